//! Canonical filename derivation for renamed receipt copies.

use crate::models::config::TemplateConfig;
use crate::models::record::Record;

/// Builds `<date>_<receipt>_<purchase>_<mall>_<amount><unit>_<order><no>_<billing><no>.pdf`.
#[derive(Debug, Clone)]
pub struct FilenameDeriver {
    receipt_label: String,
    purchase_label: String,
    currency_unit: String,
    order_number_prefix: String,
    billing_number_prefix: String,
}

impl FilenameDeriver {
    pub fn new(template: &TemplateConfig) -> Self {
        Self {
            receipt_label: template.receipt_label.clone(),
            purchase_label: template.purchase_label.clone(),
            currency_unit: template.currency_unit.clone(),
            order_number_prefix: template.order_number_prefix.clone(),
            billing_number_prefix: template.billing_number_prefix.clone(),
        }
    }

    /// Filename for `record`, or `None` when the order number, billing
    /// number, purchase date or amount is missing. Party names are not needed.
    pub fn derive(&self, record: &Record) -> Option<String> {
        let order_number = record.order_number.as_option()?;
        let billing_number = record.billing_number.as_option()?;
        let purchase_date = record.purchase_date.as_option()?;
        let total_amount = record.total_amount.as_option()?;

        Some(format!(
            "{}_{}_{}_{}_{}{}_{}{}_{}{}.pdf",
            purchase_date.replace('/', "-"),
            self.receipt_label,
            self.purchase_label,
            record.mall_name,
            total_amount,
            self.currency_unit,
            self.order_number_prefix,
            order_number,
            self.billing_number_prefix,
            billing_number,
        ))
    }
}

impl Default for FilenameDeriver {
    fn default() -> Self {
        Self::new(&TemplateConfig::default())
    }
}
