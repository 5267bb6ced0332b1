//! Record assembly: section narrowing, rule dispatch, failure classification.

use tracing::{debug, trace};

use crate::models::config::{RcptConfig, TemplateConfig};
use crate::models::record::{FieldValue, Record};

use super::normalizer::NormalizedText;
use super::rules::{
    after_first, before_first, AnchorRule, DateRule, FieldExtractor, PartyNameRule,
};
use super::{Assembly, RecordAssembler};

/// Assembler for the single receipt template described by [`TemplateConfig`].
#[derive(Debug, Clone)]
pub struct ReceiptAssembler {
    section_start: String,
    section_end: String,
    order_number: AnchorRule,
    billing_number: AnchorRule,
    purchase_date: DateRule,
    billing_date: DateRule,
    total_amount: AnchorRule,
    billing_name: PartyNameRule,
    shipping_name: PartyNameRule,
    mall_label: String,
}

impl ReceiptAssembler {
    /// Create an assembler for a template.
    pub fn new(template: &TemplateConfig) -> Self {
        Self {
            section_start: template.section_start.clone(),
            section_end: template.section_end.clone(),
            order_number: AnchorRule::line(&template.order_number_anchor),
            billing_number: AnchorRule::line(&template.billing_number_anchor),
            purchase_date: DateRule::new(&template.purchase_date_anchor),
            billing_date: DateRule::new(&template.billing_date_anchor),
            total_amount: AnchorRule::until(&template.total_amount_anchor, &template.currency_unit),
            billing_name: PartyNameRule::new(
                &template.billing_party_anchor,
                &template.name_suffix,
                template.name_line_offset,
            ),
            shipping_name: PartyNameRule::new(
                &template.shipping_party_anchor,
                &template.name_suffix,
                template.name_line_offset,
            ),
            mall_label: template.mall_label.clone(),
        }
    }

    /// Create an assembler from the full pipeline configuration.
    pub fn from_config(config: &RcptConfig) -> Self {
        Self::new(&config.template).with_strict_dates(config.extraction.strict_dates)
    }

    /// Set the seller label written to every record.
    pub fn with_mall_label(mut self, label: impl Into<String>) -> Self {
        self.mall_label = label.into();
        self
    }

    /// Set calendar validation of both date fields.
    pub fn with_strict_dates(mut self, strict: bool) -> Self {
        self.purchase_date = self.purchase_date.with_strict(strict);
        self.billing_date = self.billing_date.with_strict(strict);
        self
    }

    /// Receipt section: text between the section start and the following
    /// section end, with spaces removed so anchors match regardless of
    /// the layout's padding.
    pub fn narrow_section(&self, text: &str) -> FieldValue {
        after_first(text, &self.section_start)
            .and_then(|rest| before_first(rest, &self.section_end))
            .map(|section| section.replace(' ', ""))
            .into()
    }
}

impl Default for ReceiptAssembler {
    fn default() -> Self {
        Self::new(&TemplateConfig::default())
    }
}

impl RecordAssembler for ReceiptAssembler {
    fn assemble(&self, text: &NormalizedText) -> Assembly {
        let receipt_section = self.narrow_section(text);
        let section_missing = receipt_section.is_not_found();
        if section_missing {
            debug!(
                "Receipt section not found between {:?} and {:?}",
                self.section_start, self.section_end
            );
        }

        // Rules still run on a missing section so every record has every field
        let section = receipt_section.as_str();
        let order_number = self.order_number.extract(section);
        let billing_number = self.billing_number.extract(section);
        let purchase = self.purchase_date.extract(section);
        let billing = self.billing_date.extract(section);
        let total_amount = self.total_amount.extract(section);
        let billing_name = self.billing_name.extract(section);
        let shipping_name = self.shipping_name.extract(section);

        let record = Record {
            order_number,
            billing_number,
            purchase_date: purchase.date,
            purchase_month: purchase.month,
            billing_date: billing.date,
            total_amount,
            billing_name,
            shipping_name,
            mall_name: self.mall_label.clone(),
            source_file: String::new(),
            renamed_file: FieldValue::NotFound,
            receipt_section,
        };

        let fully_failed = section_missing || record.is_fully_failed();
        trace!(
            "Assembled record: order={} billing={} date={} fully_failed={}",
            record.order_number, record.billing_number, record.purchase_date, fully_failed
        );

        Assembly {
            record,
            fully_failed,
        }
    }
}
