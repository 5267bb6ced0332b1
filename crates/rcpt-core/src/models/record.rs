//! Receipt record model with a fixed, uniform schema.

use std::fmt;

use serde::{Serialize, Serializer};

/// Marker written wherever a field could not be extracted.
pub const NOT_FOUND_MARKER: &str = "ERROR";

/// Result of one extraction rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The rule matched and produced this text.
    Found(String),
    /// An anchor or terminator was missing.
    NotFound,
}

impl FieldValue {
    pub fn found(value: impl Into<String>) -> Self {
        Self::Found(value.into())
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Rendered text, with `NotFound` as [`NOT_FOUND_MARKER`].
    pub fn as_str(&self) -> &str {
        match self {
            Self::Found(value) => value,
            Self::NotFound => NOT_FOUND_MARKER,
        }
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::NotFound
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::NotFound, Self::found)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Metadata extracted from one receipt document.
///
/// Every field exists in every record; a miss is `FieldValue::NotFound`, so
/// the report schema stays uniform across the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub order_number: FieldValue,
    pub billing_number: FieldValue,
    /// `yyyy/mm/dd`.
    pub purchase_date: FieldValue,
    /// `yyyy/mm`, derived from the purchase date.
    pub purchase_month: FieldValue,
    /// `yyyy/mm/dd`.
    pub billing_date: FieldValue,
    /// Billed total as printed, without the currency unit.
    pub total_amount: FieldValue,
    pub billing_name: FieldValue,
    pub shipping_name: FieldValue,
    pub mall_name: String,
    /// Path of the source document relative to the input root.
    pub source_file: String,
    /// Derived filename, `NotFound` when it cannot be derived.
    pub renamed_file: FieldValue,
    /// Receipt section the rules ran against.
    pub receipt_section: FieldValue,
}

impl Record {
    /// Column order of the tabular report.
    pub const FIELD_NAMES: [&'static str; 12] = [
        "order_number",
        "billing_number",
        "purchase_date",
        "purchase_month",
        "billing_date",
        "total_amount",
        "billing_name",
        "shipping_name",
        "mall_name",
        "source_file",
        "renamed_file",
        "receipt_section",
    ];

    /// Column labels in the receipt's own language, in the same order.
    pub const TEMPLATE_HEADERS: [&'static str; 12] = [
        "注文番号",
        "請求番号",
        "注文日",
        "注文月",
        "請求日",
        "請求金額",
        "請求先",
        "配送先",
        "モール名",
        "リネーム前ファイル名",
        "リネーム後ファイル名",
        "領収証内情報",
    ];

    /// Field values in [`Record::FIELD_NAMES`] order.
    pub fn to_row(&self) -> [&str; 12] {
        [
            self.order_number.as_str(),
            self.billing_number.as_str(),
            self.purchase_date.as_str(),
            self.purchase_month.as_str(),
            self.billing_date.as_str(),
            self.total_amount.as_str(),
            self.billing_name.as_str(),
            self.shipping_name.as_str(),
            &self.mall_name,
            &self.source_file,
            self.renamed_file.as_str(),
            self.receipt_section.as_str(),
        ]
    }

    /// True when none of the seven extracted fields was found.
    ///
    /// A single hit makes the record usable; missing fields alone do not.
    pub fn is_fully_failed(&self) -> bool {
        [
            &self.order_number,
            &self.billing_number,
            &self.purchase_date,
            &self.billing_date,
            &self.total_amount,
            &self.billing_name,
            &self.shipping_name,
        ]
        .iter()
        .all(|value| value.is_not_found())
    }

    /// Report ordering key: purchase date, then order number, as rendered.
    pub fn sort_key(&self) -> (&str, &str) {
        (self.purchase_date.as_str(), self.order_number.as_str())
    }
}
