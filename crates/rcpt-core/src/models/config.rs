//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{RcptError, Result};
use crate::models::record::Record;

/// Main configuration for the rcpt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Receipt template: anchor phrases and filename labels.
    pub template: TemplateConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Input/output locations and run mode.
    pub output: OutputConfig,
}

/// Anchor phrases and labels of the receipt template.
///
/// The defaults describe the one receipt layout the extractor was written
/// for. Every rule reads its anchor from here, so a drifted layout can be
/// followed without code changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Phrase opening the receipt section.
    pub section_start: String,

    /// Phrase closing the receipt section (page footer).
    pub section_end: String,

    /// Anchor before the order number.
    pub order_number_anchor: String,

    /// Anchor before the billing number.
    pub billing_number_anchor: String,

    /// Anchor before the issue date, used as purchase date.
    pub purchase_date_anchor: String,

    /// Anchor before the billing date.
    pub billing_date_anchor: String,

    /// Anchor before the billed total.
    pub total_amount_anchor: String,

    /// Currency unit terminating the billed total.
    pub currency_unit: String,

    /// Heading of the billing-party block.
    pub billing_party_anchor: String,

    /// Heading of the shipping-party block.
    pub shipping_party_anchor: String,

    /// Honorific that follows a party name.
    pub name_suffix: String,

    /// Line index of the party name inside its block, counted from the
    /// remainder of the heading line (0).
    pub name_line_offset: usize,

    /// Seller label written to every record.
    pub mall_label: String,

    /// Document-kind label used in derived filenames.
    pub receipt_label: String,

    /// Accounting-category label used in derived filenames.
    pub purchase_label: String,

    /// Prefix of the order number in derived filenames.
    pub order_number_prefix: String,

    /// Prefix of the billing number in derived filenames.
    pub billing_number_prefix: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            section_start: "領収証".to_string(),
            section_end: "Page".to_string(),
            order_number_anchor: "ご注文番号:".to_string(),
            billing_number_anchor: "ご請求番号:".to_string(),
            purchase_date_anchor: "発行日:".to_string(),
            billing_date_anchor: "請求日:".to_string(),
            total_amount_anchor: "ご請求金額:".to_string(),
            currency_unit: "円".to_string(),
            billing_party_anchor: "請求先".to_string(),
            shipping_party_anchor: "配送先".to_string(),
            name_suffix: "様".to_string(),
            name_line_offset: 5,
            mall_label: "AppleJapan合同会社".to_string(),
            receipt_label: "領収証".to_string(),
            purchase_label: "仕入".to_string(),
            order_number_prefix: "注文番号".to_string(),
            billing_number_prefix: "請求番号".to_string(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reject dates whose parts do not form a real calendar date.
    /// Off by default: malformed date text is carried through as-is.
    pub strict_dates: bool,
}

/// Input/output locations and run mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Folder scanned for receipt PDFs.
    pub input_dir: PathBuf,

    /// Root under which renamed copies mirror the input folders.
    pub output_dir: PathBuf,

    /// Folder receiving the CSV list and the error report.
    pub report_dir: PathBuf,

    /// Copy each receipt under its derived filename.
    pub copy_renamed: bool,

    /// Folder levels scanned below and including `input_dir` (2 = top level
    /// plus one level of subfolders).
    pub max_depth: usize,

    /// `chrono` format of the timestamp in report filenames.
    pub timestamp_format: String,

    /// Header row of the CSV list.
    pub header_style: HeaderStyle,
}

/// Which names the CSV header row uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Field names, e.g. `order_number`.
    #[default]
    Field,
    /// The receipt's own labels, e.g. `注文番号`.
    Template,
}

impl HeaderStyle {
    pub fn headers(self) -> &'static [&'static str; 12] {
        match self {
            HeaderStyle::Field => &Record::FIELD_NAMES,
            HeaderStyle::Template => &Record::TEMPLATE_HEADERS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            report_dir: PathBuf::from("."),
            copy_renamed: false,
            max_depth: 2,
            timestamp_format: "%Y%m%d_%H%M".to_string(),
            header_style: HeaderStyle::Field,
        }
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| RcptError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RcptError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
