//! Core library for receipt PDF metadata extraction.
//!
//! This crate provides:
//! - PDF text extraction and Unicode normalization
//! - Anchor-based field rules for a fixed receipt template
//! - Record assembly with failure classification and filename derivation
//! - Batch processing, sorting, and CSV/error report output

pub mod dataset;
pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod receipt;
pub mod report;
pub mod source;

pub use dataset::{Dataset, DatasetBuilder, ErrorEntry, ErrorLog};
pub use error::{PdfError, RcptError, Result};
pub use models::config::{HeaderStyle, RcptConfig};
pub use models::record::{FieldValue, Record, NOT_FOUND_MARKER};
pub use pdf::{PdfExtractor, PdfProcessor, PdfTextExtractor, TextExtractor};
pub use pipeline::{BatchOutcome, BatchProcessor, ProcessedDocument};
pub use receipt::{
    normalize, Assembly, FilenameDeriver, NormalizedText, ReceiptAssembler, RecordAssembler,
};
pub use report::ReportWriter;
pub use source::{Document, DocumentSource, FolderSource};
