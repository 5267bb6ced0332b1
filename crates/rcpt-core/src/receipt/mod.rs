//! Receipt field extraction.

mod assembler;
mod filename;
mod normalizer;
pub mod rules;

pub use assembler::ReceiptAssembler;
pub use filename::FilenameDeriver;
pub use normalizer::{normalize, NormalizedText};

use crate::models::record::Record;

/// A record built from one document, with its failure classification.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Extracted record; source and renamed filenames are filled in later.
    pub record: Record,
    /// Nothing at all could be extracted.
    pub fully_failed: bool,
}

/// Trait for turning normalized document text into a record.
pub trait RecordAssembler {
    /// Extract every record field. Never fails: misses become `NotFound`.
    fn assemble(&self, text: &NormalizedText) -> Assembly;
}
