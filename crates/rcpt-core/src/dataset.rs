//! Record accumulation, report ordering, and the failed-document log.

use tracing::debug;

use crate::models::record::Record;

/// Text of a document from which nothing could be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    /// Document identifier (path relative to the input root).
    pub id: String,
    /// Normalized document text.
    pub text: String,
}

/// Failed documents kept for manual diagnosis.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.entries.push(ErrorEntry {
            id: id.into(),
            text: text.into(),
        });
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Report body: each entry as its id, its text, and a blank separator.
    pub fn render(&self) -> String {
        let mut output = String::new();
        for entry in &self.entries {
            output.push_str(&entry.id);
            output.push('\n');
            output.push_str(&entry.text);
            output.push_str("\n\n");
        }
        output
    }
}

/// Collects one record per document in discovery order.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    records: Vec<Record>,
    error_log: ErrorLog,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Fully failed documents also log their text.
    pub fn push(&mut self, record: Record, fully_failed: bool, text: &str) {
        if fully_failed {
            self.error_log.push(record.source_file.clone(), text);
        }
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sort once by (purchase date, order number). The sort is stable, so
    /// equal keys stay in discovery order.
    pub fn finish(self) -> Dataset {
        let mut records = self.records;
        records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        debug!(
            "Sorted {} records, {} fully failed",
            records.len(),
            self.error_log.len()
        );

        Dataset {
            records,
            error_log: self.error_log,
        }
    }
}

/// Sorted records of a batch plus its error log.
#[derive(Debug, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub error_log: ErrorLog,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
