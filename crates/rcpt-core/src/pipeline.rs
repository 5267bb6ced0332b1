//! Sequential batch processing: one document at a time, in discovery order.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::dataset::{Dataset, DatasetBuilder};
use crate::error::Result;
use crate::models::config::RcptConfig;
use crate::models::record::Record;
use crate::pdf::{PdfTextExtractor, TextExtractor};
use crate::receipt::{normalize, Assembly, FilenameDeriver, ReceiptAssembler, RecordAssembler};
use crate::source::{Document, DocumentSource};

/// What happened to one document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub record: Record,
    pub fully_failed: bool,
    /// Normalized document text.
    pub text: String,
    /// Text extraction failed; the record was built from empty text.
    pub unreadable: bool,
    /// Path of the renamed copy, if one was written.
    pub copied_to: Option<PathBuf>,
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Sorted records and the error log.
    pub dataset: Dataset,
    /// Renamed copies written.
    pub copied: usize,
    /// Renamed copies that could not be written.
    pub copy_failures: usize,
    /// Documents whose text could not be extracted.
    pub unreadable: usize,
}

/// Runs extraction over a batch of documents.
pub struct BatchProcessor<A = ReceiptAssembler, E = PdfTextExtractor> {
    assembler: A,
    extractor: E,
    deriver: FilenameDeriver,
    copy_root: Option<PathBuf>,
}

impl BatchProcessor {
    /// Processor for PDFs, set up from the pipeline configuration.
    pub fn from_config(config: &RcptConfig) -> Self {
        let processor = Self::new(
            ReceiptAssembler::from_config(config),
            PdfTextExtractor::new(),
            FilenameDeriver::new(&config.template),
        );
        if config.output.copy_renamed {
            processor.with_copy_to(&config.output.output_dir)
        } else {
            processor
        }
    }
}

impl<A: RecordAssembler, E: TextExtractor> BatchProcessor<A, E> {
    pub fn new(assembler: A, extractor: E, deriver: FilenameDeriver) -> Self {
        Self {
            assembler,
            extractor,
            deriver,
            copy_root: None,
        }
    }

    /// Copy each document with a derivable filename under `root`, mirroring
    /// its folder below the input root.
    pub fn with_copy_to(mut self, root: impl Into<PathBuf>) -> Self {
        self.copy_root = Some(root.into());
        self
    }

    pub fn copies_enabled(&self) -> bool {
        self.copy_root.is_some()
    }

    /// Extract, assemble and optionally copy a single document.
    ///
    /// Never fails: unreadable text and failed copies are logged and
    /// reported in the result.
    pub fn process_document(&self, document: &Document) -> ProcessedDocument {
        let (raw, unreadable) = match self.extractor.extract_document_text(&document.path) {
            Ok(raw) => (raw, false),
            Err(e) => {
                warn!("Could not extract text from {}: {}", document.id, e);
                (String::new(), true)
            }
        };
        let text = normalize(&raw);

        let Assembly {
            mut record,
            fully_failed,
        } = self.assembler.assemble(&text);
        record.source_file = document.id.clone();

        let renamed = self.deriver.derive(&record);
        let copied_to = match (&renamed, &self.copy_root) {
            (Some(name), Some(root)) => self.copy_renamed(document, root, name),
            (None, Some(_)) => {
                debug!("No filename for {}, copy skipped", document.id);
                None
            }
            _ => None,
        };
        record.renamed_file = renamed.into();

        if fully_failed {
            warn!("Nothing extracted from {}", document.id);
        }

        ProcessedDocument {
            record,
            fully_failed,
            text: text.into_string(),
            unreadable,
            copied_to,
        }
    }

    /// Process `documents` in order, calling `on_document` after each one.
    pub fn process_all<F>(&self, documents: &[Document], mut on_document: F) -> BatchOutcome
    where
        F: FnMut(&Document, &ProcessedDocument),
    {
        let mut builder = DatasetBuilder::new();
        let mut outcome = BatchOutcome::default();

        for document in documents {
            let processed = self.process_document(document);
            on_document(document, &processed);

            if processed.unreadable {
                outcome.unreadable += 1;
            }
            match (&processed.copied_to, &processed.record.renamed_file) {
                (Some(_), _) => outcome.copied += 1,
                (None, renamed) if renamed.is_found() && self.copies_enabled() => {
                    outcome.copy_failures += 1
                }
                _ => {}
            }

            builder.push(processed.record, processed.fully_failed, &processed.text);
        }

        outcome.dataset = builder.finish();
        info!(
            "Processed {} documents: {} fully failed, {} copied",
            outcome.dataset.len(),
            outcome.dataset.error_log.len(),
            outcome.copied
        );
        outcome
    }

    /// Discover documents from `source` and process them all.
    pub fn run<S: DocumentSource + ?Sized>(&self, source: &S) -> Result<BatchOutcome> {
        let documents = source.documents()?;
        Ok(self.process_all(&documents, |_, _| {}))
    }

    fn copy_renamed(&self, document: &Document, root: &Path, name: &str) -> Option<PathBuf> {
        let folder = match document.relative_path.parent() {
            Some(parent) => root.join(parent),
            None => root.to_path_buf(),
        };
        let target = folder.join(name);

        let result = fs::create_dir_all(&folder).and_then(|_| fs::copy(&document.path, &target));
        match result {
            Ok(_) => {
                debug!("Copied {} to {}", document.id, target.display());
                Some(target)
            }
            Err(e) => {
                warn!("Failed to copy {} to {}: {}", document.id, target.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RcptError;
    use crate::models::record::FieldValue;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Serves text from memory, keyed by file name.
    struct FakeText(HashMap<String, String>);

    impl FakeText {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(name, text)| (name.to_string(), text.to_string()))
                    .collect(),
            )
        }
    }

    impl TextExtractor for FakeText {
        fn extract_document_text(&self, path: &Path) -> Result<String> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            self.0
                .get(&name)
                .cloned()
                .ok_or_else(|| RcptError::Config(format!("no text for {name}")))
        }
    }

    fn receipt(order: &str, date: &str) -> String {
        format!(
            "領収証\nご注文番号: {order}\nご請求番号: B-{order}\n発行日: {date}\n請求日: {date}\nご請求金額: 1,000 円\nPage 1\n"
        )
    }

    fn document(root: &Path, relative: &str) -> Document {
        Document {
            id: relative.to_string(),
            relative_path: PathBuf::from(relative),
            path: root.join(relative),
        }
    }

    fn processor(texts: FakeText) -> BatchProcessor<ReceiptAssembler, FakeText> {
        BatchProcessor::new(ReceiptAssembler::default(), texts, FilenameDeriver::default())
    }

    #[test]
    fn test_end_to_end_record() {
        let texts = FakeText::new(&[("a.pdf", receipt("A1", "01/02/2024").as_str())]);
        let processed = processor(texts).process_document(&document(Path::new("/in"), "a.pdf"));

        assert!(!processed.fully_failed);
        assert_eq!(processed.record.source_file, "a.pdf");
        assert_eq!(
            processed.record.renamed_file,
            FieldValue::found("2024-01-02_領収証_仕入_AppleJapan合同会社_1,000円_注文番号A1_請求番号B-A1.pdf")
        );
        assert_eq!(processed.copied_to, None);
    }

    #[test]
    fn test_batch_sorts_and_logs_failures() {
        let texts = FakeText::new(&[
            ("late.pdf", receipt("A2", "03/01/2024").as_str()),
            ("junk.pdf", "no receipt here"),
            ("early.pdf", receipt("A1", "01/15/2024").as_str()),
        ]);
        let root = Path::new("/in");
        let documents = vec![
            document(root, "late.pdf"),
            document(root, "junk.pdf"),
            document(root, "sub/early.pdf"),
        ];

        let mut seen = Vec::new();
        let outcome = processor(texts).process_all(&documents, |doc, _| seen.push(doc.id.clone()));

        assert_eq!(seen, vec!["late.pdf", "junk.pdf", "sub/early.pdf"]);
        let order: Vec<&str> = outcome
            .dataset
            .records
            .iter()
            .map(|r| r.source_file.as_str())
            .collect();
        assert_eq!(order, vec!["sub/early.pdf", "late.pdf", "junk.pdf"]);

        let log = outcome.dataset.error_log.entries();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, "junk.pdf");
        assert_eq!(log[0].text, "no receipt here");
        assert_eq!(outcome.dataset.records[2].renamed_file, FieldValue::NotFound);
    }

    #[test]
    fn test_unreadable_document_is_fully_failed() {
        let processed = processor(FakeText::new(&[]))
            .process_document(&document(Path::new("/in"), "missing.pdf"));

        assert!(processed.unreadable);
        assert!(processed.fully_failed);
        assert!(processed.record.is_fully_failed());
        assert_eq!(processed.record.source_file, "missing.pdf");
    }

    #[test]
    fn test_copies_mirror_subfolders() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::create_dir_all(input.path().join("sub")).unwrap();
        fs::write(input.path().join("sub/a.pdf"), b"%PDF-a").unwrap();
        fs::write(input.path().join("b.pdf"), b"%PDF-b").unwrap();
        fs::write(input.path().join("partial.pdf"), b"%PDF-c").unwrap();

        let texts = FakeText::new(&[
            ("a.pdf", receipt("A1", "01/02/2024").as_str()),
            ("b.pdf", receipt("B1", "02/03/2024").as_str()),
            ("partial.pdf", "領収証\nご注文番号: C1\nPage"),
        ]);
        let documents = vec![
            document(input.path(), "b.pdf"),
            document(input.path(), "partial.pdf"),
            document(input.path(), "sub/a.pdf"),
        ];

        let outcome = processor(texts)
            .with_copy_to(output.path())
            .process_all(&documents, |_, _| {});

        assert_eq!(outcome.copied, 2);
        assert_eq!(outcome.copy_failures, 0);

        let copied = output
            .path()
            .join("sub")
            .join("2024-01-02_領収証_仕入_AppleJapan合同会社_1,000円_注文番号A1_請求番号B-A1.pdf");
        assert_eq!(fs::read(copied).unwrap(), b"%PDF-a");
        assert!(output
            .path()
            .join("2024-02-03_領収証_仕入_AppleJapan合同会社_1,000円_注文番号B1_請求番号B-B1.pdf")
            .exists());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_failed_copy_does_not_abort() {
        let output = tempfile::tempdir().unwrap();
        let texts = FakeText::new(&[("gone.pdf", receipt("A1", "01/02/2024").as_str())]);
        let documents = vec![document(Path::new("/nonexistent-input"), "gone.pdf")];

        let outcome = processor(texts)
            .with_copy_to(output.path())
            .process_all(&documents, |_, _| {});

        assert_eq!(outcome.copied, 0);
        assert_eq!(outcome.copy_failures, 1);
        assert_eq!(outcome.dataset.len(), 1);
    }

    #[test]
    fn test_run_discovers_from_source() {
        let input = tempfile::tempdir().unwrap();
        fs::create_dir_all(input.path().join("sub")).unwrap();
        fs::write(input.path().join("sub/a.pdf"), b"%PDF-a").unwrap();
        fs::write(input.path().join("b.pdf"), b"%PDF-b").unwrap();

        let texts = FakeText::new(&[
            ("a.pdf", receipt("A1", "01/02/2024").as_str()),
            ("b.pdf", receipt("B1", "01/02/2024").as_str()),
        ]);
        let outcome = processor(texts)
            .run(&crate::source::FolderSource::new(input.path()))
            .unwrap();

        let order: Vec<&str> = outcome
            .dataset
            .records
            .iter()
            .map(|r| r.source_file.as_str())
            .collect();
        assert_eq!(order, vec!["b.pdf", "sub/a.pdf"]);
        assert!(outcome.dataset.error_log.is_empty());
    }
}
