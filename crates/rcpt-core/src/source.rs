//! Document discovery under an input folder.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;

/// A discovered source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the input root, `/`-separated. Used as the id in
    /// reports.
    pub id: String,
    /// Path relative to the input root.
    pub relative_path: PathBuf,
    /// Path to open.
    pub path: PathBuf,
}

/// Trait for document traversal.
pub trait DocumentSource {
    /// All documents, in processing order.
    fn documents(&self) -> Result<Vec<Document>>;
}

/// PDF files under a folder, shallow levels first.
///
/// With the default depth of 2 this yields the files directly in the root,
/// then the files of each subfolder, subfolder by subfolder. Names are
/// visited in sorted order so runs are reproducible.
pub struct FolderSource {
    root: PathBuf,
    max_depth: usize,
    extension: String,
}

impl FolderSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: 2,
            extension: "pdf".to_string(),
        }
    }

    /// Folder levels to scan; 1 is the root only, 0 is unlimited.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// File extension of documents (case-insensitive).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

impl DocumentSource for FolderSource {
    fn documents(&self) -> Result<Vec<Document>> {
        let mut walker = WalkDir::new(&self.root).min_depth(1).sort_by_file_name();
        if self.max_depth > 0 {
            walker = walker.max_depth(self.max_depth);
        }

        let mut found: Vec<(usize, Document)> = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // An unreadable root is fatal; an unreadable subfolder is skipped
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.is_document(entry.path()) {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or(entry.path())
                .to_path_buf();
            let id = relative_path
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            found.push((
                entry.depth(),
                Document {
                    id,
                    relative_path,
                    path: entry.path().to_path_buf(),
                },
            ));
        }

        // Stable: keeps each subfolder's files together, in name order
        found.sort_by_key(|(depth, _)| *depth);

        debug!("Found {} documents under {}", found.len(), self.root.display());
        Ok(found.into_iter().map(|(_, document)| document).collect())
    }
}
