//! Unicode normalization of extracted page text.

use std::fmt;
use std::ops::Deref;

use unicode_normalization::UnicodeNormalization;

/// NFKC-normalized document text, the only input the field rules accept.
///
/// Receipts render the same glyph from different code points depending on
/// the embedded font, e.g. `⽂` (U+2F42, Kangxi radical) for `文` (U+6587).
/// Compatibility normalization folds those together so literal anchors match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Normalize raw extracted text.
    pub fn new(raw: &str) -> Self {
        Self(raw.nfkc().collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize raw text (NFKC). Total and idempotent.
pub fn normalize(raw: &str) -> NormalizedText {
    NormalizedText::new(raw)
}
