//! Party name rule for the billing and shipping blocks.

use super::{after_first, before_first, FieldExtractor};
use crate::models::record::FieldValue;

/// Name printed a fixed number of lines below a block heading.
///
/// The template prints the heading, then address lines, then the name
/// followed by an honorific. The rule does not look for the name: it trusts
/// the line offset. If the layout shifts by one line it returns the wrong
/// line without noticing, so the offset is configurable.
#[derive(Debug, Clone)]
pub struct PartyNameRule {
    anchor: String,
    suffix: String,
    line_offset: usize,
}

impl PartyNameRule {
    pub fn new(anchor: impl Into<String>, suffix: impl Into<String>, line_offset: usize) -> Self {
        Self {
            anchor: anchor.into(),
            suffix: suffix.into(),
            line_offset,
        }
    }
}

impl FieldExtractor for PartyNameRule {
    type Output = FieldValue;

    fn extract(&self, text: &str) -> FieldValue {
        if !text.contains(&self.suffix) {
            return FieldValue::NotFound;
        }
        // Line 0 is the rest of the heading line
        let line = after_first(text, &self.anchor)
            .and_then(|block| block.split('\n').nth(self.line_offset));

        match line {
            Some(line) => FieldValue::found(before_first(line, &self.suffix).unwrap_or(line)),
            None => FieldValue::NotFound,
        }
    }
}
