//! Anchor-based field rules for the receipt template.
//!
//! Each rule is independent and fail-closed: a missing anchor or terminator
//! yields `FieldValue::NotFound`, never an error.

pub mod anchors;
pub mod dates;
pub mod names;

pub use anchors::{after_first, before_first, AnchorRule, Terminator};
pub use dates::{DateFields, DateRule};
pub use names::PartyNameRule;

/// Trait for field rules.
pub trait FieldExtractor {
    /// The value this rule produces.
    type Output;

    /// Extract the field from normalized receipt text.
    fn extract(&self, text: &str) -> Self::Output;
}
