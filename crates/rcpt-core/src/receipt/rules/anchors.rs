//! Anchor-delimited extraction shared by every field rule.

use super::FieldExtractor;
use crate::models::record::FieldValue;

/// Text strictly after the first occurrence of `anchor`.
pub fn after_first<'a>(text: &'a str, anchor: &str) -> Option<&'a str> {
    text.find(anchor).map(|pos| &text[pos + anchor.len()..])
}

/// Text strictly before the first occurrence of `terminator`.
pub fn before_first<'a>(text: &'a str, terminator: &str) -> Option<&'a str> {
    text.find(terminator).map(|pos| &text[..pos])
}

/// Where an anchored value ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminator {
    /// End of line; a value on the last line runs to the end of the text.
    Newline,
    /// A marker that must appear somewhere in the text, e.g. a currency
    /// unit. When it does not follow the anchor the value runs to the end.
    Required(String),
}

/// Value between a literal anchor and a terminator.
#[derive(Debug, Clone)]
pub struct AnchorRule {
    anchor: String,
    terminator: Terminator,
}

impl AnchorRule {
    pub fn new(anchor: impl Into<String>, terminator: Terminator) -> Self {
        Self {
            anchor: anchor.into(),
            terminator,
        }
    }

    /// Rule for a value that ends at the line break.
    pub fn line(anchor: impl Into<String>) -> Self {
        Self::new(anchor, Terminator::Newline)
    }

    /// Rule for a value closed by `unit`; the text must contain `unit`.
    pub fn until(anchor: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(anchor, Terminator::Required(unit.into()))
    }

    /// Raw slice of `text` this rule matches.
    pub fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        let end = match &self.terminator {
            Terminator::Newline => "\n",
            Terminator::Required(marker) if text.contains(marker.as_str()) => marker.as_str(),
            Terminator::Required(_) => return None,
        };
        let rest = after_first(text, &self.anchor)?;
        Some(before_first(rest, end).unwrap_or(rest))
    }
}

impl FieldExtractor for AnchorRule {
    type Output = FieldValue;

    fn extract(&self, text: &str) -> FieldValue {
        self.find(text).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_rule() {
        let rule = AnchorRule::line("ご注文番号:");
        assert_eq!(
            rule.extract("x\nご注文番号:W123456789\nご請求番号:MA1"),
            FieldValue::found("W123456789")
        );
    }

    #[test]
    fn test_line_rule_on_last_line() {
        let rule = AnchorRule::line("ご注文番号:");
        assert_eq!(rule.extract("ご注文番号:A1"), FieldValue::found("A1"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let rule = AnchorRule::line("ご注文番号:");
        assert_eq!(
            rule.extract("ご注文番号:A1\nご注文番号:A2\n"),
            FieldValue::found("A1")
        );
    }

    #[test]
    fn test_missing_anchor() {
        let rule = AnchorRule::line("ご注文番号:");
        assert_eq!(rule.extract("ご請求番号:B2\n"), FieldValue::NotFound);
        assert_eq!(rule.extract(""), FieldValue::NotFound);
        assert_eq!(rule.extract("ERROR"), FieldValue::NotFound);
    }

    #[test]
    fn test_required_terminator() {
        let rule = AnchorRule::until("ご請求金額:", "円");
        assert_eq!(
            rule.extract("ご請求金額:219,800円\n"),
            FieldValue::found("219,800")
        );
        assert_eq!(rule.extract("ご請求金額:219,800\n"), FieldValue::NotFound);
    }

    #[test]
    fn test_terminator_elsewhere_in_text_runs_to_end() {
        let rule = AnchorRule::until("ご請求金額:", "円");
        assert_eq!(
            rule.extract("小計:200,000円\nご請求金額:219,800\n"),
            FieldValue::found("219,800\n")
        );
        assert_eq!(
            rule.extract("小計:200,000円\nご注文番号:A1\n"),
            FieldValue::NotFound
        );
    }

    #[test]
    fn test_no_trimming() {
        let rule = AnchorRule::line("No:");
        assert_eq!(rule.extract("No: 7 \n"), FieldValue::found(" 7 "));
        assert_eq!(rule.extract("No:\n"), FieldValue::found(""));
    }
}
