//! Date rules: `mm/dd/yyyy` on the receipt, `yyyy/mm/dd` in the record.

use chrono::NaiveDate;

use super::{AnchorRule, FieldExtractor};
use crate::models::record::FieldValue;

/// A reordered date and the month it falls in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFields {
    /// `yyyy/mm/dd`.
    pub date: FieldValue,
    /// `yyyy/mm`.
    pub month: FieldValue,
}

/// Date printed after an anchor, up to the line break.
///
/// The parts are reordered as text. Without strict mode nothing is
/// validated, so `13/45/20x4` becomes `20x4/13/45`.
#[derive(Debug, Clone)]
pub struct DateRule {
    rule: AnchorRule,
    strict: bool,
}

impl DateRule {
    pub fn new(anchor: impl Into<String>) -> Self {
        Self {
            rule: AnchorRule::line(anchor),
            strict: false,
        }
    }

    /// Reject parts that do not form a calendar date.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn reorder(&self, token: &str) -> Option<(String, String)> {
        // Parts past the third are ignored
        let mut parts = token.split('/');
        let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);

        if self.strict && !is_calendar_date(year, month, day) {
            return None;
        }

        Some((
            format!("{year}/{month}/{day}"),
            format!("{year}/{month}"),
        ))
    }
}

impl FieldExtractor for DateRule {
    type Output = DateFields;

    fn extract(&self, text: &str) -> DateFields {
        match self.rule.find(text).and_then(|token| self.reorder(token)) {
            Some((date, month)) => DateFields {
                date: FieldValue::Found(date),
                month: FieldValue::Found(month),
            },
            None => DateFields::default(),
        }
    }
}

fn is_calendar_date(year: &str, month: &str, day: &str) -> bool {
    let (Ok(year), Ok(month), Ok(day)) = (
        year.parse::<i32>(),
        month.parse::<u32>(),
        day.parse::<u32>(),
    ) else {
        return false;
    };
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}
