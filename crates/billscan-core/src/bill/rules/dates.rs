//! Due date and billing month extraction.
//!
//! Dates are kept as printed; bills mix `15 JAN 24` and `15/01/2024`
//! styles and downstream consumers only display them.

use regex::Regex;

use super::patterns::{BILL_MONTH, DUE_DATE_NUMERIC, DUE_DATE_TEXTUAL};
use super::FieldExtractor;

fn first_group(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Due date extractor.
pub struct DueDateExtractor;

impl DueDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DueDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DueDateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        [&*DUE_DATE_TEXTUAL, &*DUE_DATE_NUMERIC]
            .into_iter()
            .filter_map(|pattern| first_group(pattern, text))
            .collect()
    }
}

/// Billing month extractor.
pub struct BillMonthExtractor;

impl BillMonthExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BillMonthExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BillMonthExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_group(&BILL_MONTH, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        BILL_MONTH
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::rules::normalize_text;

    #[test]
    fn test_textual_due_date() {
        let text = normalize_text("Due Date: 15 Jan 24");
        assert_eq!(DueDateExtractor::new().extract(&text), Some("15 JAN 24".to_string()));
    }

    #[test]
    fn test_numeric_due_date() {
        let text = normalize_text("DUE DATE 15/01/2024");
        assert_eq!(DueDateExtractor::new().extract(&text), Some("15/01/2024".to_string()));

        let text = normalize_text("due date: 5-1-24");
        assert_eq!(DueDateExtractor::new().extract(&text), Some("5-1-24".to_string()));
    }

    #[test]
    fn test_textual_form_wins() {
        let text = normalize_text("DUE DATE 02/02/2024 ... DUE DATE 03 FEB 2024");
        assert_eq!(DueDateExtractor::new().extract(&text), Some("03 FEB 2024".to_string()));
    }

    #[test]
    fn test_due_date_not_confused_by_payable_label() {
        let text = normalize_text("PAYABLE WITHIN DUE DATE RS 4500");
        assert_eq!(DueDateExtractor::new().extract(&text), None);
    }

    #[test]
    fn test_bill_month() {
        let text = normalize_text("Bill Month: Jan 24 Reading Date 05 Jan");
        assert_eq!(BillMonthExtractor::new().extract(&text), Some("JAN 24".to_string()));
        assert_eq!(BillMonthExtractor::new().extract("NO MONTH"), None);
    }
}
