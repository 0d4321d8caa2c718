//! Regex patterns for utility bill extraction.
//!
//! All patterns run against normalized text (single spaces, upper case).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Units consumed, in fallback order
    pub static ref UNITS_LABELED: Regex = Regex::new(
        r"(?i)(?:UNITS?\s*CONSUMED?|CONSUMPTION|CURRENT\s*READING\s*-\s*PREVIOUS\s*READING)[:\s]*(\d+)(?:\s*KWH?)?"
    ).unwrap();

    pub static ref UNITS_KWH_CONSUMED: Regex = Regex::new(
        r"(?i)KWH?\s*(?:CONSUMED|USED)[:\s]*(\d+)"
    ).unwrap();

    pub static ref UNITS_TOKEN_THEN_NUMBER: Regex = Regex::new(
        r"(?i)(?:UNITS?|KWH?)[:\s|]*(\d{2,4})\b"
    ).unwrap();

    pub static ref UNITS_METER_READINGS: Regex = Regex::new(
        r"(?i)PRESENT\s*(?:READING|RDG)[:\s]*(\d+).*?PREVIOUS\s*(?:READING|RDG)[:\s]*(\d+)"
    ).unwrap();

    pub static ref UNITS_NUMBER_THEN_TOKEN: Regex = Regex::new(
        r"(?i)\b(\d{2,4})\s*(?:UNITS?|KWH?)"
    ).unwrap();

    // Dates
    pub static ref DUE_DATE_TEXTUAL: Regex = Regex::new(
        r"(?i)DUE\s*DATE[:\s]*(\d{1,2}\s*[A-Z]{3}\s*\d{2,4})"
    ).unwrap();

    pub static ref DUE_DATE_NUMERIC: Regex = Regex::new(
        r"(?i)DUE\s*DATE[:\s]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})"
    ).unwrap();

    pub static ref BILL_MONTH: Regex = Regex::new(
        r"(?i)BILL\s*MONTH[:\s]*([A-Z]{3}\s*\d{2})"
    ).unwrap();

    // Consumer reference
    pub static ref REFERENCE_NUMBER: Regex = Regex::new(
        r"(?i)REFERENCE\s*(?:NO|NUMBER|#)?[:\s]*(\d[\d\s]*[A-Z]?)\b"
    ).unwrap();

    // Payable amounts, highest priority first. Amount grammar: digit groups
    // with optional thousands commas and a two-digit fraction.
    pub static ref PAYABLE_WITHIN_DUE_DATE: Regex = Regex::new(
        r"(?i)PAYABLE\s*(?:WITHIN|BY|ON|BEFORE)?\s*DUE\s*DATE[:\s]*(?:RS\.?|PKR)?\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"
    ).unwrap();

    pub static ref AMOUNT_PAYABLE: Regex = Regex::new(
        r"(?i)(?:AMOUNT\s*)?PAYABLE[:\s]*(?:RS\.?|PKR)?\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"
    ).unwrap();

    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)(?:TOTAL|NET)\s*AMOUNT[:\s]*(?:RS\.?|PKR)?\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"
    ).unwrap();

    pub static ref CURRENT_BILL: Regex = Regex::new(
        r"(?i)CURRENT\s*BILL[:\s]*(?:RS\.?|PKR)?\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"
    ).unwrap();

    pub static ref BILL_AMOUNT: Regex = Regex::new(
        r"(?i)BILL\s*AMOUNT[:\s]*(?:RS\.?|PKR)?\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"
    ).unwrap();

    pub static ref AFTER_DUE_DATE: Regex = Regex::new(
        r"(?i)(?:PAYABLE\s*AFTER|AFTER)\s*DUE\s*DATE[:\s]*(?:RS\.?|PKR)?\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"
    ).unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse whitespace runs to a single space and upper-case the text.
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").to_uppercase()
}
