//! Monetary amount extraction for utility bills.

use regex::Captures;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    AFTER_DUE_DATE, AMOUNT_PAYABLE, BILL_AMOUNT, CURRENT_BILL, PAYABLE_WITHIN_DUE_DATE,
    TOTAL_AMOUNT,
};
use super::FieldExtractor;
use crate::bill::resolver::{resolve, Candidate, FieldRule, PlausibleRange, Resolution};

/// Rule name of the current-bill phrasing, recorded separately from the total.
pub const CURRENT_BILL_RULE: &str = "current_bill";

fn amount_group(caps: &Captures<'_>) -> Option<Decimal> {
    caps.get(1).and_then(|m| parse_amount(m.as_str()))
}

/// Payable-amount rules, most authoritative first.
pub fn payable_rules(range: PlausibleRange) -> Vec<FieldRule> {
    vec![
        FieldRule {
            name: "payable_within_due_date",
            pattern: &PAYABLE_WITHIN_DUE_DATE,
            priority: 1,
            range,
            value: amount_group,
        },
        FieldRule {
            name: "amount_payable",
            pattern: &AMOUNT_PAYABLE,
            priority: 2,
            range,
            value: amount_group,
        },
        FieldRule {
            name: "total_amount",
            pattern: &TOTAL_AMOUNT,
            priority: 3,
            range,
            value: amount_group,
        },
        FieldRule {
            name: CURRENT_BILL_RULE,
            pattern: &CURRENT_BILL,
            priority: 4,
            range,
            value: amount_group,
        },
        FieldRule {
            name: "bill_amount",
            pattern: &BILL_AMOUNT,
            priority: 5,
            range,
            value: amount_group,
        },
    ]
}

/// Payable amount extractor.
pub struct PayableExtractor {
    rules: Vec<FieldRule>,
}

/// Resolved payable amounts.
#[derive(Debug, Clone, Default)]
pub struct PayableAmounts {
    /// Resolution of the amount to pay.
    pub total: Resolution,
    /// In-range "current bill" figure, whether or not it won.
    pub current_bill: Option<Candidate>,
}

impl PayableExtractor {
    pub fn new(range: PlausibleRange) -> Self {
        Self {
            rules: payable_rules(range),
        }
    }

    pub fn resolve(&self, text: &str) -> PayableAmounts {
        let total = resolve(text, &self.rules);
        let current_bill = total.accepted_from(CURRENT_BILL_RULE).cloned();
        PayableAmounts {
            total,
            current_bill,
        }
    }
}

impl Default for PayableExtractor {
    fn default() -> Self {
        Self::new(PlausibleRange::new(Decimal::from(100), Decimal::from(100_000)))
    }
}

impl FieldExtractor for PayableExtractor {
    type Output = Candidate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.resolve(text).total.selected
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.resolve(text).total.accepted
    }
}

/// Amount owed when paid after the due date. No plausibility filter.
pub fn extract_after_due_date(text: &str) -> Option<Decimal> {
    AFTER_DUE_DATE
        .captures(text)
        .and_then(|caps| amount_group(&caps))
}

/// Parse an amount such as `4,500.00` or `980`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Format an amount with thousands separators (`12,345.50`).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let Some((integer_part, decimal_part)) = unsigned.split_once('.') else {
        return s;
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::resolver::Rejection;
    use crate::bill::rules::normalize_text;

    fn payable(text: &str) -> PayableAmounts {
        PayableExtractor::default().resolve(&normalize_text(text))
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("4,500.00"), Some(Decimal::new(450000, 2)));
        assert_eq!(parse_amount("980"), Some(Decimal::from(980)));
        assert_eq!(parse_amount("1,234,567"), Some(Decimal::from(1_234_567)));
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(1234550, 2)), "12,345.50");
        assert_eq!(format_amount(Decimal::from(980)), "980.00");
        assert_eq!(format_amount(Decimal::new(-123456, 2)), "-1,234.56");
    }

    #[test]
    fn test_payable_within_due_date_beats_current_bill() {
        let amounts = payable("CURRENT BILL RS 5000\nPAYABLE WITHIN DUE DATE RS 4500");

        assert_eq!(amounts.total.value(), Decimal::from(4500));
        assert_eq!(
            amounts.total.selected.as_ref().unwrap().rule,
            "payable_within_due_date"
        );
        assert_eq!(amounts.current_bill.unwrap().value, Decimal::from(5000));
    }

    #[test]
    fn test_amount_payable_beats_total_and_current_bill() {
        let amounts = payable("Amount Payable: Rs 3,400 Total Amount 3,900 Current Bill 4000");

        assert_eq!(amounts.total.value(), Decimal::from(3400));
        assert_eq!(amounts.total.selected.as_ref().unwrap().rule, "amount_payable");
        assert_eq!(amounts.total.accepted.len(), 3);
        assert_eq!(amounts.current_bill.unwrap().value, Decimal::from(4000));
    }

    #[test]
    fn test_amount_payable_loses_to_payable_within_due_date() {
        let amounts = payable("Amount Payable Rs 3,400\nPayable within due date Rs 3,350");

        assert_eq!(amounts.total.value(), Decimal::from(3350));
        assert_eq!(
            amounts.total.selected.as_ref().unwrap().rule,
            "payable_within_due_date"
        );
        assert!(amounts.total.accepted_from("amount_payable").is_some());
    }

    #[test]
    fn test_current_bill_wins_when_alone() {
        let amounts = payable("Current Bill: Rs. 3,250");

        assert_eq!(amounts.total.value(), Decimal::from(3250));
        assert_eq!(amounts.current_bill.unwrap().value, Decimal::from(3250));
    }

    #[test]
    fn test_total_amount_beats_bill_amount() {
        let amounts = payable("Bill Amount 2000 Net Amount PKR 1,850.50");
        assert_eq!(amounts.total.value(), Decimal::new(185050, 2));
    }

    #[test]
    fn test_out_of_range_amount_is_rejected() {
        let amounts = payable("Payable within due date Rs 250000 Bill Amount 1200");

        assert_eq!(amounts.total.value(), Decimal::from(1200));
        assert!(matches!(
            amounts.total.rejection_for("payable_within_due_date"),
            Some(Rejection::AboveRange { .. })
        ));
    }

    #[test]
    fn test_out_of_range_current_bill_not_recorded() {
        let amounts = payable("Current Bill 50");

        assert_eq!(amounts.total.value(), Decimal::ZERO);
        assert!(amounts.current_bill.is_none());
    }

    #[test]
    fn test_after_due_date() {
        let text = normalize_text("Payable after due date: Rs. 4,950");
        assert_eq!(extract_after_due_date(&text), Some(Decimal::from(4950)));
        assert_eq!(extract_after_due_date("NO LATE FEE"), None);
    }
}
