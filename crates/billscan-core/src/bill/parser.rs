//! Bill record assembly from normalized text.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cost::round_currency;
use crate::models::bill::BillRecord;
use crate::models::config::ExtractionConfig;

use super::resolver::Resolution;
use super::rules::{
    extract_after_due_date, normalize_text, BillMonthExtractor, DueDateExtractor,
    FieldExtractor, PayableExtractor, ReferenceExtractor, UnitsExtractor,
};

/// Result of bill text extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Assembled bill record.
    pub record: BillRecord,
    /// How units were resolved.
    pub units: Resolution,
    /// How the payable total was resolved.
    pub total: Resolution,
    /// Fields that could not be extracted.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for bill text parsing.
pub trait BillParser {
    /// Parse a bill from raw text.
    fn parse(&self, text: &str) -> ExtractionReport;
}

/// Rule-based bill text parser.
pub struct BillTextParser {
    fallback_rate: Decimal,
    units: UnitsExtractor,
    payable: PayableExtractor,
}

impl BillTextParser {
    /// Create a parser with default ranges and fallback rate.
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction configuration.
    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            fallback_rate: config.fallback_rate,
            units: UnitsExtractor::new(config.units_range),
            payable: PayableExtractor::new(config.amount_range),
        }
    }

    /// Set the rate used when it cannot be derived.
    pub fn with_fallback_rate(mut self, rate: Decimal) -> Self {
        self.fallback_rate = rate;
        self
    }

    /// Parse text that has already been normalized.
    pub fn parse_normalized(&self, text: &str) -> ExtractionReport {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let units = self.units.resolve(text);
        debug!(units = %units.value(), rule = ?units.selected.as_ref().map(|c| c.rule), "units resolved");
        if units.selected.is_none() {
            warnings.push("Could not extract units consumed".to_string());
        }

        let payable = self.payable.resolve(text);
        debug!(total = %payable.total.value(), rule = ?payable.total.selected.as_ref().map(|c| c.rule), "payable total resolved");
        if payable.total.selected.is_none() {
            warnings.push("Could not extract payable amount".to_string());
        }

        let current_bill = payable
            .current_bill
            .as_ref()
            .map(|c| c.value)
            .unwrap_or(Decimal::ZERO);

        let after_due_date = extract_after_due_date(text).unwrap_or(Decimal::ZERO);
        debug!(%after_due_date, "after-due-date amount");

        let due_date = DueDateExtractor::new().extract(text).unwrap_or_default();
        if due_date.is_empty() {
            warnings.push("Could not extract due date".to_string());
        }
        debug!(due_date = %due_date, "due date");

        let bill_month = BillMonthExtractor::new().extract(text).unwrap_or_default();
        debug!(bill_month = %bill_month, "bill month");

        let reference_number = ReferenceExtractor::new().extract(text).unwrap_or_default();
        if reference_number.is_empty() {
            warnings.push("Could not extract reference number".to_string());
        }
        debug!(reference_number = %reference_number, "reference number");

        let total = payable.total.value();
        if !after_due_date.is_zero() && after_due_date < total {
            warnings.push(format!(
                "After-due-date amount {} is lower than payable amount {}",
                after_due_date, total
            ));
        }

        let rate = derive_rate(total, units.value(), self.fallback_rate);

        let record = BillRecord {
            units: units.value(),
            total: round_currency(total),
            rate,
            current_bill: round_currency(current_bill),
            after_due_date: round_currency(after_due_date),
            due_date,
            bill_month,
            reference_number,
            ..BillRecord::default()
        };

        ExtractionReport {
            record,
            units,
            total: payable.total,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for BillTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BillParser for BillTextParser {
    fn parse(&self, text: &str) -> ExtractionReport {
        info!("Parsing bill from {} characters of text", text.len());
        let normalized = normalize_text(text);
        self.parse_normalized(&normalized)
    }
}

/// Per-unit rate: `total / units` rounded to cents when both are positive.
///
/// Falls back when either is missing or the quotient is out of range.
pub fn derive_rate(total: Decimal, units: Decimal, fallback: Decimal) -> Decimal {
    if total <= Decimal::ZERO || units <= Decimal::ZERO {
        return fallback;
    }
    match total.checked_div(units) {
        Some(rate) => round_currency(rate),
        None => {
            warn!(%total, %units, "rate out of range, using fallback");
            fallback
        }
    }
}
