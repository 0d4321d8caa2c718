//! The current bill analysis and the ways it changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cost::compute;
use crate::error::{ExtractionError, Result};
use crate::models::bill::{AnalyzedBill, BillRecord, CostBreakdown, ManualEntry};
use crate::models::config::SessionDefaults;

/// A change to apply to the session.
///
/// `units` and `rate` keep their current value when absent or zero, and
/// `tax_rate` when absent. `extra_charges` resets to zero when absent.
/// Bill details, when given, replace the current ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillUpdate {
    pub units: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub extra_charges: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    /// Payable amount as read from the bill.
    pub total: Option<Decimal>,
    /// Descriptive fields (dates, reference, company, ...).
    pub details: Option<BillRecord>,
}

impl BillUpdate {
    /// An update carrying every field of an extracted record.
    pub fn from_record(record: BillRecord) -> Self {
        Self {
            units: Some(record.units),
            rate: Some(record.rate),
            extra_charges: Some(record.extra_charges),
            tax_rate: None,
            total: Some(record.total),
            details: Some(record),
        }
    }

    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = Some(tax_rate);
        self
    }

    pub fn with_extra_charges(mut self, extra_charges: Decimal) -> Self {
        self.extra_charges = Some(extra_charges);
        self
    }
}

fn non_zero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

/// Record-of-truth for the bill being analyzed.
#[derive(Debug, Clone)]
pub struct BillSession {
    defaults: SessionDefaults,
    record: BillRecord,
    tax_rate: Decimal,
    breakdown: CostBreakdown,
    is_analyzed: bool,
}

impl BillSession {
    /// A session at its startup defaults.
    pub fn new(defaults: SessionDefaults) -> Self {
        Self {
            defaults,
            record: BillRecord {
                rate: defaults.rate,
                ..BillRecord::default()
            },
            tax_rate: defaults.tax_rate,
            breakdown: CostBreakdown::default(),
            is_analyzed: false,
        }
    }

    /// Merge an update and recompute the breakdown.
    ///
    /// The session is left unchanged when the breakdown cannot be computed.
    pub fn update(&mut self, update: BillUpdate) -> Result<AnalyzedBill> {
        let units = non_zero(update.units).unwrap_or(self.record.units);
        let rate = non_zero(update.rate).unwrap_or(self.record.rate);
        let tax_rate = update.tax_rate.unwrap_or(self.tax_rate);
        let extra_charges = update.extra_charges.unwrap_or(Decimal::ZERO);

        let breakdown = compute(units, rate, extra_charges, tax_rate)?;
        debug!(%units, %rate, %tax_rate, %extra_charges, total = %breakdown.total, "recomputed breakdown");

        let mut record = update.details.unwrap_or_else(|| self.record.clone());
        record.units = units;
        record.rate = rate;
        record.extra_charges = extra_charges;
        record.total = match non_zero(update.total) {
            Some(total) => total,
            None => breakdown.total,
        };

        self.record = record;
        self.tax_rate = tax_rate;
        self.breakdown = breakdown;
        self.is_analyzed = true;

        Ok(self.state())
    }

    /// Apply an extracted or structured bill record.
    pub fn apply_record(&mut self, record: BillRecord) -> Result<AnalyzedBill> {
        info!("Applying bill record with {} units", record.units);
        self.update(BillUpdate::from_record(record))
    }

    /// Replace the session with manually entered figures.
    pub fn apply_manual(&mut self, entry: ManualEntry) -> Result<AnalyzedBill> {
        for (field, value) in [
            ("units", entry.units),
            ("rate", entry.rate),
            ("extraCharges", entry.extra_charges),
            ("taxRatePercent", entry.tax_rate_percent),
        ] {
            if value < Decimal::ZERO {
                return Err(ExtractionError::Validation {
                    field: field.to_string(),
                    reason: format!("must not be negative, got {}", value),
                }
                .into());
            }
        }

        let tax_rate = entry.tax_rate();
        let breakdown = compute(entry.units, entry.rate, entry.extra_charges, tax_rate)?;
        info!("Manual entry: {} units at {}", entry.units, entry.rate);

        self.record = BillRecord {
            units: entry.units,
            rate: entry.rate,
            extra_charges: entry.extra_charges,
            total: breakdown.total,
            ..BillRecord::default()
        };
        self.tax_rate = tax_rate;
        self.breakdown = breakdown;
        self.is_analyzed = true;

        Ok(self.state())
    }

    /// Restore startup defaults.
    pub fn reset(&mut self) {
        debug!("Resetting bill session");
        *self = Self::new(self.defaults);
    }

    /// The current analysis.
    pub fn state(&self) -> AnalyzedBill {
        AnalyzedBill {
            record: self.record.clone(),
            tax_rate: self.tax_rate,
            breakdown: self.breakdown,
            is_analyzed: self.is_analyzed,
        }
    }

    pub fn is_analyzed(&self) -> bool {
        self.is_analyzed
    }
}

impl Default for BillSession {
    fn default() -> Self {
        Self::new(SessionDefaults::default())
    }
}
