//! Units-consumed extraction.

use regex::Captures;
use rust_decimal::Decimal;

use super::patterns::{
    UNITS_KWH_CONSUMED, UNITS_LABELED, UNITS_METER_READINGS, UNITS_NUMBER_THEN_TOKEN,
    UNITS_TOKEN_THEN_NUMBER,
};
use super::FieldExtractor;
use crate::bill::resolver::{first_group_number, resolve, Candidate, FieldRule, PlausibleRange, Resolution};

/// Units consumed, derived from present and previous meter readings.
fn meter_difference(caps: &Captures<'_>) -> Option<Decimal> {
    let present: Decimal = caps.get(1)?.as_str().parse().ok()?;
    let previous: Decimal = caps.get(2)?.as_str().parse().ok()?;
    Some(present - previous)
}

/// Units rules in fallback order.
pub fn units_rules(range: PlausibleRange) -> Vec<FieldRule> {
    vec![
        FieldRule {
            name: "units_labeled",
            pattern: &UNITS_LABELED,
            priority: 1,
            range,
            value: first_group_number,
        },
        FieldRule {
            name: "kwh_consumed",
            pattern: &UNITS_KWH_CONSUMED,
            priority: 2,
            range,
            value: first_group_number,
        },
        FieldRule {
            name: "token_then_number",
            pattern: &UNITS_TOKEN_THEN_NUMBER,
            priority: 3,
            range,
            value: first_group_number,
        },
        FieldRule {
            name: "meter_readings",
            pattern: &UNITS_METER_READINGS,
            priority: 4,
            range,
            value: meter_difference,
        },
        FieldRule {
            name: "number_then_token",
            pattern: &UNITS_NUMBER_THEN_TOKEN,
            priority: 5,
            range,
            value: first_group_number,
        },
    ]
}

/// Units consumed extractor.
pub struct UnitsExtractor {
    rules: Vec<FieldRule>,
}

impl UnitsExtractor {
    pub fn new(range: PlausibleRange) -> Self {
        Self {
            rules: units_rules(range),
        }
    }

    /// Resolve units, keeping every accepted and rejected candidate.
    pub fn resolve(&self, text: &str) -> Resolution {
        resolve(text, &self.rules)
    }
}

impl Default for UnitsExtractor {
    fn default() -> Self {
        Self::new(PlausibleRange::new(Decimal::from(10), Decimal::from(10_000)))
    }
}

impl FieldExtractor for UnitsExtractor {
    type Output = Candidate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.resolve(text).selected
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.resolve(text).accepted
    }
}
