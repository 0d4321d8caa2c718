//! Priority resolution over declarative field rules.
//!
//! A field with several competing phrasings is described by an ordered
//! table of [`FieldRule`]s. Every rule that matches produces a candidate;
//! candidates outside the rule's plausible range are rejected with a typed
//! reason, and the accepted candidate with the lowest priority value wins.

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Inclusive numeric range a resolved value must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlausibleRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PlausibleRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Check a value against the range.
    pub fn check(&self, value: Decimal) -> Result<(), Rejection> {
        if value < self.min {
            Err(Rejection::BelowRange { min: self.min })
        } else if value > self.max {
            Err(Rejection::AboveRange { max: self.max })
        } else {
            Ok(())
        }
    }
}

/// Turns a regex match into a candidate value.
pub type ValueFn = fn(&Captures<'_>) -> Option<Decimal>;

/// One way of finding a field in normalized text.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Rule name, reported on candidates.
    pub name: &'static str,
    /// Pattern to match.
    pub pattern: &'static Regex,
    /// Lower wins.
    pub priority: u8,
    /// Accepted values.
    pub range: PlausibleRange,
    /// Value extraction from the match.
    pub value: ValueFn,
}

/// A value found by a rule, awaiting adjudication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub rule: &'static str,
    pub priority: u8,
    pub value: Decimal,
    /// Matched text.
    pub source: String,
}

/// Why a candidate was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    BelowRange { min: Decimal },
    AboveRange { max: Decimal },
}

/// A candidate that failed its plausibility filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedCandidate {
    pub candidate: Candidate,
    pub rejection: Rejection,
}

/// Outcome of resolving one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Winning candidate, if any survived.
    pub selected: Option<Candidate>,
    /// All in-range candidates, in rule order.
    pub accepted: Vec<Candidate>,
    /// Out-of-range candidates, in rule order.
    pub rejected: Vec<RejectedCandidate>,
}

impl Resolution {
    /// Selected value, or zero when nothing survived.
    pub fn value(&self) -> Decimal {
        self.selected
            .as_ref()
            .map(|c| c.value)
            .unwrap_or(Decimal::ZERO)
    }

    /// The accepted candidate produced by a named rule.
    pub fn accepted_from(&self, rule: &str) -> Option<&Candidate> {
        self.accepted.iter().find(|c| c.rule == rule)
    }

    /// The rejection recorded for a named rule.
    pub fn rejection_for(&self, rule: &str) -> Option<Rejection> {
        self.rejected
            .iter()
            .find(|r| r.candidate.rule == rule)
            .map(|r| r.rejection)
    }
}

/// Evaluate every rule against the text and pick the best candidate.
///
/// Each rule contributes at most one candidate, from its first match.
pub fn resolve(text: &str, rules: &[FieldRule]) -> Resolution {
    let mut resolution = Resolution::default();

    for rule in rules {
        let Some(caps) = rule.pattern.captures(text) else {
            continue;
        };
        let Some(value) = (rule.value)(&caps) else {
            trace!(rule = rule.name, "match without a usable value: {}", &caps[0]);
            continue;
        };

        let candidate = Candidate {
            rule: rule.name,
            priority: rule.priority,
            value,
            source: caps[0].trim().to_string(),
        };

        match rule.range.check(value) {
            Ok(()) => {
                trace!(rule = rule.name, %value, "candidate accepted");
                resolution.accepted.push(candidate);
            }
            Err(rejection) => {
                trace!(rule = rule.name, %value, ?rejection, "candidate rejected");
                resolution.rejected.push(RejectedCandidate {
                    candidate,
                    rejection,
                });
            }
        }
    }

    resolution.selected = resolution
        .accepted
        .iter()
        .min_by_key(|c| c.priority)
        .cloned();

    resolution
}

/// Value of the first capture group as a plain number.
pub fn first_group_number(caps: &Captures<'_>) -> Option<Decimal> {
    caps.get(1).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref LOW: Regex = Regex::new(r"LOW (\d+)").unwrap();
        static ref HIGH: Regex = Regex::new(r"HIGH (\d+)").unwrap();
    }

    fn rules() -> Vec<FieldRule> {
        let range = PlausibleRange::new(Decimal::from(10), Decimal::from(100));
        vec![
            FieldRule {
                name: "high",
                pattern: &HIGH,
                priority: 1,
                range,
                value: first_group_number,
            },
            FieldRule {
                name: "low",
                pattern: &LOW,
                priority: 2,
                range,
                value: first_group_number,
            },
        ]
    }

    #[test]
    fn test_lowest_priority_wins() {
        let resolution = resolve("LOW 20 HIGH 30", &rules());

        assert_eq!(resolution.value(), Decimal::from(30));
        assert_eq!(resolution.selected.unwrap().rule, "high");
        assert_eq!(resolution.accepted.len(), 2);
    }

    #[test]
    fn test_out_of_range_falls_through() {
        let resolution = resolve("HIGH 500 LOW 20", &rules());

        assert_eq!(resolution.value(), Decimal::from(20));
        assert_eq!(
            resolution.rejection_for("high"),
            Some(Rejection::AboveRange {
                max: Decimal::from(100)
            })
        );
    }

    #[test]
    fn test_nothing_survives() {
        let resolution = resolve("HIGH 5", &rules());

        assert!(resolution.selected.is_none());
        assert_eq!(resolution.value(), Decimal::ZERO);
        assert_eq!(
            resolution.rejection_for("high"),
            Some(Rejection::BelowRange {
                min: Decimal::from(10)
            })
        );
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = PlausibleRange::new(Decimal::from(10), Decimal::from(100));
        assert!(range.check(Decimal::from(10)).is_ok());
        assert!(range.check(Decimal::from(100)).is_ok());
        assert!(range.check(Decimal::new(999, 2)).is_err());
    }
}
