//! What-if savings from reduced consumption.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cost::round_currency;

/// Projected bill after cutting consumption by a percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    /// Reduction applied, clamped to 0..=100.
    pub reduction_percent: Decimal,
    pub saved: Decimal,
    pub new_total: Decimal,
    pub tip: &'static str,
}

impl SavingsProjection {
    /// Scale `total` down by `reduction_percent`.
    ///
    /// Tax is proportional to the base cost, so scaling the total is a
    /// fair approximation of recomputing from fewer units.
    pub fn project(total: Decimal, reduction_percent: Decimal) -> Self {
        let pct = reduction_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let saved = total * pct / Decimal::ONE_HUNDRED;

        Self {
            reduction_percent: pct,
            saved: round_currency(saved),
            new_total: round_currency(total - saved),
            tip: savings_tip(pct),
        }
    }
}

/// Advice matching a reduction level.
pub fn savings_tip(reduction_percent: Decimal) -> &'static str {
    if reduction_percent.is_zero() {
        "Move the slider to see how much you could save."
    } else if reduction_percent < Decimal::from(10) {
        "Turning off lights when leaving a room can save this much."
    } else if reduction_percent < Decimal::from(20) {
        "Switching to LED bulbs and efficient fans helps significantly."
    } else if reduction_percent < Decimal::from(30) {
        "Limiting AC usage to 26°C can achieve these savings."
    } else {
        "Major lifestyle changes or solar installation might be needed for this."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_projection() {
        let projection = SavingsProjection::project(d("1775"), d("15"));

        assert_eq!(projection.saved, d("266.25"));
        assert_eq!(projection.new_total, d("1508.75"));
        assert!(projection.tip.contains("LED"));
    }

    #[test]
    fn test_zero_reduction() {
        let projection = SavingsProjection::project(d("1775"), Decimal::ZERO);

        assert_eq!(projection.saved, Decimal::ZERO);
        assert_eq!(projection.new_total, d("1775"));
        assert!(projection.tip.starts_with("Move the slider"));
    }

    #[test]
    fn test_percent_is_clamped() {
        let projection = SavingsProjection::project(d("500"), d("150"));
        assert_eq!(projection.reduction_percent, d("100"));
        assert_eq!(projection.new_total, Decimal::ZERO);

        let projection = SavingsProjection::project(d("500"), d("-20"));
        assert_eq!(projection.reduction_percent, Decimal::ZERO);
        assert_eq!(projection.saved, Decimal::ZERO);
    }

    #[test]
    fn test_tip_bands() {
        assert!(savings_tip(d("5")).contains("lights"));
        assert!(savings_tip(d("10")).contains("LED"));
        assert!(savings_tip(d("25")).contains("26°C"));
        assert!(savings_tip(d("30")).contains("solar"));
    }
}
