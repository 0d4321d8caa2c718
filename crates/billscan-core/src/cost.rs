//! Cost model shared by every entry path.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ExtractionError, Result};
use crate::models::bill::CostBreakdown;

/// Round a currency amount to two decimals, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn too_large(field: &str) -> ExtractionError {
    ExtractionError::Validation {
        field: field.to_string(),
        reason: "amount is too large to compute".to_string(),
    }
}

/// Compute the cost breakdown for a bill.
///
/// `base = units * rate`, `tax = base * tax_rate`,
/// `total = base + tax + extra_charges`. Each output is rounded on its
/// own from the unrounded intermediates, so `total` can differ from the
/// sum of the rounded components by one cent.
///
/// Fails when an intermediate exceeds the `Decimal` range.
pub fn compute(
    units: Decimal,
    rate: Decimal,
    extra_charges: Decimal,
    tax_rate: Decimal,
) -> Result<CostBreakdown> {
    let base = units.checked_mul(rate).ok_or_else(|| too_large("base"))?;
    let tax = base.checked_mul(tax_rate).ok_or_else(|| too_large("tax"))?;
    let total = base
        .checked_add(tax)
        .and_then(|sum| sum.checked_add(extra_charges))
        .ok_or_else(|| too_large("total"))?;

    Ok(CostBreakdown {
        base: round_currency(base),
        tax: round_currency(tax),
        extras: round_currency(extra_charges),
        total: round_currency(total),
    })
}
