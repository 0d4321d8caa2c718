//! Utility bill data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A normalized utility bill.
///
/// Serialized with camelCase keys so a text-extracted record and a
/// structured record from the vision service share one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillRecord {
    /// Units consumed (kWh for electricity). Zero when unresolved.
    pub units: Decimal,

    /// Amount payable within the due date.
    pub total: Decimal,

    /// Price per unit.
    pub rate: Decimal,

    /// Current-period charge, distinct from the payable amount.
    pub current_bill: Decimal,

    /// Amount owed when paid after the due date.
    pub after_due_date: Decimal,

    /// Due date exactly as printed on the bill.
    pub due_date: String,

    /// Billing month, e.g. `JAN 24`.
    pub bill_month: String,

    /// Consumer/account reference.
    pub reference_number: String,

    /// Total taxes.
    pub taxes: Decimal,

    /// Extra charges (fees, adjustments).
    pub extra_charges: Decimal,

    /// Utility kind.
    pub bill_type: BillType,

    /// Utility company name.
    pub company: String,

    /// Consumer/customer name.
    pub consumer_name: String,

    /// Meter number.
    pub meter_number: String,

    /// Arrears carried from previous periods.
    pub arrears: Decimal,

    /// Fuel price adjustment.
    pub fuel_adjustment: Decimal,
}

impl BillRecord {
    /// Neither units nor a payable amount could be determined.
    pub fn is_empty(&self) -> bool {
        self.units.is_zero() && self.total.is_zero()
    }
}

/// Kind of utility bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    #[default]
    Electricity,
    Gas,
}

impl BillType {
    /// Parse a bill type label; anything unrecognized is electricity.
    pub fn from_label(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("gas") {
            BillType::Gas
        } else {
            BillType::Electricity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::Electricity => "electricity",
            BillType::Gas => "gas",
        }
    }
}

/// Cost breakdown derived by the cost model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// `units * rate`.
    pub base: Decimal,
    /// `base * tax_rate`.
    pub tax: Decimal,
    /// Extra charges.
    pub extras: Decimal,
    /// `base + tax + extras`.
    pub total: Decimal,
}

impl CostBreakdown {
    /// Labelled non-zero components, in display order.
    pub fn components(&self) -> Vec<(&'static str, Decimal)> {
        [
            ("Base Cost", self.base),
            ("Tax", self.tax),
            ("Extra Charges", self.extras),
        ]
        .into_iter()
        .filter(|(_, value)| *value > Decimal::ZERO)
        .collect()
    }
}

/// The analysis object handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedBill {
    /// Bill fields.
    #[serde(flatten)]
    pub record: BillRecord,

    /// Tax rate as a fraction (0.05 for 5%).
    pub tax_rate: Decimal,

    /// Cost breakdown.
    pub breakdown: CostBreakdown,

    /// Whether an analysis has been applied since startup or reset.
    pub is_analyzed: bool,
}

/// Figures entered by hand, bypassing extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntry {
    /// Units consumed.
    pub units: Decimal,
    /// Price per unit.
    pub rate: Decimal,
    /// Extra charges.
    #[serde(default)]
    pub extra_charges: Decimal,
    /// Tax rate in percent (5 for 5%).
    pub tax_rate_percent: Decimal,
}

impl ManualEntry {
    /// Tax rate as a fraction.
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate_percent / Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_type_from_label() {
        assert_eq!(BillType::from_label("gas"), BillType::Gas);
        assert_eq!(BillType::from_label(" GAS "), BillType::Gas);
        assert_eq!(BillType::from_label("electricity"), BillType::Electricity);
        assert_eq!(BillType::from_label(""), BillType::Electricity);
        assert_eq!(BillType::from_label("water"), BillType::Electricity);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = BillRecord {
            current_bill: Decimal::new(5000, 0),
            bill_type: BillType::Gas,
            ..BillRecord::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["billType"], "gas");
        assert!(json.get("currentBill").is_some());
        assert!(json.get("afterDueDate").is_some());
        assert!(json.get("current_bill").is_none());
    }

    #[test]
    fn test_breakdown_components_skip_zero() {
        let breakdown = CostBreakdown {
            base: Decimal::new(1500, 0),
            tax: Decimal::new(75, 0),
            extras: Decimal::ZERO,
            total: Decimal::new(1575, 0),
        };

        let labels: Vec<_> = breakdown.components().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Base Cost", "Tax"]);
    }

    #[test]
    fn test_manual_tax_rate_fraction() {
        let entry = ManualEntry {
            units: Decimal::new(150, 0),
            rate: Decimal::new(10, 0),
            extra_charges: Decimal::ZERO,
            tax_rate_percent: Decimal::new(5, 0),
        };
        assert_eq!(entry.tax_rate(), Decimal::new(5, 2));
    }

    #[test]
    fn test_analyzed_bill_flattens_record() {
        let analyzed = AnalyzedBill {
            record: BillRecord::default(),
            tax_rate: Decimal::new(5, 2),
            breakdown: CostBreakdown::default(),
            is_analyzed: true,
        };

        let json = serde_json::to_value(&analyzed).unwrap();
        assert_eq!(json["isAnalyzed"], true);
        assert!(json.get("units").is_some());
        assert!(json.get("record").is_none());
        assert!(json["breakdown"].get("base").is_some());
    }
}
