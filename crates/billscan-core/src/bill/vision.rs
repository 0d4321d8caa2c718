//! Structured bill records produced by a vision model.
//!
//! The vision service itself lives outside this crate. It is reached
//! through [`VisionExtractor`], which callers pass in explicitly.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cost::round_currency;
use crate::error::Result;
use crate::models::bill::{BillRecord, BillType};

use super::parser::derive_rate;

/// A bill as returned by the vision service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionBill {
    #[serde(deserialize_with = "null_as_default")]
    pub bill_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub units: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub total: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub current_bill: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub after_due_date: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub due_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bill_month: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reference_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meter_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub consumer_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub arrears: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub taxes: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub fuel_adjustment: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub is_valid_bill: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl VisionBill {
    /// Neither units nor a payable amount were read.
    pub fn is_empty(&self) -> bool {
        self.units.is_zero() && self.total.is_zero()
    }

    /// Convert to a bill record. Negative figures are clamped to zero.
    pub fn into_record(self, fallback_rate: Decimal) -> BillRecord {
        let units = self.units.max(Decimal::ZERO);
        let total = round_currency(self.total.max(Decimal::ZERO));

        BillRecord {
            units,
            total,
            rate: derive_rate(total, units, fallback_rate),
            current_bill: round_currency(self.current_bill),
            after_due_date: round_currency(self.after_due_date),
            due_date: self.due_date.trim().to_string(),
            bill_month: self.bill_month.trim().to_string(),
            reference_number: self.reference_number.trim().to_string(),
            taxes: round_currency(self.taxes),
            extra_charges: Decimal::ZERO,
            bill_type: BillType::from_label(&self.bill_type),
            company: self.company.trim().to_string(),
            consumer_name: self.consumer_name.trim().to_string(),
            meter_number: self.meter_number.trim().to_string(),
            arrears: round_currency(self.arrears),
            fuel_adjustment: round_currency(self.fuel_adjustment),
        }
    }
}

/// Parse a vision service response, tolerating markdown code fences.
pub fn parse_vision_response(text: &str) -> Result<VisionBill> {
    let stripped = text.replace("```json", "").replace("```", "");
    Ok(serde_json::from_str(stripped.trim())?)
}

/// Reads a bill image into a structured record.
pub trait VisionExtractor: Send + Sync {
    /// Read the bill in `image` (of MIME type `mime`).
    fn read_bill(&self, image: &[u8], mime: &str) -> Result<VisionBill>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESPONSE: &str = r#"```json
{
  "billType": "gas",
  "company": "SNGPL",
  "units": 3,
  "total": 2150.5,
  "currentBill": 2000,
  "afterDueDate": 2365,
  "dueDate": "12 Feb 2024",
  "billMonth": "JAN 24",
  "referenceNumber": "1234567890",
  "meterNumber": null,
  "consumerName": "A. Khan",
  "arrears": 0,
  "taxes": 150.5,
  "fuelAdjustment": 0,
  "isValidBill": true
}
```"#;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_fenced_response() {
        let bill = parse_vision_response(RESPONSE).unwrap();

        assert!(bill.is_valid_bill);
        assert_eq!(bill.bill_type, "gas");
        assert_eq!(bill.total, d("2150.5"));
        assert_eq!(bill.meter_number, "");
    }

    #[test]
    fn test_missing_fields_default() {
        let bill = parse_vision_response(r#"{"units": 120}"#).unwrap();

        assert_eq!(bill.units, d("120"));
        assert_eq!(bill.total, Decimal::ZERO);
        assert_eq!(bill.company, "");
        assert!(!bill.is_valid_bill);
    }

    #[test]
    fn test_malformed_response() {
        assert!(parse_vision_response("I could not read this image").is_err());
    }

    #[test]
    fn test_into_record() {
        let record = parse_vision_response(RESPONSE)
            .unwrap()
            .into_record(d("16"));

        assert_eq!(record.bill_type, BillType::Gas);
        assert_eq!(record.units, d("3"));
        assert_eq!(record.total, d("2150.50"));
        assert_eq!(record.rate, d("716.83"));
        assert_eq!(record.company, "SNGPL");
        assert_eq!(record.consumer_name, "A. Khan");
        assert_eq!(record.due_date, "12 Feb 2024");
    }

    #[test]
    fn test_into_record_clamps_negative() {
        let bill = VisionBill {
            units: d("-5"),
            total: d("-10"),
            ..VisionBill::default()
        };
        let record = bill.into_record(d("16"));

        assert_eq!(record.units, Decimal::ZERO);
        assert_eq!(record.total, Decimal::ZERO);
        assert_eq!(record.rate, d("16"));
        assert!(record.is_empty());
    }
}
