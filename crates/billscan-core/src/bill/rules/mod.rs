//! Rule-based field extractors for utility bills.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod reference;
pub mod units;

pub use amounts::{
    extract_after_due_date, format_amount, parse_amount, PayableAmounts, PayableExtractor,
    CURRENT_BILL_RULE,
};
pub use dates::{BillMonthExtractor, DueDateExtractor};
pub use patterns::normalize_text;
pub use reference::ReferenceExtractor;
pub use units::UnitsExtractor;

/// Trait for field extractors.
///
/// Extractors receive normalized text (see [`normalize_text`]).
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
