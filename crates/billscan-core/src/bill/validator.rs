//! Keyword gate deciding whether text looks like a utility bill.

use tracing::debug;

/// Keywords whose presence suggests a utility bill.
pub const BILL_KEYWORDS: [&str; 16] = [
    "bill",
    "invoice",
    "electricity",
    "electric",
    "gas",
    "utility",
    "kwh",
    "units",
    "consumption",
    "meter",
    "reading",
    "total",
    "amount",
    "payable",
    "due",
    "charges",
];

/// Cheap content check run before full extraction.
///
/// Counts distinct keywords found as case-insensitive substrings. Coarse
/// on purpose: false positives are fine, false negatives block genuine
/// bills.
#[derive(Debug, Clone)]
pub struct ContentValidator {
    min_hits: usize,
}

impl ContentValidator {
    pub fn new(min_hits: usize) -> Self {
        Self { min_hits }
    }

    /// Keywords present in the text.
    pub fn matched_keywords(&self, text: &str) -> Vec<&'static str> {
        let lower = text.to_lowercase();
        BILL_KEYWORDS
            .iter()
            .copied()
            .filter(|keyword| lower.contains(keyword))
            .collect()
    }

    /// Whether the text is plausibly a utility bill.
    pub fn validate(&self, text: &str) -> bool {
        let hits = self.matched_keywords(text);
        debug!("content check matched {} keywords: {:?}", hits.len(), hits);
        hits.len() >= self.min_hits
    }
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Validate with the default threshold.
pub fn validate_bill_content(text: &str) -> bool {
    ContentValidator::default().validate(text)
}
