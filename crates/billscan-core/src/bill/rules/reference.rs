//! Consumer reference number extraction.

use super::patterns::REFERENCE_NUMBER;
use super::FieldExtractor;

/// Reference number extractor.
pub struct ReferenceExtractor;

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ReferenceExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        REFERENCE_NUMBER
            .captures_iter(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
