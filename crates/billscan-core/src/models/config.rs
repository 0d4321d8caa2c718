//! Configuration structures for the bill analysis pipeline.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bill::PlausibleRange;
use crate::error::{BillscanError, Result};

/// Main configuration for billscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillscanConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Defaults applied at startup and on reset.
    pub session: SessionDefaults,

    /// Upload limits.
    pub intake: IntakeConfig,

    /// PDF text source configuration.
    pub pdf: PdfConfig,
}

/// Bill field extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Accepted range for units resolved from text.
    pub units_range: PlausibleRange,

    /// Accepted range for payable amounts resolved from text.
    pub amount_range: PlausibleRange,

    /// Rate used when it cannot be derived from units and total.
    pub fallback_rate: Decimal,

    /// Distinct bill keywords required before text counts as a bill.
    pub min_keyword_hits: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            units_range: PlausibleRange::new(Decimal::from(10), Decimal::from(10_000)),
            amount_range: PlausibleRange::new(Decimal::from(100), Decimal::from(100_000)),
            fallback_rate: Decimal::from(16),
            min_keyword_hits: 3,
        }
    }
}

/// Values a fresh or reset session starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    /// Price per unit.
    pub rate: Decimal,

    /// Tax rate as a fraction.
    pub tax_rate: Decimal,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            rate: Decimal::from(10),
            tax_rate: Decimal::new(5, 2),
        }
    }
}

/// Upload limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Largest accepted bill file.
    pub max_upload_bytes: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// PDF text source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider a PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
        }
    }
}

impl BillscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BillscanError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
