//! Validation and extraction, from raw input to a bill record.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::bill::BillRecord;
use crate::models::config::ExtractionConfig;

use super::parser::{BillParser, BillTextParser, ExtractionReport};
use super::validator::ContentValidator;
use super::vision::{parse_vision_response, VisionBill};

/// Shown when the input does not look like a utility bill.
pub const NOT_A_BILL_MESSAGE: &str =
    "This file does not appear to be a utility bill. Please upload a valid electricity or gas bill.";

/// Shown when a bill was recognized but neither units nor total were found.
pub const EMPTY_MESSAGE: &str = "Could not extract bill data. Please try again or use manual entry.";

/// A bill record and how it was obtained.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum ExtractedBill {
    /// Extracted from text, with per-field diagnostics.
    Text(ExtractionReport),
    /// Read from a structured record.
    Structured { record: BillRecord },
}

impl ExtractedBill {
    pub fn record(&self) -> &BillRecord {
        match self {
            ExtractedBill::Text(report) => &report.record,
            ExtractedBill::Structured { record } => record,
        }
    }

    pub fn into_record(self) -> BillRecord {
        match self {
            ExtractedBill::Text(report) => report.record,
            ExtractedBill::Structured { record } => record,
        }
    }

    /// Extraction warnings; structured records carry none.
    pub fn warnings(&self) -> &[String] {
        match self {
            ExtractedBill::Text(report) => &report.warnings,
            ExtractedBill::Structured { .. } => &[],
        }
    }
}

/// Outcome of analyzing one bill. None of these is an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// A usable bill record.
    Analyzed(ExtractedBill),
    /// The input is not a utility bill.
    NotABill,
    /// A bill, but neither units nor total could be read.
    Empty(ExtractedBill),
}

impl AnalysisOutcome {
    /// The usable record, if any.
    pub fn record(&self) -> Option<&BillRecord> {
        match self {
            AnalysisOutcome::Analyzed(extracted) => Some(extracted.record()),
            _ => None,
        }
    }

    /// User-facing message for the non-success outcomes.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AnalysisOutcome::Analyzed(_) => None,
            AnalysisOutcome::NotABill => Some(NOT_A_BILL_MESSAGE),
            AnalysisOutcome::Empty(_) => Some(EMPTY_MESSAGE),
        }
    }

    pub fn is_analyzed(&self) -> bool {
        matches!(self, AnalysisOutcome::Analyzed(_))
    }
}

/// Content validation followed by extraction.
pub struct BillPipeline {
    validator: ContentValidator,
    parser: BillTextParser,
    fallback_rate: Decimal,
}

impl BillPipeline {
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            validator: ContentValidator::new(config.min_keyword_hits),
            parser: BillTextParser::with_config(config),
            fallback_rate: config.fallback_rate,
        }
    }

    pub fn validator(&self) -> &ContentValidator {
        &self.validator
    }

    /// Analyze raw bill text.
    pub fn analyze_text(&self, text: &str) -> AnalysisOutcome {
        if !self.validator.validate(text) {
            warn!("Text rejected by content validation");
            return AnalysisOutcome::NotABill;
        }

        let report = self.parser.parse(text);
        info!(
            "Extracted units {} and total {} in {} ms",
            report.record.units, report.record.total, report.processing_time_ms
        );

        if report.record.is_empty() {
            warn!("No units or payable amount found");
            AnalysisOutcome::Empty(ExtractedBill::Text(report))
        } else {
            AnalysisOutcome::Analyzed(ExtractedBill::Text(report))
        }
    }

    /// Analyze a structured record from the vision service.
    pub fn analyze_structured(&self, bill: VisionBill) -> AnalysisOutcome {
        if !bill.is_valid_bill {
            warn!("Structured record flagged as not a bill");
            return AnalysisOutcome::NotABill;
        }

        let record = bill.into_record(self.fallback_rate);
        info!("Structured record with units {} and total {}", record.units, record.total);

        let extracted = ExtractedBill::Structured { record };
        if extracted.record().is_empty() {
            AnalysisOutcome::Empty(extracted)
        } else {
            AnalysisOutcome::Analyzed(extracted)
        }
    }

    /// Analyze a structured record given as (possibly fenced) JSON.
    pub fn analyze_structured_json(&self, json: &str) -> Result<AnalysisOutcome> {
        let bill = parse_vision_response(json)?;
        Ok(self.analyze_structured(bill))
    }
}

impl Default for BillPipeline {
    fn default() -> Self {
        Self::new()
    }
}
