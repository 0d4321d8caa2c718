//! WASM bindings for utility bill analysis.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Amounts cross the boundary as JS numbers and come back as decimal
//! strings.

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use billscan_core::bill::rules::format_amount as format_decimal;
use billscan_core::bill::{validate_bill_content as validate_content, BillParser, BillTextParser};
use billscan_core::error::ExtractionError;
use billscan_core::{
    compute, AnalysisOutcome, AnalyzedBill, BillPipeline, BillSession, BillUpdate, ManualEntry,
    SavingsProjection,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, JsValue> {
    Ok(parse_number(field, value)?)
}

fn parse_number(field: &str, value: f64) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| {
        ExtractionError::Parse {
            field: field.to_string(),
            value: value.to_string(),
        }
        .to_string()
    })
}

/// Check whether text looks like a utility bill.
#[wasm_bindgen]
pub fn validate_bill_content(text: &str) -> bool {
    validate_content(text)
}

/// Extract bill fields from text without the content check.
///
/// Returns the record together with per-field diagnostics.
#[wasm_bindgen]
pub fn extract_bill_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&BillTextParser::new().parse(text))
}

/// Validate, extract and cost bill text.
///
/// Rejects with a user-facing message when the text is not a bill or no
/// figures could be read.
#[wasm_bindgen]
pub fn analyze_bill_text(text: &str) -> Result<JsValue, JsValue> {
    let mut analyzer = BillAnalyzer::new();
    analyzer.analyze_text(text)
}

/// Cost breakdown for the given figures. `tax_rate` is a fraction.
#[wasm_bindgen]
pub fn compute_cost(
    units: f64,
    rate: f64,
    extra_charges: f64,
    tax_rate: f64,
) -> Result<JsValue, JsValue> {
    let breakdown = compute(
        to_decimal("units", units)?,
        to_decimal("rate", rate)?,
        to_decimal("extraCharges", extra_charges)?,
        to_decimal("taxRate", tax_rate)?,
    )
    .map_err(|e| e.to_string())?;
    to_js(&breakdown)
}

/// Analysis from manually entered figures. `tax_rate_percent` is in percent.
#[wasm_bindgen]
pub fn manual_entry(
    units: f64,
    rate: f64,
    extra_charges: f64,
    tax_rate_percent: f64,
) -> Result<JsValue, JsValue> {
    let mut analyzer = BillAnalyzer::new();
    analyzer.manual(units, rate, extra_charges, tax_rate_percent)
}

/// Savings from cutting usage by `reduction_percent`.
#[wasm_bindgen]
pub fn project_savings(total: f64, reduction_percent: f64) -> Result<JsValue, JsValue> {
    let projection = SavingsProjection::project(
        to_decimal("total", total)?,
        to_decimal("reductionPercent", reduction_percent)?,
    );
    to_js(&projection)
}

/// Format an amount with thousands separators (12,345.50).
#[wasm_bindgen]
pub fn format_amount(amount: f64) -> String {
    Decimal::try_from(amount)
        .map(format_decimal)
        .unwrap_or_else(|_| format!("{:.2}", amount))
}

/// Stateful bill analysis for browser use.
///
/// Holds the current analysis the way a page would: every entry path
/// replaces it, `reset` restores the defaults.
#[wasm_bindgen]
pub struct BillAnalyzer {
    pipeline: BillPipeline,
    session: BillSession,
}

#[wasm_bindgen]
impl BillAnalyzer {
    /// Create an analyzer with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            pipeline: BillPipeline::new(),
            session: BillSession::default(),
        }
    }

    /// Analyze bill text (from OCR or PDF extraction).
    #[wasm_bindgen]
    pub fn analyze_text(&mut self, text: &str) -> Result<JsValue, JsValue> {
        let bill = self.apply_outcome(self.pipeline.analyze_text(text))?;
        to_js(&bill)
    }

    /// Apply a structured record returned by a vision model.
    #[wasm_bindgen]
    pub fn apply_structured(&mut self, response: &str) -> Result<JsValue, JsValue> {
        let outcome = self
            .pipeline
            .analyze_structured_json(response)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let bill = self.apply_outcome(outcome)?;
        to_js(&bill)
    }

    /// Replace the analysis with manually entered figures.
    #[wasm_bindgen]
    pub fn manual(
        &mut self,
        units: f64,
        rate: f64,
        extra_charges: f64,
        tax_rate_percent: f64,
    ) -> Result<JsValue, JsValue> {
        let entry = ManualEntry {
            units: to_decimal("units", units)?,
            rate: to_decimal("rate", rate)?,
            extra_charges: to_decimal("extraCharges", extra_charges)?,
            tax_rate_percent: to_decimal("taxRatePercent", tax_rate_percent)?,
        };
        let bill = self.session.apply_manual(entry).map_err(|e| e.to_string())?;
        to_js(&bill)
    }

    /// Merge a partial update (`{ units, rate, extraCharges, taxRate, ... }`).
    #[wasm_bindgen]
    pub fn update(&mut self, update: JsValue) -> Result<JsValue, JsValue> {
        let update: BillUpdate = serde_wasm_bindgen::from_value(update)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let bill = self.session.update(update).map_err(|e| e.to_string())?;
        to_js(&bill)
    }

    /// Restore startup defaults.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// The current analysis.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.state())
    }

    /// The current analysis as a JSON string.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.state()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn is_analyzed(&self) -> bool {
        self.session.is_analyzed()
    }
}

impl BillAnalyzer {
    fn apply_outcome(&mut self, outcome: AnalysisOutcome) -> Result<AnalyzedBill, String> {
        match outcome {
            AnalysisOutcome::Analyzed(extracted) => self
                .session
                .apply_record(extracted.into_record())
                .map_err(|e| e.to_string()),
            outcome => Err(outcome
                .message()
                .unwrap_or("Bill analysis failed")
                .to_string()),
        }
    }
}

impl Default for BillAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
