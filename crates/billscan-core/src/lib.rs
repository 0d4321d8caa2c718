//! Core library for utility bill analysis.
//!
//! This crate provides:
//! - Bill text extraction (units, payable amounts, dates, reference number)
//!   with priority-ranked, range-filtered field resolution
//! - Content validation for uploaded documents
//! - Structured record intake for vision-model output
//! - The cost model, bill session and savings projection
//! - PDF text extraction

pub mod bill;
pub mod cost;
pub mod error;
pub mod intake;
pub mod models;
pub mod pdf;
pub mod savings;
pub mod session;

pub use bill::{
    AnalysisOutcome, BillParser, BillPipeline, BillTextParser, ExtractedBill, ExtractionReport,
    VisionBill, VisionExtractor,
};
pub use cost::{compute, round_currency};
pub use error::{BillscanError, Result};
pub use intake::{BillIntake, BillSource, SourceKind};
pub use models::bill::{AnalyzedBill, BillRecord, BillType, CostBreakdown, ManualEntry};
pub use models::config::BillscanConfig;
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use savings::SavingsProjection;
pub use session::{BillSession, BillUpdate};
