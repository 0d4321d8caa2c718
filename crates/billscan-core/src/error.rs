//! Error types for the billscan-core library.

use thiserror::Error;

/// Main error type for the billscan library.
#[derive(Error, Debug)]
pub enum BillscanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Bill field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// An external collaborator (vision service, PDF text source) failed.
    #[error("{message}. Please try again or enter the bill details manually.")]
    Upstream { message: String },

    /// The input file type is not accepted.
    #[error("unsupported bill source: {0}")]
    UnsupportedSource(String),

    /// The input exceeds the upload size limit.
    #[error("bill file is too large ({size} bytes, limit {limit} bytes)")]
    SourceTooLarge { size: usize, limit: usize },

    /// Malformed structured record or config JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BillscanError {
    /// Build an upstream failure from any displayable cause.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to bill data entry and extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the billscan library.
pub type Result<T> = std::result::Result<T, BillscanError>;
