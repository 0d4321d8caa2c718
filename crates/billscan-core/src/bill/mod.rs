//! Utility bill field extraction.

pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod rules;
pub mod validator;
pub mod vision;

pub use parser::{derive_rate, BillParser, BillTextParser, ExtractionReport};
pub use pipeline::{AnalysisOutcome, BillPipeline, ExtractedBill, EMPTY_MESSAGE, NOT_A_BILL_MESSAGE};
pub use resolver::{resolve, Candidate, FieldRule, PlausibleRange, RejectedCandidate, Rejection, Resolution};
pub use validator::{validate_bill_content, ContentValidator, BILL_KEYWORDS};
pub use vision::{parse_vision_response, VisionBill, VisionExtractor};
