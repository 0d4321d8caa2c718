//! Routing of uploaded bills to the right extraction path.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::bill::pipeline::{AnalysisOutcome, BillPipeline};
use crate::bill::vision::VisionExtractor;
use crate::error::{BillscanError, Result};
use crate::models::config::{BillscanConfig, IntakeConfig, PdfConfig};
use crate::pdf::{PdfExtractor, PdfProcessor, PdfType};

/// Kind of bill file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Pdf,
    Image,
    Structured,
}

impl SourceKind {
    /// Map a file extension to a source kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(SourceKind::Text),
            "pdf" => Some(SourceKind::Pdf),
            "jpg" | "jpeg" | "png" | "webp" => Some(SourceKind::Image),
            "json" => Some(SourceKind::Structured),
            _ => None,
        }
    }
}

/// MIME type for an accepted image extension.
pub fn image_mime(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// A bill to analyze.
#[derive(Debug, Clone)]
pub enum BillSource {
    /// Plain bill text.
    Text(String),
    /// PDF file contents.
    Pdf(Vec<u8>),
    /// Bill photo or scan.
    Image { bytes: Vec<u8>, mime: String },
    /// Structured record JSON, as produced by the vision service.
    Structured(String),
}

impl BillSource {
    /// Build a source from file contents and the file's name.
    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let kind = SourceKind::from_extension(ext)
            .ok_or_else(|| BillscanError::UnsupportedSource(path.display().to_string()))?;

        Ok(match kind {
            SourceKind::Text => BillSource::Text(String::from_utf8_lossy(&bytes).into_owned()),
            SourceKind::Pdf => BillSource::Pdf(bytes),
            SourceKind::Image => BillSource::Image {
                bytes,
                mime: image_mime(ext).unwrap_or("image/jpeg").to_string(),
            },
            SourceKind::Structured => {
                BillSource::Structured(String::from_utf8_lossy(&bytes).into_owned())
            }
        })
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            BillSource::Text(_) => SourceKind::Text,
            BillSource::Pdf(_) => SourceKind::Pdf,
            BillSource::Image { .. } => SourceKind::Image,
            BillSource::Structured(_) => SourceKind::Structured,
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        match self {
            BillSource::Text(text) | BillSource::Structured(text) => text.len(),
            BillSource::Pdf(bytes) | BillSource::Image { bytes, .. } => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Front door for bill analysis.
pub struct BillIntake {
    pipeline: BillPipeline,
    intake: IntakeConfig,
    pdf: PdfConfig,
    vision: Option<Box<dyn VisionExtractor>>,
}

impl BillIntake {
    pub fn new(config: &BillscanConfig) -> Self {
        Self {
            pipeline: BillPipeline::with_config(&config.extraction),
            intake: config.intake.clone(),
            pdf: config.pdf.clone(),
            vision: None,
        }
    }

    /// Attach the extractor used for bill images.
    pub fn with_vision(mut self, vision: Box<dyn VisionExtractor>) -> Self {
        self.vision = Some(vision);
        self
    }

    pub fn pipeline(&self) -> &BillPipeline {
        &self.pipeline
    }

    /// Reject sources over the upload limit.
    ///
    /// Callers holding only a file size can check it before reading.
    pub fn check_size(&self, size: u64) -> Result<()> {
        let limit = self.intake.max_upload_bytes;
        if size > limit as u64 {
            return Err(BillscanError::SourceTooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                limit,
            });
        }
        Ok(())
    }

    /// Analyze a bill source.
    pub fn process(&self, source: &BillSource) -> Result<AnalysisOutcome> {
        let size = source.len();
        self.check_size(size as u64)?;

        info!("Processing {:?} bill source ({} bytes)", source.kind(), size);

        match source {
            BillSource::Text(text) => Ok(self.pipeline.analyze_text(text)),
            BillSource::Pdf(bytes) => {
                let text = self.pdf_text(bytes)?;
                Ok(self.pipeline.analyze_text(&text))
            }
            BillSource::Image { bytes, mime } => {
                let vision = self.vision.as_ref().ok_or_else(|| {
                    BillscanError::upstream("No vision extractor is configured for bill images")
                })?;
                let bill = vision.read_bill(bytes, mime).map_err(|e| {
                    warn!("Vision extraction failed: {}", e);
                    match e {
                        BillscanError::Upstream { .. } => e,
                        other => BillscanError::upstream(format!(
                            "Could not read the bill image ({})",
                            other
                        )),
                    }
                })?;
                Ok(self.pipeline.analyze_structured(bill))
            }
            BillSource::Structured(json) => self.pipeline.analyze_structured_json(json),
        }
    }

    /// Text of a PDF bill. Scanned PDFs without a text layer are an error.
    pub fn pdf_text(&self, bytes: &[u8]) -> Result<String> {
        let mut extractor = PdfExtractor::new().with_min_text_length(self.pdf.min_text_length);
        extractor.load(bytes)?;

        let content = extractor.extract_all()?;
        debug!("PDF classified as {:?}", content.pdf_type);

        match content.pdf_type {
            PdfType::Image => Err(BillscanError::upstream(
                "This PDF is a scanned image with no text layer. Upload it as an image instead",
            )),
            // Short text may still be a bill; the content check decides
            pdf_type => {
                if !pdf_type.has_text() {
                    debug!("PDF text is shorter than {} characters", self.pdf.min_text_length);
                }
                Ok(content.text)
            }
        }
    }
}

impl Default for BillIntake {
    fn default() -> Self {
        Self::new(&BillscanConfig::default())
    }
}
