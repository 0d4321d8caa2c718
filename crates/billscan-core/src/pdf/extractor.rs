//! PDF text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// PDF text extractor.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    min_text_length: usize,
}

/// Text and layout summary of a loaded PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Type of PDF content.
    pub pdf_type: PdfType,
    /// Extracted text (may be empty).
    pub text: String,
    /// Number of pages.
    pub page_count: u32,
    /// Number of embedded image XObjects.
    pub image_count: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            min_text_length: 50,
        }
    }

    /// Set the text length above which a PDF counts as text-based.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    /// Extract text and classify the loaded document.
    pub fn extract_all(&self) -> Result<PdfContent> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        // Scanned bills often have no text layer at all
        let text = match self.extract_text() {
            Ok(text) => text,
            Err(e) => {
                debug!("No text layer: {}", e);
                String::new()
            }
        };
        let image_count = self.count_images();
        let pdf_type = classify(text.trim().len(), image_count, self.min_text_length);

        debug!(
            "PDF analysis: {} pages, {} chars text, {} images -> {:?}",
            page_count,
            text.len(),
            image_count,
            pdf_type
        );

        Ok(PdfContent {
            pdf_type,
            text,
            page_count,
            image_count,
        })
    }

    /// Count image XObjects without decoding them.
    fn count_images(&self) -> usize {
        let Some(doc) = self.document.as_ref() else {
            return 0;
        };

        doc.objects
            .values()
            .filter(|object| match object {
                Object::Stream(stream) => stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|subtype| subtype.as_name())
                    .map(|name| name == b"Image")
                    .unwrap_or(false),
                _ => false,
            })
            .inspect(|_| trace!("Found image object"))
            .count()
    }
}

fn classify(text_len: usize, image_count: usize, min_text_length: usize) -> PdfType {
    match (text_len > min_text_length, image_count > 0) {
        (true, false) => PdfType::Text,
        (false, true) => PdfType::Image,
        (true, true) => PdfType::Hybrid,
        (false, false) => PdfType::Empty,
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract reads bytes, so keep the decrypted copy
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}
