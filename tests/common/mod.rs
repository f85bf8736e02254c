pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use rirekisho::{FixedClock, PipelineError, ResumeGenerator, ResumeRecord};
use std::path::Path;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// A generator with the clock pinned to 2025-02-10 and an optional photo.
pub fn generator(photo: Option<&Path>) -> Result<ResumeGenerator, PipelineError> {
    ResumeGenerator::builder()
        .with_clock(FixedClock(fixtures::render_date()))
        .with_optional_photo(photo.map(Path::to_path_buf))
        .build()
}

pub fn generate_pdf(
    record: &ResumeRecord,
    photo: Option<&Path>,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let (bytes, _report) = generator(photo)?.generate_to_bytes(record)?;
    GeneratedPdf::from_bytes(bytes)
}
