//! PDF processing module.

mod extractor;

pub use extractor::{PdfExtractor, PdfPageSource};

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Extract plain text page by page, in page order.
    fn extract_pages(&self) -> Result<Vec<String>>;
}

/// Anything that can turn a document path into its per-page plain text.
///
/// The extraction and aggregation code only depends on this trait, so batches
/// can be driven from real files or from text held in memory.
pub trait PageSource {
    /// Read the ordered page texts of the document at `path`.
    fn read_pages(&self, path: &Path) -> Result<Vec<String>>;
}
