//! PDF text extraction using lopdf and pdf-extract.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PageSource, PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
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

            // pdf-extract works on bytes, so hand it the decrypted copy
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

    fn extract_pages(&self) -> Result<Vec<String>> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        // pdf-extract panics on some documents lopdf accepts, e.g. a missing font
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
        }))
        .map_err(|_| PdfError::TextExtraction("text extractor panicked (malformed PDF)".to_string()))?
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        for (idx, text) in pages.iter().enumerate() {
            trace!("Page {}: {} chars", idx + 1, text.chars().count());
        }

        Ok(pages)
    }
}

/// [`PageSource`] reading PDF files from disk.
///
/// The file is read into memory, its pages extracted and the buffer dropped
/// before returning, on both the success and the error path.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfPageSource;

impl PdfPageSource {
    pub fn new() -> Self {
        Self
    }
}

impl PageSource for PdfPageSource {
    fn read_pages(&self, path: &Path) -> Result<Vec<String>> {
        let data = fs::read(path).map_err(|source| PdfError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;
        let pages = extractor.extract_pages()?;

        debug!("Read {} pages from {}", pages.len(), path.display());
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::DocumentExtractor;
    use crate::models::document::{Document as BatchDocument, DocumentKind, Weight};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::io::Write;
    use std::str::FromStr;

    /// One-page PDF with each line in its own text object. `font` is the
    /// resource name used by the content stream; only `F1` is defined.
    fn build_pdf(lines: &[&str], font: &str) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut operations = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), 12.into()]));
            operations.push(Operation::new("Td", vec![72.into(), (720 - 24 * idx as i64).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    fn write_pdf(dir: &Path, name: &str, data: &[u8]) -> BatchDocument {
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        BatchDocument::new(path, DocumentKind::Attachment)
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
    }

    #[test]
    fn test_load_valid_pdf() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&build_pdf(&["VAT nr: 12345678"], "F1")).unwrap();
        assert!(extractor.document.is_some());
    }

    #[test]
    fn test_text_layer_to_fields() {
        let dir = tempfile::tempdir().unwrap();
        let data = build_pdf(
            &["VAT nr: 12345678", "P aczka: 0012345678", "Waga Netto 1234,50 kg"],
            "F1",
        );
        let doc = write_pdf(dir.path(), "Z1.pdf", &data);

        let pages = PdfPageSource::new().read_pages(&doc.path).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("VAT nr: 12345678"), "{:?}", pages[0]);

        let result = DocumentExtractor::new().extract_document(&PdfPageSource::new(), &doc);
        assert!(!result.is_fault(), "{:?}", result.fault);
        assert_eq!(result.page_count, 1);
        assert_eq!(result.fields.vat_number.as_deref(), Some("12345678"));
        assert_eq!(result.fields.package_number.as_deref(), Some("345678"));
        assert_eq!(
            result.fields.weight,
            Some(Weight::Kilograms(Decimal::from_str("1234.50").unwrap()))
        );
    }

    #[test]
    fn test_undefined_font_is_a_read_fault() {
        let dir = tempfile::tempdir().unwrap();
        let data = build_pdf(&["VAT nr: 12345678"], "F9");
        let doc = write_pdf(dir.path(), "Z2.pdf", &data);

        let err = PdfPageSource::new().read_pages(&doc.path).unwrap_err();
        assert!(matches!(err, PdfError::TextExtraction(_)));

        let result = DocumentExtractor::new().extract_document(&PdfPageSource::new(), &doc);
        assert!(result.is_fault());
        assert!(result.fields.is_empty());
    }

    #[test]
    fn test_extract_pages_without_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_pages(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_page_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Z404.pdf");

        let err = PdfPageSource::new().read_pages(&path).unwrap_err();
        assert!(matches!(err, PdfError::Read { .. }));
        assert!(err.to_string().contains("Z404.pdf"));
    }

    #[test]
    fn test_page_source_corrupt_file() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4\nbroken").unwrap();

        let result = PdfPageSource::new().read_pages(file.path());
        assert!(result.is_err());
    }
}
