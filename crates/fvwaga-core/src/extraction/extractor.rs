//! Per-document extraction of VAT number, net weight and package number.

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::config::ExtractionConfig;
use crate::models::document::{Document, ExtractedFields, Weight};
use crate::pdf::PageSource;

use super::rules::{
    default_package_rule, package_rule, parse_weight, vat_rule, weight_rule, FieldRule,
};

/// Result of extracting one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields, all absent when the document could not be read.
    pub fields: ExtractedFields,
    /// Read or decode fault, if any.
    pub fault: Option<String>,
    /// Number of pages read.
    pub page_count: usize,
}

impl ExtractionResult {
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

/// Applies the three field rules to a document's pages.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    vat: FieldRule,
    weight: FieldRule,
    package: FieldRule,
}

impl DocumentExtractor {
    /// Create an extractor with the default labels and windows.
    pub fn new() -> Self {
        let config = ExtractionConfig::default();
        Self {
            vat: vat_rule(&config),
            weight: weight_rule(&config),
            package: default_package_rule(config.package_digits),
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            vat: vat_rule(config),
            weight: weight_rule(config),
            package: package_rule(config)?,
        })
    }

    pub fn rules(&self) -> [&FieldRule; 3] {
        [&self.vat, &self.weight, &self.package]
    }

    /// VAT number, `None` only if the label is missing. A blank window gives
    /// `Some("")`.
    pub fn vat_number<S: AsRef<str>>(&self, pages: &[S]) -> Option<String> {
        self.vat.scan(pages).map(|m| m.value)
    }

    /// Net weight, `None` only if the label is missing. Whatever survives
    /// cleaning is kept, even an empty string.
    pub fn weight<S: AsRef<str>>(&self, pages: &[S]) -> Option<Weight> {
        self.weight.scan(pages).map(|m| parse_weight(&m.value))
    }

    /// Package number, right-truncated to its configured width.
    pub fn package_number<S: AsRef<str>>(&self, pages: &[S]) -> Option<String> {
        self.package.scan(pages).map(|m| m.value)
    }

    /// Run all three rules over the page texts of one document.
    pub fn extract_pages<S: AsRef<str>>(&self, pages: &[S]) -> ExtractedFields {
        ExtractedFields {
            vat_number: self.vat_number(pages),
            weight: self.weight(pages),
            package_number: self.package_number(pages),
        }
    }

    /// Read a document through `source` and extract its fields.
    ///
    /// A document that cannot be read yields all-absent fields and the fault
    /// message; the error never reaches the caller.
    pub fn extract_document(&self, source: &dyn PageSource, document: &Document) -> ExtractionResult {
        let (fields, fault, page_count) = match source.read_pages(&document.path) {
            Ok(pages) => {
                let fields = self.extract_pages(&pages);
                debug!(
                    "{}: vat={:?} weight={:?} package={:?}",
                    document.file_name, fields.vat_number, fields.weight, fields.package_number
                );
                (fields, None, pages.len())
            }
            Err(e) => {
                warn!("Failed to read {}: {}", document.file_name, e);
                (ExtractedFields::empty(), Some(e.to_string()), 0)
            }
        };

        ExtractionResult {
            fields,
            fault,
            page_count,
        }
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::models::document::DocumentKind;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::path::Path;
    use std::str::FromStr;

    struct FixedSource(Vec<String>);

    impl PageSource for FixedSource {
        fn read_pages(&self, _path: &Path) -> crate::pdf::Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl PageSource for BrokenSource {
        fn read_pages(&self, _path: &Path) -> crate::pdf::Result<Vec<String>> {
            Err(PdfError::Parse("invalid xref table".to_string()))
        }
    }

    const ATTACHMENT_PAGE: &str = "Specyfikacja\nVAT nr: 98765432\nPozycje: 3\nWaga Netto 2 450,75 kg\nP aczka: 000111222333";

    #[test]
    fn test_extract_pages_all_fields() {
        let fields = DocumentExtractor::new().extract_pages(&[ATTACHMENT_PAGE]);

        assert_eq!(
            fields,
            ExtractedFields {
                vat_number: Some("98765432".to_string()),
                weight: Some(Weight::Kilograms(Decimal::from_str("2450.75").unwrap())),
                package_number: Some("222333".to_string()),
            }
        );
    }

    #[test]
    fn test_fields_found_on_different_pages() {
        let pages = ["Paczka: 123456", "nic", "VAT nr: 55555555", "Waga Netto 7,0"];
        let fields = DocumentExtractor::new().extract_pages(&pages);

        assert_eq!(fields.vat_number.as_deref(), Some("55555555"));
        assert_eq!(fields.package_number.as_deref(), Some("123456"));
        assert!(fields.weight.is_some());
    }

    #[test]
    fn test_blank_window_is_present_but_empty() {
        let fields = DocumentExtractor::new().extract_pages(&["VAT nr:", "VAT nr: 12345678"]);
        assert_eq!(fields.vat_number.as_deref(), Some(""));
    }

    #[test]
    fn test_weight_window_without_digits_is_kept() {
        let fields = DocumentExtractor::new().extract_pages(&["Waga Netto .............. 99,9"]);
        assert_eq!(fields.weight, Some(Weight::Unparsed(String::new())));
        assert!(!fields.is_empty());
    }

    #[test]
    fn test_no_labels() {
        let fields = DocumentExtractor::new().extract_pages(&["Faktura VAT 9/2024"]);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_unparsable_weight_is_kept() {
        let fields = DocumentExtractor::new().extract_pages(&["Waga Netto 1,2,3 kg"]);
        assert_eq!(fields.weight, Some(Weight::Unparsed("1,2,3".to_string())));
    }

    #[test]
    fn test_configured_windows() {
        let config = ExtractionConfig {
            vat_skip: 3,
            vat_width: 10,
            weight_skip: 4,
            weight_width: 7,
            ..ExtractionConfig::default()
        };
        let extractor = DocumentExtractor::from_config(&config).unwrap();
        let fields = extractor.extract_pages(&["VAT nr: / 0012345678 Waga Netto kg: 10,250 brutto"]);

        assert_eq!(fields.vat_number.as_deref(), Some("0012345678"));
        assert_eq!(
            fields.weight,
            Some(Weight::Kilograms(Decimal::from_str("10.25").unwrap()))
        );
    }

    #[test]
    fn test_extract_document() {
        let doc = Document::new("Z1.pdf", DocumentKind::Attachment);
        let result = DocumentExtractor::new()
            .extract_document(&FixedSource(vec![ATTACHMENT_PAGE.to_string()]), &doc);

        assert!(!result.is_fault());
        assert_eq!(result.page_count, 1);
        assert_eq!(result.fields.vat_number.as_deref(), Some("98765432"));
    }

    #[test]
    fn test_read_fault_gives_empty_fields() {
        let doc = Document::new("Z2.pdf", DocumentKind::Attachment);
        let result = DocumentExtractor::new().extract_document(&BrokenSource, &doc);

        assert!(result.fields.is_empty());
        assert_eq!(
            result.fault.as_deref(),
            Some("failed to parse PDF: invalid xref table")
        );
    }
}
