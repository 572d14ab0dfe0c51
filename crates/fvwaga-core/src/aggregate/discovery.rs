//! Finding and classifying invoice and attachment PDFs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{FvWagaError, Result};
use crate::models::config::DiscoveryConfig;
use crate::models::document::{Document, DocumentKind};

/// Documents of one run, each group sorted by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub invoices: Vec<Document>,
    pub attachments: Vec<Document>,
}

impl Batch {
    /// Classify and sort a set of paths. Paths that are neither invoices nor
    /// attachments are ignored.
    pub fn from_paths<I, P>(paths: I, config: &DiscoveryConfig) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut batch = Batch::default();

        for path in paths {
            let path = path.into();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match classify(name, config) {
                Some(DocumentKind::Invoice) => {
                    batch.invoices.push(Document::new(path, DocumentKind::Invoice))
                }
                Some(DocumentKind::Attachment) => {
                    batch.attachments.push(Document::new(path, DocumentKind::Attachment))
                }
                None => trace!("Skipping {}", name),
            }
        }

        batch.invoices.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        batch.attachments.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty() && self.attachments.is_empty()
    }

    /// Total number of documents in the batch.
    pub fn len(&self) -> usize {
        self.invoices.len() + self.attachments.len()
    }
}

/// Decide whether a file name is an invoice, an attachment, or neither.
///
/// Prefixes are case-sensitive, the extension is not.
pub fn classify(file_name: &str, config: &DiscoveryConfig) -> Option<DocumentKind> {
    let has_extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(&config.extension));

    if !has_extension {
        return None;
    }

    if file_name.starts_with(&config.invoice_prefix) {
        Some(DocumentKind::Invoice)
    } else if file_name.starts_with(&config.attachment_prefix) {
        Some(DocumentKind::Attachment)
    } else {
        None
    }
}

/// List `dir` (non-recursively) and build the batch.
///
/// Fails with [`FvWagaError::NoDocuments`] when neither group has a file.
pub fn discover(dir: &Path, config: &DiscoveryConfig) -> Result<Batch> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }

    let batch = Batch::from_paths(paths, config);
    debug!(
        "Found {} invoices and {} attachments in {}",
        batch.invoices.len(),
        batch.attachments.len(),
        dir.display()
    );

    if batch.is_empty() {
        return Err(FvWagaError::NoDocuments {
            dir: dir.to_path_buf(),
        });
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.file_name.as_str()).collect()
    }

    #[test]
    fn test_classify() {
        let config = DiscoveryConfig::default();
        let cases = [
            ("9A.pdf", Some(DocumentKind::Invoice)),
            ("900123.PDF", Some(DocumentKind::Invoice)),
            ("Z1.pdf", Some(DocumentKind::Attachment)),
            ("Z1.Pdf", Some(DocumentKind::Attachment)),
            ("z1.pdf", None),
            ("8A.pdf", None),
            ("9A.pdf.bak", None),
            ("9A.xlsx", None),
            ("Zpdf", None),
            ("fv_waga.xlsx", None),
        ];

        for (name, expected) in cases {
            assert_eq!(classify(name, &config), expected, "{}", name);
        }
    }

    #[test]
    fn test_classify_long_invoice_prefix() {
        let config = DiscoveryConfig {
            invoice_prefix: "009".to_string(),
            ..DiscoveryConfig::default()
        };
        assert_eq!(classify("009771.pdf", &config), Some(DocumentKind::Invoice));
        assert_eq!(classify("9771.pdf", &config), None);
    }

    #[test]
    fn test_from_paths_sorts_each_group() {
        let batch = Batch::from_paths(
            ["Z2.pdf", "9B.pdf", "notes.txt", "Z1.pdf", "9A.pdf"],
            &DiscoveryConfig::default(),
        );

        assert_eq!(names(&batch.invoices), ["9A.pdf", "9B.pdf"]);
        assert_eq!(names(&batch.attachments), ["Z1.pdf", "Z2.pdf"]);
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_discover_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Z2.pdf", "9B.pdf", "Z1.PDF", "9A.pdf", "readme.md"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("9sub.pdf")).unwrap();

        let batch = discover(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert_eq!(names(&batch.invoices), ["9A.pdf", "9B.pdf"]);
        assert_eq!(names(&batch.attachments), ["Z1.PDF", "Z2.pdf"]);
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("other.pdf"), b"").unwrap();

        let err = discover(dir.path(), &DiscoveryConfig::default()).unwrap_err();
        assert!(matches!(err, FvWagaError::NoDocuments { .. }));
    }
}
