//! Documents, per-document extraction results and output rows.

use std::fmt;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Role of a PDF in a batch, derived from its file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Invoice (`9*`), expected to carry the package number.
    Invoice,
    /// Attachment (`Z*`), expected to carry the VAT number and net weight.
    Attachment,
}

/// One PDF file discovered in the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: DocumentKind,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, kind: DocumentKind) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Net weight as found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    /// Parsed weight in kilograms.
    Kilograms(Decimal),
    /// Cleaned text that did not parse as a number, kept as-is.
    Unparsed(String),
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Kilograms(kg) => write!(f, "{}", kg),
            Weight::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Fields extracted from one document. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub vat_number: Option<String>,
    pub weight: Option<Weight>,
    pub package_number: Option<String>,
}

impl ExtractedFields {
    /// All three fields absent.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vat_number.is_none() && self.weight.is_none() && self.package_number.is_none()
    }
}

/// One spreadsheet record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub fv: Option<String>,
    pub weight: Option<Weight>,
    pub package: Option<String>,
}

/// Where a row's package number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageSource {
    Invoice,
    /// Invoice had none, found in the attachment at the same position.
    AttachmentFallback,
    /// Attachments-only pairing.
    Attachment,
}

/// A row together with the documents it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairedRow {
    pub row: Row,
    pub invoice: Option<String>,
    pub attachment: Option<String>,
    pub package_source: Option<PackageSource>,
}

/// Completeness counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_rows: usize,
    pub vat_numbers: usize,
    pub weights: usize,
    pub packages: usize,
}

impl BatchSummary {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Self {
        rows.into_iter().fold(Self::default(), |mut acc, row| {
            acc.total_rows += 1;
            acc.vat_numbers += row.fv.is_some() as usize;
            acc.weights += row.weight.is_some() as usize;
            acc.packages += row.package.is_some() as usize;
            acc
        })
    }

    /// Rows minus the smallest per-field count. A coarse signal, not a
    /// count of incomplete rows.
    pub fn missing_rows(&self) -> usize {
        let least = self.vat_numbers.min(self.weights).min(self.packages);
        self.total_rows.saturating_sub(least)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_rows() == 0
    }
}
