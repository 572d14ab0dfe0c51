//! Configuration structures for a batch run.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{FvWagaError, Result};

/// Main configuration for fvwaga.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FvWagaConfig {
    /// Which files count as invoices and attachments.
    pub discovery: DiscoveryConfig,

    /// Field label and window settings.
    pub extraction: ExtractionConfig,

    /// How invoices and attachments are paired into rows.
    pub pairing: PairingConfig,

    /// Spreadsheet output settings.
    pub output: OutputConfig,

    /// External viewer used for the print pass.
    pub print: PrintConfig,
}

/// Filename classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Prefix of invoice file names ("9" or "009" depending on the deployment).
    pub invoice_prefix: String,

    /// Prefix of attachment file names.
    pub attachment_prefix: String,

    /// Required extension, compared case-insensitively.
    pub extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            invoice_prefix: "9".to_string(),
            attachment_prefix: "Z".to_string(),
            extension: "pdf".to_string(),
        }
    }
}

/// Label-anchored extraction settings.
///
/// Window offsets and widths differ between document templates, so they are
/// kept here instead of in the rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Literal label preceding the VAT number.
    pub vat_label: String,

    /// Characters skipped after the VAT label.
    pub vat_skip: usize,

    /// Characters read for the VAT number.
    pub vat_width: usize,

    /// Literal label preceding the net weight.
    pub weight_label: String,

    /// Characters skipped after the weight label.
    pub weight_skip: usize,

    /// Characters read for the net weight.
    pub weight_width: usize,

    /// Regex for the package label; group 1 must capture the digit run.
    pub package_pattern: String,

    /// Number of trailing digits kept from the package number.
    pub package_digits: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            vat_label: "VAT nr:".to_string(),
            vat_skip: 1,
            vat_width: 8,
            weight_label: "Waga Netto".to_string(),
            weight_skip: 0,
            weight_width: 15,
            package_pattern: r"P\s*aczka:\s*(\d+)".to_string(),
            package_digits: 6,
        }
    }
}

/// Row pairing policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Zip sorted invoices and attachments by position, package number from
    /// the invoice with the attachment as fallback.
    #[default]
    Positional,
    /// One row per attachment, every field read from the attachment.
    AttachmentsOnly,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    pub strategy: PairingStrategy,
}

/// Spreadsheet output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file name, written to the scanned directory.
    pub file_name: String,

    /// Worksheet name.
    pub sheet_name: String,

    /// Text put in front of every VAT number in the FV column.
    pub fv_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: "fv_waga.xlsx".to_string(),
            sheet_name: "Dane Faktur".to_string(),
            fv_prefix: "00".to_string(),
        }
    }
}

/// Print pass settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Viewer executable, relative to the directory of the fvwaga binary
    /// unless absolute.
    pub viewer: PathBuf,

    /// Arguments passed before the document path.
    pub args: Vec<String>,

    /// Seconds to wait for one print job before giving up on it.
    pub timeout_secs: u64,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            viewer: PathBuf::from("SumatraPDF.exe"),
            args: vec!["-print-to-default".to_string(), "-silent".to_string()],
            timeout_secs: 60,
        }
    }
}

impl FvWagaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| FvWagaError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FvWagaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings that would make every document come out empty.
    pub fn validate(&self) -> Result<()> {
        let d = &self.discovery;
        if d.invoice_prefix.is_empty() || d.attachment_prefix.is_empty() {
            return Err(FvWagaError::Config("file prefixes must not be empty".to_string()));
        }
        if d.invoice_prefix.starts_with(&d.attachment_prefix)
            || d.attachment_prefix.starts_with(&d.invoice_prefix)
        {
            return Err(FvWagaError::Config(format!(
                "invoice prefix {:?} and attachment prefix {:?} overlap",
                d.invoice_prefix, d.attachment_prefix
            )));
        }

        let e = &self.extraction;
        if e.vat_label.is_empty() || e.weight_label.is_empty() {
            return Err(FvWagaError::Config("field labels must not be empty".to_string()));
        }
        if e.vat_width == 0 || e.weight_width == 0 || e.package_digits == 0 {
            return Err(FvWagaError::Config("window widths must be positive".to_string()));
        }

        let package = Regex::new(&e.package_pattern)
            .map_err(|err| FvWagaError::Config(format!("invalid package pattern: {}", err)))?;
        if package.captures_len() < 2 {
            return Err(FvWagaError::Config(
                "package pattern needs a capture group for the digits".to_string(),
            ));
        }

        Ok(())
    }
}
