//! Core library for pairing invoice and attachment PDFs into spreadsheet rows.
//!
//! This crate provides:
//! - PDF page text extraction
//! - Label-anchored field rules (VAT number, net weight, package number)
//! - Discovery of invoices (`9*`) and attachments (`Z*`) in a directory
//! - Row pairing strategies and completeness summary

pub mod aggregate;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pdf;

pub use aggregate::{discover, Batch, BatchReport, ExtractedDocument, RowAggregator};
pub use error::{FvWagaError, PdfError, Result};
pub use extraction::{DocumentExtractor, ExtractionResult};
pub use models::{
    BatchSummary, Document, DocumentKind, ExtractedFields, FvWagaConfig, PackageSource, PairedRow,
    PairingStrategy, Row, Weight,
};
pub use pdf::{PageSource, PdfExtractor, PdfPageSource, PdfProcessor};
