//! Data models shared by extraction, aggregation and the CLI.

pub mod config;
pub mod document;

pub use config::{FvWagaConfig, PairingStrategy};
pub use document::{
    BatchSummary, Document, DocumentKind, ExtractedFields, PackageSource, PairedRow, Row, Weight,
};
