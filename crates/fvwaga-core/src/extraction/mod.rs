//! Field extraction from document page text.

mod extractor;
pub mod rules;

pub use extractor::{DocumentExtractor, ExtractionResult};
pub use rules::{Anchor, ExtractionMatch, Field, FieldRule, Step, Window};
