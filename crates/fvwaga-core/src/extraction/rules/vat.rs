//! VAT number rule.
//!
//! The number is read from a fixed window after the `VAT nr:` label. No
//! checksum or digit validation is done; whatever lands in the window is kept.

use crate::models::config::ExtractionConfig;

use super::{Field, FieldRule, Step, Window};

/// Build the VAT number rule from configuration.
pub fn vat_rule(config: &ExtractionConfig) -> FieldRule {
    FieldRule::label(
        Field::VatNumber,
        config.vat_label.as_str(),
        Window::new(config.vat_skip, config.vat_width),
    )
    .then(Step::Trim)
}
