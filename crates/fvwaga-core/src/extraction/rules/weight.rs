//! Net weight rule and decimal-comma normalization.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::config::ExtractionConfig;
use crate::models::document::Weight;

use super::{Field, FieldRule, Step, Window};

/// Build the net weight rule from configuration.
///
/// The window is trimmed and stripped of everything except digits and commas,
/// which removes thousands separators and unit suffixes.
pub fn weight_rule(config: &ExtractionConfig) -> FieldRule {
    FieldRule::label(
        Field::Weight,
        config.weight_label.as_str(),
        Window::new(config.weight_skip, config.weight_width),
    )
    .then(Step::Trim)
    .then(Step::RetainDigitsAndComma)
}

/// Parse a cleaned weight ("1234,56") as kilograms.
///
/// Text that does not parse is returned as [`Weight::Unparsed`] instead of
/// being dropped.
pub fn parse_weight(cleaned: &str) -> Weight {
    match Decimal::from_str(&cleaned.replace(',', ".")) {
        Ok(kg) => Weight::Kilograms(kg),
        Err(_) => Weight::Unparsed(cleaned.to_string()),
    }
}
