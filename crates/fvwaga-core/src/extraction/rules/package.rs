//! Package number rule.

use regex::Regex;

use crate::error::{FvWagaError, Result};
use crate::models::config::ExtractionConfig;

use super::patterns::PACKAGE_LABEL;
use super::{Field, FieldRule, Step};

/// Build the package number rule from configuration.
///
/// Package numbers are right-truncated: only the last `package_digits`
/// characters of the captured digit run are significant.
pub fn package_rule(config: &ExtractionConfig) -> Result<FieldRule> {
    if config.package_pattern == PACKAGE_LABEL.as_str() {
        return Ok(default_package_rule(config.package_digits));
    }

    let pattern = Regex::new(&config.package_pattern)
        .map_err(|e| FvWagaError::Config(format!("invalid package pattern: {}", e)))?;
    Ok(build(pattern, config.package_digits))
}

/// Package rule on the built-in `P aczka:` pattern.
pub fn default_package_rule(digits: usize) -> FieldRule {
    build(PACKAGE_LABEL.clone(), digits)
}

fn build(pattern: Regex, digits: usize) -> FieldRule {
    FieldRule::pattern(Field::PackageNumber, pattern)
        .then(Step::Trim)
        .then(Step::KeepLast(digits))
}
