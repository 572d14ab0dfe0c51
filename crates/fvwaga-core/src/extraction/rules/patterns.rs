//! Regex patterns shared by the field rules.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Package label. Some text layers split "Paczka" into "P aczka", hence
    // the optional whitespace after the P.
    pub static ref PACKAGE_LABEL: Regex = Regex::new(
        r"P\s*aczka:\s*(\d+)"
    ).unwrap();

    // Anything that cannot be part of a decimal-comma weight
    pub static ref NON_WEIGHT_CHARS: Regex = Regex::new(
        r"[^\d,]"
    ).unwrap();
}
