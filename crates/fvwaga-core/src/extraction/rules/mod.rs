//! Label-anchored field rules.
//!
//! A rule is data: where to anchor (a literal label or a regex), which
//! character window to read after the anchor, and which clean-up steps to run
//! on it. The three fields of a document are three instances of the same
//! [`FieldRule`] type.

pub mod package;
pub mod patterns;
pub mod vat;
pub mod weight;

pub use package::{default_package_rule, package_rule};
pub use vat::vat_rule;
pub use weight::{parse_weight, weight_rule};

use std::fmt;

use regex::Regex;
use tracing::trace;

use patterns::NON_WEIGHT_CHARS;

/// The fields a document can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    VatNumber,
    Weight,
    PackageNumber,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::VatNumber => "VAT number",
            Field::Weight => "weight",
            Field::PackageNumber => "package number",
        })
    }
}

/// Where a field starts in the page text.
#[derive(Debug, Clone)]
pub enum Anchor {
    /// First occurrence of a literal label; the value is read from a window
    /// after it.
    Label(String),
    /// First regex match; capture group 1 is the value.
    Pattern(Regex),
}

/// Character window read after a literal label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Characters skipped right after the label.
    pub skip: usize,
    /// Characters read after the skipped ones.
    pub width: usize,
}

impl Window {
    pub fn new(skip: usize, width: usize) -> Self {
        Self { skip, width }
    }
}

/// Clean-up applied to the raw window, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Strip surrounding whitespace.
    Trim,
    /// Drop everything but ASCII/Unicode digits and commas.
    RetainDigitsAndComma,
    /// Keep only the last `n` characters.
    KeepLast(usize),
}

impl Step {
    fn apply(self, value: String) -> String {
        match self {
            Step::Trim => value.trim().to_string(),
            Step::RetainDigitsAndComma => NON_WEIGHT_CHARS.replace_all(&value, "").into_owned(),
            Step::KeepLast(n) => {
                let len = value.chars().count();
                value.chars().skip(len.saturating_sub(n)).collect()
            }
        }
    }
}

/// A located field value with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Value after the clean-up steps.
    pub value: T,
    /// Raw window (or capture) before clean-up.
    pub source: String,
    /// Zero-based page the anchor was found on, when known.
    pub page: Option<usize>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
            page: None,
        }
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionMatch<U> {
        ExtractionMatch {
            value: f(self.value),
            source: self.source,
            page: self.page,
        }
    }
}

/// Declarative description of how one field is read.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: Field,
    pub anchor: Anchor,
    pub window: Window,
    pub steps: Vec<Step>,
}

impl FieldRule {
    /// Rule anchored on a literal label.
    pub fn label(field: Field, label: impl Into<String>, window: Window) -> Self {
        Self {
            field,
            anchor: Anchor::Label(label.into()),
            window,
            steps: Vec::new(),
        }
    }

    /// Rule anchored on a regex whose first group captures the value.
    pub fn pattern(field: Field, pattern: Regex) -> Self {
        Self {
            field,
            anchor: Anchor::Pattern(pattern),
            window: Window::new(0, 0),
            steps: Vec::new(),
        }
    }

    /// Append a clean-up step.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Locate the field on one page.
    ///
    /// Returns `Some` whenever the anchor occurs, even if the window turns
    /// out empty after clean-up; that still ends the page scan.
    pub fn locate(&self, page: &str) -> Option<ExtractionMatch<String>> {
        let raw = match &self.anchor {
            Anchor::Label(label) => {
                let start = page.find(label.as_str())? + label.len();
                page[start..]
                    .chars()
                    .skip(self.window.skip)
                    .take(self.window.width)
                    .collect::<String>()
            }
            Anchor::Pattern(re) => re.captures(page)?.get(1)?.as_str().to_string(),
        };

        let value = self.steps.iter().fold(raw.clone(), |acc, step| step.apply(acc));
        trace!("{}: window {:?} -> {:?}", self.field, raw, value);
        Some(ExtractionMatch::new(value, raw))
    }

    /// Scan pages in order and stop at the first page where the anchor occurs.
    pub fn scan<S: AsRef<str>>(&self, pages: &[S]) -> Option<ExtractionMatch<String>> {
        pages
            .iter()
            .enumerate()
            .find_map(|(idx, page)| self.locate(page.as_ref()).map(|m| m.on_page(idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_steps() {
        let cases = [
            (Step::Trim, "  12 34 \n", "12 34"),
            (Step::RetainDigitsAndComma, "1 234,56 kg", "1234,56"),
            (Step::RetainDigitsAndComma, "1.234,5t", "1234,5"),
            (Step::KeepLast(6), "0012345678", "345678"),
            (Step::KeepLast(6), "1234", "1234"),
            (Step::KeepLast(3), "", ""),
        ];

        for (step, input, expected) in cases {
            assert_eq!(step.apply(input.to_string()), expected, "{:?} on {:?}", step, input);
        }
    }

    #[test]
    fn test_label_window_counts_characters() {
        let rule = FieldRule::label(Field::VatNumber, "Nr:", Window::new(1, 4));
        let m = rule.locate("Łódź Nr: żółw123").unwrap();
        assert_eq!(m.value, "żółw");
    }

    #[test]
    fn test_window_past_end_of_page() {
        let rule = FieldRule::label(Field::VatNumber, "VAT nr:", Window::new(1, 8)).then(Step::Trim);
        let m = rule.locate("VAT nr: 12").unwrap();
        assert_eq!(m.value, "12");
        assert_eq!(m.source, " 12");
    }

    #[test]
    fn test_label_at_end_gives_empty_match() {
        let rule = FieldRule::label(Field::VatNumber, "VAT nr:", Window::new(1, 8)).then(Step::Trim);
        let m = rule.locate("header VAT nr:").unwrap();
        assert_eq!(m.value, "");
    }

    #[test]
    fn test_scan_stops_at_first_page_with_label() {
        let rule = FieldRule::label(Field::VatNumber, "VAT nr:", Window::new(1, 8)).then(Step::Trim);
        let pages = ["nothing here", "VAT nr:", "VAT nr: 11111111"];

        let m = rule.scan(&pages).unwrap();
        assert_eq!(m.page, Some(1));
        assert_eq!(m.value, "");
    }

    #[test]
    fn test_pattern_anchor_uses_first_group() {
        let rule = FieldRule::pattern(Field::PackageNumber, Regex::new(r"Nr\s*(\d+)").unwrap());
        let m = rule.scan(&["", "Nr 42 Nr 43"]).unwrap();
        assert_eq!(m.value, "42");
        assert_eq!(m.page, Some(1));
    }

    #[test]
    fn test_no_anchor() {
        let rule = FieldRule::label(Field::Weight, "Waga Netto", Window::new(0, 15));
        assert!(rule.scan(&["Waga Brutto 12,0"]).is_none());
        assert!(rule.scan::<&str>(&[]).is_none());
    }
}
