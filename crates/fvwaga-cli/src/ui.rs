//! Console layout helpers for the interactive run.

use std::io::{self, Write};

use console::{style, Term};
use tracing::debug;

pub const COLUMN_WIDTH: usize = 32;
const SEPARATOR_WIDTH: usize = 66;

pub fn header() {
    let rule = "═".repeat(SEPARATOR_WIDTH - 2);
    println!("╔{}╗", rule);
    println!("║{:^width$}║", "fvwaga - invoice / attachment data extractor", width = SEPARATOR_WIDTH - 2);
    println!("╚{}╝", rule);
}

pub fn section(title: &str) {
    println!();
    println!("{}", style(title).bold());
    separator();
}

pub fn separator() {
    println!("{}", "─".repeat(SEPARATOR_WIDTH));
}

/// Print two unstyled cells side by side.
pub fn columns(left: &str, right: &str) {
    println!("  {:<width$} {}", left, right, width = COLUMN_WIDTH);
}

pub fn info(message: impl std::fmt::Display) {
    println!("{} {}", style("ℹ").blue(), message);
}

pub fn ok(message: impl std::fmt::Display) {
    println!("  {} {}", style("✓").green(), message);
}

pub fn warning(message: impl std::fmt::Display) {
    println!("  {} {}", style("⚠").yellow(), style(message).yellow());
}

pub fn failure(message: impl std::fmt::Display) {
    println!("  {} {}", style("✗").red(), message);
}

/// Block until the operator presses ENTER. Errors reading stdin (closed or
/// not a terminal) just end the wait.
pub fn pause(message: &str) {
    println!();
    println!("{}", style(message).dim());
    if let Err(e) = Term::stdout().read_line() {
        debug!("Pause ended without input: {}", e);
    }
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if let Err(e) = io::stdout().flush() {
        debug!("Failed to flush prompt: {}", e);
    }
    match Term::stdout().read_line() {
        Ok(answer) => is_yes(&answer),
        Err(e) => {
            debug!("No answer read, assuming no: {}", e);
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "t" | "tak"
    )
}
