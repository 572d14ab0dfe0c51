//! Inspect command - show what the field rules see in a single PDF.
//!
//! Useful for tuning label windows against sample documents.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use fvwaga_core::aggregate::classify;
use fvwaga_core::extraction::Anchor;
use fvwaga_core::{DocumentExtractor, ExtractedFields, PageSource, PdfPageSource};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// PDF file to inspect
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: InspectFormat,

    /// Also print the text of every page
    #[arg(long)]
    pages: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InspectFormat {
    /// JSON output
    Json,
    /// Plain text report
    Text,
}

/// How one rule matched.
#[derive(Debug, Serialize)]
struct RuleReport {
    field: String,
    anchor: String,
    page: Option<usize>,
    window: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    file: String,
    kind: Option<String>,
    page_count: usize,
    rules: Vec<RuleReport>,
    fields: ExtractedFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pages: Option<Vec<String>>,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    info!("Inspecting file: {}", args.input.display());

    let pages = PdfPageSource::new().read_pages(&args.input)?;
    let extractor = DocumentExtractor::from_config(&config.extraction)?;

    let file = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let rules = extractor
        .rules()
        .into_iter()
        .map(|rule| {
            let found = rule.scan(&pages);
            RuleReport {
                field: rule.field.to_string(),
                anchor: match &rule.anchor {
                    Anchor::Label(label) => format!(
                        "{:?} skip {} width {}",
                        label, rule.window.skip, rule.window.width
                    ),
                    Anchor::Pattern(re) => format!("/{}/", re.as_str()),
                },
                page: found.as_ref().and_then(|m| m.page).map(|p| p + 1),
                window: found.as_ref().map(|m| m.source.clone()),
                value: found.map(|m| m.value),
            }
        })
        .collect();

    let report = InspectReport {
        kind: classify(&file, &config.discovery).map(|k| format!("{:?}", k).to_lowercase()),
        file,
        page_count: pages.len(),
        rules,
        fields: extractor.extract_pages(&pages),
        pages: args.pages.then(|| pages.clone()),
    };

    match args.format {
        InspectFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        InspectFormat::Text => print_text(&report),
    }

    Ok(())
}

fn print_text(report: &InspectReport) {
    println!(
        "{} {} ({}, {} pages)",
        style("ℹ").blue(),
        style(&report.file).bold(),
        report.kind.as_deref().unwrap_or("not a batch document"),
        report.page_count
    );
    println!();

    for rule in &report.rules {
        println!("{}", style(&rule.field).bold());
        println!("  anchor : {}", rule.anchor);
        match (&rule.page, &rule.window) {
            (Some(page), Some(window)) => {
                println!("  page   : {}", page);
                println!("  window : {:?}", window);
                println!(
                    "  value  : {}",
                    rule.value.as_deref().filter(|v| !v.is_empty()).unwrap_or("<empty>")
                );
            }
            _ => println!("  {}", style("not found").yellow()),
        }
    }

    if let Some(pages) = &report.pages {
        for (idx, text) in pages.iter().enumerate() {
            println!();
            println!("{}", style(format!("── page {} ──", idx + 1)).dim());
            println!("{}", text);
        }
    }
}
