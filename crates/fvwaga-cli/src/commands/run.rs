//! Run command: pair the invoices and attachments of a directory into a
//! spreadsheet.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fvwaga_core::{
    discover, Batch, BatchReport, BatchSummary, DocumentExtractor, FvWagaConfig, PackageSource,
    PairedRow, PairingStrategy, PdfPageSource, RowAggregator,
};

use crate::output::{self, OutputFormat};
use crate::print;
use crate::ui;

/// Arguments for the run command.
#[derive(Args, Default)]
pub struct RunArgs {
    /// Directory to scan (default: current directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Output file (default: fv_waga.xlsx in the scanned directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from the output file extension)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Pairing strategy
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// File name prefix of invoices, e.g. 9 or 009
    #[arg(long)]
    invoice_prefix: Option<String>,

    /// Print the invoices through the configured viewer afterwards
    #[arg(long)]
    print: bool,

    /// Do not open the spreadsheet when done
    #[arg(long)]
    no_open: bool,

    /// Never wait for the operator; implies --no-open
    #[arg(short, long)]
    non_interactive: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrategyArg {
    /// Zip sorted invoices and attachments by position
    Positional,
    /// One row per attachment, invoices only printed
    AttachmentsOnly,
}

impl From<StrategyArg> for PairingStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Positional => PairingStrategy::Positional,
            StrategyArg::AttachmentsOnly => PairingStrategy::AttachmentsOnly,
        }
    }
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if let Err(e) = execute(&args, config_path).await {
        println!();
        println!("{} {:#}", style("✗ FATAL:").red().bold(), e);
        if !args.non_interactive {
            ui::pause("Press ENTER to exit...");
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn execute(args: &RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let interactive = !args.non_interactive;

    let config = resolve_config(args, config_path)?;
    let strategy = config.pairing.strategy;

    let dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    info!("Scanning {}", dir.display());

    ui::header();

    let batch = discover(&dir, &config.discovery)?;
    show_batch(&batch, &config);

    // Extraction
    ui::section("PROCESSING");

    let to_read = match strategy {
        PairingStrategy::Positional => batch.len(),
        PairingStrategy::AttachmentsOnly => batch.attachments.len(),
    };
    let pb = ProgressBar::new(to_read as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let extractor = DocumentExtractor::from_config(&config.extraction)?;
    let report = RowAggregator::new(strategy).process(&batch, &extractor, &PdfPageSource::new(), |d| {
        pb.set_message(d.document.file_name.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();

    show_rows(&report);
    show_summary(&report.summary);

    // Output
    ui::section("WRITING SPREADSHEET");

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| dir.join(&config.output.file_name));
    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_path(&output_path));

    let rows: Vec<_> = report.rows().cloned().collect();
    output::write_rows(&output_path, format, &rows, &config.output)?;

    ui::ok(format!("File written : {}", output_path.display()));
    ui::ok(format!("Rows         : {}", rows.len()));
    ui::separator();

    println!();
    println!(
        "{} Finished at {} in {:?}",
        style("✓").green().bold(),
        chrono::Local::now().format("%H:%M:%S"),
        start.elapsed()
    );

    if interactive && !args.no_open {
        ui::pause("Press ENTER to open the file...");
        match open_file(&output_path) {
            Ok(()) => ui::info(format!("Opening {}", output_path.display())),
            Err(e) => ui::failure(format!("Cannot open {}: {:#}", output_path.display(), e)),
        }
    }

    // Print pass over invoices
    let wants_print = args.print || (interactive && strategy == PairingStrategy::AttachmentsOnly);
    if wants_print && !batch.invoices.is_empty() {
        let question = format!("Print {} invoices?", batch.invoices.len());
        if !interactive || ui::confirm(&question) {
            print_invoices(&batch, &config).await;
        }
    }

    if interactive {
        ui::pause("Press ENTER to finish...");
    }

    Ok(())
}

/// Configuration with command-line overrides applied.
fn resolve_config(args: &RunArgs, config_path: Option<&str>) -> anyhow::Result<FvWagaConfig> {
    let mut config = super::load_config(config_path)?;

    if let Some(strategy) = args.strategy {
        config.pairing.strategy = strategy.into();
    }
    if let Some(prefix) = &args.invoice_prefix {
        config.discovery.invoice_prefix = prefix.clone();
    }

    config.validate()?;
    debug!("Effective config: {:?}", config);
    Ok(config)
}

fn show_batch(batch: &Batch, config: &FvWagaConfig) {
    let d = &config.discovery;
    ui::section("PDF FILES FOUND");

    let invoices_title = format!("Invoices ({}*)", d.invoice_prefix);
    let attachments_title = format!("Attachments ({}*)", d.attachment_prefix);
    ui::columns(&invoices_title, &attachments_title);

    let len = batch.invoices.len().max(batch.attachments.len());
    for idx in 0..len {
        let left = batch
            .invoices
            .get(idx)
            .map(|d| format!("• {}", d.file_name))
            .unwrap_or_default();
        let right = batch
            .attachments
            .get(idx)
            .map(|d| format!("• {}", d.file_name))
            .unwrap_or_default();
        ui::columns(&left, &right);
    }

    println!();
    if batch.invoices.is_empty() {
        ui::warning(format!(
            "No invoices ({}*): data is taken from attachments only.",
            d.invoice_prefix
        ));
    }
    if batch.attachments.is_empty() {
        ui::warning(format!(
            "No attachments ({}*): package numbers are searched in invoices only.",
            d.attachment_prefix
        ));
    }
}

fn show_rows(report: &BatchReport) {
    let unreadable: HashSet<&str> = report
        .faults()
        .map(|d| d.document.file_name.as_str())
        .collect();

    for paired in &report.rows {
        let (left, right) = row_status(paired, &unreadable);
        ui::columns(&left, &right);
    }

    let faults: Vec<_> = report.faults().collect();
    if !faults.is_empty() {
        println!();
        for d in faults {
            ui::failure(format!(
                "{}: {}",
                d.document.file_name,
                d.result.fault.as_deref().unwrap_or("unknown error")
            ));
        }
    }
}

/// Status cells of one row: invoice on the left, attachment on the right.
fn row_status(paired: &PairedRow, unreadable: &HashSet<&str>) -> (String, String) {
    let left = match &paired.invoice {
        Some(name) if unreadable.contains(name.as_str()) => format!("✗ {} (read error)", name),
        Some(name) if paired.package_source == Some(PackageSource::Invoice) => format!("✓ {}", name),
        Some(name) => format!("✗ {} (no package)", name),
        None => String::new(),
    };

    let mut right = match &paired.attachment {
        Some(name) if unreadable.contains(name.as_str()) => format!("✗ {} (read error)", name),
        Some(name) if paired.row.fv.is_some() && paired.row.weight.is_some() => {
            format!("✓ {}", name)
        }
        Some(name) => format!("✗ {} (missing data)", name),
        None => String::new(),
    };
    if paired.package_source == Some(PackageSource::AttachmentFallback) {
        right.push_str(" [package: fallback]");
    }

    (left, right)
}

fn show_summary(summary: &BatchSummary) {
    ui::section("SUMMARY");

    let total = summary.total_rows;
    println!("  Rows total     : {}", total);
    println!("  VAT numbers    : {}/{}", summary.vat_numbers, total);
    println!("  Weights        : {}/{}", summary.weights, total);
    println!("  Package numbers: {}/{}", summary.packages, total);

    let missing = summary.missing_rows();
    println!();
    if missing > 0 {
        ui::warning(format!("{} rows have gaps - cells left empty", missing));
    } else {
        ui::ok("All data complete");
    }
    ui::separator();
}

async fn print_invoices(batch: &Batch, config: &FvWagaConfig) {
    ui::section("PRINTING");
    ui::info(format!(
        "Viewer: {}",
        print::viewer_path(&config.print).display()
    ));

    let outcome = print::print_documents(&batch.invoices, &config.print, |doc, result| match result {
        Ok(()) => ui::ok(&doc.file_name),
        Err(e) => ui::failure(format!("{}: {:#}", doc.file_name, e)),
    })
    .await;

    println!();
    println!(
        "  {} printed, {} failed",
        style(outcome.printed).green(),
        style(outcome.failed).red()
    );
}

/// Hand the file to the desktop's default application without waiting.
fn open_file(path: &Path) -> anyhow::Result<()> {
    #[cfg(windows)]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    };

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = Command::new("open");
        c.arg(path);
        c
    };

    #[cfg(all(unix, not(target_os = "macos")))]
    let mut command = {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    command.spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fvwaga_core::Row;
    use pretty_assertions::assert_eq;

    fn paired(
        invoice: Option<&str>,
        attachment: Option<&str>,
        fv: Option<&str>,
        package_source: Option<PackageSource>,
    ) -> PairedRow {
        PairedRow {
            row: Row {
                fv: fv.map(str::to_string),
                weight: fv.map(|_| fvwaga_core::Weight::Unparsed("1".to_string())),
                package: package_source.map(|_| "123456".to_string()),
            },
            invoice: invoice.map(str::to_string),
            attachment: attachment.map(str::to_string),
            package_source,
        }
    }

    #[test]
    fn test_row_status_complete() {
        let row = paired(Some("9A.pdf"), Some("Z1.pdf"), Some("1"), Some(PackageSource::Invoice));
        assert_eq!(
            row_status(&row, &HashSet::new()),
            ("✓ 9A.pdf".to_string(), "✓ Z1.pdf".to_string())
        );
    }

    #[test]
    fn test_row_status_fallback() {
        let row = paired(
            Some("9A.pdf"),
            Some("Z1.pdf"),
            Some("1"),
            Some(PackageSource::AttachmentFallback),
        );
        assert_eq!(
            row_status(&row, &HashSet::new()),
            (
                "✗ 9A.pdf (no package)".to_string(),
                "✓ Z1.pdf [package: fallback]".to_string()
            )
        );
    }

    #[test]
    fn test_row_status_unreadable_and_missing() {
        let unreadable: HashSet<&str> = ["9B.pdf"].into_iter().collect();
        let row = paired(Some("9B.pdf"), None, None, None);
        assert_eq!(
            row_status(&row, &unreadable),
            ("✗ 9B.pdf (read error)".to_string(), String::new())
        );

        let row = paired(None, Some("Z3.pdf"), None, None);
        assert_eq!(
            row_status(&row, &unreadable),
            (String::new(), "✗ Z3.pdf (missing data)".to_string())
        );
    }

    #[test]
    fn test_cli_overrides() {
        let args = RunArgs {
            strategy: Some(StrategyArg::AttachmentsOnly),
            invoice_prefix: Some("009".to_string()),
            ..RunArgs::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        FvWagaConfig::default().save(&path).unwrap();

        let config = resolve_config(&args, path.to_str()).unwrap();
        assert_eq!(config.pairing.strategy, PairingStrategy::AttachmentsOnly);
        assert_eq!(config.discovery.invoice_prefix, "009");
    }
}
