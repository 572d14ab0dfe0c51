//! Spreadsheet writers for the paired rows.

use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use fvwaga_core::models::config::OutputConfig;
use fvwaga_core::{Row, Weight};

/// Header row of the output table.
pub const HEADER: [&str; 3] = ["FV", "Waga", "Paczka"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook
    Xlsx,
    /// Comma-separated values
    Csv,
}

impl OutputFormat {
    /// Pick the format from a file extension, Excel unless it says csv.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Xlsx,
        }
    }
}

/// FV cell: configured prefix followed by the VAT number. Empty when there is
/// no VAT number or its window was blank.
pub fn fv_cell(row: &Row, prefix: &str) -> Option<String> {
    row.fv
        .as_deref()
        .filter(|vat| !vat.is_empty())
        .map(|vat| format!("{}{}", prefix, vat))
}

/// Write all rows at once, replacing any existing file.
pub fn write_rows(
    path: &Path,
    format: OutputFormat,
    rows: &[Row],
    config: &OutputConfig,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Xlsx => write_xlsx(path, rows, config)?,
        OutputFormat::Csv => write_csv(path, rows, config)?,
    }
    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn write_xlsx(path: &Path, rows: &[Row], config: &OutputConfig) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&config.sheet_name)?;

    let bold = Format::new().set_bold();
    for (col, title) in HEADER.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    worksheet.set_column_width(0, 16)?;
    worksheet.set_column_width(1, 12)?;
    worksheet.set_column_width(2, 12)?;

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;

        if let Some(fv) = fv_cell(row, &config.fv_prefix) {
            worksheet.write_string(r, 0, fv)?;
        }

        match &row.weight {
            Some(Weight::Kilograms(kg)) => match kg.to_f64() {
                Some(value) => {
                    worksheet.write_number(r, 1, value)?;
                }
                None => {
                    worksheet.write_string(r, 1, kg.to_string())?;
                }
            },
            Some(Weight::Unparsed(raw)) if !raw.is_empty() => {
                worksheet.write_string(r, 1, raw)?;
            }
            _ => {}
        }

        if let Some(package) = &row.package {
            worksheet.write_string(r, 2, package)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(path: &Path, rows: &[Row], config: &OutputConfig) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record([
            fv_cell(row, &config.fv_prefix).unwrap_or_default(),
            row.weight.as_ref().map(|w| w.to_string()).unwrap_or_default(),
            row.package.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
