//! CLI command handlers for CSV import
//!
//! Columns are picked with flags; any flag left out falls back to the
//! column suggested from the file's headers.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use crate::config::Settings;
use crate::display::{format_headers, format_import_report, format_preview, format_row_check};
use crate::error::{ExpenseError, ExpenseResult};
use crate::services::import::{detect_mapping, parse_csv_file, ColumnMapping, ParsedCsv};
use crate::services::ImportService;
use crate::storage::Storage;

/// Arguments of `expenses import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to CSV file
    pub file: PathBuf,
    /// Column holding the date
    #[arg(long)]
    pub date: Option<String>,
    /// Column holding the amount
    #[arg(long)]
    pub amount: Option<String>,
    /// Column holding the description
    #[arg(long)]
    pub description: Option<String>,
    /// Column holding the category (rows without one get the default category)
    #[arg(long)]
    pub category: Option<String>,
    /// Check every row without storing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Show the first rows of the file before importing
    #[arg(long)]
    pub preview: bool,
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> ExpenseResult<()> {
    let parsed = read_file(&args.file)?;
    let mapping = resolve_mapping(&parsed.headers, &args);

    mapping.validate()?;
    mapping.validate_against_headers(&parsed.headers)?;

    if args.preview {
        let rows = ImportService::preview(&parsed, settings.preview_rows);
        println!("Preview ({} of {} row(s)):", rows.len(), parsed.rows.len());
        print!("{}", format_preview(&parsed.headers, rows));
        println!();
    }

    println!("{}", describe_mapping(&mapping));

    let service = ImportService::new(storage).with_default_category(&settings.default_category);

    if args.dry_run {
        let check = service.check_rows(&parsed.rows, &mapping)?;
        print!("{}", format_row_check(&check));
        return Ok(());
    }

    info!(file = %args.file.display(), rows = parsed.rows.len(), "importing");
    let report = service.import_rows(&parsed.rows, &mapping)?;
    print!("{}", format_import_report(&report));

    Ok(())
}

/// Handle the headers command
pub fn handle_headers_command(file: &Path, settings: &Settings) -> ExpenseResult<()> {
    let parsed = read_file(file)?;

    print!("{}", format_headers(&parsed.headers));
    println!();
    println!("{}", describe_mapping(&detect_mapping(&parsed.headers)));
    println!();

    let rows = ImportService::preview(&parsed, settings.preview_rows);
    print!("{}", format_preview(&parsed.headers, rows));

    Ok(())
}

fn read_file(file: &Path) -> ExpenseResult<ParsedCsv> {
    if !file.exists() {
        return Err(ExpenseError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }
    parse_csv_file(file)
}

/// Flags win; anything not given comes from the header suggestion
fn resolve_mapping(headers: &[String], args: &ImportArgs) -> ColumnMapping {
    let detected = detect_mapping(headers);

    ColumnMapping {
        date: args.date.clone().unwrap_or(detected.date),
        amount: args.amount.clone().unwrap_or(detected.amount),
        description: args.description.clone().unwrap_or(detected.description),
        category: args.category.clone().or(detected.category),
    }
}

fn describe_mapping(mapping: &ColumnMapping) -> String {
    let show = |column: &str| {
        if column.trim().is_empty() {
            "(none)".to_string()
        } else {
            format!("\"{}\"", column)
        }
    };

    format!(
        "Column mapping: date <- {}, amount <- {}, description <- {}, category <- {}",
        show(&mapping.date),
        show(&mapping.amount),
        show(&mapping.description),
        show(mapping.category.as_deref().unwrap_or(""))
    )
}
