//! Import display formatting

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::services::import::{CsvRow, ImportOutcome, ImportReport, RowCheck};

use super::expense::truncate;

/// Numbered header list, for picking mapping columns
pub fn format_headers(headers: &[String]) -> String {
    let mut output = format!("{} column(s):\n", headers.len());
    for (i, header) in headers.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, header));
    }
    output
}

/// The first rows of a file under its headers
pub fn format_preview(headers: &[String], rows: &[CsvRow]) -> String {
    if rows.is_empty() {
        return "No rows to preview.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for row in rows {
        builder.push_record(
            headers
                .iter()
                .map(|h| truncate(row.get(h).unwrap_or(""), 30)),
        );
    }

    let mut table = builder.build();
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Summary of a finished import
pub fn format_import_report(report: &ImportReport) -> String {
    let mut output = String::new();

    let headline = match report.outcome() {
        ImportOutcome::Success => format!("Imported all {} row(s).", report.total_rows),
        ImportOutcome::Partial => format!(
            "Imported {} of {} row(s); {} failed.",
            report.success_count(),
            report.total_rows,
            report.error_count()
        ),
        ImportOutcome::Failed => format!("No rows imported; all {} failed.", report.total_rows),
        ImportOutcome::Empty => "Nothing to import.".to_string(),
    };
    output.push_str(&headline);
    output.push('\n');

    if let (Some(first), Some(last)) = (report.imported.first(), report.imported.last()) {
        output.push_str(&format!("New ids: {} .. {}\n", first.id, last.id));
    }

    push_errors(&mut output, report.error_messages());

    if !report.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &report.warnings {
            output.push_str(&format!("  {}\n", warning));
        }
    }
    output
}

/// Summary of a dry run
pub fn format_row_check(check: &RowCheck) -> String {
    let mut output = format!(
        "Dry run: {} of {} row(s) would be imported.\n",
        check.accepted.len(),
        check.total_rows
    );
    push_errors(
        &mut output,
        check.failures.iter().map(ToString::to_string).collect(),
    );
    output
}

fn push_errors(output: &mut String, errors: Vec<String>) {
    if errors.is_empty() {
        return;
    }
    output.push_str("\nErrors:\n");
    for error in errors {
        output.push_str(&format!("  {}\n", error));
    }
}
