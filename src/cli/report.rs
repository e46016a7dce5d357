//! CLI commands for reports
//!
//! Provides commands for the yearly per-month totals and the
//! month-over-month comparison.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::{Datelike, Utc};
use clap::Subcommand;

use super::parse_month;
use crate::config::Settings;
use crate::display::{format_comparison, format_monthly_totals};
use crate::error::{ExpenseError, ExpenseResult};
use crate::reports::{MonthComparison, MonthlyTotals};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Spending per month for a year
    Monthly {
        /// Year to report on (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare a month with the month before it
    Compare {
        /// Month to compare (YYYY-MM, default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> ExpenseResult<()> {
    match cmd {
        ReportCommands::Monthly { year, output } => {
            handle_monthly_report(storage, settings, year, output)
        }
        ReportCommands::Compare { month } => handle_compare_report(storage, settings, month),
    }
}

fn handle_monthly_report(
    storage: &Storage,
    settings: &Settings,
    year: Option<i32>,
    output: Option<PathBuf>,
) -> ExpenseResult<()> {
    let year = year.unwrap_or_else(|| Utc::now().year());
    let report = MonthlyTotals::generate(storage, year)?;

    if let Some(path) = output {
        let file = File::create(&path).map_err(|e| {
            ExpenseError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        report.export_csv(BufWriter::new(file))?;
        println!("Monthly report exported to: {}", path.display());
    } else {
        print!("{}", format_monthly_totals(&report, &settings.currency_symbol));
    }

    Ok(())
}

fn handle_compare_report(
    storage: &Storage,
    settings: &Settings,
    month: Option<String>,
) -> ExpenseResult<()> {
    let comparison = match month {
        Some(month) => {
            let (year, month) = parse_month(&month)?;
            MonthComparison::for_month(&storage.expenses.list()?, year, month)?
        }
        None => MonthComparison::current(storage, Utc::now())?,
    };

    print!("{}", format_comparison(&comparison, &settings.currency_symbol));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_monthly_export_writes_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("monthly.csv");
        let storage = Storage::in_memory().unwrap();

        handle_report_command(
            &storage,
            &Settings::default(),
            ReportCommands::Monthly {
                year: Some(2025),
                output: Some(path.clone()),
            },
        )
        .unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("Year,Month,Category,Amount,Count"));
        assert!(text.contains("2025,1,TOTAL,"));
    }

    #[test]
    fn test_compare_rejects_bad_month() {
        let storage = Storage::empty();
        let err = handle_report_command(
            &storage,
            &Settings::default(),
            ReportCommands::Compare {
                month: Some("January".into()),
            },
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
