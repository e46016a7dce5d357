//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod expense;
pub mod export;
pub mod history;
pub mod import;
pub mod report;

pub use category::{handle_category_command, CategoryCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use history::handle_history_command;
pub use import::{handle_headers_command, handle_import_command, ImportArgs};
pub use report::{handle_report_command, ReportCommands};

use chrono::{Datelike, NaiveDate};

use crate::error::{ExpenseError, ExpenseResult};

/// Parse `YYYY-MM` into (year, month)
pub(crate) fn parse_month(value: &str) -> ExpenseResult<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| {
            ExpenseError::Validation(format!("Invalid month (use YYYY-MM): {}", value))
        })?;
    Ok((date.year(), date.month()))
}
