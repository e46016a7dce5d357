//! Display formatting for terminal output
//!
//! Tables and summaries for expenses, categories, reports and imports.

pub mod category;
pub mod expense;
pub mod import;
pub mod report;

pub use category::{format_category_details, format_category_table};
pub use expense::{format_expense_details, format_expense_table};
pub use import::{format_headers, format_import_report, format_preview, format_row_check};
pub use report::{format_comparison, format_monthly_totals};
