//! Spending reports
//!
//! Monthly totals for a year and a month-over-month comparison.

pub mod comparison;
pub mod monthly;

pub use comparison::{MonthComparison, MonthSummary, Trend};
pub use monthly::{MonthTotal, MonthlyTotals};
