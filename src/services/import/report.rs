//! Import report types
//!
//! Row problems are data, not errors: each failed row becomes a
//! [`RowFailure`] in the report and the rest of the batch carries on.

use std::fmt;

use crate::models::Expense;

/// Why a single row was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowErrorKind {
    /// Date, amount or description cell absent or blank
    MissingRequiredData,
    /// Amount not a number, or not strictly positive
    InvalidAmount,
    /// Date in no recognized format
    InvalidDate,
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowErrorKind::MissingRequiredData => write!(f, "Missing required data"),
            RowErrorKind::InvalidAmount => write!(f, "Invalid amount value"),
            RowErrorKind::InvalidDate => write!(f, "Invalid date format"),
        }
    }
}

/// A rejected row, numbered from 1 over data rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFailure {
    pub row: usize,
    pub reason: RowErrorKind,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.reason)
    }
}

/// Summary of one import call
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Stored expenses, in row order
    pub imported: Vec<Expense>,
    /// Rejected rows, in row order
    pub errors: Vec<RowFailure>,
    pub total_rows: usize,
    /// Problems after the rows were stored, such as an unwritable audit log
    pub warnings: Vec<String>,
}

/// Coarse classification of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Every row imported
    Success,
    /// Some rows imported, some rejected
    Partial,
    /// Every row rejected
    Failed,
    /// No rows at all
    Empty,
}

impl ImportReport {
    pub fn success_count(&self) -> usize {
        self.imported.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn outcome(&self) -> ImportOutcome {
        match (self.success_count(), self.error_count()) {
            (0, 0) => ImportOutcome::Empty,
            (_, 0) => ImportOutcome::Success,
            (0, _) => ImportOutcome::Failed,
            _ => ImportOutcome::Partial,
        }
    }

    /// Failure lines such as `"Row 2: Invalid date format"`
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Collects row outcomes for one import call
#[derive(Debug, Default)]
pub struct ImportReportBuilder {
    imported: Vec<Expense>,
    errors: Vec<RowFailure>,
    total_rows: usize,
    warnings: Vec<String>,
}

impl ImportReportBuilder {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Self::default()
        }
    }

    /// Record a rejected row
    pub fn fail(&mut self, row: usize, reason: RowErrorKind) -> &mut Self {
        self.errors.push(RowFailure { row, reason });
        self
    }

    /// Record stored expenses
    pub fn imported(&mut self, expenses: impl IntoIterator<Item = Expense>) -> &mut Self {
        self.imported.extend(expenses);
        self
    }

    /// Record a problem that did not reject any row
    pub fn warn(&mut self, message: impl Into<String>) -> &mut Self {
        self.warnings.push(message.into());
        self
    }

    pub fn finish(self) -> ImportReport {
        debug_assert_eq!(
            self.imported.len() + self.errors.len(),
            self.total_rows,
            "every row is either imported or rejected"
        );
        ImportReport {
            imported: self.imported,
            errors: self.errors,
            total_rows: self.total_rows,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, Money, NewExpense};
    use chrono::Utc;

    fn expense(id: u64) -> Expense {
        NewExpense::new("x", Money::from_cents(100)).into_expense(ExpenseId::new(id), Utc::now())
    }

    #[test]
    fn test_failure_display() {
        let failure = RowFailure {
            row: 2,
            reason: RowErrorKind::InvalidDate,
        };
        assert_eq!(failure.to_string(), "Row 2: Invalid date format");
        assert_eq!(
            RowErrorKind::MissingRequiredData.to_string(),
            "Missing required data"
        );
        assert_eq!(RowErrorKind::InvalidAmount.to_string(), "Invalid amount value");
    }

    #[test]
    fn test_counts_and_outcome() {
        let mut builder = ImportReportBuilder::new(3);
        builder
            .imported(vec![expense(1), expense(2)])
            .fail(3, RowErrorKind::InvalidAmount);
        let report = builder.finish();

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.success_count() + report.error_count(), report.total_rows);
        assert_eq!(report.outcome(), ImportOutcome::Partial);
        assert_eq!(report.error_messages(), vec!["Row 3: Invalid amount value"]);
    }

    #[test]
    fn test_outcome_classes() {
        assert_eq!(ImportReportBuilder::new(0).finish().outcome(), ImportOutcome::Empty);

        let mut all_bad = ImportReportBuilder::new(1);
        all_bad.fail(1, RowErrorKind::MissingRequiredData);
        assert_eq!(all_bad.finish().outcome(), ImportOutcome::Failed);

        let mut all_good = ImportReportBuilder::new(1);
        all_good.imported(vec![expense(1)]);
        assert_eq!(all_good.finish().outcome(), ImportOutcome::Success);
    }

    #[test]
    fn test_warnings_do_not_change_outcome() {
        let mut builder = ImportReportBuilder::new(1);
        builder.imported(vec![expense(1)]).warn("Audit log not updated");
        let report = builder.finish();

        assert_eq!(report.outcome(), ImportOutcome::Success);
        assert_eq!(report.warnings, vec!["Audit log not updated"]);
    }
}
