//! CSV export
//!
//! The layout matches what the importer's header detection recognizes, so
//! an exported file can be imported again as-is.

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;
use crate::storage::Storage;

/// Column headers of an expense export
pub const EXPORT_HEADERS: [&str; 5] = ["ID", "Date", "Description", "Category", "Amount"];

/// Write the given expenses as CSV
pub fn write_expenses_csv<W: Write>(expenses: &[Expense], writer: W) -> ExpenseResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(EXPORT_HEADERS)?;

    for expense in expenses {
        csv.write_record([
            expense.id.value().to_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.description.clone(),
            expense.category.clone(),
            expense.amount.value().to_string(),
        ])?;
    }

    csv.flush().map_err(|e| ExpenseError::Export(e.to_string()))
}

/// Export every stored expense, in insertion order
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: W) -> ExpenseResult<()> {
    write_expenses_csv(&storage.expenses.list()?, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::import::{detect_mapping, parse_csv, ImportService};

    #[test]
    fn test_export_quotes_and_formats() {
        let storage = Storage::in_memory().unwrap();
        let mut out = Vec::new();
        export_expenses_csv(&storage, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ID,Date,Description,Category,Amount"));
        assert_eq!(
            lines.next(),
            Some("1,2025-01-03,Grocery shopping at Whole Foods,Food,87.45")
        );
    }

    #[test]
    fn test_export_can_be_imported_again() {
        let source = Storage::in_memory().unwrap();
        let mut out = Vec::new();
        export_expenses_csv(&source, &mut out).unwrap();

        let parsed = parse_csv(&String::from_utf8(out).unwrap()).unwrap();
        let mapping = detect_mapping(&parsed.headers);
        assert!(mapping.validate().is_ok());

        let target = Storage::empty();
        let report = ImportService::new(&target)
            .import_rows(&parsed.rows, &mapping)
            .unwrap();

        let original = source.expenses.list().unwrap();
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.success_count(), original.len());
        assert_eq!(report.imported[0].amount, original[0].amount);
        assert_eq!(report.imported[0].category, original[0].category);
    }
}
