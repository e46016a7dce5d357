//! CSV import
//!
//! Pipeline: [`parse_csv`] yields headers and header-keyed rows, the caller
//! picks a [`ColumnMapping`] (or takes the [`detect_mapping`] suggestion),
//! and [`ImportService::import_rows`] validates the mapping, checks every
//! row and commits the valid ones as one batch. Bad rows never stop the
//! import; they are listed in the returned [`ImportReport`].

mod ingest;
mod mapping;
mod parser;
mod report;

pub use ingest::{ingest_row, normalize_amount, parse_date};
pub use mapping::{detect_mapping, ColumnMapping, LogicalField};
pub use parser::{parse_csv, parse_csv_file, parse_csv_reader, CsvRow, ParsedCsv};
pub use report::{ImportOutcome, ImportReport, ImportReportBuilder, RowErrorKind, RowFailure};

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::ExpenseResult;
use crate::models::{NewExpense, DEFAULT_CATEGORY};
use crate::storage::Storage;

/// Outcome of checking rows without storing anything
#[derive(Debug, Clone, PartialEq)]
pub struct RowCheck {
    /// Accepted rows as `(row number, payload)`
    pub accepted: Vec<(usize, NewExpense)>,
    pub failures: Vec<RowFailure>,
    pub total_rows: usize,
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
    default_category: String,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Category given to rows with no category cell
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !category.trim().is_empty() {
            self.default_category = category.trim().to_string();
        }
        self
    }

    /// Validate the mapping and every row, storing nothing
    pub fn check_rows(&self, rows: &[CsvRow], mapping: &ColumnMapping) -> ExpenseResult<RowCheck> {
        mapping.validate()?;

        let mut accepted = Vec::new();
        let mut failures = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + 1;
            match ingest_row(row, mapping, &self.default_category) {
                Ok(expense) => accepted.push((row_number, expense)),
                Err(reason) => {
                    debug!(row = row_number, %reason, "row rejected");
                    failures.push(RowFailure {
                        row: row_number,
                        reason,
                    });
                }
            }
        }

        Ok(RowCheck {
            accepted,
            failures,
            total_rows: rows.len(),
        })
    }

    /// Import rows under a mapping
    ///
    /// Fails with `InvalidMapping` before looking at any row. Otherwise the
    /// valid rows are stored in one batch, so their ids are consecutive and
    /// follow row order, and all of them share one creation timestamp.
    ///
    /// Once the batch is stored the report is always returned. Snapshot or
    /// audit failures after that point become report warnings.
    pub fn import_rows(
        &self,
        rows: &[CsvRow],
        mapping: &ColumnMapping,
    ) -> ExpenseResult<ImportReport> {
        let check = self.check_rows(rows, mapping)?;
        let imported_at = Utc::now();

        let batch: Vec<NewExpense> = check
            .accepted
            .into_iter()
            .map(|(_, expense)| expense.with_created_at(imported_at))
            .collect();

        let mut builder = ImportReportBuilder::new(check.total_rows);
        for failure in &check.failures {
            builder.fail(failure.row, failure.reason);
        }

        if !batch.is_empty() {
            let stored = self.storage.expenses.insert_many(batch)?;
            if let Err(e) = self.storage.expenses.save() {
                warn!(error = %e, "imported expenses were not saved");
                builder.warn(format!("Imported expenses were not saved: {}", e));
            }
            if let Err(e) = self.storage.log_created_expenses(&stored) {
                warn!(error = %e, "imported expenses were not audited");
                builder.warn(format!("Audit log not updated: {}", e));
            }
            builder.imported(stored);
        }

        let report = builder.finish();
        info!(
            total = report.total_rows,
            imported = report.success_count(),
            failed = report.error_count(),
            warnings = report.warnings.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Parse a file and import it
    pub fn import_file(
        &self,
        path: impl AsRef<Path>,
        mapping: &ColumnMapping,
    ) -> ExpenseResult<ImportReport> {
        let parsed = parse_csv_file(path)?;
        self.import_rows(&parsed.rows, mapping)
    }

    /// The first `count` rows, for showing the user before importing
    pub fn preview(parsed: &ParsedCsv, count: usize) -> &[CsvRow] {
        &parsed.rows[..count.min(parsed.rows.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppPaths, Settings};
    use crate::error::ExpenseError;
    use crate::models::{ExpenseId, Money};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn full_mapping() -> ColumnMapping {
        ColumnMapping::new("date", "amount", "description")
    }

    fn row(date: &str, amount: &str, description: &str) -> CsvRow {
        CsvRow::from_pairs([("date", date), ("amount", amount), ("description", description)])
    }

    #[test]
    fn test_coffee_and_tea() {
        let storage = Storage::empty();
        let service = ImportService::new(&storage);
        let rows = vec![
            row("2024-03-01", "$50.00", "Coffee"),
            row("bad", "10", "Tea"),
        ];

        let report = service.import_rows(&rows, &full_mapping()).unwrap();

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.error_messages(), vec!["Row 2: Invalid date format"]);

        let coffee = &report.imported[0];
        assert_eq!(coffee.description, "Coffee");
        assert_eq!(coffee.amount.value(), dec!(50.00));
        assert_eq!(coffee.category, "Other");
        assert_eq!(coffee.date, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(storage.expenses.list().unwrap(), report.imported);
    }

    #[test]
    fn test_invalid_mapping_touches_nothing() {
        let storage = Storage::empty();
        let service = ImportService::new(&storage);
        let mapping = ColumnMapping::new("", "Amt", "Desc");
        let rows = vec![CsvRow::from_pairs([("Amt", "5"), ("Desc", "x")])];

        let err = service.import_rows(&rows, &mapping).unwrap_err();
        assert!(err.is_invalid_mapping());
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert_eq!(storage.expenses.next_id().unwrap(), ExpenseId::new(1));
    }

    #[test]
    fn test_bad_row_is_isolated() {
        let storage = Storage::empty();
        let service = ImportService::new(&storage);
        let rows = vec![
            row("2024-01-01", "10", "one"),
            row("2024-01-02", "-3", "two"),
            row("2024-01-03", "30", "three"),
        ];

        let report = service.import_rows(&rows, &full_mapping()).unwrap();
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.errors[0].row, 2);
        assert_eq!(report.errors[0].reason, RowErrorKind::InvalidAmount);

        let names: Vec<_> = report.imported.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["one", "three"]);
    }

    #[test]
    fn test_ids_increase_after_existing_records() {
        let storage = Storage::empty();
        storage
            .expenses
            .insert(NewExpense::new("Existing", Money::from_cents(100)))
            .unwrap();
        let service = ImportService::new(&storage);
        let rows = vec![
            row("2024-01-01", "1", "a"),
            row("nope", "1", "b"),
            row("2024-01-03", "1", "c"),
        ];

        let report = service.import_rows(&rows, &full_mapping()).unwrap();
        let ids: Vec<_> = report.imported.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(report.imported[0].created_at, report.imported[1].created_at);
    }

    #[test]
    fn test_counts_always_add_up() {
        let storage = Storage::empty();
        let service = ImportService::new(&storage);
        let rows = vec![
            row("", "", ""),
            row("2024-01-01", "abc", "x"),
            row("2024-01-01", "0", "x"),
            row("13/45/2024", "5", "x"),
            row("2024-01-01", "5", "ok"),
        ];

        let report = service.import_rows(&rows, &full_mapping()).unwrap();
        assert_eq!(report.success_count() + report.error_count(), report.total_rows);
        assert_eq!(report.outcome(), ImportOutcome::Partial);
        assert_eq!(
            report.error_messages(),
            vec![
                "Row 1: Missing required data",
                "Row 2: Invalid amount value",
                "Row 3: Invalid amount value",
                "Row 4: Invalid date format",
            ]
        );
    }

    #[test]
    fn test_custom_default_category() {
        let storage = Storage::empty();
        let service = ImportService::new(&storage).with_default_category("Misc");
        let report = service
            .import_rows(&[row("2024-01-01", "5", "x")], &full_mapping())
            .unwrap();
        assert_eq!(report.imported[0].category, "Misc");
    }

    #[test]
    fn test_check_rows_stores_nothing() {
        let storage = Storage::empty();
        let service = ImportService::new(&storage);
        let check = service
            .check_rows(
                &[row("2024-01-01", "5", "x"), row("x", "5", "y")],
                &full_mapping(),
            )
            .unwrap();

        assert_eq!(check.accepted.len(), 1);
        assert_eq!(check.accepted[0].0, 1);
        assert_eq!(check.failures.len(), 1);
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_import_file_persists_and_audits() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            seed_fixtures: false,
            ..Settings::default()
        };
        let storage = Storage::open(paths.clone(), &settings).unwrap();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Amount,Memo,Category").unwrap();
        writeln!(file, "01/15/2024,\"$1,200.00\",Rent,Bills").unwrap();
        writeln!(file, "01/16/2024,4.5,Coffee,").unwrap();

        let mapping = ColumnMapping::new("Date", "Amount", "Memo").with_category("Category");
        let report = ImportService::new(&storage)
            .import_file(file.path(), &mapping)
            .unwrap();

        assert_eq!(report.outcome(), ImportOutcome::Success);
        assert_eq!(report.imported[0].category, "Bills");
        assert_eq!(report.imported[1].category, "Other");

        let reopened = Storage::open(paths, &settings).unwrap();
        assert_eq!(reopened.expenses.count().unwrap(), 2);
        assert_eq!(reopened.audit().unwrap().read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_audit_failure_after_commit_still_reports() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            seed_fixtures: false,
            ..Settings::default()
        };
        let storage = Storage::open(paths.clone(), &settings).unwrap();
        std::fs::create_dir_all(paths.audit_log()).unwrap();

        let report = ImportService::new(&storage)
            .import_rows(&[row("2024-01-01", "5", "Coffee")], &full_mapping())
            .unwrap();

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Audit log not updated"));
        assert_eq!(storage.expenses.count().unwrap(), 1);

        let reopened = Storage::open(paths, &settings).unwrap();
        assert_eq!(reopened.expenses.count().unwrap(), 1);
    }

    #[test]
    fn test_oversized_amounts_are_row_failures() {
        let storage = Storage::empty();
        let rows = vec![
            row("2024-01-01", "79228162514264337593543950335", "a"),
            row("2024-01-02", "79228162514264337593543950335", "b"),
        ];

        let report = ImportService::new(&storage)
            .import_rows(&rows, &full_mapping())
            .unwrap();

        assert_eq!(report.success_count(), 0);
        assert_eq!(
            report.error_messages(),
            vec!["Row 1: Invalid amount value", "Row 2: Invalid amount value"]
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_import_empty_file() {
        let storage = Storage::empty();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Amount,Description").unwrap();

        let err = ImportService::new(&storage)
            .import_file(file.path(), &full_mapping())
            .unwrap_err();
        assert!(matches!(err, ExpenseError::EmptyFile));
    }

    #[test]
    fn test_preview_limits_rows() {
        let parsed = parse_csv("a\n1\n2\n3\n").unwrap();
        assert_eq!(ImportService::preview(&parsed, 2).len(), 2);
        assert_eq!(ImportService::preview(&parsed, 10).len(), 3);
    }
}
