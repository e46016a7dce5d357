//! JSON export
//!
//! Dumps expenses and categories with a schema version and some metadata.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, Expense, Money};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full data export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub expenses: Vec<Expense>,
    pub categories: Vec<Category>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,
    pub category_count: usize,
    pub total_amount: Money,
    pub earliest_expense: Option<DateTime<Utc>>,
    pub latest_expense: Option<DateTime<Utc>>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> ExpenseResult<Self> {
        let expenses = storage.expenses.list()?;
        let categories = storage.categories.list()?;

        let metadata = ExportMetadata {
            expense_count: expenses.len(),
            category_count: categories.len(),
            total_amount: expenses.iter().map(|e| e.amount).sum(),
            earliest_expense: expenses.iter().map(|e| e.date).min(),
            latest_expense: expenses.iter().map(|e| e.date).max(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            expenses,
            categories,
            metadata,
        })
    }

    /// Check schema version and id uniqueness
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.expenses.iter().find(|e| !seen.insert(e.id)) {
            return Err(format!("Duplicate expense id {}", dup.id));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.categories.iter().find(|c| !seen.insert(c.id)) {
            return Err(format!("Duplicate category id {}", dup.id));
        }

        Ok(())
    }
}

/// Export everything as JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: W, pretty: bool) -> ExpenseResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| ExpenseError::Export(e.to_string()))
}

/// Read an export back and validate it
pub fn read_export_json(json: &str) -> ExpenseResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json).map_err(|e| ExpenseError::Export(e.to_string()))?;
    export.validate().map_err(ExpenseError::Export)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_and_read_back() {
        let storage = Storage::in_memory().unwrap();
        let mut out = Vec::new();
        export_full_json(&storage, &mut out, true).unwrap();

        let export = read_export_json(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(export.expenses, storage.expenses.list().unwrap());
        assert_eq!(export.metadata.category_count, 7);
        assert!(export.metadata.earliest_expense <= export.metadata.latest_expense);
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let storage = Storage::empty();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();
        assert!(export.validate().unwrap_err().contains("Schema version"));

        let json = serde_json::to_string(&export).unwrap();
        assert!(read_export_json(&json).is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let storage = Storage::in_memory().unwrap();
        let mut export = FullExport::from_storage(&storage).unwrap();
        let first = export.expenses[0].clone();
        export.expenses.push(first);
        assert!(export.validate().unwrap_err().contains("Duplicate expense id"));
    }
}
