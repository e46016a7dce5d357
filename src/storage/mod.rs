//! Storage layer for expense-tracker
//!
//! The record stores are traits so the import pipeline and services never
//! depend on a concrete engine. The bundled repositories keep everything in
//! memory and can optionally snapshot to JSON files with atomic writes.

pub mod categories;
pub mod expenses;
pub mod file_io;
pub mod fixtures;

pub use categories::CategoryRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};

use serde::Serialize;
use tracing::{debug, info};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::{AppPaths, Settings};
use crate::error::ExpenseResult;
use crate::models::{
    Category, CategoryId, CategoryPatch, Expense, ExpenseId, ExpensePatch, NewCategory,
    NewExpense,
};

/// Keyed collection of expenses
///
/// Implementations own id assignment: ids are unique, strictly increasing
/// and never reused, even after the newest expense is deleted. Every value
/// handed out is an independent copy.
pub trait ExpenseStore: Send + Sync {
    /// All expenses in insertion order
    fn list(&self) -> ExpenseResult<Vec<Expense>>;

    fn get(&self, id: ExpenseId) -> ExpenseResult<Expense>;

    /// Assign the next id and store the expense
    fn insert(&self, data: NewExpense) -> ExpenseResult<Expense>;

    /// Store a batch under one allocation; ids follow input order
    fn insert_many(&self, batch: Vec<NewExpense>) -> ExpenseResult<Vec<Expense>>;

    /// Apply a patch and validate the result under one lock, returning
    /// `(before, after)`. An invalid result leaves the record untouched.
    fn update(&self, id: ExpenseId, patch: ExpensePatch) -> ExpenseResult<(Expense, Expense)>;

    /// Remove an expense, returning the removed record
    fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense>;

    /// The id the next insert would receive
    fn next_id(&self) -> ExpenseResult<ExpenseId>;

    fn count(&self) -> ExpenseResult<usize> {
        Ok(self.list()?.len())
    }

    /// Persist pending changes, if the store is backed by anything
    fn save(&self) -> ExpenseResult<()> {
        Ok(())
    }
}

/// Keyed collection of categories
pub trait CategoryStore: Send + Sync {
    fn list(&self) -> ExpenseResult<Vec<Category>>;

    fn get(&self, id: CategoryId) -> ExpenseResult<Category>;

    /// Case-insensitive lookup by name
    fn find_by_name(&self, name: &str) -> ExpenseResult<Option<Category>>;

    fn insert(&self, data: NewCategory) -> ExpenseResult<Category>;

    fn update(&self, id: CategoryId, patch: CategoryPatch) -> ExpenseResult<Category>;

    fn delete(&self, id: CategoryId) -> ExpenseResult<Category>;

    fn save(&self) -> ExpenseResult<()> {
        Ok(())
    }
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: Option<AppPaths>,
    pub expenses: Box<dyn ExpenseStore>,
    pub categories: Box<dyn CategoryStore>,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Pure in-memory storage seeded with the starter data
    pub fn in_memory() -> ExpenseResult<Self> {
        Ok(Self::with_stores(
            Box::new(ExpenseRepository::from_records(fixtures::sample_expenses()?)),
            Box::new(CategoryRepository::from_records(fixtures::default_categories())),
        ))
    }

    /// Pure in-memory storage with no records at all
    pub fn empty() -> Self {
        Self::with_stores(
            Box::new(ExpenseRepository::in_memory()),
            Box::new(CategoryRepository::in_memory()),
        )
    }

    /// Wrap caller-supplied stores. No audit log is written.
    pub fn with_stores(expenses: Box<dyn ExpenseStore>, categories: Box<dyn CategoryStore>) -> Self {
        Self {
            paths: None,
            expenses,
            categories,
            audit: None,
        }
    }

    /// Open JSON-backed storage in a data directory, with auditing
    ///
    /// Missing snapshots are seeded from the starter data when
    /// `settings.seed_fixtures` is on, otherwise they start empty.
    pub fn open(paths: AppPaths, settings: &Settings) -> ExpenseResult<Self> {
        paths.ensure_directories()?;

        let expenses = ExpenseRepository::with_path(paths.expenses_file());
        if !expenses.load()? && settings.seed_fixtures {
            info!("seeding sample expenses");
            expenses.replace_all(fixtures::sample_expenses()?)?;
        }

        let categories = CategoryRepository::with_path(paths.categories_file());
        if !categories.load()? && settings.seed_fixtures {
            info!("seeding default categories");
            categories.replace_all(fixtures::default_categories())?;
        }

        debug!(base = %paths.base_dir().display(), "storage opened");

        Ok(Self {
            audit: Some(AuditLogger::new(paths.audit_log())),
            paths: Some(paths),
            expenses: Box::new(expenses),
            categories: Box::new(categories),
        })
    }

    /// Paths of the backing directory, if any
    pub fn paths(&self) -> Option<&AppPaths> {
        self.paths.as_ref()
    }

    /// The audit log, if this storage writes one
    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> ExpenseResult<()> {
        self.expenses.save()?;
        self.categories.save()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> ExpenseResult<()> {
        match &self.audit {
            Some(audit) => audit.log(&AuditEntry::create(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> ExpenseResult<()> {
        let Some(audit) = &self.audit else {
            return Ok(());
        };

        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };

        audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> ExpenseResult<()> {
        match &self.audit {
            Some(audit) => audit.log(&AuditEntry::delete(
                entity_type,
                entity_id,
                entity_name,
                entity,
            )),
            None => Ok(()),
        }
    }

    /// One create entry per expense, flushed once
    pub fn log_created_expenses(&self, expenses: &[Expense]) -> ExpenseResult<()> {
        let Some(audit) = &self.audit else {
            return Ok(());
        };

        let entries: Vec<_> = expenses
            .iter()
            .map(|e| {
                AuditEntry::create(
                    EntityType::Expense,
                    e.id.to_string(),
                    Some(e.description.clone()),
                    e,
                )
            })
            .collect();
        audit.log_batch(&entries)
    }
}
