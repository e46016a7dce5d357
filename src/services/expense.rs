//! Expense service
//!
//! Validation, persistence and audit around the expense store, plus the
//! filtered and sorted listings the CLI shows.

use tracing::debug;

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, ExpensePatch, Money, NewExpense};
use crate::storage::Storage;

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Newest first
    #[default]
    Date,
    /// Largest first
    Amount,
    /// Category name A-Z, newest first within a category
    Category,
}

/// Filters for [`ExpenseService::list`]
#[derive(Debug, Clone, Default)]
pub struct ExpenseQuery {
    /// Case-insensitive match on description or category
    pub search: Option<String>,
    /// Exact (case-insensitive) category label
    pub category: Option<String>,
    /// Calendar month as (year, month)
    pub month: Option<(i32, u32)>,
    pub sort: SortBy,
    pub limit: Option<usize>,
}

impl ExpenseQuery {
    fn matches(&self, expense: &Expense) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            if !expense.description.to_lowercase().contains(&needle)
                && !expense.category.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !expense.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }

        match self.month {
            Some((year, month)) => expense.is_in_month(year, month),
            None => true,
        }
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and store a new expense
    pub fn create(&self, data: NewExpense) -> ExpenseResult<Expense> {
        data.validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        let expense = self.storage.expenses.insert(data)?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        debug!(id = %expense.id, "expense created");
        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        self.storage.expenses.get(id)
    }

    /// Look up by id, accepting both `"7"` and `"exp-7"`
    pub fn find(&self, identifier: &str) -> ExpenseResult<Expense> {
        let id = identifier
            .parse::<ExpenseId>()
            .map_err(|_| ExpenseError::expense_not_found(identifier))?;
        self.get(id)
    }

    /// Filtered, sorted listing
    pub fn list(&self, query: &ExpenseQuery) -> ExpenseResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .storage
            .expenses
            .list()?
            .into_iter()
            .filter(|e| query.matches(e))
            .collect();

        match query.sort {
            SortBy::Date => expenses.sort_by(|a, b| b.date.cmp(&a.date)),
            SortBy::Amount => expenses.sort_by(|a, b| b.amount.cmp(&a.amount)),
            SortBy::Category => expenses.sort_by(|a, b| {
                a.category
                    .to_lowercase()
                    .cmp(&b.category.to_lowercase())
                    .then_with(|| b.date.cmp(&a.date))
            }),
        }

        if let Some(limit) = query.limit {
            expenses.truncate(limit);
        }

        Ok(expenses)
    }

    /// Apply a patch; the store rejects it if the result would be invalid
    pub fn update(&self, id: ExpenseId, patch: ExpensePatch) -> ExpenseResult<Expense> {
        if patch.is_empty() {
            return self.storage.expenses.get(id);
        }

        let (before, after) = self.storage.expenses.update(id, patch)?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            after.id.to_string(),
            Some(after.description.clone()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    pub fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let removed = self.storage.expenses.delete(id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            removed.id.to_string(),
            Some(removed.description.clone()),
            &removed,
        )?;

        Ok(removed)
    }

    /// Sum of amounts, saturating at the decimal range
    pub fn total(expenses: &[Expense]) -> Money {
        expenses.iter().map(|e| e.amount).sum()
    }
}
