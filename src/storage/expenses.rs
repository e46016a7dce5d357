//! Expense repository
//!
//! Holds expenses in insertion order behind a single `RwLock`. Every id
//! allocation and mutation happens under the write guard, so concurrent
//! callers can never compute the same next id and readers never observe a
//! half-committed batch. When constructed with a path, the repository can
//! snapshot itself to `expenses.json`.
//!
//! Id contract: the next id is one past the larger of the high-water mark and
//! the largest live id. Deleting the newest expense therefore never frees its
//! id for reuse.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, ExpensePatch, NewExpense};

use super::file_io::{read_json, write_json_atomic};
use super::ExpenseStore;

/// Serializable expense snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseData {
    /// Highest id ever handed out
    #[serde(default)]
    pub high_water: u64,
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Default)]
struct ExpenseState {
    expenses: Vec<Expense>,
    high_water: u64,
}

impl ExpenseState {
    fn from_data(data: ExpenseData) -> Self {
        let max_live = data.expenses.iter().map(|e| e.id.value()).max().unwrap_or(0);
        Self {
            high_water: data.high_water.max(max_live),
            expenses: data.expenses,
        }
    }

    fn peek(&self) -> ExpenseId {
        let max_live = self.expenses.iter().map(|e| e.id.value()).max().unwrap_or(0);
        ExpenseId::new(self.high_water.max(max_live) + 1)
    }

    fn allocate(&mut self) -> ExpenseId {
        let id = self.peek();
        self.high_water = id.value();
        id
    }

    fn position(&self, id: ExpenseId) -> ExpenseResult<usize> {
        self.expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))
    }
}

/// In-memory expense repository with optional JSON snapshot
pub struct ExpenseRepository {
    path: Option<PathBuf>,
    state: RwLock<ExpenseState>,
}

impl ExpenseRepository {
    /// Create an empty, purely in-memory repository
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(ExpenseState::default()),
        }
    }

    /// Create an in-memory repository holding the given records
    pub fn from_records(expenses: Vec<Expense>) -> Self {
        Self {
            path: None,
            state: RwLock::new(ExpenseState::from_data(ExpenseData {
                high_water: 0,
                expenses,
            })),
        }
    }

    /// Create a repository that snapshots to `path`
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            state: RwLock::new(ExpenseState::default()),
        }
    }

    /// Load the snapshot from disk
    ///
    /// Returns `false` when no snapshot exists yet, leaving the repository
    /// untouched.
    pub fn load(&self) -> ExpenseResult<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        let Some(data) = read_json::<ExpenseData, _>(path)? else {
            return Ok(false);
        };

        debug!(count = data.expenses.len(), path = %path.display(), "loaded expenses");
        *self.write()? = ExpenseState::from_data(data);
        Ok(true)
    }

    /// Replace the contents with `expenses` (used for fixture seeding)
    pub fn replace_all(&self, expenses: Vec<Expense>) -> ExpenseResult<()> {
        *self.write()? = ExpenseState::from_data(ExpenseData {
            high_water: 0,
            expenses,
        });
        Ok(())
    }

    fn read(&self) -> ExpenseResult<RwLockReadGuard<'_, ExpenseState>> {
        self.state
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> ExpenseResult<RwLockWriteGuard<'_, ExpenseState>> {
        self.state
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

impl ExpenseStore for ExpenseRepository {
    fn list(&self) -> ExpenseResult<Vec<Expense>> {
        Ok(self.read()?.expenses.clone())
    }

    fn get(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let state = self.read()?;
        let idx = state.position(id)?;
        Ok(state.expenses[idx].clone())
    }

    fn insert(&self, data: NewExpense) -> ExpenseResult<Expense> {
        let mut state = self.write()?;
        let id = state.allocate();
        let expense = data.into_expense(id, Utc::now());
        state.expenses.push(expense.clone());
        Ok(expense)
    }

    fn insert_many(&self, batch: Vec<NewExpense>) -> ExpenseResult<Vec<Expense>> {
        let mut state = self.write()?;
        let now = Utc::now();
        let mut inserted = Vec::with_capacity(batch.len());

        for data in batch {
            let id = state.allocate();
            let expense = data.into_expense(id, now);
            state.expenses.push(expense.clone());
            inserted.push(expense);
        }

        Ok(inserted)
    }

    fn update(&self, id: ExpenseId, patch: ExpensePatch) -> ExpenseResult<(Expense, Expense)> {
        let mut state = self.write()?;
        let idx = state.position(id)?;

        let before = state.expenses[idx].clone();
        let mut after = before.clone();
        after.apply(patch);
        after
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        state.expenses[idx] = after.clone();
        Ok((before, after))
    }

    fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let mut state = self.write()?;
        let idx = state.position(id)?;
        Ok(state.expenses.remove(idx))
    }

    fn next_id(&self) -> ExpenseResult<ExpenseId> {
        Ok(self.read()?.peek())
    }

    fn count(&self) -> ExpenseResult<usize> {
        Ok(self.read()?.expenses.len())
    }

    fn save(&self) -> ExpenseResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let state = self.read()?;
        let data = ExpenseData {
            high_water: state.high_water,
            expenses: state.expenses.clone(),
        };
        write_json_atomic(path, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn coffee() -> NewExpense {
        NewExpense::new("Coffee", Money::from_cents(450))
    }

    #[test]
    fn test_empty_store_starts_at_one() {
        let repo = ExpenseRepository::in_memory();
        assert_eq!(repo.next_id().unwrap(), ExpenseId::new(1));
        assert_eq!(repo.insert(coffee()).unwrap().id, ExpenseId::new(1));
        assert_eq!(repo.insert(coffee()).unwrap().id, ExpenseId::new(2));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let repo = ExpenseRepository::in_memory();
        repo.insert(NewExpense::new("a", Money::from_cents(1))).unwrap();
        repo.insert(NewExpense::new("b", Money::from_cents(2))).unwrap();
        repo.insert(NewExpense::new("c", Money::from_cents(3))).unwrap();

        let names: Vec<_> = repo.list().unwrap().into_iter().map(|e| e.description).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_returned_values_are_copies() {
        let repo = ExpenseRepository::in_memory();
        let mut inserted = repo.insert(coffee()).unwrap();
        inserted.description = "Mutated".into();

        let mut listed = repo.list().unwrap();
        listed[0].amount = Money::from_cents(1);

        let stored = repo.get(inserted.id).unwrap();
        assert_eq!(stored.description, "Coffee");
        assert_eq!(stored.amount, Money::from_cents(450));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let repo = ExpenseRepository::in_memory();
        let err = repo.get(ExpenseId::new(99)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_deleting_max_id_does_not_reuse_it() {
        let repo = ExpenseRepository::in_memory();
        repo.insert(coffee()).unwrap();
        let newest = repo.insert(coffee()).unwrap();
        assert_eq!(newest.id, ExpenseId::new(2));

        let removed = repo.delete(newest.id).unwrap();
        assert_eq!(removed.id, ExpenseId::new(2));

        let next = repo.insert(coffee()).unwrap();
        assert_eq!(next.id, ExpenseId::new(3));
    }

    #[test]
    fn test_seeded_records_continue_from_max() {
        let now = Utc::now();
        let seeded = vec![
            coffee().into_expense(ExpenseId::new(4), now),
            coffee().into_expense(ExpenseId::new(9), now),
        ];
        let repo = ExpenseRepository::from_records(seeded);
        assert_eq!(repo.insert(coffee()).unwrap().id, ExpenseId::new(10));
    }

    #[test]
    fn test_update_preserves_id_and_created_at() {
        let repo = ExpenseRepository::in_memory();
        let original = repo.insert(coffee()).unwrap();

        let (before, updated) = repo
            .update(
                original.id,
                ExpensePatch {
                    description: Some("Latte".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(before, original);
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.description, "Latte");
        assert_eq!(repo.get(original.id).unwrap().description, "Latte");
    }

    #[test]
    fn test_invalid_update_leaves_record_unchanged() {
        let repo = ExpenseRepository::in_memory();
        let original = repo.insert(coffee()).unwrap();

        let err = repo
            .update(
                original.id,
                ExpensePatch {
                    description: Some("Latte".into()),
                    amount: Some(Money::zero()),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(repo.get(original.id).unwrap(), original);
    }

    #[test]
    fn test_update_and_delete_missing() {
        let repo = ExpenseRepository::in_memory();
        assert!(repo
            .update(ExpenseId::new(1), ExpensePatch::default())
            .unwrap_err()
            .is_not_found());
        assert!(repo.delete(ExpenseId::new(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_insert_many_allocates_contiguously() {
        let repo = ExpenseRepository::in_memory();
        repo.insert(coffee()).unwrap();

        let batch = repo.insert_many(vec![coffee(), coffee(), coffee()]).unwrap();
        let ids: Vec<_> = batch.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(repo.count().unwrap(), 4);
    }

    #[test]
    fn test_concurrent_inserts_get_distinct_ids() {
        let repo = Arc::new(ExpenseRepository::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| repo.insert(coffee()).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(ids.last().unwrap().value(), 200);
    }

    #[test]
    fn test_save_and_reload_keeps_high_water() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");

        let repo = ExpenseRepository::with_path(path.clone());
        assert!(!repo.load().unwrap());
        repo.insert(coffee()).unwrap();
        let second = repo.insert(coffee()).unwrap();
        repo.delete(second.id).unwrap();
        repo.save().unwrap();

        let reloaded = ExpenseRepository::with_path(path);
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.count().unwrap(), 1);
        assert_eq!(reloaded.insert(coffee()).unwrap().id, ExpenseId::new(3));
    }
}
