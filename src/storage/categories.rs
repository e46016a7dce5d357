//! Category repository
//!
//! Manages the category list and its `categories.json` snapshot. Name
//! uniqueness is a service-level rule; the repository only stores.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, CategoryId, CategoryPatch, NewCategory};

use super::file_io::{read_json, write_json_atomic};
use super::CategoryStore;

/// Serializable category snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryData {
    #[serde(default)]
    pub high_water: u64,
    pub categories: Vec<Category>,
}

#[derive(Debug, Default)]
struct CategoryState {
    categories: Vec<Category>,
    high_water: u64,
}

impl CategoryState {
    fn from_data(data: CategoryData) -> Self {
        let max_live = data
            .categories
            .iter()
            .map(|c| c.id.value())
            .max()
            .unwrap_or(0);
        Self {
            high_water: data.high_water.max(max_live),
            categories: data.categories,
        }
    }

    fn allocate(&mut self) -> CategoryId {
        self.high_water += 1;
        CategoryId::new(self.high_water)
    }

    fn position(&self, id: CategoryId) -> ExpenseResult<usize> {
        self.categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ExpenseError::category_not_found(id.to_string()))
    }
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: Option<PathBuf>,
    state: RwLock<CategoryState>,
}

impl CategoryRepository {
    /// Create an empty in-memory repository
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(CategoryState::default()),
        }
    }

    /// Create an in-memory repository holding the given categories
    pub fn from_records(categories: Vec<Category>) -> Self {
        Self {
            path: None,
            state: RwLock::new(CategoryState::from_data(CategoryData {
                high_water: 0,
                categories,
            })),
        }
    }

    /// Create a repository backed by `path`
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            state: RwLock::new(CategoryState::default()),
        }
    }

    /// Load categories from disk. Returns `false` if nothing was saved yet.
    pub fn load(&self) -> ExpenseResult<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        let Some(data) = read_json::<CategoryData, _>(path)? else {
            return Ok(false);
        };

        debug!(count = data.categories.len(), "loaded categories");
        *self.write()? = CategoryState::from_data(data);
        Ok(true)
    }

    /// Replace the contents with `categories`
    pub fn replace_all(&self, categories: Vec<Category>) -> ExpenseResult<()> {
        *self.write()? = CategoryState::from_data(CategoryData {
            high_water: 0,
            categories,
        });
        Ok(())
    }

    fn read(&self) -> ExpenseResult<RwLockReadGuard<'_, CategoryState>> {
        self.state
            .read()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> ExpenseResult<RwLockWriteGuard<'_, CategoryState>> {
        self.state
            .write()
            .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

impl CategoryStore for CategoryRepository {
    fn list(&self) -> ExpenseResult<Vec<Category>> {
        Ok(self.read()?.categories.clone())
    }

    fn get(&self, id: CategoryId) -> ExpenseResult<Category> {
        let state = self.read()?;
        let idx = state.position(id)?;
        Ok(state.categories[idx].clone())
    }

    fn find_by_name(&self, name: &str) -> ExpenseResult<Option<Category>> {
        let state = self.read()?;
        Ok(state
            .categories
            .iter()
            .find(|c| c.matches_name(name))
            .cloned())
    }

    fn insert(&self, data: NewCategory) -> ExpenseResult<Category> {
        let mut state = self.write()?;
        let id = state.allocate();
        let category = data.into_category(id);
        state.categories.push(category.clone());
        Ok(category)
    }

    fn update(&self, id: CategoryId, patch: CategoryPatch) -> ExpenseResult<Category> {
        let mut state = self.write()?;
        let idx = state.position(id)?;
        let category = &mut state.categories[idx];
        category.apply(patch);
        Ok(category.clone())
    }

    fn delete(&self, id: CategoryId) -> ExpenseResult<Category> {
        let mut state = self.write()?;
        let idx = state.position(id)?;
        Ok(state.categories.remove(idx))
    }

    fn save(&self) -> ExpenseResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let state = self.read()?;
        let data = CategoryData {
            high_water: state.high_water,
            categories: state.categories.clone(),
        };
        write_json_atomic(path, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_insert_and_find_by_name() {
        let repo = CategoryRepository::in_memory();
        let food = repo
            .insert(NewCategory::new("Food").with_color("#F59E0B"))
            .unwrap();
        assert_eq!(food.id, CategoryId::new(1));

        let found = repo.find_by_name("FOOD").unwrap().unwrap();
        assert_eq!(found.id, food.id);
        assert!(repo.find_by_name("Travel").unwrap().is_none());
    }

    #[test]
    fn test_update_preserves_id() {
        let repo = CategoryRepository::in_memory();
        let food = repo.insert(NewCategory::new("Food")).unwrap();

        let updated = repo
            .update(
                food.id,
                CategoryPatch {
                    color: Some("#10B981".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, food.id);
        assert_eq!(updated.name, "Food");
        assert_eq!(updated.color, "#10B981");
    }

    #[test]
    fn test_delete_and_missing() {
        let repo = CategoryRepository::in_memory();
        let food = repo.insert(NewCategory::new("Food")).unwrap();
        repo.delete(food.id).unwrap();

        assert!(repo.get(food.id).unwrap_err().is_not_found());
        assert!(repo.delete(food.id).unwrap_err().is_not_found());
        assert_eq!(repo.insert(NewCategory::new("Bills")).unwrap().id, CategoryId::new(2));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");

        let repo = CategoryRepository::with_path(path.clone());
        repo.insert(NewCategory::new("Food")).unwrap();
        repo.insert(NewCategory::new("Bills")).unwrap();
        repo.save().unwrap();

        let reloaded = CategoryRepository::with_path(path);
        assert!(reloaded.load().unwrap());
        let names: Vec<_> = reloaded.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Food", "Bills"]);
    }
}
