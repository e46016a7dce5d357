//! Category service
//!
//! Category CRUD with unique, case-insensitive names, and display color
//! lookup for expense labels.

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::category::color_for;
use crate::models::{Category, CategoryId, CategoryPatch, NewCategory, FALLBACK_COLOR};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
    fallback_color: String,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            fallback_color: FALLBACK_COLOR.to_string(),
        }
    }

    /// Color used for labels with no category record
    pub fn with_fallback_color(mut self, color: impl Into<String>) -> Self {
        self.fallback_color = color.into();
        self
    }

    /// Create a category with a name no other category uses
    pub fn create(&self, data: NewCategory) -> ExpenseResult<Category> {
        data.validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;
        self.ensure_unique(&data.name, None)?;

        let category = self.storage.categories.insert(data)?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    pub fn list(&self) -> ExpenseResult<Vec<Category>> {
        self.storage.categories.list()
    }

    pub fn get(&self, id: CategoryId) -> ExpenseResult<Category> {
        self.storage.categories.get(id)
    }

    /// Find by name first, then by id (`"3"` or `"cat-3"`)
    pub fn find(&self, identifier: &str) -> ExpenseResult<Category> {
        if let Some(category) = self.storage.categories.find_by_name(identifier)? {
            return Ok(category);
        }

        match identifier.parse::<CategoryId>() {
            Ok(id) => self.get(id),
            Err(_) => Err(ExpenseError::category_not_found(identifier)),
        }
    }

    /// Update a category; the id never changes
    pub fn update(&self, id: CategoryId, patch: CategoryPatch) -> ExpenseResult<Category> {
        let before = self.storage.categories.get(id)?;

        if let Some(name) = &patch.name {
            let mut candidate = before.clone();
            candidate.apply(CategoryPatch {
                name: Some(name.clone()),
                ..Default::default()
            });
            candidate
                .validate()
                .map_err(|e| ExpenseError::Validation(e.to_string()))?;
            self.ensure_unique(name, Some(id))?;
        }

        let after = self.storage.categories.update(id, patch)?;
        self.storage.categories.save()?;

        if before != after {
            self.storage.log_update(
                EntityType::Category,
                after.id.to_string(),
                Some(after.name.clone()),
                &before,
                &after,
            )?;
        }

        Ok(after)
    }

    /// Delete a category. Expenses keep their label and fall back to the
    /// neutral color.
    pub fn delete(&self, id: CategoryId) -> ExpenseResult<Category> {
        let removed = self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            removed.id.to_string(),
            Some(removed.name.clone()),
            &removed,
        )?;

        Ok(removed)
    }

    /// Display color for an expense's category label
    pub fn color_of(&self, label: &str) -> ExpenseResult<String> {
        let categories = self.list()?;
        Ok(color_for(&categories, label, &self.fallback_color).to_string())
    }

    fn ensure_unique(&self, name: &str, except: Option<CategoryId>) -> ExpenseResult<()> {
        match self.storage.categories.find_by_name(name)? {
            Some(existing) if Some(existing.id) != except => Err(ExpenseError::Duplicate {
                entity_type: "Category",
                identifier: name.trim().to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_duplicate() {
        let storage = Storage::empty();
        let service = CategoryService::new(&storage);

        let food = service
            .create(NewCategory::new("Food").with_color("#F59E0B"))
            .unwrap();
        assert_eq!(food.id, CategoryId::new(1));

        let err = service.create(NewCategory::new(" food ")).unwrap_err();
        assert!(matches!(err, ExpenseError::Duplicate { .. }));

        let err = service.create(NewCategory::new("")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_find_by_name_or_id() {
        let storage = Storage::in_memory().unwrap();
        let service = CategoryService::new(&storage);

        assert_eq!(service.find("bills").unwrap().name, "Bills");
        assert_eq!(service.find("cat-1").unwrap().id, CategoryId::new(1));
        assert!(service.find("Travel").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_keeps_id_and_checks_names() {
        let storage = Storage::empty();
        let service = CategoryService::new(&storage);
        let food = service.create(NewCategory::new("Food")).unwrap();
        service.create(NewCategory::new("Bills")).unwrap();

        let err = service
            .update(
                food.id,
                CategoryPatch {
                    name: Some("BILLS".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ExpenseError::Duplicate { .. }));

        let renamed = service
            .update(
                food.id,
                CategoryPatch {
                    name: Some("food".into()),
                    icon: Some("Apple".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.id, food.id);
        assert_eq!(renamed.name, "food");
        assert_eq!(renamed.icon, "Apple");
    }

    #[test]
    fn test_color_lookup_after_delete() {
        let storage = Storage::empty();
        let service = CategoryService::new(&storage).with_fallback_color("#111111");
        let travel = service
            .create(NewCategory::new("Travel").with_color("#0EA5E9"))
            .unwrap();

        assert_eq!(service.color_of("travel").unwrap(), "#0EA5E9");
        service.delete(travel.id).unwrap();
        assert_eq!(service.color_of("travel").unwrap(), "#111111");
        assert!(service.delete(travel.id).unwrap_err().is_not_found());
    }
}
