//! Category model
//!
//! Categories carry display metadata (a color and an icon token) for the
//! labels expenses use. Expenses reference categories by name only.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Label given to expenses that arrive without a category
pub const DEFAULT_CATEGORY: &str = "Other";

/// Neutral display color for labels with no category record
pub const FALLBACK_COLOR: &str = "#6B7280";

/// Default icon token for new categories
pub const DEFAULT_ICON: &str = "Tag";

/// An expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier
    pub id: CategoryId,

    /// Unique display name
    pub name: String,

    /// Color token (e.g. "#4F46E5")
    pub color: String,

    /// Icon token
    pub icon: String,
}

impl Category {
    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }

    /// Check whether this category answers to the given label
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Data for a new category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            icon: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Build the stored record
    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name.trim().to_string(),
            color: self.color.unwrap_or_else(|| FALLBACK_COLOR.to_string()),
            icon: self.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }
}

/// Partial update for a category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Category {
    /// Apply a patch in place, keeping the id
    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
    }
}

/// Resolve the display color for a category label
///
/// Unknown labels get `fallback` rather than an error.
pub fn color_for<'a>(categories: &'a [Category], name: &str, fallback: &'a str) -> &'a str {
    categories
        .iter()
        .find(|c| c.matches_name(name))
        .map(|c| c.color.as_str())
        .unwrap_or(fallback)
}

fn validate_name(name: &str) -> Result<(), CategoryValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }

    if name.len() > 50 {
        return Err(CategoryValidationError::NameTooLong(name.len()));
    }

    Ok(())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn food() -> Category {
        NewCategory::new("Food")
            .with_color("#F59E0B")
            .with_icon("Utensils")
            .into_category(CategoryId::new(1))
    }

    #[test]
    fn test_new_category_defaults() {
        let cat = NewCategory::new("  Misc ").into_category(CategoryId::new(2));
        assert_eq!(cat.name, "Misc");
        assert_eq!(cat.color, FALLBACK_COLOR);
        assert_eq!(cat.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_color_lookup_with_fallback() {
        let categories = vec![food()];
        assert_eq!(color_for(&categories, "food", FALLBACK_COLOR), "#F59E0B");
        assert_eq!(color_for(&categories, "Travel", FALLBACK_COLOR), "#6B7280");
    }

    #[test]
    fn test_validation() {
        assert!(food().validate().is_ok());
        assert_eq!(
            NewCategory::new(" ").validate(),
            Err(CategoryValidationError::EmptyName)
        );
        assert_eq!(
            NewCategory::new("x".repeat(51)).validate(),
            Err(CategoryValidationError::NameTooLong(51))
        );
    }

    #[test]
    fn test_apply_patch_keeps_id() {
        let mut cat = food();
        cat.apply(CategoryPatch {
            name: Some("Groceries".into()),
            ..Default::default()
        });
        assert_eq!(cat.id, CategoryId::new(1));
        assert_eq!(cat.name, "Groceries");
        assert_eq!(cat.color, "#F59E0B");
    }
}
