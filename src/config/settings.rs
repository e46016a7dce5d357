//! User settings for expense-tracker
//!
//! Manages display preferences, import defaults and the category color
//! fallback.

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::error::ExpenseError;
use crate::models::category::{DEFAULT_CATEGORY, FALLBACK_COLOR};

/// User settings for expense-tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format) for display
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Category assigned when none is given
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Display color for expenses whose category has no record
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,

    /// Number of rows shown by the import preview
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Seed the store with sample data on first use
    #[serde(default = "default_seed_fixtures")]
    pub seed_fixtures: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_fallback_color() -> String {
    FALLBACK_COLOR.to_string()
}

fn default_preview_rows() -> usize {
    5
}

fn default_seed_fixtures() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_category: default_category(),
            fallback_color: default_fallback_color(),
            preview_rows: default_preview_rows(),
            seed_fixtures: default_seed_fixtures(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &AppPaths) -> Result<Self, ExpenseError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ExpenseError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ExpenseError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AppPaths) -> Result<(), ExpenseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ExpenseError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ExpenseError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
