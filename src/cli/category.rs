//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_table};
use crate::error::ExpenseResult;
use crate::models::{CategoryPatch, NewCategory};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories with how many expenses use each
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Display color (e.g., "#3B82F6")
        #[arg(long)]
        color: Option<String>,
        /// Icon name
        #[arg(long)]
        icon: Option<String>,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
        /// New icon
        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a category (expenses keep their label)
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> ExpenseResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            let expenses = storage.expenses.list()?;
            print!("{}", format_category_table(&categories, &expenses));
        }

        CategoryCommands::Add { name, color, icon } => {
            let mut data = NewCategory::new(name);
            if let Some(color) = color {
                data = data.with_color(color);
            }
            if let Some(icon) = icon {
                data = data.with_icon(icon);
            }

            let category = service.create(data)?;
            println!("Created category: {}", category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let category = service.find(&category)?;
            print!("{}", format_category_details(&category));
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
            icon,
        } => {
            let category = service.find(&category)?;

            if name.is_none() && color.is_none() && icon.is_none() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(category.id, CategoryPatch { name, color, icon })?;
            println!("Updated category: {}", updated.name);
            print!("{}", format_category_details(&updated));
        }

        CategoryCommands::Delete { category } => {
            let category = service.find(&category)?;
            let removed = service.delete(category.id)?;
            println!("Deleted category: {}", removed.name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_rename() {
        let storage = Storage::in_memory().unwrap();

        handle_category_command(
            &storage,
            CategoryCommands::Add {
                name: "Travel".into(),
                color: Some("#0EA5E9".into()),
                icon: None,
            },
        )
        .unwrap();

        handle_category_command(
            &storage,
            CategoryCommands::Edit {
                category: "travel".into(),
                name: Some("Trips".into()),
                color: None,
                icon: None,
            },
        )
        .unwrap();

        let trips = storage.categories.find_by_name("Trips").unwrap().unwrap();
        assert_eq!(trips.color, "#0EA5E9");
        assert!(storage.categories.find_by_name("Travel").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let storage = Storage::in_memory().unwrap();
        let err = handle_category_command(
            &storage,
            CategoryCommands::Add {
                name: "food".into(),
                color: None,
                icon: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::ExpenseError::Duplicate { .. }));
    }
}
