//! Core data models for expense-tracker
//!
//! Expenses, categories, their ids and the money type.

pub mod category;
pub mod expense;
pub mod ids;
pub mod money;

pub use category::{Category, CategoryPatch, NewCategory, DEFAULT_CATEGORY, FALLBACK_COLOR};
pub use expense::{Expense, ExpensePatch, NewExpense};
pub use ids::{CategoryId, ExpenseId};
pub use money::Money;
