//! Expense model
//!
//! An expense is a single outflow with a description, a positive amount, a
//! free-text category label and the date it happened on. The category is a
//! denormalized name rather than a foreign key, so an expense may carry a
//! category that has no matching category record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::DEFAULT_CATEGORY;
use super::ids::ExpenseId;
use super::money::Money;

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Store-assigned identifier
    pub id: ExpenseId,

    /// What the money was spent on
    pub description: String,

    /// Strictly positive amount
    pub amount: Money,

    /// Category label (soft reference by name)
    pub category: String,

    /// When the expense happened
    pub date: DateTime<Utc>,

    /// When the record was created; never changes afterwards
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Check if this expense falls in the given calendar month (1-12)
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        use chrono::Datelike;
        self.date.year() == year && self.date.month() == month
    }

    /// Apply a patch in place. The id and creation time are untouched.
    /// Text fields are trimmed and a blank category becomes the default.
    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = normalize_category(Some(category));
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_fields(&self.description, self.amount)
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount,
            self.category
        )
    }
}

/// Data for a new expense. There is deliberately no id field: ids are only
/// ever assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewExpense {
    /// Create a new expense payload with the required fields
    pub fn new(description: impl Into<String>, amount: Money) -> Self {
        Self {
            description: description.into(),
            amount,
            category: None,
            date: None,
            created_at: None,
        }
    }

    /// Set the category label
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the expense date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the stored record, filling defaults for absent timestamps and
    /// an absent or blank category
    pub fn into_expense(self, id: ExpenseId, now: DateTime<Utc>) -> Expense {
        Expense {
            id,
            description: self.description.trim().to_string(),
            category: normalize_category(self.category),
            amount: self.amount,
            date: self.date.unwrap_or(now),
            created_at: self.created_at.unwrap_or(now),
        }
    }

    /// Validate the payload
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        validate_fields(&self.description, self.amount)
    }
}

/// Partial update for an expense. Neither the id nor the creation time can
/// be expressed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

fn normalize_category(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

fn validate_fields(description: &str, amount: Money) -> Result<(), ExpenseValidationError> {
    if description.trim().is_empty() {
        return Err(ExpenseValidationError::EmptyDescription);
    }

    if !amount.is_positive() {
        return Err(ExpenseValidationError::NonPositiveAmount(amount));
    }

    if !amount.is_within_limit() {
        return Err(ExpenseValidationError::AmountTooLarge(amount));
    }

    Ok(())
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Description is required"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be a positive number (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount exceeds {} (got {})", Money::MAX_AMOUNT, amount)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
