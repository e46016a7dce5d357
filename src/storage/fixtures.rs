//! Starter data for a fresh store
//!
//! A new store is seeded with the standard category set and a handful of
//! sample expenses so reports have something to show on first run.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, CategoryId, Expense, ExpenseId, Money, NewCategory, NewExpense};

/// (name, color, icon)
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Food", "#F59E0B", "Utensils"),
    ("Transportation", "#3B82F6", "Car"),
    ("Entertainment", "#8B5CF6", "Film"),
    ("Shopping", "#EC4899", "ShoppingBag"),
    ("Bills", "#EF4444", "Receipt"),
    ("Healthcare", "#10B981", "Heart"),
    ("Other", "#6B7280", "Tag"),
];

/// (description, cents, category, date "YYYY-MM-DD")
const SAMPLE_EXPENSES: &[(&str, i64, &str, &str)] = &[
    ("Grocery shopping at Whole Foods", 8745, "Food", "2025-01-03"),
    ("Monthly bus pass", 9000, "Transportation", "2025-01-05"),
    ("Electric bill", 11230, "Bills", "2025-01-10"),
    ("Movie tickets", 3200, "Entertainment", "2025-01-18"),
    ("Pharmacy prescription", 2450, "Healthcare", "2025-01-22"),
    ("Lunch with coworkers", 4215, "Food", "2025-02-02"),
    ("New running shoes", 12999, "Shopping", "2025-02-08"),
    ("Internet service", 6999, "Bills", "2025-02-12"),
    ("Gas station fill-up", 5480, "Transportation", "2025-02-15"),
    ("Concert tickets", 8500, "Entertainment", "2025-02-21"),
    ("Farmers market", 3675, "Food", "2025-03-01"),
    ("Dentist copay", 4000, "Healthcare", "2025-03-06"),
];

/// The default category set
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, (name, color, icon))| {
            NewCategory::new(*name)
                .with_color(*color)
                .with_icon(*icon)
                .into_category(CategoryId::new(i as u64 + 1))
        })
        .collect()
}

/// Sample expenses with ids 1..=n
pub fn sample_expenses() -> ExpenseResult<Vec<Expense>> {
    SAMPLE_EXPENSES
        .iter()
        .enumerate()
        .map(|(i, (description, cents, category, date))| {
            let date = fixture_date(date)?;
            Ok(NewExpense::new(*description, Money::from_cents(*cents))
                .with_category(*category)
                .with_date(date)
                .into_expense(ExpenseId::new(i as u64 + 1), date))
        })
        .collect()
}

fn fixture_date(value: &str) -> ExpenseResult<DateTime<Utc>> {
    let date = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ExpenseError::Storage(format!("Bad fixture date {}: {}", value, e)))?;
    let naive = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| ExpenseError::Storage(format!("Bad fixture date {}", value)))?;
    Ok(Utc.from_utc_datetime(&naive))
}
