//! Expense CLI commands
//!
//! Implements CLI commands for recording, listing and editing expenses.

use chrono::{DateTime, Utc};
use clap::{Subcommand, ValueEnum};

use super::parse_month;
use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_table};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{ExpensePatch, Money, NewExpense};
use crate::services::import::parse_date;
use crate::services::{CategoryService, ExpenseQuery, ExpenseService, SortBy};
use crate::storage::Storage;

/// Sort order for `expense list`
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SortArg {
    /// Newest first
    #[default]
    Date,
    /// Highest amount first
    Amount,
    /// Category name A-Z
    Category,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => SortBy::Date,
            SortArg::Amount => SortBy::Amount,
            SortArg::Category => SortBy::Category,
        }
    }
}

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        description: String,
        /// Amount (e.g., "12.50" or "$12.50")
        amount: String,
        /// Category name (defaults to the configured default category)
        #[arg(short, long)]
        category: Option<String>,
        /// Expense date (e.g., 2025-01-15 or 01/15/2025); defaults to now
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List expenses
    List {
        /// Match text in description or category
        #[arg(short, long)]
        search: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Sort order
        #[arg(long, value_enum, default_value = "date")]
        sort: SortArg,
        /// Maximum number of expenses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show expense details
    Show {
        /// Expense ID (e.g., 7 or exp-7)
        id: String,
    },

    /// Edit an expense
    Edit {
        /// Expense ID
        id: String,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            category,
            date,
        } => {
            let mut data = NewExpense::new(description, parse_amount(&amount)?)
                .with_category(category.unwrap_or_else(|| settings.default_category.clone()));
            if let Some(date) = date {
                data = data.with_date(parse_date_arg(&date)?);
            }

            let expense = service.create(data)?;
            println!("Recorded expense: {}", expense.description);
            println!("  Amount:   {}", expense.amount.format_with_symbol(symbol));
            println!("  Category: {}", expense.category);
            println!("  ID:       {}", expense.id);
        }

        ExpenseCommands::List {
            search,
            category,
            month,
            sort,
            limit,
        } => {
            let query = ExpenseQuery {
                search,
                category,
                month: month.as_deref().map(parse_month).transpose()?,
                sort: sort.into(),
                limit,
            };
            let expenses = service.list(&query)?;
            print!(
                "{}",
                format_expense_table(&expenses, symbol, &settings.date_format)
            );
        }

        ExpenseCommands::Show { id } => {
            let expense = service.find(&id)?;
            let color = category_color(storage, settings, &expense.category)?;
            print!("{}", format_expense_details(&expense, &color, symbol));
        }

        ExpenseCommands::Edit {
            id,
            description,
            amount,
            category,
            date,
        } => {
            let expense = service.find(&id)?;
            let patch = ExpensePatch {
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                date: date.as_deref().map(parse_date_arg).transpose()?,
            };

            if patch.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(expense.id, patch)?;
            let color = category_color(storage, settings, &updated.category)?;
            println!("Updated expense: {}", updated.id);
            print!("{}", format_expense_details(&updated, &color, symbol));
        }

        ExpenseCommands::Delete { id } => {
            let expense = service.find(&id)?;
            let removed = service.delete(expense.id)?;
            println!("Deleted expense {}: {}", removed.id, removed.description);
        }
    }

    Ok(())
}

fn category_color(storage: &Storage, settings: &Settings, label: &str) -> ExpenseResult<String> {
    CategoryService::new(storage)
        .with_fallback_color(settings.fallback_color.clone())
        .color_of(label)
}

fn parse_amount(value: &str) -> ExpenseResult<Money> {
    Money::parse(value).map_err(|e| ExpenseError::Validation(format!("Invalid amount: {}", e)))
}

fn parse_date_arg(value: &str) -> ExpenseResult<DateTime<Utc>> {
    parse_date(value).ok_or_else(|| ExpenseError::Validation(format!("Invalid date: {}", value)))
}
