//! Expense Tracker - personal expense tracking with CSV import
//!
//! This library provides the core functionality for the `expenses` command.
//! Expenses are recorded, categorized and summarized per month; bank
//! statements are bulk-imported from CSV through a column mapping, with bad
//! rows reported individually instead of aborting the import.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Expenses, categories, ids and money
//! - `storage`: Record store traits, in-memory repositories, JSON snapshots
//! - `services`: Business logic, including the CSV import pipeline
//! - `reports`: Monthly totals and month-over-month comparison
//! - `display`: Terminal tables
//! - `export`: CSV and JSON export
//! - `audit`: Audit logging system
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust
//! use expense_tracker::services::import::{parse_csv, ColumnMapping};
//! use expense_tracker::services::ImportService;
//! use expense_tracker::storage::Storage;
//!
//! let storage = Storage::empty();
//! let parsed = parse_csv("Date,Amount,Desc\n2024-01-15,4.50,Coffee\nbad,x,\n").unwrap();
//! let mapping = ColumnMapping::new("Date", "Amount", "Desc");
//!
//! let report = ImportService::new(&storage).import_rows(&parsed.rows, &mapping).unwrap();
//! assert_eq!(report.success_count(), 1);
//! assert_eq!(report.error_messages(), vec!["Row 2: Missing required data"]);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
