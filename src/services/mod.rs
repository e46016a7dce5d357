//! Service layer for expense-tracker
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit logging and the CSV import pipeline.

pub mod category;
pub mod expense;
pub mod import;

pub use category::CategoryService;
pub use expense::{ExpenseQuery, ExpenseService, SortBy};
pub use import::{ColumnMapping, ImportReport, ImportService};
