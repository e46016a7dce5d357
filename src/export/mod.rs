//! Export module
//!
//! - CSV: expenses only, re-importable
//! - JSON: expenses and categories with schema versioning

pub mod csv;
pub mod json;

pub use self::csv::{export_expenses_csv, write_expenses_csv, EXPORT_HEADERS};
pub use self::json::{export_full_json, read_export_json, FullExport, EXPORT_SCHEMA_VERSION};
