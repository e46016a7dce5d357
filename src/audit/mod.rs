//! Audit logging
//!
//! Every create, update and delete of an expense or category made through
//! the services is appended to `audit.log` as one JSON object per line,
//! with before/after snapshots and a short field diff for updates. Imports
//! write one create entry per imported expense.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
