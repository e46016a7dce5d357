//! Column mapping from CSV headers to expense fields

use std::fmt;

use crate::error::{ExpenseError, ExpenseResult};

/// The expense fields a CSV column can feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Date,
    Amount,
    Description,
    Category,
}

impl LogicalField {
    /// Fields every import needs, in the order they are checked
    pub const REQUIRED: [LogicalField; 3] = [
        LogicalField::Date,
        LogicalField::Amount,
        LogicalField::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::Date => "date",
            LogicalField::Amount => "amount",
            LogicalField::Description => "description",
            LogicalField::Category => "category",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which source column feeds each expense field
///
/// Columns are referenced by header name. An empty or whitespace-only name
/// counts as unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: String,
    pub amount: String,
    pub description: String,
    pub category: Option<String>,
}

impl ColumnMapping {
    pub fn new(
        date: impl Into<String>,
        amount: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            amount: amount.into(),
            description: description.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The column mapped to `field`, if any
    pub fn column(&self, field: LogicalField) -> Option<&str> {
        let raw = match field {
            LogicalField::Date => self.date.as_str(),
            LogicalField::Amount => self.amount.as_str(),
            LogicalField::Description => self.description.as_str(),
            LogicalField::Category => self.category.as_deref()?,
        };

        let trimmed = raw.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Required fields with no column, in check order
    pub fn missing_fields(&self) -> Vec<LogicalField> {
        LogicalField::REQUIRED
            .into_iter()
            .filter(|field| self.column(*field).is_none())
            .collect()
    }

    /// Reject the mapping if any required field is unmapped
    ///
    /// Every missing field is reported, always in the order date, amount,
    /// description.
    pub fn validate(&self) -> ExpenseResult<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ExpenseError::InvalidMapping { missing })
        }
    }

    /// Reject mapped columns that do not appear in `headers`
    pub fn validate_against_headers(&self, headers: &[String]) -> ExpenseResult<()> {
        let unknown: Vec<&str> = [
            LogicalField::Date,
            LogicalField::Amount,
            LogicalField::Description,
            LogicalField::Category,
        ]
        .into_iter()
        .filter_map(|field| self.column(field))
        .filter(|column| !headers.iter().any(|h| h == column))
        .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ExpenseError::Import(format!(
                "Column(s) not found in CSV headers: {}",
                unknown.join(", ")
            )))
        }
    }
}

/// Suggest a mapping from header names
///
/// Each field takes the first header that looks like it. Fields with no
/// plausible header are left unmapped, so the suggestion still has to pass
/// [`ColumnMapping::validate`].
pub fn detect_mapping(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for header in headers {
        let h = header.trim().to_lowercase();

        if mapping.date.is_empty() && (h.contains("date") || h.contains("posted")) {
            mapping.date = header.clone();
        } else if mapping.amount.is_empty()
            && (h.contains("amount")
                || h.contains("debit")
                || h.contains("withdrawal")
                || h.contains("cost")
                || h.contains("price")
                || h == "amt")
        {
            mapping.amount = header.clone();
        } else if mapping.category.is_none() && (h.contains("category") || h == "type") {
            mapping.category = Some(header.clone());
        } else if mapping.description.is_empty()
            && (h.contains("description")
                || h.contains("payee")
                || h.contains("merchant")
                || h.contains("memo")
                || h.contains("name")
                || h == "desc")
        {
            mapping.description = header.clone();
        }
    }

    mapping
}
