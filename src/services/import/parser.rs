//! CSV parsing into header-keyed rows
//!
//! The first record is the header row. Blank lines are skipped, short
//! records are padded with empty cells, and when two columns share a header
//! name the first one wins.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{ExpenseError, ExpenseResult};

/// One data row, keyed by header name in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    cells: Vec<(String, String)>,
}

impl CsvRow {
    /// Build a row from `(header, value)` pairs. Later duplicates of a header
    /// are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            if row.get(&key).is_none() {
                row.cells.push((key, value.into()));
            }
        }
        row
    }

    /// Raw cell value for a header
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Headers plus data rows of a CSV source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    /// Distinct header names in column order
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

/// Parse CSV text
pub fn parse_csv(text: &str) -> ExpenseResult<ParsedCsv> {
    parse_csv_reader(text.as_bytes())
}

/// Parse a CSV file
pub fn parse_csv_file(path: impl AsRef<Path>) -> ExpenseResult<ParsedCsv> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ExpenseError::Import(format!("Failed to open {}: {}", path.display(), e))
    })?;
    parse_csv_reader(file)
}

/// Parse CSV from any reader
///
/// Fails with [`ExpenseError::EmptyFile`] when there is no data row.
pub fn parse_csv_reader<R: Read>(reader: R) -> ExpenseResult<ParsedCsv> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut headers: Vec<String> = Vec::with_capacity(raw_headers.len());
    for header in &raw_headers {
        if !headers.contains(header) {
            headers.push(header.clone());
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(CsvRow::from_pairs(
            raw_headers
                .iter()
                .enumerate()
                .map(|(idx, header)| (header.as_str(), record.get(idx).unwrap_or(""))),
        ));
    }

    if rows.is_empty() {
        return Err(ExpenseError::EmptyFile);
    }

    debug!(headers = headers.len(), rows = rows.len(), "parsed csv");
    Ok(ParsedCsv { headers, rows })
}
