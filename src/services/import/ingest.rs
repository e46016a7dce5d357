//! Per-row field extraction and normalization
//!
//! Turns one [`CsvRow`] into a [`NewExpense`] or a [`RowErrorKind`]. Nothing
//! here touches the store, so a batch can be checked in full before any of
//! it is committed.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{Money, NewExpense};

use super::mapping::{ColumnMapping, LogicalField};
use super::parser::CsvRow;
use super::report::RowErrorKind;

/// Calendar-date layouts accepted in import files
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%m/%d/%y",
];

/// Timestamp layouts without an offset, read as UTC
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Validate and convert one row
///
/// Blank or missing category cells get `default_category`.
pub fn ingest_row(
    row: &CsvRow,
    mapping: &ColumnMapping,
    default_category: &str,
) -> Result<NewExpense, RowErrorKind> {
    let date_raw = cell(row, mapping, LogicalField::Date);
    let amount_raw = cell(row, mapping, LogicalField::Amount);
    let description = cell(row, mapping, LogicalField::Description);

    let (Some(date_raw), Some(amount_raw), Some(description)) = (date_raw, amount_raw, description)
    else {
        return Err(RowErrorKind::MissingRequiredData);
    };

    let amount = normalize_amount(amount_raw).ok_or(RowErrorKind::InvalidAmount)?;
    let date = parse_date(date_raw).ok_or(RowErrorKind::InvalidDate)?;
    let category = cell(row, mapping, LogicalField::Category).unwrap_or(default_category);

    Ok(NewExpense::new(description, amount)
        .with_category(category)
        .with_date(date))
}

/// Trimmed, non-empty cell for a logical field
fn cell<'r>(row: &'r CsvRow, mapping: &ColumnMapping, field: LogicalField) -> Option<&'r str> {
    let column = mapping.column(field)?;
    let value = row.get(column)?.trim();
    (!value.is_empty()).then_some(value)
}

/// Lenient amount parsing for bank exports
///
/// Drops everything except digits, `.` and `-`, then reads the longest
/// leading `-?digits[.digits]` literal from what is left. Returns `None`
/// unless the value is strictly positive and at most [`Money::MAX_AMOUNT`].
///
/// ```
/// use expense_tracker::services::import::normalize_amount;
/// assert_eq!(normalize_amount("$1,234.56").unwrap().to_string(), "$1234.56");
/// assert!(normalize_amount("-5").is_none());
/// assert!(normalize_amount("79228162514264337593543950335").is_none());
/// ```
pub fn normalize_amount(raw: &str) -> Option<Money> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let literal = leading_number(&cleaned)?;
    let value = Decimal::from_str(&literal).ok()?;
    let money = Money::new(value);
    (money.is_positive() && money.is_within_limit()).then_some(money)
}

/// Canonical form of the leading numeric literal, e.g. `"-.5x"` -> `"-0.5"`
fn leading_number(s: &str) -> Option<String> {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };

    let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (int_part, tail) = rest.split_at(int_len);

    let frac_part = tail
        .strip_prefix('.')
        .map(|after| {
            let frac_len = after.bytes().take_while(u8::is_ascii_digit).count();
            &after[..frac_len]
        })
        .unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    Some(if frac_part.is_empty() {
        format!("{}{}", sign, int_part)
    } else {
        format!("{}{}.{}", sign, int_part, frac_part)
    })
}

/// Parse the date formats found in bank and spreadsheet exports
///
/// Date-only values land on midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .find(plausible_year)
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

// `%Y` happily reads "24" as year 24; leave two-digit years to `%y`.
fn plausible_year(date: &NaiveDate) -> bool {
    use chrono::Datelike;
    (1000..=9999).contains(&date.year())
}
