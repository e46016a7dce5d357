//! Month-over-month comparison

use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, Money};
use crate::storage::Storage;

/// Direction of change against the previous month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Same,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Same => write!(f, "same"),
        }
    }
}

/// Total and count for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub total: Money,
    pub count: usize,
}

impl MonthSummary {
    fn collect(expenses: &[Expense], year: i32, month: u32) -> Self {
        let (total, count) = expenses
            .iter()
            .filter(|e| e.is_in_month(year, month))
            .fold((Money::zero(), 0), |(total, count), e| (total + e.amount, count + 1));

        Self {
            year,
            month,
            total,
            count,
        }
    }
}

/// A month compared with the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthComparison {
    pub current: MonthSummary,
    pub previous: MonthSummary,
    /// Percent change, 2 decimal places; 100 when the previous month is zero
    pub percentage_change: Decimal,
    pub trend: Trend,
}

impl MonthComparison {
    /// Compare `month` of `year` (1-12) with the preceding month.
    ///
    /// Fails with [`ExpenseError::Overflow`] when the percentage cannot be
    /// represented, e.g. a tiny previous total against a large current one.
    pub fn for_month(expenses: &[Expense], year: i32, month: u32) -> ExpenseResult<Self> {
        let (prev_year, prev_month) = if month <= 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };

        let current = MonthSummary::collect(expenses, year, month);
        let previous = MonthSummary::collect(expenses, prev_year, prev_month);

        let change = if previous.total.is_zero() {
            Decimal::ONE_HUNDRED
        } else {
            percent_change(current.total.value(), previous.total.value()).ok_or_else(|| {
                ExpenseError::Overflow(format!(
                    "change from {} to {} is out of range",
                    previous.total, current.total
                ))
            })?
        };

        // Trend from the unrounded value so tiny changes still register
        let trend = match change.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => Trend::Up,
            std::cmp::Ordering::Less => Trend::Down,
            std::cmp::Ordering::Equal => Trend::Same,
        };

        Ok(Self {
            current,
            previous,
            percentage_change: change.round_dp(2),
            trend,
        })
    }

    /// Compare the month containing `now` with the month before
    pub fn current(storage: &Storage, now: DateTime<Utc>) -> ExpenseResult<Self> {
        Self::for_month(&storage.expenses.list()?, now.year(), now.month())
    }
}

fn percent_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
}
