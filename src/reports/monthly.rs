//! Monthly totals report
//!
//! Twelve calendar-month buckets for one year, each with its total and a
//! per-category breakdown.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::Datelike;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, Money};
use crate::storage::Storage;

/// Spending for one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotal {
    /// 1-12
    pub month: u32,
    pub total: Money,
    pub count: usize,
    /// Category label -> amount, sorted by label
    pub breakdown: BTreeMap<String, Money>,
}

/// Monthly totals for a year
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    pub year: i32,
    /// Always 12 entries, January first
    pub months: Vec<MonthTotal>,
}

impl MonthlyTotals {
    /// Bucket `expenses` dated in `year` by month
    pub fn for_year(expenses: &[Expense], year: i32) -> Self {
        let mut months: Vec<MonthTotal> = (1..=12)
            .map(|month| MonthTotal {
                month,
                total: Money::zero(),
                count: 0,
                breakdown: BTreeMap::new(),
            })
            .collect();

        for expense in expenses.iter().filter(|e| e.date.year() == year) {
            let bucket = &mut months[expense.date.month0() as usize];
            bucket.total += expense.amount;
            bucket.count += 1;
            *bucket
                .breakdown
                .entry(expense.category.clone())
                .or_insert_with(Money::zero) += expense.amount;
        }

        Self { year, months }
    }

    /// Build the report from everything in storage
    pub fn generate(storage: &Storage, year: i32) -> ExpenseResult<Self> {
        Ok(Self::for_year(&storage.expenses.list()?, year))
    }

    pub fn yearly_total(&self) -> Money {
        self.months.iter().map(|m| m.total).sum()
    }

    pub fn expense_count(&self) -> usize {
        self.months.iter().map(|m| m.count).sum()
    }

    /// The month with the highest total, if anything was spent
    pub fn busiest_month(&self) -> Option<&MonthTotal> {
        self.months
            .iter()
            .filter(|m| m.count > 0)
            .max_by(|a, b| a.total.cmp(&b.total).then(b.month.cmp(&a.month)))
    }

    /// Write one row per (month, category) plus a total row per month
    pub fn export_csv<W: Write>(&self, writer: W) -> ExpenseResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Year", "Month", "Category", "Amount", "Count"])?;

        for month in &self.months {
            for (category, amount) in &month.breakdown {
                csv.write_record([
                    self.year.to_string(),
                    month.month.to_string(),
                    category.clone(),
                    format!("{:.2}", amount.value().round_dp(2)),
                    String::new(),
                ])?;
            }
            csv.write_record([
                self.year.to_string(),
                month.month.to_string(),
                "TOTAL".to_string(),
                format!("{:.2}", month.total.value().round_dp(2)),
                month.count.to_string(),
            ])?;
        }

        csv.flush()
            .map_err(|e| ExpenseError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, NewExpense};
    use chrono::{TimeZone, Utc};

    fn expense(id: u64, cents: i64, category: &str, y: i32, m: u32, d: u32) -> Expense {
        let date = Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        NewExpense::new("x", Money::from_cents(cents))
            .with_category(category)
            .with_date(date)
            .into_expense(ExpenseId::new(id), date)
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(1, 1000, "Food", 2024, 1, 5),
            expense(2, 2500, "Food", 2024, 1, 20),
            expense(3, 4000, "Bills", 2024, 1, 31),
            expense(4, 700, "Food", 2024, 3, 1),
            expense(5, 9999, "Food", 2023, 12, 31),
        ]
    }

    #[test]
    fn test_twelve_buckets_for_the_year() {
        let totals = MonthlyTotals::for_year(&sample(), 2024);

        assert_eq!(totals.months.len(), 12);
        assert_eq!(totals.months[0].total, Money::from_cents(7500));
        assert_eq!(totals.months[0].count, 3);
        assert_eq!(totals.months[0].breakdown["Food"], Money::from_cents(3500));
        assert_eq!(totals.months[0].breakdown["Bills"], Money::from_cents(4000));
        assert_eq!(totals.months[1].total, Money::zero());
        assert!(totals.months[1].breakdown.is_empty());
        assert_eq!(totals.months[2].total, Money::from_cents(700));
    }

    #[test]
    fn test_yearly_total_excludes_other_years() {
        let totals = MonthlyTotals::for_year(&sample(), 2024);
        assert_eq!(totals.yearly_total(), Money::from_cents(8200));
        assert_eq!(totals.expense_count(), 4);
        assert_eq!(totals.busiest_month().unwrap().month, 1);
    }

    #[test]
    fn test_totals_saturate_on_huge_amounts() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let huge = Money::new(rust_decimal::Decimal::MAX);
        let expenses: Vec<Expense> = (1..=2)
            .map(|id| {
                NewExpense::new("wire", huge)
                    .with_date(date)
                    .into_expense(ExpenseId::new(id), date)
            })
            .collect();

        let totals = MonthlyTotals::for_year(&expenses, 2024);
        assert_eq!(totals.months[0].total, huge);
        assert_eq!(totals.months[0].breakdown["Other"], huge);
        assert_eq!(totals.yearly_total(), huge);
    }

    #[test]
    fn test_empty_year() {
        let totals = MonthlyTotals::for_year(&sample(), 2019);
        assert!(totals.yearly_total().is_zero());
        assert!(totals.busiest_month().is_none());
    }

    #[test]
    fn test_export_csv() {
        let totals = MonthlyTotals::for_year(&sample(), 2024);
        let mut out = Vec::new();
        totals.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Year,Month,Category,Amount,Count\n"));
        assert!(text.contains("2024,1,Bills,40.00,\n"));
        assert!(text.contains("2024,1,TOTAL,75.00,3\n"));
        assert!(text.contains("2024,12,TOTAL,0.00,0\n"));
    }
}
