//! Report display formatting

use chrono::Month;

use crate::reports::{MonthComparison, MonthlyTotals, Trend};

/// Terminal rendering of a year's monthly totals
pub fn format_monthly_totals(totals: &MonthlyTotals, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Monthly Spending: {}\n", totals.year));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!("{:<12} {:>14} {:>8}  {}\n", "Month", "Total", "Count", "Top category"));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for month in &totals.months {
        let top = month
            .breakdown
            .iter()
            .max_by(|a, b| a.1.cmp(b.1))
            .map(|(name, amount)| format!("{} ({})", name, amount.format_with_symbol(symbol)))
            .unwrap_or_default();

        output.push_str(&format!(
            "{:<12} {:>14} {:>8}  {}\n",
            month_name(month.month),
            month.total.format_with_symbol(symbol),
            month.count,
            top
        ));
    }

    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "{:<12} {:>14} {:>8}\n",
        "TOTAL",
        totals.yearly_total().format_with_symbol(symbol),
        totals.expense_count()
    ));

    output
}

/// Terminal rendering of a month-over-month comparison
pub fn format_comparison(cmp: &MonthComparison, symbol: &str) -> String {
    let arrow = match cmp.trend {
        Trend::Up => "▲",
        Trend::Down => "▼",
        Trend::Same => "=",
    };

    format!(
        "{} {}: {} ({} expenses)\n{} {}: {} ({} expenses)\nChange: {} {}% ({})\n",
        month_name(cmp.current.month),
        cmp.current.year,
        cmp.current.total.format_with_symbol(symbol),
        cmp.current.count,
        month_name(cmp.previous.month),
        cmp.previous.year,
        cmp.previous.total.format_with_symbol(symbol),
        cmp.previous.count,
        arrow,
        cmp.percentage_change,
        cmp.trend
    )
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpenseId, Money, NewExpense};
    use chrono::{TimeZone, Utc};

    fn expense(id: u64, cents: i64, m: u32, category: &str) -> Expense {
        let date = Utc.with_ymd_and_hms(2024, m, 3, 0, 0, 0).unwrap();
        NewExpense::new("x", Money::from_cents(cents))
            .with_category(category)
            .with_date(date)
            .into_expense(ExpenseId::new(id), date)
    }

    #[test]
    fn test_monthly_rendering() {
        let expenses = vec![expense(1, 1000, 1, "Food"), expense(2, 3000, 1, "Bills")];
        let text = format_monthly_totals(&MonthlyTotals::for_year(&expenses, 2024), "$");

        assert!(text.starts_with("Monthly Spending: 2024"));
        assert!(text.contains("January"));
        assert!(text.contains("Bills ($30.00)"));
        assert!(text.contains("December"));
        assert!(text.contains("$40.00"));
    }

    #[test]
    fn test_comparison_rendering() {
        let expenses = vec![expense(1, 1000, 1, "Food"), expense(2, 2000, 2, "Food")];
        let cmp = MonthComparison::for_month(&expenses, 2024, 2).unwrap();
        let text = format_comparison(&cmp, "$");

        assert!(text.contains("February 2024: $20.00 (1 expenses)"));
        assert!(text.contains("January 2024: $10.00"));
        assert!(text.contains("Change: ▲ 100"));
        assert!(text.contains("(up)"));
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(13), "?");
    }
}
