//! Category display formatting

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Category, Expense};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Expenses")]
    used_by: usize,
}

/// Format categories with how many expenses carry each label
pub fn format_category_table(categories: &[Category], expenses: &[Expense]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nAdd one with 'expenses category add <name>'.\n"
            .to_string();
    }

    let mut usage: HashMap<String, usize> = HashMap::new();
    for expense in expenses {
        *usage.entry(expense.category.to_lowercase()).or_default() += 1;
    }

    let rows = categories.iter().map(|c| CategoryRow {
        id: c.id.value(),
        name: c.name.clone(),
        color: c.color.clone(),
        icon: c.icon.clone(),
        used_by: usage.get(&c.name.to_lowercase()).copied().unwrap_or(0),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

pub fn format_category_details(category: &Category) -> String {
    format!(
        "Category: {}\nName:     {}\nColor:    {}\nIcon:     {}\n",
        category.id, category.name, category.color, category.icon
    )
}
