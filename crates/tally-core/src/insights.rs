//! Spending insights over the ledger

use std::collections::HashMap;

use crate::models::{CategorySpending, Expense, Insights};

/// Summarize spending by category
///
/// Returns `None` for an empty ledger.
pub fn summarize(expenses: &[Expense]) -> Option<Insights> {
    if expenses.is_empty() {
        return None;
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    let mut by_category: HashMap<&str, (f64, usize)> = HashMap::new();
    for expense in expenses {
        let entry = by_category.entry(expense.category.as_str()).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut categories: Vec<CategorySpending> = by_category
        .into_iter()
        .map(|(category, (amount, count))| CategorySpending {
            category: category.to_string(),
            amount,
            percentage: if total > 0.0 {
                (amount / total) * 100.0
            } else {
                0.0
            },
            count,
        })
        .collect();

    categories.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    let average = if expenses.len() > 1 {
        Some(total / expenses.len() as f64)
    } else {
        None
    };

    Some(Insights {
        total,
        by_category: categories,
        average,
    })
}

/// Expenses sorted newest first
pub fn history(expenses: &[Expense]) -> Vec<&Expense> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
