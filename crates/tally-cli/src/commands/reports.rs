//! Report command implementations (history, insights)

use anyhow::Result;
use tally_core::models::TIMESTAMP_FORMAT;
use tally_core::ExpenseTracker;

use super::truncate;

/// Width of the spending bar in the insights table
const BAR_WIDTH: usize = 20;

pub fn cmd_history(tracker: &ExpenseTracker, limit: Option<usize>, json: bool) -> Result<()> {
    let history = tracker.history();
    let shown: Vec<_> = history
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No expenses recorded yet. Add one with:");
        println!("  tally add \"Spent $12 on lunch at Burger King\"");
        return Ok(());
    }

    println!();
    println!("📝 Expense History");
    println!(
        "   {:19} │ {:15} │ {:>10} │ Description",
        "Date", "Category", "Amount"
    );
    println!("   ────────────────────┼─────────────────┼────────────┼────────────────────");

    for expense in shown {
        println!(
            "   {:19} │ {:15} │ {:>10} │ {}",
            expense.date.format(TIMESTAMP_FORMAT).to_string(),
            truncate(&expense.category, 15),
            format!("${:.2}", expense.amount),
            truncate(&expense.description, 40)
        );
    }

    Ok(())
}

pub fn cmd_insights(tracker: &ExpenseTracker, json: bool) -> Result<()> {
    let insights = tracker.insights();

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    let Some(insights) = insights else {
        println!("Not enough data for insights.");
        return Ok(());
    };

    println!();
    println!("📊 Spending Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: ${:.2}", insights.total);
    println!();

    for cat in &insights.by_category {
        println!(
            "   {:15} │ {:>10} │ {:20} {:>5.1}%",
            truncate(&cat.category, 15),
            format!("${:.2}", cat.amount),
            bar(cat.percentage),
            cat.percentage
        );
    }

    if let Some(average) = insights.average {
        println!();
        println!("   Average per expense: ${:.2}", average);
    }

    Ok(())
}

/// Render a share (0-100) as a bar of up to [`BAR_WIDTH`] cells
fn bar(percentage: f64) -> String {
    let cells = ((percentage / 100.0) * BAR_WIDTH as f64).clamp(0.0, BAR_WIDTH as f64) as usize;
    "█".repeat(cells)
}
