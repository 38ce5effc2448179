//! Expense entry commands (natural-language add, manual add)

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tally_core::{Expense, ExpenseTracker, Feedback};
use tracing::debug;

/// How `tally add` settles the category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddMode {
    /// Ask on the terminal
    Ask,
    /// Take the suggestion as-is
    Accept,
    /// Use this category
    Category(String),
}

pub fn cmd_add(
    tracker: &mut ExpenseTracker,
    sentence: &str,
    mode: AddMode,
    input: &mut dyn BufRead,
) -> Result<()> {
    let Some(suggestion) = tracker.suggest(sentence) else {
        println!("⚠️  Could not detect an amount. Try: tally manual --amount <AMOUNT> --description <TEXT>");
        return Ok(());
    };

    println!();
    println!("   Extracted Amount: ${:.2}", suggestion.amount);
    println!("   Extracted Desc:   {}", suggestion.description);
    println!("   Suggestion:       [{}]", suggestion.category);

    debug!("Settling category with {:?}", mode);
    let feedback = match mode {
        AddMode::Accept => Feedback::Accept,
        AddMode::Category(category) => Feedback::Correct(category),
        AddMode::Ask => ask_feedback(input)?,
    };

    let learned = matches!(feedback, Feedback::Correct(_));
    match tracker
        .confirm(suggestion, feedback)
        .context("Failed to record expense")?
    {
        Some(expense) => {
            if learned {
                println!("   🧠 Learned from your correction");
            }
            print_saved(expense);
        }
        None => println!("Cancelled."),
    }

    Ok(())
}

pub fn cmd_manual(
    tracker: &mut ExpenseTracker,
    amount: f64,
    description: &str,
    category: Option<&str>,
) -> Result<()> {
    let expense = tracker
        .add_manual(amount, description, category)
        .context("Failed to record expense")?;
    print_saved(expense);
    Ok(())
}

/// Prompt for y/n/change; anything else (or end of input) cancels
fn ask_feedback(input: &mut dyn BufRead) -> Result<Feedback> {
    let answer = prompt(input, "Is this correct? (y/n/change category): ")?;

    match answer.to_lowercase().as_str() {
        "y" | "yes" => Ok(Feedback::Accept),
        "n" | "no" | "change" => {
            let category = prompt(input, "Enter correct category: ")?;
            if category.is_empty() {
                Ok(Feedback::Cancel)
            } else {
                Ok(Feedback::Correct(category))
            }
        }
        _ => Ok(Feedback::Cancel),
    }
}

fn prompt(input: &mut dyn BufRead, question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read answer")?;
    Ok(line.trim().to_string())
}

fn print_saved(expense: &Expense) {
    println!(
        "✅ Saved ${:.2} \"{}\" as {}",
        expense.amount, expense.description, expense.category
    );
}
