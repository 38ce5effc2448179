//! Classifier inspection commands (predict, model)

use anyhow::Result;
use tally_core::ExpenseTracker;

use super::truncate;

pub fn cmd_predict(tracker: &ExpenseTracker, text: &str, scores: bool) -> Result<()> {
    let category = tracker.predict(text);
    println!("🏷️  {}", category);

    if scores {
        let mut probabilities = tracker.classifier().probabilities(text);
        if probabilities.is_empty() {
            println!("   (no usable words in \"{}\")", text);
            return Ok(());
        }
        probabilities.sort_by(|a, b| b.1.total_cmp(&a.1));

        println!();
        for (category, probability) in probabilities {
            println!(
                "   {:20} │ {:>6.2}%",
                truncate(&category, 20),
                probability * 100.0
            );
        }
    }

    Ok(())
}

pub fn cmd_model(tracker: &ExpenseTracker) -> Result<()> {
    let classifier = tracker.classifier();
    let state = classifier.export();

    println!();
    println!("🧠 Classifier");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Ledger: {}", tracker.store().path().display());
    println!("   Examples learned: {}", classifier.total_documents());
    println!("   Vocabulary: {} words", classifier.vocabulary_size());
    println!();
    println!("   {:20} │ {:>8} │ {:>6}", "Category", "Examples", "Words");
    println!("   ─────────────────────┼──────────┼────────");

    for (category, documents) in &state.category_counts {
        let words: u64 = state
            .feature_counts
            .get(category)
            .map(|w| w.values().fold(0u64, |total, n| total.saturating_add(*n)))
            .unwrap_or(0);
        println!(
            "   {:20} │ {:>8} │ {:>6}",
            truncate(category, 20),
            documents,
            words
        );
    }

    Ok(())
}
