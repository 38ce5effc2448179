//! Expense tracker: extraction, categorization and learning in one place
//!
//! The natural-language flow is two-step so the caller can ask the user:
//! 1. [`ExpenseTracker::suggest`] extracts an amount and predicts a category
//! 2. [`ExpenseTracker::confirm`] applies the user's answer, trains the
//!    classifier on the final category and saves the ledger
//!
//! Every committed expense is also a training example, so suggestions
//! improve with use.

use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::extract::extract;
use crate::insights;
use crate::ledger::LedgerStore;
use crate::models::{Expense, Feedback, Insights, Suggestion};

pub struct ExpenseTracker {
    expenses: Vec<Expense>,
    classifier: Classifier,
    store: LedgerStore,
}

impl ExpenseTracker {
    /// Load the ledger behind `store`
    pub fn open(store: LedgerStore) -> Result<Self> {
        let ledger = store.load()?;
        Ok(Self {
            expenses: ledger.expenses,
            classifier: ledger.classifier,
            store,
        })
    }

    /// Extract and categorize a sentence
    ///
    /// Returns `None` when no amount could be found.
    pub fn suggest(&self, sentence: &str) -> Option<Suggestion> {
        let extraction = extract(sentence);
        if !extraction.is_found() {
            return None;
        }

        let category = self.classifier.predict(&extraction.description);
        Some(Suggestion {
            amount: extraction.amount,
            description: extraction.description,
            category,
        })
    }

    /// Apply user feedback to a suggestion
    ///
    /// Accepting or correcting trains the classifier and records the expense;
    /// cancelling does neither and returns `None`.
    pub fn confirm(
        &mut self,
        suggestion: Suggestion,
        feedback: Feedback,
    ) -> Result<Option<&Expense>> {
        let category = match feedback {
            Feedback::Accept => suggestion.category,
            Feedback::Correct(label) => {
                let label = normalize_label(&label)?;
                info!(
                    "Learning correction: '{}' is {} (suggested {})",
                    suggestion.description, label, suggestion.category
                );
                label
            }
            Feedback::Cancel => {
                debug!("Cancelled entry '{}'", suggestion.description);
                return Ok(None);
            }
        };

        self.classifier.train(&suggestion.description, &category);
        self.commit(suggestion.amount, suggestion.description, category)
            .map(Some)
    }

    /// Record an expense entered field by field
    ///
    /// Without an explicit category the classifier's prediction is used.
    pub fn add_manual(
        &mut self,
        amount: f64,
        description: &str,
        category: Option<&str>,
    ) -> Result<&Expense> {
        if !amount.is_finite() || amount == 0.0 {
            return Err(Error::InvalidData(format!("Invalid amount: {}", amount)));
        }

        let description = description.trim();
        let category = match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(label) => title_case(label),
            None => self.classifier.predict(description),
        };

        self.classifier.train(description, &category);
        self.commit(amount, description.to_string(), category)
    }

    /// Predict a category without recording anything
    pub fn predict(&self, text: &str) -> String {
        self.classifier.predict(text)
    }

    /// Expenses, newest first
    pub fn history(&self) -> Vec<&Expense> {
        insights::history(&self.expenses)
    }

    pub fn insights(&self) -> Option<Insights> {
        insights::summarize(&self.expenses)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Persist the current expenses and model
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.expenses, &self.classifier)
    }

    fn commit(&mut self, amount: f64, description: String, category: String) -> Result<&Expense> {
        self.expenses.push(Expense::now(amount, description, category));
        self.save()?;

        let index = self.expenses.len() - 1;
        Ok(&self.expenses[index])
    }
}

/// Title-case a user-typed category and reject blank labels
fn normalize_label(label: &str) -> Result<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Error::InvalidData("Category cannot be empty".into()));
    }
    Ok(title_case(label))
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
///
/// "food & drink" → "Food & Drink", "e-books" → "E-Books".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::UNCATEGORIZED;

    fn open_temp() -> (tempfile::TempDir, ExpenseTracker) {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));
        let tracker = ExpenseTracker::open(store).unwrap();
        (dir, tracker)
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("food & drink"), "Food & Drink");
        assert_eq!(title_case("PETS"), "Pets");
        assert_eq!(title_case("e-books"), "E-Books");
        assert_eq!(title_case("3d printing"), "3D Printing");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_suggest() {
        let (_dir, tracker) = open_temp();

        let suggestion = tracker.suggest("Spent $12 on lunch at Burger King").unwrap();
        assert_eq!(suggestion.amount, 12.0);
        assert_eq!(suggestion.description, "lunch at Burger King");
        assert_eq!(suggestion.category, "Food & Drink");

        assert!(tracker.suggest("I like my job").is_none());
    }

    #[test]
    fn test_accept_trains_and_saves() {
        let (_dir, mut tracker) = open_temp();
        let before = tracker.classifier().category_count("Food & Drink");

        let suggestion = tracker.suggest("$4.50 latte").unwrap();
        let expense = tracker
            .confirm(suggestion, Feedback::Accept)
            .unwrap()
            .unwrap()
            .clone();
        assert_eq!(expense.category, "Food & Drink");
        assert_eq!(expense.amount, 4.5);
        assert_eq!(
            tracker.classifier().category_count("Food & Drink"),
            before + 1
        );

        let reopened = ExpenseTracker::open(tracker.store().clone()).unwrap();
        assert_eq!(reopened.expenses(), &[expense]);
        assert_eq!(reopened.classifier().export(), tracker.classifier().export());
    }

    #[test]
    fn test_correction_is_title_cased_and_learned() {
        let (_dir, mut tracker) = open_temp();

        for _ in 0..2 {
            let suggestion = tracker.suggest("$60 vet checkup for the dog").unwrap();
            let expense = tracker
                .confirm(suggestion, Feedback::Correct("  pet care ".to_string()))
                .unwrap()
                .unwrap();
            assert_eq!(expense.category, "Pet Care");
        }

        assert_eq!(tracker.predict("vet checkup"), "Pet Care");
        assert_eq!(tracker.expenses().len(), 2);
    }

    #[test]
    fn test_blank_correction_is_rejected() {
        let (_dir, mut tracker) = open_temp();
        let suggestion = tracker.suggest("$5 snacks").unwrap();

        let result = tracker.confirm(suggestion, Feedback::Correct("   ".to_string()));
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert!(tracker.expenses().is_empty());
    }

    #[test]
    fn test_cancel_records_nothing() {
        let (_dir, mut tracker) = open_temp();
        let snapshot = tracker.classifier().export();

        let suggestion = tracker.suggest("$9 movie").unwrap();
        assert!(tracker.confirm(suggestion, Feedback::Cancel).unwrap().is_none());

        assert!(tracker.expenses().is_empty());
        assert_eq!(tracker.classifier().export(), snapshot);
        assert!(!tracker.store().path().exists());
    }

    #[test]
    fn test_manual_entry() {
        let (_dir, mut tracker) = open_temp();

        let expense = tracker.add_manual(1200.0, " rent for march ", None).unwrap();
        assert_eq!(expense.category, "Housing");
        assert_eq!(expense.description, "rent for march");

        let expense = tracker
            .add_manual(35.0, "haircut", Some("personal care"))
            .unwrap();
        assert_eq!(expense.category, "Personal Care");
        assert_eq!(tracker.classifier().feature_count("Personal Care", "haircut"), 1);
    }

    #[test]
    fn test_manual_entry_with_noise_description() {
        let (_dir, mut tracker) = open_temp();
        let expense = tracker.add_manual(3.0, "ok", None).unwrap();
        assert_eq!(expense.category, UNCATEGORIZED);
    }

    #[test]
    fn test_manual_entry_rejects_bad_amount() {
        let (_dir, mut tracker) = open_temp();
        assert!(tracker.add_manual(f64::NAN, "x", None).is_err());
        assert!(tracker.add_manual(0.0, "x", None).is_err());
        assert!(tracker.expenses().is_empty());
    }

    #[test]
    fn test_history_and_insights() {
        let (_dir, mut tracker) = open_temp();
        assert!(tracker.insights().is_none());

        tracker.add_manual(10.0, "pizza", None).unwrap();
        tracker.add_manual(30.0, "milk and eggs", None).unwrap();

        assert_eq!(tracker.history().len(), 2);
        let insights = tracker.insights().unwrap();
        assert_eq!(insights.total, 40.0);
        assert_eq!(insights.by_category[0].category, "Groceries");
        assert_eq!(insights.average, Some(20.0));
    }
}
