//! Tally Core Library
//!
//! Natural-language expense tracking with a self-improving categorizer:
//! - Tokenizer and multinomial Naive Bayes classifier with online training
//! - Regex-based amount/description extraction from free-text sentences
//! - JSON ledger persistence for expenses and the learned model
//! - Spending insights and history
//! - TOML configuration with embedded defaults

pub mod classifier;
pub mod config;
pub mod error;
pub mod extract;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod tokenize;
pub mod tracker;

pub use classifier::{
    CategoryScore, Classifier, ModelState, SharedClassifier, SEED_EXAMPLES, UNCATEGORIZED,
};
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{extract, Extraction};
pub use ledger::{Ledger, LedgerStore};
pub use models::{CategorySpending, Expense, Feedback, Insights, Suggestion};
pub use tokenize::tokenize;
pub use tracker::{title_case, ExpenseTracker};
