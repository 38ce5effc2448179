//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses in plain English
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Natural-language expense tracker that learns your categories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger file (overrides config and TALLY_DATA_FILE)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file (defaults to ~/.local/share/tally/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an expense from a sentence, e.g. "Spent $12 on lunch at Burger King"
    Add {
        /// The sentence (quotes optional)
        #[arg(required = true, num_args = 1..)]
        sentence: Vec<String>,

        /// Accept the suggested category without asking
        #[arg(short, long, conflicts_with = "category")]
        yes: bool,

        /// Use this category instead of asking
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add an expense field by field
    Manual {
        /// Amount spent
        #[arg(short, long, allow_negative_numbers = true)]
        amount: f64,

        /// What it was for
        #[arg(short, long)]
        description: String,

        /// Category (defaults to the suggestion)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show expense history, newest first
    History {
        /// Show at most this many expenses
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show spending by category
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest a category for a description without recording anything
    Predict {
        /// Description text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Also show the probability of every category
        #[arg(long)]
        scores: bool,
    },

    /// Show what the classifier has learned
    Model,
}
