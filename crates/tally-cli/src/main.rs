//! Tally CLI - Natural-language expense tracker
//!
//! Usage:
//!   tally add Spent $12 on lunch     Add from a sentence (asks to confirm the category)
//!   tally manual -a 40 -d "gas"      Add field by field
//!   tally history                    List expenses
//!   tally insights                   Spending by category

mod cli;
mod commands;


use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.data.as_deref())?;

    match cli.command {
        Commands::Add {
            sentence,
            yes,
            category,
        } => {
            let mut tracker = commands::open_tracker(&config)?;
            let mode = match (yes, category) {
                (_, Some(category)) => commands::AddMode::Category(category),
                (true, None) => commands::AddMode::Accept,
                (false, None) => commands::AddMode::Ask,
            };
            commands::cmd_add(
                &mut tracker,
                &sentence.join(" "),
                mode,
                &mut io::stdin().lock(),
            )
        }
        Commands::Manual {
            amount,
            description,
            category,
        } => {
            let mut tracker = commands::open_tracker(&config)?;
            commands::cmd_manual(&mut tracker, amount, &description, category.as_deref())
        }
        Commands::History { limit, json } => {
            let tracker = commands::open_tracker(&config)?;
            commands::cmd_history(&tracker, limit, json)
        }
        Commands::Insights { json } => {
            let tracker = commands::open_tracker(&config)?;
            commands::cmd_insights(&tracker, json)
        }
        Commands::Predict { text, scores } => {
            let tracker = commands::open_tracker(&config)?;
            commands::cmd_predict(&tracker, &text.join(" "), scores)
        }
        Commands::Model => {
            let tracker = commands::open_tracker(&config)?;
            commands::cmd_model(&tracker)
        }
    }
}
