//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (load_config, open_tracker)
//! - `add` - Expense entry (natural-language add, manual add)
//! - `reports` - History and insights
//! - `model` - Classifier inspection (predict, model)

pub mod add;
pub mod core;
pub mod model;
pub mod reports;

// Re-export command functions for main.rs
pub use add::*;
pub use self::core::*;
pub use model::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
