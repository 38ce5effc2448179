//! Domain models for Tally

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Timestamp layout used in the ledger file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    pub amount: f64,
    pub description: String,
    pub category: String,
}

impl Expense {
    /// Create an expense stamped with the current local time
    pub fn now(amount: f64, description: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Self {
            // Second precision, matching what the ledger stores
            date: now.with_nanosecond(0).unwrap_or(now),
            amount,
            description: description.into(),
            category: category.into(),
        }
    }
}

/// A classifier suggestion for a free-text sentence, awaiting user feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub amount: f64,
    pub description: String,
    pub category: String,
}

/// User response to a [`Suggestion`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// The suggested category is right
    Accept,
    /// Use this category instead
    Correct(String),
    /// Discard the entry
    Cancel,
}

/// Spending for one category in the insights report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: f64,
    /// Share of total spending, 0-100
    pub percentage: f64,
    pub count: usize,
}

/// Aggregate view over the ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub total: f64,
    /// Sorted by amount, largest first
    pub by_category: Vec<CategorySpending>,
    /// Average per expense, only reported with more than one expense
    pub average: Option<f64>,
}

/// Serde adapter for [`TIMESTAMP_FORMAT`]
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
