//! Amount and description extraction from free-text sentences
//!
//! Recognizes two amount shapes, whichever appears first in the sentence:
//! - a currency symbol followed by a number: `$12`, `£1,200.50`, `€3`
//! - a number followed by a currency word: `45.50 dollars`, `300 rs`, `20USD`
//!
//! The matched text is cut out of the sentence and the remainder is cleaned up
//! into a description ("Spent $12 on lunch" → 12.0, "lunch"). A sentence with
//! no recognizable amount comes back unchanged with an amount of `0.0`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[£$€][,0-9]+(?:\.[0-9]{2})?|[,0-9]+(?:\.[0-9]{2})?\s*(?:dollars|usd|eur|inr|rs)\b",
    )
    .expect("valid amount regex")
});

static LEADING_FILLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:spent|paid|for|on)\s+)+").expect("valid filler regex")
});

static TRAILING_CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:dollars|usd|rs|inr)$").expect("valid currency regex")
});

/// Result of parsing a sentence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    /// Parsed amount, `0.0` when nothing was found
    pub amount: f64,
    pub description: String,
}

impl Extraction {
    fn not_found(sentence: &str) -> Self {
        Self {
            amount: 0.0,
            description: sentence.to_string(),
        }
    }

    /// Whether an amount was recognized
    ///
    /// A zero amount is always treated as a miss, never as a free expense.
    pub fn is_found(&self) -> bool {
        self.amount != 0.0
    }
}

/// Pull an amount and a description out of a sentence
pub fn extract(sentence: &str) -> Extraction {
    let Some(found) = AMOUNT_RE.find(sentence) else {
        debug!("No amount found in '{}'", sentence);
        return Extraction::not_found(sentence);
    };

    let Some(amount) = parse_amount(found.as_str()) else {
        debug!("Could not parse amount from '{}'", found.as_str());
        return Extraction::not_found(sentence);
    };

    let remainder = format!("{}{}", &sentence[..found.start()], &sentence[found.end()..]);
    let description = clean_description(&remainder);

    debug!(
        "Extracted {} / '{}' from '{}'",
        amount, description, sentence
    );

    Extraction {
        amount,
        description,
    }
}

/// Keep only digits and the decimal point, then parse
///
/// Thousands separators are dropped without checking their grouping.
fn parse_amount(matched: &str) -> Option<f64> {
    let digits: String = matched
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok()
}

fn clean_description(remainder: &str) -> String {
    let trimmed = remainder.trim();
    let without_filler = LEADING_FILLER_RE.replace(trimmed, "");
    let without_currency = TRAILING_CURRENCY_RE.replace(&without_filler, "");
    without_currency.trim().to_string()
}
