//! Online-learning expense categorizer
//!
//! A multinomial Naive Bayes model with add-one (Laplace) smoothing over the
//! tokens produced by [`tokenize`]. The model starts from a small seed corpus
//! and is refined incrementally every time the user confirms or corrects a
//! suggestion.
//!
//! ## Scoring
//!
//! For each category `c` the log-posterior is
//!
//! ```text
//! ln(docs(c) / total_docs) + Σ ln((count(c, token) + 1) / (words(c) + |vocabulary|))
//! ```
//!
//! and the category with the strictly greatest score wins. Categories are
//! visited in the order they were first trained, so ties always go to the
//! earliest category. That order is part of the exported [`ModelState`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tokenize::tokenize;

/// Category returned when no prediction can be made
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Built-in training examples applied to every new classifier
pub const SEED_EXAMPLES: &[(&str, &str)] = &[
    ("coffee starbucks latte espresso", "Food & Drink"),
    ("burger pizza lunch dinner restaurant mcdonalds", "Food & Drink"),
    ("uber taxi bus train gas fuel petrol", "Transportation"),
    ("netflix spotify subscription apple music hulu", "Entertainment"),
    ("movie cinema bowling game", "Entertainment"),
    ("grocery milk eggs bread walmart costco", "Groceries"),
    ("electric water bill utility internet wifi", "Utilities"),
    ("rent mortgage house", "Housing"),
    ("salary paycheck deposit income", "Income"),
    ("shirt pants clothes shoes mall shopping", "Shopping"),
];

/// Per-category counters
#[derive(Debug, Clone, Default)]
struct CategoryStats {
    /// Number of training calls labeled with this category
    documents: u64,
    /// Token occurrence counts
    words: HashMap<String, u64>,
    /// Sum of `words` values, kept alongside to avoid re-summing per predict
    total_words: u64,
}

/// Log-posterior score of one category for a piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
}

/// Serializable snapshot of a classifier
///
/// `category_counts` keeps first-trained order so that a reloaded model breaks
/// ties exactly like the one that was exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    #[serde(default)]
    pub feature_counts: BTreeMap<String, BTreeMap<String, u64>>,
    #[serde(default, with = "ordered_counts")]
    pub category_counts: Vec<(String, u64)>,
}

impl ModelState {
    /// True when the state carries no training data at all
    pub fn is_empty(&self) -> bool {
        self.feature_counts.is_empty() && self.category_counts.is_empty()
    }
}

/// Naive Bayes classifier over expense descriptions
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Scored categories, in first-trained order
    order: Vec<String>,
    /// Counters for every category with a feature table, scored or not
    stats: HashMap<String, CategoryStats>,
    vocabulary: HashSet<String>,
}

impl Classifier {
    /// Create a classifier trained on [`SEED_EXAMPLES`]
    pub fn new() -> Self {
        let mut classifier = Self::empty();
        for (text, category) in SEED_EXAMPLES {
            classifier.train(text, category);
        }
        classifier
    }

    /// Create a classifier with no training data
    pub fn empty() -> Self {
        Self {
            order: Vec::new(),
            stats: HashMap::new(),
            vocabulary: HashSet::new(),
        }
    }

    /// Learn that `text` belongs to `category`
    ///
    /// Not idempotent: training the same pair twice doubles its weight.
    pub fn train(&mut self, text: &str, category: &str) {
        let tokens = tokenize(text);

        if !self.order.iter().any(|c| c == category) {
            self.order.push(category.to_string());
        }
        let stats = self.stats.entry(category.to_string()).or_default();

        for token in &tokens {
            let count = stats.words.entry(token.clone()).or_insert(0);
            *count = count.saturating_add(1);
            stats.total_words = stats.total_words.saturating_add(1);
            if !self.vocabulary.contains(token) {
                self.vocabulary.insert(token.clone());
            }
        }
        stats.documents = stats.documents.saturating_add(1);

        debug!(
            "Trained '{}' on {} tokens (documents: {})",
            category,
            tokens.len(),
            stats.documents
        );
    }

    /// Predict the most likely category, or [`UNCATEGORIZED`]
    pub fn predict(&self, text: &str) -> String {
        let mut best: Option<CategoryScore> = None;
        for candidate in self.scores(text) {
            let better = match &best {
                Some(current) => candidate.score > current.score,
                None => candidate.score > f64::NEG_INFINITY,
            };
            if better {
                best = Some(candidate);
            }
        }

        match best {
            Some(winner) => {
                debug!("Predicted '{}' for '{}' (score {:.4})", winner.category, text, winner.score);
                winner.category
            }
            None => {
                debug!("No prediction for '{}'", text);
                UNCATEGORIZED.to_string()
            }
        }
    }

    /// Log-posterior score of every category, in first-trained order
    ///
    /// Empty when the text has no tokens or nothing with tokens has been trained.
    pub fn scores(&self, text: &str) -> Vec<CategoryScore> {
        let tokens = tokenize(text);
        let total_documents = self.total_documents();
        // Documents without tokens leave nothing to smooth over
        if tokens.is_empty() || total_documents == 0 || self.vocabulary.is_empty() {
            return Vec::new();
        }

        let vocabulary_size = self.vocabulary.len() as f64;

        self.order
            .iter()
            .map(|category| {
                let (documents, total_words) = self
                    .stats
                    .get(category)
                    .map(|s| (s.documents, s.total_words))
                    .unwrap_or((0, 0));

                let mut score = (documents as f64 / total_documents as f64).ln();
                let denominator = total_words as f64 + vocabulary_size;
                for token in &tokens {
                    let count = self.feature_count(category, token) as f64;
                    score += ((count + 1.0) / denominator).ln();
                }

                CategoryScore {
                    category: category.clone(),
                    score,
                }
            })
            .collect()
    }

    /// Normalized probabilities derived from [`Classifier::scores`]
    ///
    /// Diagnostic only; prediction uses the raw log scores.
    pub fn probabilities(&self, text: &str) -> Vec<(String, f64)> {
        let scores = self.scores(text);
        let max = scores
            .iter()
            .map(|s| s.score)
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Vec::new();
        }

        let weights: Vec<f64> = scores.iter().map(|s| (s.score - max).exp()).collect();
        let total: f64 = weights.iter().sum();

        scores
            .into_iter()
            .zip(weights)
            .map(|(s, w)| (s.category, w / total))
            .collect()
    }

    /// Occurrences of `token` under `category`, zero if either is unknown
    pub fn feature_count(&self, category: &str, token: &str) -> u64 {
        self.stats
            .get(category)
            .and_then(|s| s.words.get(token))
            .copied()
            .unwrap_or(0)
    }

    /// Training calls labeled with `category`, zero if unknown
    pub fn category_count(&self, category: &str) -> u64 {
        self.stats.get(category).map(|s| s.documents).unwrap_or(0)
    }

    /// Scored categories in first-trained order
    pub fn categories(&self) -> &[String] {
        &self.order
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.vocabulary.contains(token)
    }

    pub fn total_documents(&self) -> u64 {
        self.order
            .iter()
            .fold(0u64, |total, c| total.saturating_add(self.category_count(c)))
    }

    /// Snapshot the model for persistence
    pub fn export(&self) -> ModelState {
        let feature_counts = self
            .stats
            .iter()
            .map(|(category, stats)| {
                let words = stats
                    .words
                    .iter()
                    .map(|(token, count)| (token.clone(), *count))
                    .collect();
                (category.clone(), words)
            })
            .collect();

        let category_counts = self
            .order
            .iter()
            .map(|c| (c.clone(), self.category_count(c)))
            .collect();

        ModelState {
            feature_counts,
            category_counts,
        }
    }

    /// Replace the model with a previously exported snapshot
    ///
    /// An empty snapshot leaves the current model untouched.
    pub fn import(&mut self, state: ModelState) {
        if state.is_empty() {
            debug!("Ignoring empty model state");
            return;
        }

        let mut stats: HashMap<String, CategoryStats> = HashMap::new();
        let mut vocabulary = HashSet::new();

        for (category, words) in state.feature_counts {
            let entry = stats.entry(category).or_default();
            for (token, count) in words {
                entry.total_words = entry.total_words.saturating_add(count);
                vocabulary.insert(token.clone());
                entry.words.insert(token, count);
            }
        }

        let mut order = Vec::with_capacity(state.category_counts.len());
        for (category, documents) in state.category_counts {
            stats.entry(category.clone()).or_default().documents = documents;
            if !order.contains(&category) {
                order.push(category);
            }
        }

        debug!(
            "Imported model: {} categories, {} tokens",
            order.len(),
            vocabulary.len()
        );

        self.order = order;
        self.stats = stats;
        self.vocabulary = vocabulary;
    }

    /// Build a classifier from a snapshot, seeding it when the snapshot is empty
    pub fn from_state(state: ModelState) -> Self {
        if state.is_empty() {
            return Self::new();
        }
        let mut classifier = Self::empty();
        classifier.import(state);
        classifier
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifier handle for concurrent hosts
///
/// Every operation holds a single lock for its whole duration, so a predict
/// never observes a half-applied training call.
#[derive(Debug, Clone, Default)]
pub struct SharedClassifier {
    inner: Arc<Mutex<Classifier>>,
}

impl SharedClassifier {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            inner: Arc::new(Mutex::new(classifier)),
        }
    }

    pub fn train(&self, text: &str, category: &str) {
        self.lock().train(text, category);
    }

    pub fn predict(&self, text: &str) -> String {
        self.lock().predict(text)
    }

    pub fn export(&self) -> ModelState {
        self.lock().export()
    }

    pub fn import(&self, state: ModelState) {
        self.lock().import(state);
    }

    /// Run `f` against the classifier while holding the lock
    pub fn with<R>(&self, f: impl FnOnce(&mut Classifier) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Classifier> {
        // Every mutation is a sequence of counter increments; a panic mid-train
        // cannot leave a state that predict would mis-handle.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serialize `Vec<(String, u64)>` as a JSON object, keeping key order
mod ordered_counts {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(counts: &[(String, u64)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(counts.len()))?;
        for (category, count) in counts {
            map.serialize_entry(category, count)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, u64)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Vec<(String, u64)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category to document count")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut counts: Vec<(String, u64)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((category, count)) = access.next_entry::<String, u64>()? {
                    // Duplicate keys: last value wins, first position kept
                    match counts.iter_mut().find(|(c, _)| *c == category) {
                        Some(existing) => existing.1 = count,
                        None => counts.push((category, count)),
                    }
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
