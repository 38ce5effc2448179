//! Ledger persistence
//!
//! The ledger is a single JSON document:
//!
//! ```json
//! {
//!     "expenses": [{"date": "2024-03-05 12:30:00", "amount": 12.0, ...}],
//!     "ai_model": {"feature_counts": {...}, "category_counts": {...}}
//! }
//! ```
//!
//! Loading is forgiving. A missing file, unparseable JSON or a damaged section
//! is logged and replaced by an empty ledger or a freshly seeded classifier,
//! so a bad file never blocks the tracker from starting. Expenses are decoded
//! one record at a time and only unreadable records are dropped. Whenever
//! anything is dropped the file is first copied to `<ledger>.bak`, since the
//! next save rewrites it. Only real I/O failures are returned as errors.

use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::classifier::{Classifier, ModelState};
use crate::config::Config;
use crate::error::Result;
use crate::models::Expense;

/// Everything restored from the ledger file
#[derive(Debug, Clone)]
pub struct Ledger {
    pub expenses: Vec<Expense>,
    pub classifier: Classifier,
}

/// On-disk document layout (write side)
#[derive(Serialize)]
struct LedgerDocument<'a> {
    expenses: &'a [Expense],
    ai_model: ModelState,
}

/// JSON file store for expenses and the learned model
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
    seed: bool,
}

impl LedgerStore {
    /// Create a store for `path`; fresh classifiers are seeded
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.data_file).with_seed(config.seed)
    }

    /// Whether a fresh classifier is trained on the built-in examples
    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Classifier used when the file has no usable model
    pub fn fresh_classifier(&self) -> Classifier {
        if self.seed {
            Classifier::new()
        } else {
            Classifier::empty()
        }
    }

    /// Load the ledger, falling back to fresh state for anything unusable
    pub fn load(&self) -> Result<Ledger> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No ledger at {}, starting fresh", self.path.display());
                return Ok(self.fresh_ledger());
            }
            Err(e) => return Err(e.into()),
        };

        let document: Value = match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Value::Object(map),
            Ok(_) => {
                warn!(
                    "Ledger {} is not a JSON object, starting fresh",
                    self.path.display()
                );
                self.backup_damaged()?;
                return Ok(self.fresh_ledger());
            }
            Err(e) => {
                warn!(
                    "Error loading ledger {}: {}. Starting fresh",
                    self.path.display(),
                    e
                );
                self.backup_damaged()?;
                return Ok(self.fresh_ledger());
            }
        };

        let (expenses, expenses_intact) = self.decode_expenses(document.get("expenses"));
        let (classifier, model_intact) = self.decode_model(document.get("ai_model"));
        if !(expenses_intact && model_intact) {
            self.backup_damaged()?;
        }

        info!(
            "Loaded {} expenses and {} categories from {}",
            expenses.len(),
            classifier.categories().len(),
            self.path.display()
        );

        Ok(Ledger {
            expenses,
            classifier,
        })
    }

    /// Write the ledger atomically (temp file in the same directory, then rename)
    pub fn save(&self, expenses: &[Expense], classifier: &Classifier) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let document = LedgerDocument {
            expenses,
            ai_model: classifier.export(),
        };

        let temp_file = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            document.serialize(&mut serializer)?;
            writer.flush()?;
        }
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        info!(
            "Saved {} expenses to {}",
            expenses.len(),
            self.path.display()
        );
        Ok(())
    }

    fn fresh_ledger(&self) -> Ledger {
        Ledger {
            expenses: Vec::new(),
            classifier: self.fresh_classifier(),
        }
    }

    /// Path of the copy kept when a damaged ledger is loaded
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Copy the ledger aside before dropping anything from it
    fn backup_damaged(&self) -> Result<()> {
        let backup = self.backup_path();
        fs::copy(&self.path, &backup)?;
        warn!("Kept a copy of the damaged ledger at {}", backup.display());
        Ok(())
    }

    /// Decode expenses record by record; `false` when anything was dropped
    fn decode_expenses(&self, value: Option<&Value>) -> (Vec<Expense>, bool) {
        let records = match value {
            None | Some(Value::Null) => return (Vec::new(), true),
            Some(Value::Array(records)) => records,
            Some(_) => {
                warn!("Ignoring expenses in ledger: not a JSON array");
                return (Vec::new(), false);
            }
        };

        let mut expenses = Vec::with_capacity(records.len());
        let mut intact = true;
        for (index, record) in records.iter().enumerate() {
            match serde_json::from_value::<Expense>(record.clone()) {
                Ok(expense) => expenses.push(expense),
                Err(e) => {
                    warn!("Skipping unreadable expense #{} in ledger: {}", index, e);
                    intact = false;
                }
            }
        }
        (expenses, intact)
    }

    /// Restore the classifier; `false` when an unreadable model was replaced
    fn decode_model(&self, value: Option<&Value>) -> (Classifier, bool) {
        let state = match value {
            None | Some(Value::Null) => return (self.fresh_classifier(), true),
            Some(value) => match serde_json::from_value::<ModelState>(value.clone()) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Ignoring unreadable ai_model in ledger: {}", e);
                    return (self.fresh_classifier(), false);
                }
            },
        };

        if state.is_empty() {
            return (self.fresh_classifier(), true);
        }

        let mut classifier = Classifier::empty();
        classifier.import(state);
        (classifier, true)
    }
}
