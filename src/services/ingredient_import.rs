// ABOUTME: Best-effort ingredient catalogue import from a JSON file
// ABOUTME: Skips stored and repeated (name, unit) pairs, inserts the rest in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::database::Database;
use crate::models::NewIngredient;

/// What an import run did; failures are reported here rather than returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// This many new ingredients were inserted
    Inserted(usize),
    /// Every pair in the file was already stored
    NothingNew,
    /// The file does not exist
    FileNotFound(PathBuf),
    /// The file is not a JSON array of `{name, measurement_unit}`
    Malformed(String),
    /// Reading the file or writing the rows failed
    Failed(String),
}

impl ImportOutcome {
    /// Whether the run ended without an error
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Inserted(_) | Self::NothingNew)
    }
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted(count) => write!(f, "Added {count} new ingredients"),
            Self::NothingNew => write!(f, "No new ingredients to add"),
            Self::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::Malformed(message) => write!(f, "Invalid JSON: {message}"),
            Self::Failed(message) => write!(f, "Import failed: {message}"),
        }
    }
}

/// Pairs not yet stored, first occurrence wins within the file
#[must_use]
pub fn select_new(
    records: Vec<NewIngredient>,
    existing: &HashSet<(String, String)>,
) -> Vec<NewIngredient> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let key = (record.name.clone(), record.measurement_unit.clone());
            !existing.contains(&key) && seen.insert(key)
        })
        .collect()
}

/// Load ingredients from `path` into the catalogue
pub async fn import_ingredients(database: &Database, path: &Path) -> ImportOutcome {
    let outcome = run_import(database, path).await;
    if outcome.is_success() {
        info!(file = %path.display(), "{outcome}");
    } else {
        error!(file = %path.display(), "{outcome}");
    }
    outcome
}

async fn run_import(database: &Database, path: &Path) -> ImportOutcome {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return ImportOutcome::FileNotFound(path.to_path_buf())
        }
        Err(e) => return ImportOutcome::Failed(e.to_string()),
    };

    let records: Vec<NewIngredient> = match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(e) => return ImportOutcome::Malformed(e.to_string()),
    };

    let ingredients = database.ingredients();
    let existing = match ingredients.existing_pairs().await {
        Ok(existing) => existing,
        Err(e) => return ImportOutcome::Failed(e.to_string()),
    };

    let total = records.len();
    let fresh = select_new(records, &existing);
    if fresh.is_empty() {
        return ImportOutcome::NothingNew;
    }
    if fresh.len() < total {
        warn!(
            skipped = total - fresh.len(),
            "Skipping ingredients that are already present"
        );
    }

    match ingredients.insert_many(&fresh).await {
        Ok(inserted) => ImportOutcome::Inserted(inserted),
        Err(e) => ImportOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, unit: &str) -> NewIngredient {
        NewIngredient {
            name: name.into(),
            measurement_unit: unit.into(),
        }
    }

    #[test]
    fn test_select_new_skips_existing_and_repeats() {
        let existing: HashSet<_> = [("salt".to_owned(), "g".to_owned())].into_iter().collect();
        let fresh = select_new(
            vec![
                record("salt", "g"),
                record("salt", "pinch"),
                record("pepper", "g"),
                record("pepper", "g"),
            ],
            &existing,
        );
        assert_eq!(fresh, vec![record("salt", "pinch"), record("pepper", "g")]);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ImportOutcome::Inserted(3).to_string(), "Added 3 new ingredients");
        assert!(!ImportOutcome::Malformed("eof".into()).is_success());
        assert!(ImportOutcome::NothingNew.is_success());
    }
}
