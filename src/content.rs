use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// How many items of each content type a label may surface.
pub const MAX_ITEMS_PER_KIND: usize = 3;

/// Curated content authored for one label: free-text snippets, image
/// references (URLs or inline `data:` URIs) and video URLs. Entries are
/// static data; they are filtered and truncated at lookup time, never
/// mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentEntry {
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

/// The cleaned-up content returned for a label: each list holds at most
/// [`MAX_ITEMS_PER_KIND`] non-blank, trimmed strings. All three lists empty is
/// a valid, expected state — the page shows a neutral message for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSelection {
    pub texts: Vec<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

impl ContentSelection {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.images.is_empty() && self.videos.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Malformed content file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Which registry keys line up with the classifier vocabulary.
///
/// Produced by [`ContentRegistry::validate_against`] after the vocabulary is
/// known — the registry is authored independently of the model, so typos and
/// gaps only become visible once both sides exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    /// Registry keys that are not labels the classifier can predict
    pub unknown: Vec<String>,
    /// Labels the classifier can predict that have no registry entry
    pub uncovered: Vec<String>,
}

impl CoverageReport {
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty() && self.uncovered.is_empty()
    }
}

/// Static mapping from label name to curated content.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    entries: HashMap<String, ContentEntry>,
}

impl ContentRegistry {
    pub fn new(entries: HashMap<String, ContentEntry>) -> Self {
        Self { entries }
    }

    /// Parses a registry from JSON: an object mapping label names to entries.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let entries: HashMap<String, ContentEntry> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks the registry keys against the vocabulary resolved from the
    /// loaded classifier. Unknown keys are logged as warnings (they will never
    /// be shown); uncovered labels are informational (lookup degrades to the
    /// "no content yet" state).
    pub fn validate_against(&self, labels: &[String]) -> CoverageReport {
        let mut unknown: Vec<String> = self
            .entries
            .keys()
            .filter(|key| !labels.iter().any(|l| l == *key))
            .cloned()
            .collect();
        unknown.sort();

        let uncovered: Vec<String> = labels
            .iter()
            .filter(|label| !self.entries.contains_key(*label))
            .cloned()
            .collect();

        for key in &unknown {
            warn!("Content registry key '{}' is not a label the classifier can predict", key);
        }
        if !uncovered.is_empty() {
            info!(
                "{} of {} labels have no curated content yet",
                uncovered.len(),
                labels.len()
            );
        }

        CoverageReport { unknown, uncovered }
    }

    /// Returns the curated content for a label.
    ///
    /// Unknown labels are not an error: they yield an empty selection and the
    /// page shows a neutral message.
    pub fn lookup(&self, label: &str) -> ContentSelection {
        match self.entries.get(label) {
            Some(entry) => ContentSelection {
                texts: pick_valid(&entry.texts),
                images: pick_valid(&entry.images),
                videos: pick_valid(&entry.videos),
            },
            None => ContentSelection::default(),
        }
    }
}

/// Keeps the first [`MAX_ITEMS_PER_KIND`] entries that are non-blank after
/// trimming. Applied uniformly to all three content types.
fn pick_valid(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .take(MAX_ITEMS_PER_KIND)
        .map(str::to_string)
        .collect()
}
