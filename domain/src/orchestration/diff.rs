//! Word-level diff estimator
//!
//! The convergence signal for early stopping: how much of a text changed
//! between two drafts, measured over case-folded whitespace-delimited words.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of words kept in each of `added` / `removed`.
pub const DIFF_DISPLAY_LIMIT: usize = 10;

/// Normalized change between two texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diff {
    /// Change magnitude in `[0, 1]`
    pub ratio: f64,
    /// Words only in the new text (sorted, at most [`DIFF_DISPLAY_LIMIT`])
    pub added: Vec<String>,
    /// Words only in the old text (sorted, at most [`DIFF_DISPLAY_LIMIT`])
    pub removed: Vec<String>,
}

impl Diff {
    /// Estimate the change from `old` to `new`.
    ///
    /// `ratio = (|added| + |removed|) / max(|old words|, |new words|)`, clamped
    /// to `[0, 1]`, where added/removed are computed over word sets and the
    /// denominators count words with repetition. An empty text on either side
    /// yields a ratio of `1.0` with no word lists.
    pub fn between(old: &str, new: &str) -> Self {
        if old.is_empty() || new.is_empty() {
            return Self {
                ratio: 1.0,
                added: Vec::new(),
                removed: Vec::new(),
            };
        }

        let old_words = words(old);
        let new_words = words(new);
        let old_set: BTreeSet<&str> = old_words.iter().map(String::as_str).collect();
        let new_set: BTreeSet<&str> = new_words.iter().map(String::as_str).collect();

        let added: Vec<&str> = new_set.difference(&old_set).copied().collect();
        let removed: Vec<&str> = old_set.difference(&new_set).copied().collect();

        let total = old_words.len().max(new_words.len());
        let ratio = if total > 0 {
            (added.len() + removed.len()) as f64 / total as f64
        } else {
            0.0
        };

        Self {
            ratio: ratio.clamp(0.0, 1.0),
            added: capped(&added),
            removed: capped(&removed),
        }
    }

    /// The ratio as a whole percentage, for display.
    pub fn percent(&self) -> u32 {
        (self.ratio * 100.0).round() as u32
    }
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn capped(words: &[&str]) -> Vec<String> {
    words
        .iter()
        .take(DIFF_DISPLAY_LIMIT)
        .map(|w| w.to_string())
        .collect()
}
