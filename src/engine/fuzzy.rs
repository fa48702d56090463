//! Fuzzy string matching utilities for worker resolution.

use super::types::Worker;
use std::collections::HashSet;

/// Calculates a match score between a worker and a lowercase query.
#[must_use]
pub fn calculate_score(worker: &Worker, query: &str, query_words: &[&str]) -> f64 {
    let name_lower = worker.name.to_lowercase();
    let role_lower = worker.role.as_deref().unwrap_or_default().to_lowercase();

    let mut score = 0.0;

    // Substring match (high value)
    if name_lower.contains(query) {
        score += 0.8;
    }

    // Word-level matching
    let name_words: Vec<_> = name_lower.split_whitespace().collect();
    for word in query_words {
        if name_words.iter().any(|w| w.starts_with(word)) {
            score += 0.3;
        }
        if !role_lower.is_empty() && role_lower.contains(word) {
            score += 0.1;
        }
    }

    if name_lower.starts_with(query) {
        score += 0.5;
    }

    score += string_similarity(&name_lower, query) * 0.4;

    score.min(1.0)
}

/// Jaccard similarity of the two character sets.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn string_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: HashSet<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b_chars: HashSet<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    let intersection = a_chars.intersection(&b_chars).count();
    let union = a_chars.union(&b_chars).count();

    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}
