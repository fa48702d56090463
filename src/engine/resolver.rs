//! Worker Resolver: matches human queries to workers.

use super::error::FolgaError;
use super::fuzzy::calculate_score;
use super::repo::WorkerRepo;
use super::types::Worker;
use anyhow::Result;
use rusqlite::Connection;

/// Minimum fuzzy score accepted as a match.
const MATCH_THRESHOLD: f64 = 0.3;

pub struct ResolveResult {
    pub worker: Worker,
    pub confidence: f64,
}

pub struct WorkerResolver<'a> {
    repo: WorkerRepo<'a>,
    fuzzy: bool,
}

impl<'a> WorkerResolver<'a> {
    /// Creates a resolver that accepts a numeric ID or an exact name only.
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            repo: WorkerRepo::new(conn),
            fuzzy: false,
        }
    }

    /// Creates a resolver that falls back to fuzzy name matching.
    ///
    /// Only for lookups that do not write: a near-miss may pick another worker.
    #[must_use]
    pub fn fuzzy(conn: &'a Connection) -> Self {
        Self {
            repo: WorkerRepo::new(conn),
            fuzzy: true,
        }
    }

    /// Resolves a user query into a worker: numeric ID first, then exact
    /// name, then (when enabled) fuzzy name matching.
    ///
    /// # Errors
    /// Returns `FolgaError::WorkerNotFound` if nothing matches.
    pub fn resolve(&self, query: &str) -> Result<ResolveResult> {
        let query = query.trim();
        if let Ok(id) = query.parse::<i64>() {
            if let Some(worker) = self.repo.find_by_id(id)? {
                return Ok(ResolveResult {
                    worker,
                    confidence: 1.0,
                });
            }
        }

        if let Some(worker) = self.repo.find_by_name(query)? {
            return Ok(ResolveResult {
                worker,
                confidence: 1.0,
            });
        }

        if !self.fuzzy || query.is_empty() {
            return Err(FolgaError::WorkerNotFound(query.to_string()).into());
        }
        self.fuzzy_resolve(query)
    }

    fn fuzzy_resolve(&self, query: &str) -> Result<ResolveResult> {
        let workers = self.repo.list_all()?;
        let query_lower = query.to_lowercase();
        let words: Vec<_> = query_lower.split_whitespace().collect();

        let mut matches: Vec<_> = workers
            .into_iter()
            .map(|w| (calculate_score(&w, &query_lower, &words), w))
            .filter(|(s, _)| *s > MATCH_THRESHOLD)
            .collect();

        // Prefer active workers on ties; archived ones still resolve.
        matches.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.1.active.cmp(&a.1.active))
        });

        let (confidence, worker) = matches
            .into_iter()
            .next()
            .ok_or_else(|| FolgaError::WorkerNotFound(query.to_string()))?;

        tracing::debug!(query, worker_id = worker.id, confidence, "fuzzy worker match");
        Ok(ResolveResult { worker, confidence })
    }
}

/// Normalizes a worker name for storage: trimmed, single-spaced, upper-case.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
