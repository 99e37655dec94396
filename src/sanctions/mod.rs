//! Sanctions screening against a locally held reference list.
//!
//! - [`list`] — loading the reference list from CSV into an immutable snapshot.
//! - [`fuzzy`] — partial-substring similarity and display casing.
//!
//! A [`SanctionsScreener`] owns the current snapshot behind an `Arc`. Screening
//! takes a cheap clone of that `Arc`, so an in-flight check keeps the list it
//! started with even if [`SanctionsScreener::reload`] swaps in a new one.

pub mod fuzzy;
pub mod list;

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use tracing::{error, info, warn};

use crate::models::SanctionsRecord;
pub use list::SanctionsList;

/// Minimum rounded similarity that counts as a sanctions hit.
pub const DEFAULT_MATCH_THRESHOLD: u8 = 86;

#[derive(Debug)]
pub struct SanctionsScreener {
    list: RwLock<Arc<SanctionsList>>,
    threshold: u8,
}

impl SanctionsScreener {
    #[cfg(test)]
    pub fn new(list: SanctionsList) -> Self {
        Self::with_threshold(list, DEFAULT_MATCH_THRESHOLD)
    }

    pub fn with_threshold(list: SanctionsList, threshold: u8) -> Self {
        SanctionsScreener {
            list: RwLock::new(Arc::new(list)),
            threshold,
        }
    }

    /// The snapshot currently used for screening.
    pub fn snapshot(&self) -> Arc<SanctionsList> {
        self.list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the reference list. Checks already running finish on the old one.
    pub fn reload(&self, list: SanctionsList) {
        let count = list.len();
        *self.list.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(list);
        info!(count, "sanctions list reloaded");
    }

    /// Reload from `path` when its modification time differs from `seen`.
    ///
    /// Returns the modification time now in effect, to pass back on the next call.
    pub fn reload_if_modified(&self, path: &Path, seen: Option<SystemTime>) -> Option<SystemTime> {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        if modified.is_some() && modified != seen {
            self.reload(SanctionsList::load_or_empty(path));
        }
        modified
    }

    /// Screen `name` against the reference list.
    pub fn check(&self, name: &str) -> SanctionsRecord {
        let list = self.snapshot();

        if list.is_empty() {
            warn!("sanctions check skipped: sanctions list is empty");
            return SanctionsRecord::no_match();
        }
        if name.is_empty() {
            warn!("sanctions check skipped: no name provided");
            return SanctionsRecord::no_match();
        }

        let candidate = name.to_lowercase();

        let Some((best_name, best_score)) = best_match(&candidate, list.names()) else {
            error!(candidate = name, "sanctions matching produced no candidate");
            return SanctionsRecord::no_match();
        };

        // Round half to even, then compare the integer score against the threshold.
        let score = best_score.round_ties_even().clamp(0.0, 100.0) as u8;
        let matched = score >= self.threshold;

        if matched {
            warn!(candidate = name, best = %best_name, score, "potential sanctions match");
        } else {
            info!(candidate = name, best = %best_name, score, "no sanctions match");
        }

        SanctionsRecord {
            matched,
            matched_name: matched.then(|| fuzzy::title_case(best_name)),
            score,
        }
    }
}

/// Highest-scoring reference name; the earliest one wins a tie.
fn best_match<'a>(candidate: &str, names: &'a [String]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for listed in names {
        let score = fuzzy::partial_ratio(candidate, listed);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((listed.as_str(), score)),
        }
    }
    best
}
