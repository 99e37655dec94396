//! Approval case queue: splits scored cases into a high-priority group and an
//! ordered pending group for reviewers.

use std::cmp::Reverse;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Cases scoring at or above this are shown first, ahead of the sort order.
pub const HIGH_PRIORITY_THRESHOLD: u8 = 60;

const SUBMISSION_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub case_id: String,
    pub vendor: String,
    pub risk_score: u8,
    pub assigned_to: String,
    pub status: String,
    /// `YYYY-MM-DD HH:MM`
    pub last_submission: String,
}

impl Case {
    fn submitted_at(&self) -> Option<NaiveDateTime> {
        match NaiveDateTime::parse_from_str(&self.last_submission, SUBMISSION_FORMAT) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(case_id = %self.case_id, last_submission = %self.last_submission, error = %e, "unparsable submission time");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSort {
    /// Highest risk score first.
    Score,
    /// Most recent submission first.
    Recent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseQueue {
    /// Cases at or above [`HIGH_PRIORITY_THRESHOLD`], in input order.
    pub high_priority: Vec<Case>,
    /// Everything else, ordered by the requested [`QueueSort`].
    pub pending: Vec<Case>,
}

impl CaseQueue {
    pub fn build(cases: Vec<Case>, sort: QueueSort) -> Self {
        let (high_priority, mut pending): (Vec<Case>, Vec<Case>) = cases
            .into_iter()
            .partition(|c| c.risk_score >= HIGH_PRIORITY_THRESHOLD);

        match sort {
            QueueSort::Score => pending.sort_by_key(|c| Reverse(c.risk_score)),
            // `None` sorts below every timestamp, so unparsable entries end up last.
            QueueSort::Recent => pending.sort_by_cached_key(|c| Reverse(c.submitted_at())),
        }

        CaseQueue {
            high_priority,
            pending,
        }
    }

    pub fn len(&self) -> usize {
        self.high_priority.len() + self.pending.len()
    }
}

/// Read a JSON array of [`Case`] records.
pub fn load_cases(path: &Path) -> Result<Vec<Case>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read case file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid case file {}", path.display()))
}
