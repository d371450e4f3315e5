//! Core data types for the triage engine
//!
//! Historical records arrive already normalized by the ingestion layer; the
//! engine never sees raw platform payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered shortlist of assignee identifiers, most likely first.
pub type RankedCandidates = Vec<String>;

/// A resolved issue or pull request with its human assignee(s)
///
/// Immutable once produced: the engine only ever borrows records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Free-text body of the issue or pull request
    pub body: String,

    /// Labels attached at resolution time, in platform order
    #[serde(default)]
    pub labels: Vec<String>,

    /// When the record was closed or merged
    pub resolved_at: DateTime<Utc>,

    /// Candidate assignee identifiers; the first usable one is the truth
    #[serde(default)]
    pub ground_truth: Vec<String>,
}

impl HistoricalRecord {
    /// Create a record resolved now with the given assignees and no labels
    pub fn new(body: impl Into<String>, ground_truth: Vec<String>) -> Self {
        Self {
            body: body.into(),
            labels: Vec::new(),
            resolved_at: Utc::now(),
            ground_truth,
        }
    }

    /// Builder-style label setter
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style resolution timestamp setter
    pub fn resolved_at(mut self, resolved_at: DateTime<Utc>) -> Self {
        self.resolved_at = resolved_at;
        self
    }

    /// The single ground-truth assignee, if one is usable
    ///
    /// A present but blank first entry counts as missing.
    pub fn primary_assignee(&self) -> Option<&str> {
        self.ground_truth
            .first()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }
}
