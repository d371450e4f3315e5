//! Classifier capability contract.
//!
//! A classifier is owned by exactly one [`Model`](super::Model); it is
//! `Send` so a host can move a model into a worker, but never shared.

use crate::error::Result;
use crate::types::{HistoricalRecord, RankedCandidates};

/// Pluggable assignee classifier
pub trait Classifier: Send {
    /// Short identifier used in logs and snapshot metadata
    fn name(&self) -> &str;

    /// Replace all learned state with what `records` teach
    ///
    /// An empty batch is valid and resets the classifier to its baseline.
    fn learn(&mut self, records: &[HistoricalRecord]) -> Result<()>;

    /// Rank candidate assignees for `record`, most likely first
    ///
    /// Must be callable before any `learn`, returning a possibly empty list.
    fn predict(&self, record: &HistoricalRecord) -> Result<RankedCandidates>;

    /// Serialize the current learned state for recovery snapshots
    fn snapshot(&self) -> Result<Vec<u8>>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn learn(&mut self, records: &[HistoricalRecord]) -> Result<()> {
        (**self).learn(records)
    }

    fn predict(&self, record: &HistoricalRecord) -> Result<RankedCandidates> {
        (**self).predict(record)
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        (**self).snapshot()
    }
}
