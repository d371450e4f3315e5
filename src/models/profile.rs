//! Per-assignee activity profiles aggregated from historical records.
//!
//! Profiles are rebuilt from scratch on every pass; nothing is persisted
//! between calls.

use crate::types::HistoricalRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Activity summary for one assignee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssigneeProfile {
    pub name: String,
    /// Latest resolution timestamp seen for this assignee
    pub last_active: DateTime<Utc>,
    /// Union of labels in first-seen order, no duplicates
    pub labels: Vec<String>,
    /// Number of records naming this assignee
    pub contributions: u32,
}

impl AssigneeProfile {
    fn first_sighting(name: &str, record: &HistoricalRecord) -> Self {
        let mut profile = Self {
            name: name.to_string(),
            last_active: record.resolved_at,
            labels: Vec::new(),
            contributions: 1,
        };
        profile.merge_labels(&record.labels);
        profile
    }

    fn record_sighting(&mut self, record: &HistoricalRecord) {
        if record.resolved_at > self.last_active {
            self.last_active = record.resolved_at;
        }
        self.merge_labels(&record.labels);
        self.contributions += 1;
    }

    fn merge_labels(&mut self, labels: &[String]) {
        let mut seen: HashSet<&str> = self.labels.iter().map(String::as_str).collect();
        let mut fresh = Vec::new();
        for label in labels {
            if seen.insert(label.as_str()) {
                fresh.push(label.clone());
            }
        }
        self.labels.extend(fresh);
    }

    /// True if this assignee has worked under `label` before
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Assignee name → profile, iterated in name order
pub type AssigneeProfiles = BTreeMap<String, AssigneeProfile>;

/// Aggregate records into one profile per primary assignee
///
/// Records without a usable ground-truth assignee are skipped.
pub fn build_profiles(records: &[HistoricalRecord]) -> AssigneeProfiles {
    let mut profiles = AssigneeProfiles::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(name) = record.primary_assignee() else {
            skipped += 1;
            continue;
        };

        match profiles.get_mut(name) {
            Some(profile) => profile.record_sighting(record),
            None => {
                profiles.insert(
                    name.to_string(),
                    AssigneeProfile::first_sighting(name, record),
                );
            }
        }
    }

    debug!(
        profiles = profiles.len(),
        skipped, "Built assignee profiles from {} records", records.len()
    );

    profiles
}
