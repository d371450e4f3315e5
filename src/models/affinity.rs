//! Label-affinity classifier built on assignee profiles.
//!
//! Ranks assignees by how many of a record's labels already appear in their
//! profile, nudged toward more active contributors. Bodies are ignored.

use super::classifier::Classifier;
use super::profile::{build_profiles, AssigneeProfile, AssigneeProfiles};
use super::ranking::top_k;
use crate::error::{Result, TriageError};
use crate::types::{HistoricalRecord, RankedCandidates};
use serde::{Deserialize, Serialize};

/// Default weight of the activity term
pub const DEFAULT_ACTIVITY_WEIGHT: f64 = 0.5;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    classifier: String,
    activity_weight: f64,
    profiles: Vec<AssigneeProfile>,
}

/// Profile-driven assignee classifier
#[derive(Debug, Clone)]
pub struct AffinityClassifier {
    activity_weight: f64,
    profiles: Vec<AssigneeProfile>,
    max_contributions: u32,
}

impl AffinityClassifier {
    pub const NAME: &'static str = "affinity";

    pub fn new() -> Self {
        Self {
            activity_weight: DEFAULT_ACTIVITY_WEIGHT,
            profiles: Vec::new(),
            max_contributions: 0,
        }
    }

    /// Create an untrained classifier; `activity_weight` must lie in [0, 1]
    pub fn with_activity_weight(activity_weight: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&activity_weight) {
            return Err(TriageError::Config(format!(
                "affinity activity_weight must be within [0, 1], got {}",
                activity_weight
            )));
        }
        Ok(Self {
            activity_weight,
            ..Self::new()
        })
    }

    fn load(&mut self, profiles: AssigneeProfiles) {
        self.profiles = profiles.into_values().collect();
        self.max_contributions = self
            .profiles
            .iter()
            .map(|p| p.contributions)
            .max()
            .unwrap_or(0);
    }

    /// Per-assignee scores, index-aligned with the learned profiles
    pub fn scores(&self, labels: &[String]) -> Vec<f64> {
        self.profiles
            .iter()
            .map(|profile| {
                let overlap = labels.iter().filter(|l| profile.has_label(l)).count() as f64;
                let activity = if self.max_contributions == 0 {
                    0.0
                } else {
                    f64::from(profile.contributions) / f64::from(self.max_contributions)
                };
                overlap + self.activity_weight * activity
            })
            .collect()
    }
}

impl Default for AffinityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for AffinityClassifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn learn(&mut self, records: &[HistoricalRecord]) -> Result<()> {
        self.load(build_profiles(records));
        Ok(())
    }

    fn predict(&self, record: &HistoricalRecord) -> Result<RankedCandidates> {
        let scores = self.scores(&record.labels);
        Ok(top_k(&scores, scores.len())
            .into_iter()
            .map(|index| self.profiles[index].name.clone())
            .collect())
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&Snapshot {
            classifier: Self::NAME.to_string(),
            activity_weight: self.activity_weight,
            profiles: self.profiles.clone(),
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(assignee: &str, labels: &[&str]) -> HistoricalRecord {
        HistoricalRecord::new("", vec![assignee.to_string()]).with_labels(labels.iter().copied())
    }

    #[test]
    fn test_label_overlap_dominates() {
        let mut classifier = AffinityClassifier::new();
        classifier
            .learn(&[
                labeled("ui-dev", &["ui", "css"]),
                labeled("core-dev", &["crash"]),
                labeled("core-dev", &["perf"]),
                labeled("core-dev", &["perf"]),
            ])
            .unwrap();

        let ranked = classifier.predict(&labeled("?", &["css"])).unwrap();
        assert_eq!(ranked, vec!["ui-dev", "core-dev"]);
    }

    #[test]
    fn test_activity_breaks_even_overlap() {
        let mut classifier = AffinityClassifier::new();
        classifier
            .learn(&[
                labeled("occasional", &["bug"]),
                labeled("regular", &["bug"]),
                labeled("regular", &["bug"]),
            ])
            .unwrap();

        let ranked = classifier.predict(&labeled("?", &[])).unwrap();
        assert_eq!(ranked, vec!["regular", "occasional"]);
    }

    #[test]
    fn test_zero_weight_falls_back_to_name_order() {
        let mut classifier = AffinityClassifier::with_activity_weight(0.0).unwrap();
        classifier
            .learn(&[labeled("zed", &[]), labeled("amy", &[]), labeled("zed", &[])])
            .unwrap();

        let ranked = classifier.predict(&labeled("?", &[])).unwrap();
        assert_eq!(ranked, vec!["amy", "zed"]);
    }

    #[test]
    fn test_untrained_and_invalid_weight() {
        let classifier = AffinityClassifier::new();
        assert!(classifier.predict(&labeled("?", &["x"])).unwrap().is_empty());
        assert!(AffinityClassifier::with_activity_weight(1.5).is_err());
    }
}
