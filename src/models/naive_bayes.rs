//! Multinomial naive Bayes over record body tokens.
//!
//! The baseline classifier: each assignee is a class, each record body a bag
//! of lower-cased word tokens.
//!
//! # Scoring
//!
//! For a query with known tokens t₁..tₙ, class c scores
//!
//! ```text
//! ln P(c) + Σ ln((count(tᵢ, c) + α) / (tokens(c) + α·|V|))
//! ```
//!
//! with Laplace smoothing α and vocabulary V. Tokens never seen during
//! training carry no evidence and are skipped.

use super::classifier::Classifier;
use super::ranking::top_k;
use crate::error::{Result, TriageError};
use crate::types::{HistoricalRecord, RankedCandidates};
use crate::utils::string::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Default Laplace smoothing
pub const DEFAULT_SMOOTHING: f64 = 1.0;

/// Token statistics for one assignee
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    pub name: String,
    pub documents: u32,
    pub token_total: u64,
    pub token_counts: BTreeMap<String, u32>,
}

/// Everything the classifier learned from one training batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesState {
    /// Sorted by assignee name
    pub classes: Vec<ClassStats>,
    pub vocabulary: BTreeSet<String>,
    pub documents: u32,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    classifier: String,
    smoothing: f64,
    state: NaiveBayesState,
}

/// Naive Bayes assignee classifier
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    smoothing: f64,
    state: NaiveBayesState,
}

impl NaiveBayesClassifier {
    pub const NAME: &'static str = "naive-bayes";

    /// Create an untrained classifier with default smoothing
    pub fn new() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            state: NaiveBayesState::default(),
        }
    }

    /// Create an untrained classifier with a custom smoothing constant
    pub fn with_smoothing(smoothing: f64) -> Result<Self> {
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(TriageError::Config(format!(
                "naive bayes smoothing must be positive and finite, got {}",
                smoothing
            )));
        }
        Ok(Self {
            smoothing,
            state: NaiveBayesState::default(),
        })
    }

    /// Rebuild a classifier from bytes produced by [`Classifier::snapshot`]
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_slice(bytes)?;
        if snapshot.classifier != Self::NAME {
            return Err(TriageError::Classifier(format!(
                "snapshot belongs to '{}', not '{}'",
                snapshot.classifier,
                Self::NAME
            )));
        }
        let mut classifier = Self::with_smoothing(snapshot.smoothing)?;
        classifier.state = snapshot.state;
        Ok(classifier)
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    pub fn state(&self) -> &NaiveBayesState {
        &self.state
    }

    /// Per-class log scores, index-aligned with `state().classes`
    pub fn scores(&self, body: &str) -> Vec<f64> {
        let state = &self.state;
        if state.classes.is_empty() {
            return Vec::new();
        }

        let tokens: Vec<String> = tokenize(body)
            .into_iter()
            .filter(|token| state.vocabulary.contains(token))
            .collect();
        let vocabulary = state.vocabulary.len() as f64;
        let documents = f64::from(state.documents);

        state
            .classes
            .iter()
            .map(|class| {
                let prior = (f64::from(class.documents) / documents).ln();
                let denominator = class.token_total as f64 + self.smoothing * vocabulary;
                tokens.iter().fold(prior, |score, token| {
                    let count = class.token_counts.get(token).copied().unwrap_or(0);
                    score + ((f64::from(count) + self.smoothing) / denominator).ln()
                })
            })
            .collect()
    }
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for NaiveBayesClassifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn learn(&mut self, records: &[HistoricalRecord]) -> Result<()> {
        let mut classes: BTreeMap<String, ClassStats> = BTreeMap::new();
        let mut vocabulary = BTreeSet::new();
        let mut documents = 0u32;

        for record in records {
            let Some(assignee) = record.primary_assignee() else {
                continue;
            };
            let class = classes
                .entry(assignee.to_string())
                .or_insert_with(|| ClassStats {
                    name: assignee.to_string(),
                    ..ClassStats::default()
                });
            class.documents += 1;
            documents += 1;

            for token in tokenize(&record.body) {
                class.token_total += 1;
                *class.token_counts.entry(token.clone()).or_insert(0) += 1;
                vocabulary.insert(token);
            }
        }

        debug!(
            classes = classes.len(),
            vocabulary = vocabulary.len(),
            documents,
            "Naive bayes trained"
        );

        self.state = NaiveBayesState {
            classes: classes.into_values().collect(),
            vocabulary,
            documents,
        };
        Ok(())
    }

    fn predict(&self, record: &HistoricalRecord) -> Result<RankedCandidates> {
        let scores = self.scores(&record.body);
        Ok(top_k(&scores, scores.len())
            .into_iter()
            .map(|index| self.state.classes[index].name.clone())
            .collect())
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&Snapshot {
            classifier: Self::NAME.to_string(),
            smoothing: self.smoothing,
            state: self.state.clone(),
        })?)
    }
}
