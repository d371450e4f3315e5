//! Confusion matrix and per-class precision/recall.
//!
//! Rows are expected labels, columns predicted labels. Label order is the
//! lexicographic order of the distinct union, fixed when the matrix is built.

use crate::error::{Result, TriageError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Contingency counts over one fold's (expected, predicted) labels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MatrixParts")]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<Vec<u32>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// Serialized form; the label index is rebuilt on load
#[derive(Deserialize)]
struct MatrixParts {
    labels: Vec<String>,
    counts: Vec<Vec<u32>>,
}

impl TryFrom<MatrixParts> for ConfusionMatrix {
    type Error = String;

    fn try_from(parts: MatrixParts) -> std::result::Result<Self, Self::Error> {
        let n = parts.labels.len();
        if parts.counts.len() != n || parts.counts.iter().any(|row| row.len() != n) {
            return Err(format!(
                "confusion matrix counts must be {n}x{n} to match its labels"
            ));
        }

        let index = label_index(&parts.labels);
        if index.len() != n {
            return Err("confusion matrix labels must be distinct".to_string());
        }

        Ok(Self {
            labels: parts.labels,
            counts: parts.counts,
            index,
        })
    }
}

impl PartialEq for ConfusionMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels && self.counts == other.counts
    }
}

fn label_index(labels: &[String]) -> HashMap<String, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.clone(), i))
        .collect()
}

/// Precision/recall for a single label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub true_positives: u32,
    pub false_positives: u32,
    pub false_negatives: u32,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

impl ConfusionMatrix {
    /// Count label pairs; both sequences must have equal length
    pub fn build(expected: &[String], predicted: &[String]) -> Result<Self> {
        if expected.len() != predicted.len() {
            return Err(TriageError::LengthMismatch {
                expected: expected.len(),
                predicted: predicted.len(),
            });
        }

        let labels: Vec<String> = expected
            .iter()
            .chain(predicted)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index = label_index(&labels);

        let mut counts = vec![vec![0u32; labels.len()]; labels.len()];
        for (e, p) in expected.iter().zip(predicted) {
            counts[index[e]][index[p]] += 1;
        }

        Ok(Self {
            labels,
            counts,
            index,
        })
    }

    /// Distinct labels in row/column order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of (expected, predicted) pairs counted
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Count for one (expected, predicted) cell; unknown labels count zero
    pub fn count(&self, expected: &str, predicted: &str) -> u32 {
        match (self.position(expected), self.position(predicted)) {
            (Some(row), Some(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    /// Derive TP/FP/FN counts and precision/recall for one label
    pub fn class_metrics(&self, label: &str) -> ClassMetrics {
        let (true_positives, false_positives, false_negatives) = match self.position(label) {
            Some(k) => {
                let tp = self.counts[k][k];
                let column: u32 = self.counts.iter().map(|row| row[k]).sum();
                let row: u32 = self.counts[k].iter().sum();
                (tp, column - tp, row - tp)
            }
            None => (0, 0, 0),
        };

        let precision = ratio(true_positives, true_positives + false_positives);
        let recall = ratio(true_positives, true_positives + false_negatives);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ClassMetrics {
            label: label.to_string(),
            true_positives,
            false_positives,
            false_negatives,
            precision,
            recall,
            f1_score,
        }
    }

    /// Report per-class metrics for `labels`
    ///
    /// Pure reporting: emits one event per label and returns the metrics,
    /// leaving the matrix untouched.
    pub fn classes_evaluation(&self, labels: &[String]) -> Vec<ClassMetrics> {
        labels
            .iter()
            .map(|label| {
                let metrics = self.class_metrics(label);
                info!(
                    label = %metrics.label,
                    precision = metrics.precision,
                    recall = metrics.recall,
                    f1 = metrics.f1_score,
                    "Class evaluation"
                );
                metrics
            })
            .collect()
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}
