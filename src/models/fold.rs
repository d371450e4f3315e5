//! Cross-validation harness.
//!
//! Three splitting strategies share one single-fold evaluator:
//!
//! - **Incremental**: train on the first 10%, 20%, … 80% of the records and
//!   test on the rest, snapshotting the classifier after each iteration.
//! - **Alternating half**: train on one half, test on the other, then swap.
//! - **Rolling decile**: each contiguous tenth is tested once against a model
//!   trained on everything else.
//!
//! Records are expected in chronological order. Every strategy either runs
//! all of its folds or stops at the first failure, reporting which fold.

use super::matrix::{ClassMetrics, ConfusionMatrix};
use super::model::Model;
use crate::error::{Result, TriageError};
use crate::types::HistoricalRecord;
use crate::utils::string::truncate_at_char_boundary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Label recorded as "predicted" when a miss comes with an empty ranking
///
/// The sentinel lives in the same namespace as assignee names, so an assignee
/// literally called `<none>` shares its matrix cells. [`FoldResult::unranked`]
/// counts these misses independently of the matrix.
pub const UNPREDICTED: &str = "<none>";

/// Training shares used by the incremental strategy, in tenths
const INCREMENTAL_TENTHS: Range<usize> = 1..9;

const DECILES: usize = 10;

/// Splitting strategy for [`Model::run_fold`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoldStrategy {
    Incremental,
    AlternatingHalf,
    RollingDecile,
}

impl fmt::Display for FoldStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldStrategy::Incremental => write!(f, "incremental"),
            FoldStrategy::AlternatingHalf => write!(f, "alternating-half"),
            FoldStrategy::RollingDecile => write!(f, "rolling-decile"),
        }
    }
}

impl FromStr for FoldStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "incremental" => Ok(FoldStrategy::Incremental),
            "alternating-half" | "two-fold" => Ok(FoldStrategy::AlternatingHalf),
            "rolling-decile" | "ten-fold" => Ok(FoldStrategy::RollingDecile),
            other => Err(format!(
                "unknown strategy '{}', expected incremental, alternating-half or rolling-decile",
                other
            )),
        }
    }
}

/// Outcome of a single train/test partition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldResult {
    /// Share of test records whose assignee made the shortlist, in [0, 1]
    pub accuracy: f64,
    pub matrix: ConfusionMatrix,
    pub distinct_labels: Vec<String>,
    pub class_metrics: Vec<ClassMetrics>,
    /// Misses where the classifier returned no candidates at all
    pub unranked: usize,
    pub train_size: usize,
    pub test_size: usize,
}

/// Aggregate of one strategy run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldSummary {
    pub run_id: Uuid,
    pub strategy: FoldStrategy,
    pub classifier: String,
    pub folds: Vec<FoldResult>,
    /// Mean accuracy over the folds that actually ran
    pub mean_accuracy: f64,
}

impl FoldSummary {
    fn new(run_id: Uuid, strategy: FoldStrategy, classifier: &str, folds: Vec<FoldResult>) -> Self {
        let mean_accuracy = if folds.is_empty() {
            0.0
        } else {
            folds.iter().map(|f| f.accuracy).sum::<f64>() / folds.len() as f64
        };

        Self {
            run_id,
            strategy,
            classifier: classifier.to_string(),
            folds,
            mean_accuracy,
        }
    }
}

/// `round(n · tenths / 10)` with halves rounded up
fn tenth_point(n: usize, tenths: usize) -> usize {
    (n * tenths + 5) / 10
}

/// Contiguous decile ranges covering `0..n`
///
/// With fewer than ten records some ranges are empty.
pub fn decile_bounds(n: usize) -> Vec<Range<usize>> {
    (0..DECILES)
        .map(|d| tenth_point(n, d)..tenth_point(n, d + 1))
        .collect()
}

/// Every record outside `held_out`, as a freshly allocated sequence
fn records_outside(records: &[HistoricalRecord], held_out: &Range<usize>) -> Vec<HistoricalRecord> {
    records[..held_out.start]
        .iter()
        .chain(&records[held_out.end..])
        .cloned()
        .collect()
}

fn fold_failure(strategy: FoldStrategy, fold: usize, source: TriageError) -> TriageError {
    TriageError::FoldFailed {
        strategy: strategy.to_string(),
        fold,
        source: Box::new(source),
    }
}

impl Model {
    /// Train on `train`, then score predictions for every `test` record
    ///
    /// A test record counts as correct when its assignee appears within the
    /// first `shortlist_size` candidates. For the confusion matrix a hit is
    /// recorded as the true label and a miss as the top-ranked candidate.
    pub fn evaluate_fold(
        &mut self,
        train: &[HistoricalRecord],
        test: &[HistoricalRecord],
    ) -> Result<FoldResult> {
        if test.is_empty() {
            return Err(TriageError::EmptyTestSet);
        }

        let expected = test
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .primary_assignee()
                    .map(str::to_string)
                    .ok_or(TriageError::MissingGroundTruth { index })
            })
            .collect::<Result<Vec<String>>>()?;

        self.learn(train)?;

        let mut predicted = Vec::with_capacity(test.len());
        let mut correct = 0usize;
        let mut unranked = 0usize;
        for (record, truth) in test.iter().zip(&expected) {
            let ranked = self.predict(record)?;
            let shortlist = &ranked[..ranked.len().min(self.shortlist_size)];

            if shortlist.contains(truth) {
                correct += 1;
                predicted.push(truth.clone());
            } else if let Some(top) = ranked.first() {
                predicted.push(top.clone());
            } else {
                unranked += 1;
                predicted.push(UNPREDICTED.to_string());
            }

            debug!(
                actual = %truth,
                shortlist = ?shortlist,
                body = %truncate_at_char_boundary(&record.body, 60),
                "Scored prediction"
            );
        }

        let accuracy = correct as f64 / test.len() as f64;
        let matrix = ConfusionMatrix::build(&expected, &predicted)?;
        let distinct_labels = matrix.labels().to_vec();
        let class_metrics = matrix.classes_evaluation(&distinct_labels);

        Ok(FoldResult {
            accuracy,
            matrix,
            distinct_labels,
            class_metrics,
            unranked,
            train_size: train.len(),
            test_size: test.len(),
        })
    }

    /// Grow the training share from 10% to 80% in steps of 10%
    pub fn incremental_fold(&mut self, records: &[HistoricalRecord]) -> Result<FoldSummary> {
        let strategy = FoldStrategy::Incremental;
        let run_id = Uuid::new_v4();
        info!(%run_id, %strategy, records = records.len(), "Starting fold run");

        let mut folds = Vec::with_capacity(INCREMENTAL_TENTHS.len());
        for (fold, tenths) in INCREMENTAL_TENTHS.enumerate() {
            let (train, test) = records.split_at(tenth_point(records.len(), tenths));
            let result = self
                .evaluate_fold(train, test)
                .map_err(|e| fold_failure(strategy, fold, e))?;

            let artifact = format!("{}-{}.model", self.snapshot_prefix, tenths * 10);
            self.snapshot_recovery(&artifact);

            info!(%run_id, %strategy, fold, accuracy = result.accuracy, "Fold complete");
            folds.push(result);
        }

        Ok(self.finish(run_id, strategy, folds))
    }

    /// Train on one half and test on the other, then swap
    pub fn alternating_half_fold(&mut self, records: &[HistoricalRecord]) -> Result<FoldSummary> {
        let strategy = FoldStrategy::AlternatingHalf;
        let run_id = Uuid::new_v4();
        info!(%run_id, %strategy, records = records.len(), "Starting fold run");

        let (first, second) = records.split_at(records.len() / 2);
        let mut folds = Vec::with_capacity(2);
        for (fold, (train, test)) in [(first, second), (second, first)].into_iter().enumerate() {
            let result = self
                .evaluate_fold(train, test)
                .map_err(|e| fold_failure(strategy, fold, e))?;

            info!(%run_id, %strategy, fold, accuracy = result.accuracy, "Fold complete");
            folds.push(result);
        }

        Ok(self.finish(run_id, strategy, folds))
    }

    /// Hold out each contiguous decile in turn
    pub fn rolling_decile_fold(&mut self, records: &[HistoricalRecord]) -> Result<FoldSummary> {
        let strategy = FoldStrategy::RollingDecile;
        let run_id = Uuid::new_v4();
        info!(%run_id, %strategy, records = records.len(), "Starting fold run");

        let mut folds = Vec::with_capacity(DECILES);
        for (fold, decile) in decile_bounds(records.len()).into_iter().enumerate() {
            let train = records_outside(records, &decile);
            let result = self
                .evaluate_fold(&train, &records[decile])
                .map_err(|e| fold_failure(strategy, fold, e))?;

            info!(%run_id, %strategy, fold, accuracy = result.accuracy, "Fold complete");
            folds.push(result);
        }

        Ok(self.finish(run_id, strategy, folds))
    }

    fn finish(&self, run_id: Uuid, strategy: FoldStrategy, folds: Vec<FoldResult>) -> FoldSummary {
        let summary = FoldSummary::new(run_id, strategy, self.classifier_name(), folds);
        info!(
            %run_id,
            %strategy,
            folds = summary.folds.len(),
            mean_accuracy = summary.mean_accuracy,
            "Fold run complete"
        );
        summary
    }
}
