//! Integration tests for the cross-validation harness
//!
//! Tests the three fold strategies through the public API:
//! - Accuracy bounds with oracle and hopeless classifiers
//! - Alternating-half averaging
//! - Rolling-decile training sets built fresh per fold
//! - Fault propagation and best-effort snapshots

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use triage_core::models::{FoldStrategy, Model, NaiveBayesClassifier};
use triage_core::{
    ArtifactSink, ArtifactStorage, Classifier, HistoricalRecord, MemoryStorage, RankedCandidates,
    Result, TriageError,
};

/// Always ranks the true assignee first
struct Oracle;

impl Classifier for Oracle {
    fn name(&self) -> &str {
        "oracle"
    }

    fn learn(&mut self, _records: &[HistoricalRecord]) -> Result<()> {
        Ok(())
    }

    fn predict(&self, record: &HistoricalRecord) -> Result<RankedCandidates> {
        Ok(record.ground_truth.clone())
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(b"oracle".to_vec())
    }
}

/// Never ranks anyone who exists
struct Hopeless;

impl Classifier for Hopeless {
    fn name(&self) -> &str {
        "hopeless"
    }

    fn learn(&mut self, _records: &[HistoricalRecord]) -> Result<()> {
        Ok(())
    }

    fn predict(&self, _record: &HistoricalRecord) -> Result<RankedCandidates> {
        Ok(vec!["nobody".to_string(); 7])
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Remembers the bodies of every training batch it receives
struct Recorder {
    batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Classifier for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn learn(&mut self, records: &[HistoricalRecord]) -> Result<()> {
        self.batches
            .lock()
            .unwrap()
            .push(records.iter().map(|r| r.body.clone()).collect());
        Ok(())
    }

    fn predict(&self, _record: &HistoricalRecord) -> Result<RankedCandidates> {
        Ok(Vec::new())
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Fails to learn once it has been trained `fail_on` times
struct Flaky {
    calls: usize,
    fail_on: usize,
}

impl Classifier for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    fn learn(&mut self, _records: &[HistoricalRecord]) -> Result<()> {
        self.calls += 1;
        if self.calls > self.fail_on {
            return Err(TriageError::Classifier("training diverged".to_string()));
        }
        Ok(())
    }

    fn predict(&self, record: &HistoricalRecord) -> Result<RankedCandidates> {
        Ok(record.ground_truth.clone())
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

struct BrokenDisk;

impl ArtifactSink for BrokenDisk {
    fn write_artifact(&self, _name: &str, _bytes: &[u8]) -> Result<()> {
        Err(TriageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

fn numbered(n: usize) -> Vec<HistoricalRecord> {
    (0..n)
        .map(|i| HistoricalRecord::new(format!("record-{}", i), vec![format!("dev-{}", i % 3)]))
        .collect()
}

#[test]
fn test_oracle_scores_perfect_accuracy() {
    let records = numbered(30);
    for strategy in [
        FoldStrategy::Incremental,
        FoldStrategy::AlternatingHalf,
        FoldStrategy::RollingDecile,
    ] {
        let mut model = Model::new(Oracle);
        let summary = model.run_fold(strategy, &records).unwrap();
        assert_eq!(summary.mean_accuracy, 1.0, "{}", strategy);
        assert!(summary.folds.iter().all(|f| f.accuracy == 1.0));
    }
}

#[test]
fn test_hopeless_scores_zero_accuracy() {
    let mut model = Model::new(Hopeless);
    let summary = model
        .run_fold(FoldStrategy::RollingDecile, &numbered(20))
        .unwrap();

    assert_eq!(summary.mean_accuracy, 0.0);
    let fold = &summary.folds[0];
    assert_eq!(fold.matrix.count("dev-0", "nobody"), 1);
    assert!(fold.distinct_labels.contains(&"nobody".to_string()));
}

#[test]
fn test_accuracy_stays_in_unit_interval() {
    let records: Vec<HistoricalRecord> = (0..40)
        .map(|i| {
            let (body, who) = match i % 4 {
                0 => ("kernel panic on boot", "kai"),
                1 => ("typo in readme", "dora"),
                2 => ("kernel readme panic", "kai"),
                _ => ("boot typo", "dora"),
            };
            HistoricalRecord::new(body, vec![who.to_string()])
        })
        .collect();

    let mut model = Model::new(NaiveBayesClassifier::new())
        .with_shortlist_size(1)
        .unwrap();
    let summary = model.run_fold(FoldStrategy::Incremental, &records).unwrap();

    assert_eq!(summary.folds.len(), 8);
    for fold in &summary.folds {
        assert!((0.0..=1.0).contains(&fold.accuracy));
        assert_eq!(fold.train_size + fold.test_size, 40);
    }
}

#[test]
fn test_alternating_half_is_mean_of_both_halves() {
    let records = vec![
        HistoricalRecord::new("parallel test body", vec!["Mike".into()]),
        HistoricalRecord::new("fxcore and", vec!["John".into()]),
        HistoricalRecord::new("fxcore or", vec!["John".into()]),
        HistoricalRecord::new("other parallel", vec!["Mike".into()]),
    ];

    let mut model = Model::new(NaiveBayesClassifier::new())
        .with_shortlist_size(1)
        .unwrap();
    let summary = model
        .run_fold(FoldStrategy::AlternatingHalf, &records)
        .unwrap();

    let mut first = Model::new(NaiveBayesClassifier::new())
        .with_shortlist_size(1)
        .unwrap();
    let acc_a = first
        .evaluate_fold(&records[..2], &records[2..])
        .unwrap()
        .accuracy;
    let mut second = Model::new(NaiveBayesClassifier::new())
        .with_shortlist_size(1)
        .unwrap();
    let acc_b = second
        .evaluate_fold(&records[2..], &records[..2])
        .unwrap()
        .accuracy;

    assert_eq!(summary.folds.len(), 2);
    assert_eq!(summary.folds[0].accuracy, acc_a);
    assert_eq!(summary.folds[1].accuracy, acc_b);
    assert_eq!(summary.mean_accuracy, (acc_a + acc_b) / 2.0);
}

#[test]
fn test_rolling_decile_trains_on_everything_else() {
    let records = numbered(23);
    let batches = Arc::new(Mutex::new(Vec::new()));
    let mut model = Model::new(Recorder {
        batches: batches.clone(),
    });

    let summary = model
        .run_fold(FoldStrategy::RollingDecile, &records)
        .unwrap();
    assert_eq!(summary.folds.len(), 10);

    let batches = batches.lock().unwrap();
    assert_eq!(batches.len(), 10);

    let all: BTreeSet<String> = records.iter().map(|r| r.body.clone()).collect();
    let mut tested = BTreeSet::new();
    for (decile, (batch, fold)) in batches.iter().zip(&summary.folds).enumerate() {
        let trained: BTreeSet<String> = batch.iter().cloned().collect();
        assert_eq!(trained.len(), batch.len(), "decile {} duplicated records", decile);

        let held_out: BTreeSet<String> = all.difference(&trained).cloned().collect();
        assert_eq!(held_out.len(), fold.test_size, "decile {}", decile);
        assert!(tested.is_disjoint(&held_out));
        tested.extend(held_out);
    }
    assert_eq!(tested, all);
}

#[test]
fn test_rolling_decile_preserves_order_of_remaining_records() {
    let records = numbered(10);
    let batches = Arc::new(Mutex::new(Vec::new()));
    let mut model = Model::new(Recorder {
        batches: batches.clone(),
    });
    model
        .run_fold(FoldStrategy::RollingDecile, &records)
        .unwrap();

    let batches = batches.lock().unwrap();
    let expected: Vec<String> = records
        .iter()
        .filter(|r| r.body != "record-4")
        .map(|r| r.body.clone())
        .collect();
    assert_eq!(batches[4], expected);
    assert_eq!(records[4].body, "record-4");
}

#[test]
fn test_classifier_fault_aborts_run_with_fold_index() {
    let mut model = Model::new(Flaky {
        calls: 0,
        fail_on: 3,
    });
    let err = model
        .run_fold(FoldStrategy::RollingDecile, &numbered(20))
        .unwrap_err();

    assert_eq!(err.failed_fold(), Some(3));
    assert!(!err.is_validation());
    match err {
        TriageError::FoldFailed { source, .. } => {
            assert!(matches!(*source, TriageError::Classifier(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_ground_truth_names_the_fold() {
    let mut records = numbered(20);
    records[19].ground_truth = vec![String::new()];

    let mut model = Model::new(Oracle);
    let err = model
        .run_fold(FoldStrategy::RollingDecile, &records)
        .unwrap_err();

    assert_eq!(err.failed_fold(), Some(9));
    assert!(err.is_validation());
}

#[test]
fn test_snapshot_failures_do_not_abort_incremental() {
    let mut model = Model::new(Oracle).with_artifact_sink(BrokenDisk);
    let summary = model
        .run_fold(FoldStrategy::Incremental, &numbered(20))
        .unwrap();
    assert_eq!(summary.folds.len(), 8);
    assert_eq!(summary.mean_accuracy, 1.0);
}

#[test]
fn test_incremental_snapshots_land_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ArtifactStorage::new(temp_dir.path().join("caches"));
    let mut model = Model::new(NaiveBayesClassifier::new()).with_artifact_sink(storage);

    model
        .run_fold(FoldStrategy::Incremental, &numbered(20))
        .unwrap();

    let reader = ArtifactStorage::new(temp_dir.path().join("caches"));
    let snapshots = reader.list_artifacts("model").unwrap();
    assert_eq!(snapshots.len(), 8);

    let last = reader.read_artifact("incremental-80.model").unwrap();
    let restored = NaiveBayesClassifier::from_snapshot(&last).unwrap();
    assert_eq!(restored.state().documents, 16);
}

#[test]
fn test_alternating_half_does_not_snapshot() {
    let storage = Arc::new(MemoryStorage::new());
    let mut model = Model::new(Oracle).with_artifact_sink(storage.clone());
    model
        .run_fold(FoldStrategy::AlternatingHalf, &numbered(6))
        .unwrap();
    assert!(storage.write_log().is_empty());
}

#[test]
fn test_summary_serializes() {
    let mut model = Model::new(Oracle);
    let summary = model
        .run_fold(FoldStrategy::AlternatingHalf, &numbered(6))
        .unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["strategy"], "alternating-half");
    assert_eq!(json["classifier"], "oracle");
    assert_eq!(json["folds"].as_array().unwrap().len(), 2);
}
