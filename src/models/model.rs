//! Model orchestrator: one classifier, its recovery snapshots, and the
//! cross-validation entry point.
//!
//! A `Model` exclusively owns its classifier. Hosts that want parallel folds
//! or concurrent predictions create one `Model` per unit of work.

use super::affinity::AffinityClassifier;
use super::classifier::Classifier;
use super::fold::{FoldStrategy, FoldSummary};
use super::naive_bayes::NaiveBayesClassifier;
use crate::artifacts::{ArtifactSink, ArtifactStorage};
use crate::config::TriageConfig;
use crate::error::{Result, TriageError};
use crate::types::{HistoricalRecord, RankedCandidates};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Default number of ranked candidates that count toward a hit
pub const DEFAULT_SHORTLIST_SIZE: usize = 5;

/// Built-in classifier variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    NaiveBayes,
    Affinity,
}

impl ClassifierKind {
    /// Instantiate an untrained classifier with settings from `config`
    pub fn build(self, config: &TriageConfig) -> Result<Box<dyn Classifier>> {
        Ok(match self {
            ClassifierKind::NaiveBayes => Box::new(NaiveBayesClassifier::with_smoothing(
                config.naive_bayes.smoothing,
            )?),
            ClassifierKind::Affinity => Box::new(AffinityClassifier::with_activity_weight(
                config.affinity.activity_weight,
            )?),
        })
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierKind::NaiveBayes => write!(f, "{}", NaiveBayesClassifier::NAME),
            ClassifierKind::Affinity => write!(f, "{}", AffinityClassifier::NAME),
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "naive-bayes" | "bayes" => Ok(ClassifierKind::NaiveBayes),
            "affinity" => Ok(ClassifierKind::Affinity),
            other => Err(format!(
                "unknown classifier '{}', expected naive-bayes or affinity",
                other
            )),
        }
    }
}

/// Owns one classifier and drives learning, prediction and evaluation
pub struct Model {
    classifier: Box<dyn Classifier>,
    sink: Option<Box<dyn ArtifactSink>>,
    pub(crate) shortlist_size: usize,
    pub(crate) snapshot_prefix: String,
}

impl Model {
    /// Wrap a classifier with default harness settings and no snapshot sink
    pub fn new<C: Classifier + 'static>(classifier: C) -> Self {
        Self::from_boxed(Box::new(classifier))
    }

    pub fn from_boxed(classifier: Box<dyn Classifier>) -> Self {
        Self {
            classifier,
            sink: None,
            shortlist_size: DEFAULT_SHORTLIST_SIZE,
            snapshot_prefix: "incremental".to_string(),
        }
    }

    /// Build a model whose harness and snapshot settings come from `config`
    pub fn from_config(kind: ClassifierKind, config: &TriageConfig) -> Result<Self> {
        config.validate()?;

        let mut model = Self::from_boxed(kind.build(config)?)
            .with_shortlist_size(config.harness.shortlist_size)?;
        model.snapshot_prefix = config.snapshots.prefix.clone();
        if config.snapshots.enabled {
            model = model.with_artifact_sink(ArtifactStorage::new(&config.snapshots.directory));
        }
        Ok(model)
    }

    /// Route recovery snapshots to `sink`
    pub fn with_artifact_sink<S: ArtifactSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn with_shortlist_size(mut self, shortlist_size: usize) -> Result<Self> {
        if shortlist_size == 0 {
            return Err(TriageError::Config(
                "shortlist size must be at least 1".to_string(),
            ));
        }
        self.shortlist_size = shortlist_size;
        Ok(self)
    }

    pub fn with_snapshot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.snapshot_prefix = prefix.into();
        self
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn shortlist_size(&self) -> usize {
        self.shortlist_size
    }

    /// Retrain the classifier from scratch on `records`
    pub fn learn(&mut self, records: &[HistoricalRecord]) -> Result<()> {
        debug!(
            classifier = self.classifier.name(),
            records = records.len(),
            "Learning"
        );
        self.classifier.learn(records)
    }

    /// Rank candidate assignees for one record
    pub fn predict(&self, record: &HistoricalRecord) -> Result<RankedCandidates> {
        self.classifier.predict(record)
    }

    /// Write the classifier state under `name`
    ///
    /// Best-effort: failures are logged and reported as `false`, never
    /// returned as errors. Returns `false` as well when no sink is set.
    pub fn snapshot_recovery(&self, name: &str) -> bool {
        let Some(sink) = &self.sink else {
            return false;
        };

        match self
            .classifier
            .snapshot()
            .and_then(|bytes| sink.write_artifact(name, &bytes))
        {
            Ok(()) => {
                debug!(artifact = name, "Recovery snapshot written");
                true
            }
            Err(e) => {
                warn!(artifact = name, error = %e, "Recovery snapshot failed");
                false
            }
        }
    }

    /// Run one cross-validation strategy over `records`
    pub fn run_fold(
        &mut self,
        strategy: FoldStrategy,
        records: &[HistoricalRecord],
    ) -> Result<FoldSummary> {
        match strategy {
            FoldStrategy::Incremental => self.incremental_fold(records),
            FoldStrategy::AlternatingHalf => self.alternating_half_fold(records),
            FoldStrategy::RollingDecile => self.rolling_decile_fold(records),
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("classifier", &self.classifier.name())
            .field("snapshots", &self.sink.is_some())
            .field("shortlist_size", &self.shortlist_size)
            .field("snapshot_prefix", &self.snapshot_prefix)
            .finish()
    }
}
