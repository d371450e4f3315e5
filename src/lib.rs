//! Triage - assignee recommendation for issues and pull requests
//!
//! Learns from resolved historical records who usually handles what, and
//! recommends a ranked shortlist of assignees for new records:
//! - Pluggable classifiers behind a single `learn`/`predict` contract
//! - Per-assignee activity profiles
//! - Deterministic top-K ranking
//! - Cross-validation harness with confusion-matrix reporting
//!
//! # Architecture
//!
//! - **Types**: Historical records and ranked candidates
//! - **Models**: Classifiers, profiles, the model orchestrator and its folds
//! - **Artifacts**: Named-artifact sinks for recovery snapshots
//! - **Config**: TOML configuration with environment overrides
//!
//! Ingestion, persistence and delivery of recommendations belong to the host.
//!
//! # Example
//!
//! ```
//! use triage_core::{HistoricalRecord, Model, NaiveBayesClassifier};
//!
//! # fn main() -> triage_core::Result<()> {
//! let history = vec![
//!     HistoricalRecord::new("parallel test body", vec!["Mike".into()]),
//!     HistoricalRecord::new("fxcore and", vec!["John".into()]),
//! ];
//!
//! let mut model = Model::new(NaiveBayesClassifier::new());
//! model.learn(&history)?;
//!
//! let ranked = model.predict(&HistoricalRecord::new("fxcore crash", vec![]))?;
//! assert_eq!(ranked[0], "John");
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use artifacts::{ArtifactSink, ArtifactStorage, MemoryStorage};
pub use config::TriageConfig;
pub use error::{Result, TriageError};
pub use models::{
    AffinityClassifier, AssigneeProfile, Classifier, ClassifierKind, FoldResult, FoldStrategy,
    FoldSummary, Model, NaiveBayesClassifier,
};
pub use types::{HistoricalRecord, RankedCandidates};
