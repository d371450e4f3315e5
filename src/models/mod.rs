//! Assignee recommendation models and their evaluation harness.
//!
//! # Architecture
//!
//! - **Classifier**: pluggable `learn`/`predict` contract
//! - **NaiveBayesClassifier**: token-based baseline
//! - **AffinityClassifier**: label overlap with assignee profiles
//! - **Model**: owns one classifier, writes recovery snapshots, runs folds
//! - **ConfusionMatrix**: per-class precision/recall for a fold
//!
//! # Usage
//!
//! ```rust
//! use triage_core::models::{FoldStrategy, Model, NaiveBayesClassifier};
//! use triage_core::HistoricalRecord;
//!
//! # fn example() -> triage_core::Result<()> {
//! let records: Vec<HistoricalRecord> = (0..20)
//!     .map(|i| {
//!         let who = if i % 2 == 0 { "mike" } else { "john" };
//!         HistoricalRecord::new(format!("{} module issue", who), vec![who.to_string()])
//!     })
//!     .collect();
//!
//! let mut model = Model::new(NaiveBayesClassifier::new());
//! let summary = model.run_fold(FoldStrategy::AlternatingHalf, &records)?;
//! assert_eq!(summary.folds.len(), 2);
//!
//! model.learn(&records)?;
//! let ranked = model.predict(&HistoricalRecord::new("john module", vec![]))?;
//! assert_eq!(ranked[0], "john");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod affinity;
pub mod classifier;
pub mod fold;
pub mod matrix;
pub mod model;
pub mod naive_bayes;
pub mod profile;
pub mod ranking;

pub use affinity::AffinityClassifier;
pub use classifier::Classifier;
pub use fold::{decile_bounds, FoldResult, FoldStrategy, FoldSummary, UNPREDICTED};
pub use matrix::{ClassMetrics, ConfusionMatrix};
pub use model::{ClassifierKind, Model};
pub use naive_bayes::NaiveBayesClassifier;
pub use profile::{build_profiles, AssigneeProfile, AssigneeProfiles};
pub use ranking::top_k;
