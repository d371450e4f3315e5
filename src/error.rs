//! Error types for the triage engine
//!
//! Structured error definitions use thiserror; classifier implementations
//! are free to use anyhow internally and convert at the boundary.

use thiserror::Error;

/// Main error type for triage operations
#[derive(Error, Debug)]
pub enum TriageError {
    /// A test record carried no usable ground-truth assignee
    #[error("Missing ground truth for test record {index}")]
    MissingGroundTruth { index: usize },

    /// Expected and predicted label sequences differ in length
    #[error("Label sequence length mismatch: {expected} expected vs {predicted} predicted")]
    LengthMismatch { expected: usize, predicted: usize },

    /// A fold was asked to score an empty test partition
    #[error("Empty test partition")]
    EmptyTestSet,

    /// Fault raised by a classifier implementation
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// A multi-fold strategy stopped at its first hard fault
    #[error("{strategy} fold {fold} failed: {source}")]
    FoldFailed {
        strategy: String,
        fold: usize,
        #[source]
        source: Box<TriageError>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl TriageError {
    /// True for the validation family: bad input, not a broken classifier.
    pub fn is_validation(&self) -> bool {
        match self {
            TriageError::MissingGroundTruth { .. }
            | TriageError::LengthMismatch { .. }
            | TriageError::EmptyTestSet => true,
            TriageError::FoldFailed { source, .. } => source.is_validation(),
            _ => false,
        }
    }

    /// Iteration index of a failed multi-fold run, if any.
    pub fn failed_fold(&self) -> Option<usize> {
        match self {
            TriageError::FoldFailed { fold, .. } => Some(*fold),
            _ => None,
        }
    }
}

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

/// Convert anyhow::Error to TriageError
impl From<anyhow::Error> for TriageError {
    fn from(err: anyhow::Error) -> Self {
        TriageError::Other(err.to_string())
    }
}

impl From<crate::config::ConfigError> for TriageError {
    fn from(err: crate::config::ConfigError) -> Self {
        TriageError::Config(err.to_string())
    }
}
