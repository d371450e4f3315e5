//! Named artifacts: the seam to whatever storage the host provides.
//!
//! The engine only ever asks to "write these bytes under this name"; it never
//! chooses formats or locations beyond the name itself.

pub mod storage;

pub use storage::{ArtifactStorage, MemoryStorage};

use crate::error::Result;
use std::sync::Arc;

/// Destination for recovery snapshots and other named artifacts
pub trait ArtifactSink: Send + Sync {
    fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<()>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for Arc<S> {
    fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<()> {
        (**self).write_artifact(name, bytes)
    }
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for Box<S> {
    fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<()> {
        (**self).write_artifact(name, bytes)
    }
}
