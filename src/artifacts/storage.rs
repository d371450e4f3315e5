//! Named-artifact storage backends

use super::ArtifactSink;
use crate::error::{Result, TriageError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Writes each artifact as a file under a root directory
pub struct ArtifactStorage {
    base_path: PathBuf,
}

impl ArtifactStorage {
    /// Create a storage manager; the directory is created on first write
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the base path for artifacts
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Read artifact bytes back
    pub fn read_artifact(&self, name: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(name);
        fs::read(&full_path).map_err(|e| {
            TriageError::Other(format!(
                "Failed to read artifact {}: {}",
                full_path.display(),
                e
            ))
        })
    }

    /// List artifact files with the given extension, sorted by name
    pub fn list_artifacts(&self, extension: &str) -> Result<Vec<PathBuf>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
                artifacts.push(path);
            }
        }
        artifacts.sort();
        Ok(artifacts)
    }

    /// Check if artifact exists
    pub fn exists(&self, name: &str) -> bool {
        self.base_path.join(name).exists()
    }
}

impl ArtifactSink for ArtifactStorage {
    fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(name);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TriageError::Other(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&full_path, bytes).map_err(|e| {
            TriageError::Other(format!(
                "Failed to write artifact {}: {}",
                full_path.display(),
                e
            ))
        })
    }
}

/// Keeps artifacts in memory, in write order per name
#[derive(Default)]
pub struct MemoryStorage {
    artifacts: Mutex<BTreeMap<String, Vec<u8>>>,
    writes: Mutex<Vec<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes last written under `name`
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts.lock().ok()?.get(name).cloned()
    }

    /// Every write so far, oldest first
    pub fn write_log(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }
}

impl ArtifactSink for MemoryStorage {
    fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.artifacts
            .lock()
            .map_err(|_| poisoned())?
            .insert(name.to_string(), bytes.to_vec());
        self.writes
            .lock()
            .map_err(|_| poisoned())?
            .push(name.to_string());
        Ok(())
    }
}

fn poisoned() -> TriageError {
    TriageError::Other("artifact store lock poisoned".to_string())
}
