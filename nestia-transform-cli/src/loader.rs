//! Snapshot loading.
//!
//! Turns scanned files into compilation units. A broken snapshot does not
//! stop the others from loading; its error is collected instead.

use std::path::PathBuf;

use nestia_transform::{CompilationUnit, LoadError};
use tracing::debug;

use crate::scanner::SnapshotFile;

/// A compilation unit together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// Path to the snapshot file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// The parsed unit.
    pub unit: CompilationUnit,
}

/// Loader for scanned snapshot files.
#[derive(Debug, Default)]
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single snapshot.
    pub fn load_file(&self, file: &SnapshotFile) -> Result<LoadedSnapshot, LoadError> {
        let unit = CompilationUnit::from_json(&file.content, &file.path)?;
        debug!(
            path = %file.relative_path.display(),
            decorators = unit.source.decorators().count(),
            definitions = unit.types.definitions.len(),
            "Loaded snapshot"
        );
        Ok(LoadedSnapshot {
            path: file.path.clone(),
            relative_path: file.relative_path.clone(),
            unit,
        })
    }

    /// Load every file, collecting the ones that fail.
    pub fn load_files(&self, files: &[SnapshotFile]) -> (Vec<LoadedSnapshot>, Vec<LoadError>) {
        let mut loaded = Vec::new();
        let mut errors = Vec::new();

        for file in files {
            match self.load_file(file) {
                Ok(snapshot) => loaded.push(snapshot),
                Err(e) => errors.push(e),
            }
        }

        (loaded, errors)
    }
}
