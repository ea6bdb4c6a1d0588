//! Snapshot storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Snapshot storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory for snapshot files; snapshots stay in memory when unset
    pub snapshot_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Check if snapshots are written to disk
    pub fn is_persistent(&self) -> bool {
        self.snapshot_dir
            .as_ref()
            .is_some_and(|dir| !dir.as_os_str().is_empty())
    }
}
