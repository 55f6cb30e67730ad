use crate::config::{default_library_dir, default_recordings_dir};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where recordings are written and published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory new recordings are written to and listed from.
    #[serde(default = "default_recordings_dir")]
    pub recordings_dir: PathBuf,

    /// Shared library directory finished recordings are published to.
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            recordings_dir: default_recordings_dir(),
            library_dir: default_library_dir(),
        }
    }
}
