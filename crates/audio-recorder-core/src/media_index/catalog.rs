use crate::{CoreResult, MediaEntry, RecorderError};

use std::{fs, io::Write, panic::Location, path::Path};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

/// On-disk catalog of published recordings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct MediaCatalog {
    #[serde(default)]
    pub(crate) entries: Vec<MediaEntry>,
}

impl MediaCatalog {
    /// Load the catalog, treating a missing file as empty.
    #[track_caller]
    #[instrument]
    pub(crate) fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| RecorderError::MediaIndexError {
            reason: format!("Failed to read catalog: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        toml::from_str(&contents).map_err(|e| RecorderError::MediaIndexError {
            reason: format!("Failed to parse catalog: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Persist the catalog by writing a temp file and renaming it over the
    /// old one.
    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn save(&self, path: &Path) -> CoreResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| RecorderError::MediaIndexError {
            reason: format!("Failed to serialize catalog: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file =
            fs::File::create(&temp_path).map_err(|e| RecorderError::MediaIndexError {
                reason: format!("Failed to create temp catalog file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| RecorderError::MediaIndexError {
                reason: format!("Failed to write temp catalog file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file
            .sync_all()
            .map_err(|e| RecorderError::MediaIndexError {
                reason: format!("Failed to sync temp catalog file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        fs::rename(&temp_path, path).map_err(|e| RecorderError::MediaIndexError {
            reason: format!("Failed to rename temp catalog to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(entry_count = self.entries.len(), "Catalog saved");

        Ok(())
    }

    pub(crate) fn contains_display_name(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.display_name == name)
    }

    /// Clear the pending flag of `id`, returning the updated entry.
    pub(crate) fn mark_ready(&mut self, id: Uuid) -> Option<&MediaEntry> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        entry.pending = false;
        Some(entry)
    }
}
