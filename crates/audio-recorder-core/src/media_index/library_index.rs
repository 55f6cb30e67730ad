use crate::{
    CoreResult, MediaEntry, MediaIndex, RecorderError,
    media_index::{catalog::MediaCatalog, mime_type_for},
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// File name of the catalog kept at the library root.
pub(crate) const CATALOG_FILE_NAME: &str = "index.toml";

/// Media index backed by a shared library directory and a TOML catalog.
///
/// Publishing follows an insert, copy, mark-ready sequence so a reader of the
/// catalog never sees a ready entry whose content is incomplete.
#[derive(Debug, Clone)]
pub struct LibraryIndex {
    root: PathBuf,
    catalog_path: PathBuf,
}

impl LibraryIndex {
    /// Open the library at `root`, creating the directory if needed.
    #[track_caller]
    #[instrument(skip(root))]
    pub fn open(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let root = root.into();

        if !root.exists() {
            fs::create_dir_all(&root)?;
            debug!(root = ?root, "Created library directory");
        }

        let catalog_path = root.join(CATALOG_FILE_NAME);

        info!(root = ?root, "Media library opened");

        Ok(Self { root, catalog_path })
    }

    /// Library root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Pick a display name not used by the catalog or by a file on disk,
    /// appending ` (n)` to the stem on collision.
    fn unique_display_name(&self, catalog: &MediaCatalog, file_name: &str) -> String {
        let is_taken =
            |name: &str| catalog.contains_display_name(name) || self.root.join(name).exists();

        if !is_taken(file_name) {
            return file_name.to_string();
        }

        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        (1u32..)
            .map(|n| format!("{} ({}){}", stem, n, extension))
            .find(|candidate| !is_taken(candidate.as_str()))
            .unwrap_or_else(|| format!("{}-{}{}", stem, Uuid::new_v4(), extension))
    }
}

impl MediaIndex for LibraryIndex {
    #[track_caller]
    #[instrument(skip(self))]
    fn publish(&mut self, source: &Path) -> CoreResult<MediaEntry> {
        if !source.is_file() {
            return Err(RecorderError::RecordingNotFound {
                path: source.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| RecorderError::MediaIndexError {
                reason: format!("Recording has no usable file name: {:?}", source),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut catalog = MediaCatalog::load(&self.catalog_path)?;
        let display_name = self.unique_display_name(&catalog, file_name);

        let entry = MediaEntry {
            id: Uuid::new_v4(),
            display_name: display_name.clone(),
            mime_type: mime_type_for(source).to_string(),
            relative_path: display_name,
            pending: true,
        };

        catalog.entries.push(entry.clone());
        catalog.save(&self.catalog_path)?;
        debug!(id = %entry.id, display_name = %entry.display_name, "Pending entry inserted");

        let target = self.root.join(&entry.relative_path);
        if let Err(e) = fs::copy(source, &target) {
            warn!(id = %entry.id, error = %e, "Copy failed, entry left pending");
            return Err(RecorderError::MediaIndexError {
                reason: format!("Failed to copy {:?} to {:?}: {}", source, target, e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let ready = catalog
            .mark_ready(entry.id)
            .cloned()
            .ok_or_else(|| RecorderError::MediaIndexError {
                reason: format!("Entry {} vanished from catalog", entry.id),
                location: ErrorLocation::from(Location::caller()),
            })?;
        catalog.save(&self.catalog_path)?;

        info!(
            id = %ready.id,
            display_name = %ready.display_name,
            mime_type = %ready.mime_type,
            "Recording published"
        );

        Ok(ready)
    }

    #[track_caller]
    fn entries(&self) -> CoreResult<Vec<MediaEntry>> {
        Ok(MediaCatalog::load(&self.catalog_path)?.entries)
    }
}
