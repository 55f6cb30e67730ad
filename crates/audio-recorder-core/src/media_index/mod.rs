//! Publishing finished recordings to a shared media catalog.

mod catalog;
pub(crate) mod library_index;

pub use library_index::LibraryIndex;

use crate::CoreResult;

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One published recording in the media index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    /// Stable identifier of the entry.
    pub id: Uuid,
    /// File name shown to other applications.
    pub display_name: String,
    /// MIME type derived from the file extension.
    pub mime_type: String,
    /// Location of the content relative to the library root.
    pub relative_path: String,
    /// True while the content is still being copied in.
    pub pending: bool,
}

/// Shared catalog other applications use to discover recordings.
pub trait MediaIndex {
    /// Copy `source` into the index and return the ready entry.
    ///
    /// # Errors
    ///
    /// Returns error if the catalog cannot be updated or the content cannot
    /// be copied. An entry whose copy failed stays pending.
    fn publish(&mut self, source: &Path) -> CoreResult<MediaEntry>;

    /// All entries currently in the index.
    fn entries(&self) -> CoreResult<Vec<MediaEntry>>;
}

/// MIME type for a recording file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("3gp") => "audio/3gpp",
        Some("ogg") | Some("opus") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("mp3") => "audio/mpeg",
        _ => "application/octet-stream",
    }
}
