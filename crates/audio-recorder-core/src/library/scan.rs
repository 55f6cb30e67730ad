use crate::{CoreResult, RecordingEntry, library::RECORDING_EXTENSION};

use std::{fs, io::ErrorKind, path::Path};

use tracing::{debug, instrument};

/// Scan `dir` for recordings and return them as a sorted snapshot.
///
/// Only regular files with the recording extension are listed. A missing
/// directory is an empty library, not an error.
#[track_caller]
#[instrument]
pub fn scan_recordings(dir: &Path) -> CoreResult<Vec<RecordingEntry>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Recordings directory does not exist yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();

    for item in read_dir {
        let item = item?;
        if !item.file_type()?.is_file() {
            continue;
        }

        let path = item.path();
        if path
            .extension()
            .is_some_and(|ext| ext == RECORDING_EXTENSION)
        {
            entries.push(RecordingEntry::new(path));
        }
    }

    entries.sort();

    debug!(count = entries.len(), "Recordings scanned");

    Ok(entries)
}
