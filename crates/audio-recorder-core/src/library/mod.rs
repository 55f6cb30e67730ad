mod entry;
mod naming;
mod scan;

pub use {
    entry::RecordingEntry,
    naming::{
        RECORDING_EXTENSION, RECORDING_PREFIX, TIMESTAMP_FORMAT, is_recording_file_name,
        recording_file_name,
    },
    scan::scan_recordings,
};
