//! Timestamped recording file names: `record_<yyyyMMdd_HHmmss>.wav`.

use chrono::{DateTime, NaiveDateTime, TimeZone};

/// Extension of every recording written by the capture backend.
pub const RECORDING_EXTENSION: &str = "wav";

/// File name prefix of every recording.
pub const RECORDING_PREFIX: &str = "record_";

/// `chrono` format of the timestamp embedded in the file name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build the file name for a recording started at `timestamp`.
pub fn recording_file_name<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}.{}",
        RECORDING_PREFIX,
        timestamp.format(TIMESTAMP_FORMAT),
        RECORDING_EXTENSION
    )
}

/// True if `name` follows the recording naming pattern.
pub fn is_recording_file_name(name: &str) -> bool {
    name.strip_prefix(RECORDING_PREFIX)
        .and_then(|rest| rest.strip_suffix(RECORDING_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|stamp| NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok())
}
