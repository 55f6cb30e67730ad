use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use thiserror::Error;

/// Recorder errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio output device could be opened.
    #[error("No audio output device: {reason} {location}")]
    NoOutputDevice {
        /// Description of the output device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing or finalizing the recording file failed.
    #[error("Encoding error: {reason} {location}")]
    EncodingError {
        /// Description of the encoding error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording could not be decoded for playback.
    #[error("Failed to decode {path:?}: {reason} {location}")]
    DecodeError {
        /// Path of the file that failed to decode.
        path: PathBuf,
        /// Description of the decoder error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording session is already active.
    #[error("Already recording to {path:?} {location}")]
    AlreadyRecording {
        /// Output path of the active session.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Playback was requested while a recording session is active.
    #[error("Cannot play back while recording {location}")]
    RecordingInProgress {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Nothing has been recorded yet.
    #[error("No recording to play {location}")]
    NothingToPlay {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The requested recording does not exist.
    #[error("Recording not found at path: {path:?} {location}")]
    RecordingNotFound {
        /// Path to the missing recording.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The timestamped output file already exists.
    #[error("Output file already exists: {path:?} {location}")]
    OutputExists {
        /// Path that would have been overwritten.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Publishing to or reading the media index failed.
    #[error("Media index error: {reason} {location}")]
    MediaIndexError {
        /// Description of the media index error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for RecorderError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RecorderError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
