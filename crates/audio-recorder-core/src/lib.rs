//! Audio Recorder Core Library
//!
//! Records microphone audio to timestamped WAV files, lists saved
//! recordings and plays them back, using CPAL, Hound and Rodio.
//!
//! # Example
//!
//! ```no_run
//! use audio_recorder_core::{
//!     CoreResult, CpalCapture, LibraryIndex, RecordingController, RodioPlayback,
//! };
//!
//! use std::{thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let index = LibraryIndex::open("library")?;
//!     let mut controller =
//!         RecordingController::new("recordings", CpalCapture::new(), RodioPlayback::new(), index)?;
//!
//!     controller.start_recording()?;
//!     sleep(Duration::from_secs(3));
//!     if let Some(stopped) = controller.stop_recording()? {
//!         println!("Saved {}", stopped.path.display());
//!     }
//!
//!     controller.play_recording()?;
//!     Ok(())
//! }
//! ```

mod audio;
mod controller;
mod error;
mod library;
mod media_index;

pub use {
    audio::{
        CaptureBackend, CaptureHandle, CpalCapture, CpalCaptureHandle, PlaybackBackend,
        PlaybackHandle, RodioPlayback, RodioPlaybackHandle,
    },
    controller::{
        PlaybackSession, PlaybackState, RecordingController, RecordingSession, RecordingState,
        StoppedRecording,
    },
    error::{RecorderError, Result as CoreResult},
    library::{
        RECORDING_EXTENSION, RECORDING_PREFIX, RecordingEntry, TIMESTAMP_FORMAT,
        is_recording_file_name, recording_file_name, scan_recordings,
    },
    media_index::{LibraryIndex, MediaEntry, MediaIndex, mime_type_for},
};

/// Controller wired to the production audio backends and media library.
pub type DesktopRecorder = RecordingController<CpalCapture, RodioPlayback, LibraryIndex>;
