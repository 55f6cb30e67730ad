//! Audio capture and playback seams.
//!
//! The controller only sees these traits. Production code plugs in the cpal
//! capture backend and the rodio playback backend.

pub(crate) mod capture;
mod playback;

pub use {
    capture::{CpalCapture, CpalCaptureHandle},
    playback::{RodioPlayback, RodioPlaybackHandle},
};

use crate::CoreResult;

use std::path::Path;

/// Opens capture sessions that write microphone audio to a file.
pub trait CaptureBackend {
    /// Live capture resource returned by [`CaptureBackend::open`].
    type Handle: CaptureHandle;

    /// Acquire the input device, create `output_path` and start capturing.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be acquired or prepared, or the
    /// output file cannot be created.
    fn open(&mut self, output_path: &Path) -> CoreResult<Self::Handle>;
}

/// An active capture session.
pub trait CaptureHandle {
    /// Stop capturing, release the device and finalize the output file.
    fn finish(self) -> CoreResult<()>;
}

/// Opens playback sessions that render an audio file.
pub trait PlaybackBackend {
    /// Live playback resource returned by [`PlaybackBackend::open`].
    type Handle: PlaybackHandle;

    /// Open `source`, decode it and start rendering.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, cannot be decoded, or no output
    /// device is available.
    fn open(&mut self, source: &Path) -> CoreResult<Self::Handle>;
}

/// An active playback session.
pub trait PlaybackHandle {
    /// True once the source has been played to the end.
    fn is_finished(&self) -> bool;

    /// Stop rendering and release the output device.
    fn release(self);
}
