use crate::MediaEntry;

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use uuid::Uuid;

/// A recording in progress.
#[derive(Debug)]
pub struct RecordingSession<H> {
    session_id: Uuid,
    output_path: PathBuf,
    started_at: Instant,
    pub(crate) handle: H,
}

impl<H> RecordingSession<H> {
    pub(crate) fn new(output_path: PathBuf, handle: H) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            output_path,
            started_at: Instant::now(),
            handle,
        }
    }

    /// Unique session ID for log correlation.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// File the session is writing to.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Time since capture started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Recording state machine: `Idle -> Recording -> Idle`.
#[derive(Debug)]
pub enum RecordingState<H> {
    /// No capture session.
    Idle,
    /// Capturing into the session's output file.
    Recording(RecordingSession<H>),
}

impl<H> Default for RecordingState<H> {
    fn default() -> Self {
        RecordingState::Idle
    }
}

/// A recording being played back.
#[derive(Debug)]
pub struct PlaybackSession<H> {
    source: PathBuf,
    pub(crate) handle: H,
}

impl<H> PlaybackSession<H> {
    pub(crate) fn new(source: PathBuf, handle: H) -> Self {
        Self { source, handle }
    }

    /// File being played.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Playback state machine: `Idle -> Playing -> Playing | Idle`.
#[derive(Debug)]
pub enum PlaybackState<H> {
    /// Nothing is playing.
    Idle,
    /// Rendering the session's source file.
    Playing(PlaybackSession<H>),
}

impl<H> Default for PlaybackState<H> {
    fn default() -> Self {
        PlaybackState::Idle
    }
}

/// Outcome of a successful stop: the finalized file and its index entry.
#[derive(Debug, Clone)]
pub struct StoppedRecording {
    /// Session ID of the finished recording.
    pub session_id: Uuid,
    /// Finalized recording file in the output directory.
    pub path: PathBuf,
    /// Entry published to the media index.
    pub media_entry: MediaEntry,
    /// How long the capture ran.
    pub duration: Duration,
}
