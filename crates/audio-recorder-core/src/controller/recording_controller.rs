use crate::{
    CoreResult, MediaIndex, RecorderError, RecordingEntry,
    audio::{CaptureBackend, CaptureHandle, PlaybackBackend, PlaybackHandle},
    controller::{PlaybackSession, PlaybackState, RecordingSession, RecordingState, StoppedRecording},
    library::{recording_file_name, scan_recordings},
};

use std::{
    fs, mem,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, TimeZone};
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Owns the single recording session, the single playback session and the
/// output directory.
///
/// # Invariants
///
/// - At most one recording and one playback session exist at a time.
/// - Recording and playback are mutually exclusive: starting a recording
///   releases playback, and playback is refused while recording.
/// - Invalid transitions are rejected or ignored, never a panic.
///
/// # Thread Safety
///
/// Not shared. Create it on the thread that drives it; the audio backends
/// run their own threads once started.
pub struct RecordingController<C, P, M>
where
    C: CaptureBackend,
    P: PlaybackBackend,
    M: MediaIndex,
{
    output_dir: PathBuf,
    capture: C,
    playback: P,
    media_index: M,
    recording: RecordingState<C::Handle>,
    playback_state: PlaybackState<P::Handle>,
    last_recording: Option<PathBuf>,
}

impl<C, P, M> RecordingController<C, P, M>
where
    C: CaptureBackend,
    P: PlaybackBackend,
    M: MediaIndex,
{
    /// Create a controller writing recordings into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the output directory cannot be created.
    #[track_caller]
    #[instrument(skip_all)]
    pub fn new(
        output_dir: impl Into<PathBuf>,
        capture: C,
        playback: P,
        media_index: M,
    ) -> CoreResult<Self> {
        let output_dir = output_dir.into();

        if !output_dir.exists() {
            fs::create_dir_all(&output_dir)?;
            debug!(output_dir = ?output_dir, "Created output directory");
        }

        info!(output_dir = ?output_dir, "RecordingController initialized");

        Ok(Self {
            output_dir,
            capture,
            playback,
            media_index,
            recording: RecordingState::Idle,
            playback_state: PlaybackState::Idle,
            last_recording: None,
        })
    }

    /// Start recording into a new timestamped file.
    ///
    /// Releases any active playback first. Returns the output path.
    ///
    /// # Errors
    ///
    /// Returns error if already recording, if the target file exists, or if
    /// the capture device cannot be acquired. The controller stays idle on
    /// error.
    #[track_caller]
    pub fn start_recording(&mut self) -> CoreResult<PathBuf> {
        self.start_recording_at(&Local::now())
    }

    #[track_caller]
    #[instrument(skip(self, timestamp))]
    pub(crate) fn start_recording_at<Tz>(&mut self, timestamp: &DateTime<Tz>) -> CoreResult<PathBuf>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if let RecordingState::Recording(session) = &self.recording {
            return Err(RecorderError::AlreadyRecording {
                path: session.output_path().to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let output_path = self.output_dir.join(recording_file_name(timestamp));

        if output_path.exists() {
            return Err(RecorderError::OutputExists {
                path: output_path,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.stop_playback();

        let handle = self.capture.open(&output_path)?;
        let session = RecordingSession::new(output_path.clone(), handle);

        info!(
            session_id = %session.session_id(),
            path = ?output_path,
            "Recording started"
        );

        self.recording = RecordingState::Recording(session);

        Ok(output_path)
    }

    /// Stop the active recording, finalize the file and publish it.
    ///
    /// Returns `None` without side effects when nothing is recording.
    ///
    /// # Errors
    ///
    /// Returns error if finalizing or publishing fails. The capture device
    /// is released and the controller is idle either way.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop_recording(&mut self) -> CoreResult<Option<StoppedRecording>> {
        let session = match mem::take(&mut self.recording) {
            RecordingState::Idle => {
                warn!("Stop requested while not recording, ignoring");
                return Ok(None);
            }
            RecordingState::Recording(session) => session,
        };

        let session_id = session.session_id();
        let duration = session.elapsed();
        let path = session.output_path().to_path_buf();

        session.handle.finish()?;
        self.last_recording = Some(path.clone());

        let media_entry = self.media_index.publish(&path)?;

        info!(
            session_id = %session_id,
            duration_ms = duration.as_millis(),
            path = ?path,
            "Recording stopped"
        );

        Ok(Some(StoppedRecording {
            session_id,
            path,
            media_entry,
            duration,
        }))
    }

    /// Play the most recent recording made by this controller.
    ///
    /// # Errors
    ///
    /// Returns error while recording, when nothing has been recorded yet, or
    /// when playback cannot start.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn play_recording(&mut self) -> CoreResult<()> {
        if self.is_recording() {
            return Err(RecorderError::RecordingInProgress {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let path = self
            .last_recording
            .clone()
            .ok_or(RecorderError::NothingToPlay {
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.play_selected_recording(&path)
    }

    /// Release any current playback, then play `path`.
    ///
    /// # Errors
    ///
    /// Returns error while recording or when playback cannot start. No
    /// playback session remains on error.
    #[track_caller]
    #[instrument(skip(self, path), fields(path = ?path.as_ref()))]
    pub fn play_selected_recording(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();

        if self.is_recording() {
            return Err(RecorderError::RecordingInProgress {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.stop_playback();

        let handle = self.playback.open(path)?;
        self.playback_state = PlaybackState::Playing(PlaybackSession::new(path.to_path_buf(), handle));

        info!("Playback started");

        Ok(())
    }

    /// Release the active playback session. Returns whether one was active.
    #[instrument(skip(self))]
    pub fn stop_playback(&mut self) -> bool {
        match mem::take(&mut self.playback_state) {
            PlaybackState::Idle => false,
            PlaybackState::Playing(session) => {
                debug!(path = ?session.source(), "Releasing playback");
                session.handle.release();
                true
            }
        }
    }

    /// Scan the output directory and return a snapshot of the recordings.
    ///
    /// # Errors
    ///
    /// Returns error if the directory exists but cannot be read.
    #[track_caller]
    pub fn load_recordings(&self) -> CoreResult<Vec<RecordingEntry>> {
        scan_recordings(&self.output_dir)
    }

    /// Finalize any active recording and release any playback.
    ///
    /// # Errors
    ///
    /// Returns error if finalizing or publishing the active recording fails.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) -> CoreResult<Option<StoppedRecording>> {
        self.stop_playback();
        self.stop_recording()
    }

    /// True while a recording session is active.
    pub fn is_recording(&self) -> bool {
        matches!(self.recording, RecordingState::Recording(_))
    }

    /// True while a playback session is active and has audio left to play.
    pub fn is_playing(&self) -> bool {
        match &self.playback_state {
            PlaybackState::Idle => false,
            PlaybackState::Playing(session) => !session.handle.is_finished(),
        }
    }

    /// Output path of the active recording session.
    pub fn active_recording(&self) -> Option<&Path> {
        match &self.recording {
            RecordingState::Idle => None,
            RecordingState::Recording(session) => Some(session.output_path()),
        }
    }

    /// Source of the active playback session, finished or not.
    pub fn playback_source(&self) -> Option<&Path> {
        match &self.playback_state {
            PlaybackState::Idle => None,
            PlaybackState::Playing(session) => Some(session.source()),
        }
    }

    /// Most recent recording finalized by this controller.
    pub fn last_recording(&self) -> Option<&Path> {
        self.last_recording.as_deref()
    }

    /// Directory recordings are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Media index recordings are published to.
    pub fn media_index(&self) -> &M {
        &self.media_index
    }
}
