//! In-memory capture and playback backends for controller tests.

use crate::{
    CoreResult, MediaEntry, MediaIndex, RecorderError,
    audio::{CaptureBackend, CaptureHandle, PlaybackBackend, PlaybackHandle},
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use error_location::ErrorLocation;

/// Bytes written by [`FakeCaptureHandle::finish`].
pub(crate) const FAKE_AUDIO: &[u8] = b"RIFF-fake-audio";

#[derive(Debug, Default)]
pub(crate) struct CaptureLog {
    pub(crate) opened: Vec<PathBuf>,
    pub(crate) finished: Vec<PathBuf>,
    pub(crate) fail_next_open: bool,
    pub(crate) fail_next_finish: bool,
}

/// Capture backend that creates the output file and fills it on finish.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeCapture {
    log: Arc<Mutex<CaptureLog>>,
}

impl FakeCapture {
    pub(crate) fn log(&self) -> MutexGuard<'_, CaptureLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of capture handles opened but not finished.
    pub(crate) fn live_handles(&self) -> usize {
        let log = self.log();
        log.opened.len() - log.finished.len()
    }
}

impl CaptureBackend for FakeCapture {
    type Handle = FakeCaptureHandle;

    #[track_caller]
    fn open(&mut self, output_path: &Path) -> CoreResult<Self::Handle> {
        let mut log = self.log();

        if log.fail_next_open {
            log.fail_next_open = false;
            return Err(RecorderError::NoMicrophoneFound {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        fs::write(output_path, b"")?;
        log.opened.push(output_path.to_path_buf());

        Ok(FakeCaptureHandle {
            path: output_path.to_path_buf(),
            log: Arc::clone(&self.log),
        })
    }
}

pub(crate) struct FakeCaptureHandle {
    path: PathBuf,
    log: Arc<Mutex<CaptureLog>>,
}

impl CaptureHandle for FakeCaptureHandle {
    #[track_caller]
    fn finish(self) -> CoreResult<()> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.finished.push(self.path.clone());

        // The handle is released either way, like a real stream that fails
        // to finalize its file.
        if log.fail_next_finish {
            log.fail_next_finish = false;
            return Err(RecorderError::EncodingError {
                reason: "finalize failed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        fs::write(&self.path, FAKE_AUDIO)?;
        Ok(())
    }
}

/// Playback backend that tracks which sources hold a live handle.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakePlayback {
    live: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakePlayback {
    pub(crate) fn live(&self) -> Vec<PathBuf> {
        self.live.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PlaybackBackend for FakePlayback {
    type Handle = FakePlaybackHandle;

    #[track_caller]
    fn open(&mut self, source: &Path) -> CoreResult<Self::Handle> {
        if !source.exists() {
            return Err(RecorderError::RecordingNotFound {
                path: source.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(source.to_path_buf());

        Ok(FakePlaybackHandle {
            source: source.to_path_buf(),
            live: Arc::clone(&self.live),
        })
    }
}

pub(crate) struct FakePlaybackHandle {
    source: PathBuf,
    live: Arc<Mutex<Vec<PathBuf>>>,
}

impl PlaybackHandle for FakePlaybackHandle {
    fn is_finished(&self) -> bool {
        false
    }

    fn release(self) {
        let mut live = self.live.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pos) = live.iter().position(|p| *p == self.source) {
            live.remove(pos);
        }
    }
}

/// Media index whose publish always fails, counting the attempts.
#[derive(Debug, Default)]
pub(crate) struct FailingIndex {
    pub(crate) attempts: Vec<PathBuf>,
}

impl MediaIndex for FailingIndex {
    #[track_caller]
    fn publish(&mut self, source: &Path) -> CoreResult<MediaEntry> {
        self.attempts.push(source.to_path_buf());
        Err(RecorderError::MediaIndexError {
            reason: "library unavailable".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn entries(&self) -> CoreResult<Vec<MediaEntry>> {
        Ok(Vec::new())
    }
}
