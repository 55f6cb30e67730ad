use crate::{
    CoreResult, RecorderError,
    audio::{PlaybackBackend, PlaybackHandle},
};

use std::{fs::File, io::BufReader, panic::Location, path::Path};

use error_location::ErrorLocation;
use rodio::{Decoder, OutputStream, Sink};
use tracing::{debug, info, instrument};

/// File playback through the default rodio output device.
#[derive(Debug, Default)]
pub struct RodioPlayback;

impl RodioPlayback {
    /// Create a playback backend.
    pub fn new() -> Self {
        Self
    }
}

impl PlaybackBackend for RodioPlayback {
    type Handle = RodioPlaybackHandle;

    #[track_caller]
    #[instrument(skip(self))]
    fn open(&mut self, source: &Path) -> CoreResult<Self::Handle> {
        let file = File::open(source).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RecorderError::RecordingNotFound {
                path: source.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            },
            _ => RecorderError::IoError {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            },
        })?;

        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| RecorderError::DecodeError {
                path: source.to_path_buf(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| RecorderError::NoOutputDevice {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let sink = Sink::try_new(&stream_handle).map_err(|e| RecorderError::DeviceError {
            reason: format!("Failed to create sink: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        sink.append(decoder);

        info!(path = ?source, "Playback started");

        Ok(RodioPlaybackHandle {
            _stream: stream,
            sink,
        })
    }
}

/// A rodio sink playing one recording.
///
/// The output stream must outlive the sink, so the handle keeps it alive
/// until [`PlaybackHandle::release`].
pub struct RodioPlaybackHandle {
    _stream: OutputStream,
    sink: Sink,
}

impl PlaybackHandle for RodioPlaybackHandle {
    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn release(self) {
        self.sink.stop();
        debug!("Playback released");
    }
}
