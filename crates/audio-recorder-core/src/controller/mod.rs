mod recording_controller;
mod session;

pub use {
    recording_controller::RecordingController,
    session::{PlaybackSession, PlaybackState, RecordingSession, RecordingState, StoppedRecording},
};
