use crate::{
    LibraryIndex, MediaIndex, RecorderError, RecordingController, is_recording_file_name,
    tests::support::{FAKE_AUDIO, FailingIndex, FakeCapture, FakePlayback},
};

use std::fs;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

type TestController = RecordingController<FakeCapture, FakePlayback, LibraryIndex>;

#[allow(clippy::unwrap_used)]
fn controller(dir: &TempDir) -> (TestController, FakeCapture, FakePlayback) {
    let capture = FakeCapture::default();
    let playback = FakePlayback::default();
    let index = LibraryIndex::open(dir.path().join("Library")).unwrap();
    let controller = RecordingController::new(
        dir.path().join("Music"),
        capture.clone(),
        playback.clone(),
        index,
    )
    .unwrap();
    (controller, capture, playback)
}

/// WHAT: Start then stop leaves one named file, published and ready
/// WHY: A finished recording must exist locally and in the shared index
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_controller_when_recording_started_and_stopped_then_one_file_published() {
    // Given: An idle controller with an empty output directory
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, _playback) = controller(&dir);

    // When: Recording is started and stopped
    let started = controller.start_recording().unwrap();
    let stopped = controller.stop_recording().unwrap().unwrap();

    // Then: Exactly one file matching the pattern exists
    let files: Vec<_> = fs::read_dir(controller.output_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(is_recording_file_name(&files[0]));
    assert_eq!(stopped.path, started);

    // Then: The index holds it with pending cleared
    let entries = controller.media_index().entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].pending);
    assert_eq!(entries[0].display_name, files[0]);
    assert_eq!(entries[0], stopped.media_entry);
    assert!(!controller.is_recording());
}

/// WHAT: Stop without an active session is a no-op
/// WHY: An unguarded stop must never crash the process
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_controller_when_stopping_then_returns_none() {
    // Given: A controller that never started recording
    let dir = TempDir::new().unwrap();
    let (mut controller, capture, _playback) = controller(&dir);

    // When: Stop is requested
    let result = controller.stop_recording();

    // Then: Nothing happens
    assert!(matches!(result, Ok(None)));
    assert!(capture.log().finished.is_empty());
    assert!(controller.media_index().entries().unwrap().is_empty());
}

/// WHAT: Second start while recording is rejected
/// WHY: Only one capture session may exist; the first must not leak
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_starting_again_then_already_recording_error() {
    // Given: An active recording
    let dir = TempDir::new().unwrap();
    let (mut controller, capture, _playback) = controller(&dir);
    let first = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).single().unwrap();
    let second = Utc.with_ymd_and_hms(2024, 5, 1, 10, 31, 0).single().unwrap();
    let path = controller.start_recording_at(&first).unwrap();

    // When: Another start is requested
    let result = controller.start_recording_at(&second);

    // Then: Rejected, first session untouched
    assert!(matches!(result, Err(RecorderError::AlreadyRecording { .. })));
    assert_eq!(controller.active_recording(), Some(path.as_path()));
    assert_eq!(capture.live_handles(), 1);
}

/// WHAT: Output path follows record_<yyyyMMdd_HHmmss>.wav
/// WHY: The file name carries the recording time
#[test]
#[allow(clippy::unwrap_used)]
fn given_timestamp_when_starting_then_output_named_after_timestamp() {
    // Given: A fixed start time
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, _playback) = controller(&dir);
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().unwrap();

    // When: Recording starts
    let path = controller.start_recording_at(&at).unwrap();

    // Then: The name embeds the timestamp
    assert_eq!(path, controller.output_dir().join("record_20240102_030405.wav"));
}

/// WHAT: Starting onto an existing file is refused
/// WHY: Two recordings in the same second must not overwrite each other
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_output_when_starting_then_output_exists_error() {
    // Given: A file already at the target path
    let dir = TempDir::new().unwrap();
    let (mut controller, capture, _playback) = controller(&dir);
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().unwrap();
    fs::write(controller.output_dir().join("record_20240102_030405.wav"), b"x").unwrap();

    // When: Recording starts at that timestamp
    let result = controller.start_recording_at(&at);

    // Then: Refused without opening the device
    assert!(matches!(result, Err(RecorderError::OutputExists { .. })));
    assert!(capture.log().opened.is_empty());
    assert!(!controller.is_recording());
}

/// WHAT: Capture failure leaves the controller idle
/// WHY: A device error ends the action without a dangling session
#[test]
#[allow(clippy::unwrap_used)]
fn given_unavailable_device_when_starting_then_error_and_idle() {
    // Given: A capture backend that fails on open
    let dir = TempDir::new().unwrap();
    let (mut controller, capture, _playback) = controller(&dir);
    capture.log().fail_next_open = true;

    // When: Recording starts
    let result = controller.start_recording();

    // Then: Error is returned and state is Idle
    assert!(matches!(result, Err(RecorderError::NoMicrophoneFound { .. })));
    assert!(!controller.is_recording());
    assert!(controller.active_recording().is_none());
}

/// WHAT: Switching tracks leaves exactly one live playback
/// WHY: The previous player must be released before a new one starts
#[test]
#[allow(clippy::unwrap_used)]
fn given_playing_a_when_selecting_b_then_only_b_is_live() {
    // Given: Two recordings on disk
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, playback) = controller(&dir);
    let a = controller.output_dir().join("record_20240101_000000.wav");
    let b = controller.output_dir().join("record_20240101_000001.wav");
    fs::write(&a, FAKE_AUDIO).unwrap();
    fs::write(&b, FAKE_AUDIO).unwrap();

    // When: A then B are played
    controller.play_selected_recording(&a).unwrap();
    controller.play_selected_recording(&b).unwrap();

    // Then: Only B holds a playback resource
    assert_eq!(playback.live(), vec![b.clone()]);
    assert_eq!(controller.playback_source(), Some(b.as_path()));
    assert!(controller.is_playing());
}

/// WHAT: Play last recording before any recording fails
/// WHY: There is no file to play yet
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_recording_when_playing_last_then_nothing_to_play() {
    // Given: A fresh controller
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, playback) = controller(&dir);

    // When: Play last recording
    let result = controller.play_recording();

    // Then: NothingToPlay and no playback
    assert!(matches!(result, Err(RecorderError::NothingToPlay { .. })));
    assert!(playback.live().is_empty());
}

/// WHAT: Play last recording plays the file just stopped
/// WHY: The play button targets the most recent recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopped_recording_when_playing_last_then_plays_that_file() {
    // Given: One finished recording
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, playback) = controller(&dir);
    let path = controller.start_recording().unwrap();
    controller.stop_recording().unwrap();

    // When: Play last recording
    controller.play_recording().unwrap();

    // Then: That file is playing
    assert_eq!(controller.last_recording(), Some(path.as_path()));
    assert_eq!(playback.live(), vec![path]);
}

/// WHAT: Playback is refused while recording
/// WHY: Record and playback are mutually exclusive
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_playing_then_recording_in_progress() {
    // Given: An active recording and an older file
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, playback) = controller(&dir);
    let old = controller.output_dir().join("record_20200101_000000.wav");
    fs::write(&old, FAKE_AUDIO).unwrap();
    controller.start_recording().unwrap();

    // When: Playback of the older file is requested
    let result = controller.play_selected_recording(&old);

    // Then: Rejected
    assert!(matches!(result, Err(RecorderError::RecordingInProgress { .. })));
    assert!(playback.live().is_empty());
}

/// WHAT: Starting a recording releases active playback
/// WHY: Record and playback are mutually exclusive
#[test]
#[allow(clippy::unwrap_used)]
fn given_playing_when_recording_started_then_playback_released() {
    // Given: A file playing
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, playback) = controller(&dir);
    let old = controller.output_dir().join("record_20200101_000000.wav");
    fs::write(&old, FAKE_AUDIO).unwrap();
    controller.play_selected_recording(&old).unwrap();

    // When: Recording starts
    controller.start_recording().unwrap();

    // Then: Playback is gone
    assert!(playback.live().is_empty());
    assert!(controller.playback_source().is_none());
    assert!(controller.is_recording());
}

/// WHAT: Missing selection fails and leaves no playback
/// WHY: A failed open must not keep the previous player around either
#[test]
#[allow(clippy::unwrap_used)]
fn given_playing_when_selecting_missing_file_then_not_found_and_idle() {
    // Given: A file playing
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, playback) = controller(&dir);
    let a = controller.output_dir().join("record_20240101_000000.wav");
    fs::write(&a, FAKE_AUDIO).unwrap();
    controller.play_selected_recording(&a).unwrap();

    // When: A missing file is selected
    let result = controller.play_selected_recording(dir.path().join("missing.wav"));

    // Then: Error, nothing playing
    assert!(matches!(result, Err(RecorderError::RecordingNotFound { .. })));
    assert!(playback.live().is_empty());
    assert!(!controller.is_playing());
}

/// WHAT: load_recordings lists exactly the .wav files
/// WHY: The list must reflect the directory regardless of prior operations
#[test]
#[allow(clippy::unwrap_used)]
fn given_mixed_files_when_loading_then_only_recordings_listed() {
    // Given: A finished recording plus unrelated files
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, _playback) = controller(&dir);
    let recorded = controller.start_recording().unwrap();
    let before_stop = controller.load_recordings().unwrap();
    controller.stop_recording().unwrap();
    let extra = controller.output_dir().join("imported.wav");
    fs::write(&extra, FAKE_AUDIO).unwrap();
    fs::write(controller.output_dir().join("notes.txt"), b"x").unwrap();

    // When: Recordings are loaded
    let entries = controller.load_recordings().unwrap();

    // Then: Exactly the two wav files
    let paths: Vec<_> = entries.iter().map(|e| e.path().to_path_buf()).collect();
    assert_eq!(paths, vec![extra, recorded.clone()]);
    assert_eq!(before_stop.len(), 1);
    assert_eq!(before_stop[0].path(), recorded.as_path());
}

/// WHAT: Shutdown finalizes recording and releases playback
/// WHY: Exiting the app must not lose an in-progress recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_shutting_down_then_recording_published() {
    // Given: An active recording
    let dir = TempDir::new().unwrap();
    let (mut controller, capture, playback) = controller(&dir);
    let path = controller.start_recording().unwrap();

    // When: Shutdown
    let stopped = controller.shutdown().unwrap();

    // Then: The recording is finalized and published
    assert_eq!(stopped.map(|s| s.path), Some(path.clone()));
    assert_eq!(capture.live_handles(), 0);
    assert_eq!(fs::read(&path).unwrap(), FAKE_AUDIO);
    assert!(playback.live().is_empty());
    assert_eq!(controller.media_index().entries().unwrap().len(), 1);
}

/// WHAT: A failed publish still leaves the recording on disk, listed and playable
/// WHY: The library being unavailable must not lose the local recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_unavailable_library_when_stopping_then_error_idle_and_recording_kept() {
    // Given: A recording into a controller whose library rejects publishing
    let dir = TempDir::new().unwrap();
    let capture = FakeCapture::default();
    let mut controller = RecordingController::new(
        dir.path().join("Music"),
        capture.clone(),
        FakePlayback::default(),
        FailingIndex::default(),
    )
    .unwrap();
    let path = controller.start_recording().unwrap();

    // When: Recording stops
    let result = controller.stop_recording();

    // Then: The error surfaces after the file was finalized
    assert!(matches!(result, Err(RecorderError::MediaIndexError { .. })));
    assert_eq!(controller.media_index().attempts, vec![path.clone()]);
    assert_eq!(fs::read(&path).unwrap(), FAKE_AUDIO);

    // Then: Idle, capture released, and the file is the last recording
    assert!(!controller.is_recording());
    assert_eq!(capture.live_handles(), 0);
    assert_eq!(controller.last_recording(), Some(path.as_path()));
    let listed: Vec<_> = controller
        .load_recordings()
        .unwrap()
        .iter()
        .map(|e| e.path().to_path_buf())
        .collect();
    assert_eq!(listed, vec![path]);

    // Then: A new recording can start right away
    let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single().unwrap();
    assert!(controller.start_recording_at(&later).is_ok());
}

/// WHAT: A failed finalize leaves the controller idle without a last recording
/// WHY: An unfinished file must not be offered for playback or published
#[test]
#[allow(clippy::unwrap_used)]
fn given_finalize_failure_when_stopping_then_error_idle_and_nothing_published() {
    // Given: An active recording whose capture fails to finalize
    let dir = TempDir::new().unwrap();
    let (mut controller, capture, _playback) = controller(&dir);
    controller.start_recording().unwrap();
    capture.log().fail_next_finish = true;

    // When: Recording stops
    let result = controller.stop_recording();

    // Then: Error, idle, released, and nothing to play or publish
    assert!(matches!(result, Err(RecorderError::EncodingError { .. })));
    assert!(!controller.is_recording());
    assert_eq!(capture.live_handles(), 0);
    assert!(controller.last_recording().is_none());
    assert!(matches!(
        controller.play_recording(),
        Err(RecorderError::NothingToPlay { .. })
    ));
    assert!(controller.media_index().entries().unwrap().is_empty());

    // Then: A second stop is a no-op
    assert!(matches!(controller.stop_recording(), Ok(None)));
}

/// WHAT: Play last failing to open leaves nothing playing
/// WHY: The previous playback is released before the new one is tried
#[test]
#[allow(clippy::unwrap_used)]
fn given_last_recording_deleted_when_playing_last_then_not_found_and_idle() {
    // Given: A finished recording that is playing, then deleted
    let dir = TempDir::new().unwrap();
    let (mut controller, _capture, playback) = controller(&dir);
    let path = controller.start_recording().unwrap();
    controller.stop_recording().unwrap();
    controller.play_recording().unwrap();
    fs::remove_file(&path).unwrap();

    // When: Play last recording again
    let result = controller.play_recording();

    // Then: Not found and no playback session remains
    assert!(matches!(result, Err(RecorderError::RecordingNotFound { .. })));
    assert!(playback.live().is_empty());
    assert!(!controller.is_playing());
    assert!(controller.playback_source().is_none());
}
