mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod storage_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, storage_config::StorageConfig,
};

use std::path::PathBuf;

use directories::{ProjectDirs, UserDirs};

pub(crate) const DEFAULT_NOTIFICATIONS: bool = true;

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "audio-recorder", "Audio-Recorder")
}

pub(crate) fn default_notifications() -> bool {
    DEFAULT_NOTIFICATIONS
}

/// App-scoped music directory the recorder writes into.
pub(crate) fn default_recordings_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("Music"))
        .unwrap_or_else(|| PathBuf::from("Music"))
}

/// Shared library other applications browse, `~/Music/Recordings` when the
/// platform has an audio directory.
pub(crate) fn default_library_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.audio_dir().map(|audio| audio.join("Recordings")))
        .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("Recordings")))
        .unwrap_or_else(|| PathBuf::from("Recordings"))
}
