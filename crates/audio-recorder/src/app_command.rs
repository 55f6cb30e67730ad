use std::path::PathBuf;

/// Commands sent from the hotkey handler and tray menu to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new recording session.
    StartRecording,
    /// Stop the current recording session and publish it.
    StopRecording,
    /// Start if idle, stop if recording.
    ToggleRecording,
    /// Play the most recent recording.
    PlayLastRecording,
    /// Play a recording picked from the list.
    PlayRecording {
        /// Path of the selected recording.
        path: PathBuf,
    },
    /// Rescan the recordings directory and refresh the list.
    RefreshRecordings,
    /// Open the recordings directory in the file manager.
    OpenRecordingsFolder,
    /// Request application shutdown.
    Shutdown,
}
