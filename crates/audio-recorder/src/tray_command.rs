use crate::TrayIconState;

use audio_recorder_core::RecordingEntry;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone)]
pub enum TrayCommand {
    /// Update the tray icon and which controls are enabled.
    SetState {
        /// New icon state.
        state: TrayIconState,
        /// Whether a recording exists for "Play Last Recording".
        can_play: bool,
    },
    /// Replace the recordings submenu with a fresh scan.
    ShowRecordings(Vec<RecordingEntry>),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
