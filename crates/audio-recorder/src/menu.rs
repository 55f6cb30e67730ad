//! Stable tray menu IDs and their mapping to application actions.
//!
//! Recording entries carry their path in the menu ID, so a click can be
//! resolved on the runtime thread without access to the `!Send` menu.

use crate::AppCommand;

use std::path::{Path, PathBuf};

use tray_icon::menu::MenuId;

pub(crate) const START_ID: &str = "start-recording";
pub(crate) const STOP_ID: &str = "stop-recording";
pub(crate) const PLAY_LAST_ID: &str = "play-last-recording";
pub(crate) const REFRESH_ID: &str = "refresh-recordings";
pub(crate) const OPEN_FOLDER_ID: &str = "open-recordings-folder";
pub(crate) const EXIT_ID: &str = "exit";

const RECORDING_ID_PREFIX: &str = "recording:";

/// Menu ID of a recordings-list entry.
///
/// `None` for paths that are not valid UTF-8, which could not be resolved
/// back to the same file from the ID.
pub(crate) fn recording_item_id(path: &Path) -> Option<MenuId> {
    let path = path.to_str()?;
    Some(MenuId::new(format!("{}{}", RECORDING_ID_PREFIX, path)))
}

/// Map a clicked menu item to the command it triggers.
pub(crate) fn command_for(id: &MenuId) -> Option<AppCommand> {
    let id = id.0.as_str();

    if let Some(path) = id.strip_prefix(RECORDING_ID_PREFIX) {
        return Some(AppCommand::PlayRecording {
            path: PathBuf::from(path),
        });
    }

    match id {
        START_ID => Some(AppCommand::StartRecording),
        STOP_ID => Some(AppCommand::StopRecording),
        PLAY_LAST_ID => Some(AppCommand::PlayLastRecording),
        REFRESH_ID => Some(AppCommand::RefreshRecordings),
        OPEN_FOLDER_ID => Some(AppCommand::OpenRecordingsFolder),
        EXIT_ID => Some(AppCommand::Shutdown),
        _ => None,
    }
}
