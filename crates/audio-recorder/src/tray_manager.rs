//! System tray icon and menu, the recorder's single screen.
//!
//! Manages an icon with three states (Idle, Recording, Playing) and a
//! context menu with record/stop/play controls, the recordings list, and
//! Exit.

use crate::{
    AppError, AppResult, ControlVisibility, TrayIconState,
    menu::{
        EXIT_ID, OPEN_FOLDER_ID, PLAY_LAST_ID, REFRESH_ID, START_ID, STOP_ID, recording_item_id,
    },
};

use std::panic::Location;

use audio_recorder_core::RecordingEntry;
use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{debug, info, instrument, warn};
use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Edge length of the generated tray icon in pixels.
const ICON_SIZE: u32 = 32;

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    start_item: MenuItem,
    stop_item: MenuItem,
    play_item: MenuItem,
    recordings_menu: Submenu,
    recording_items: Vec<MenuItem>,
    empty_item: Option<MenuItem>,
}

impl TrayManager {
    /// Create a new tray manager with initial state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let start_item = MenuItem::with_id(START_ID, "Start Recording", true, None);
        let stop_item = MenuItem::with_id(STOP_ID, "Stop Recording", false, None);
        let play_item = MenuItem::with_id(PLAY_LAST_ID, "Play Last Recording", false, None);
        let recordings_menu = Submenu::new("Recordings", true);
        let refresh_item = MenuItem::with_id(REFRESH_ID, "Refresh Recordings", true, None);
        let open_folder_item =
            MenuItem::with_id(OPEN_FOLDER_ID, "Open Recordings Folder", true, None);
        let exit_item = MenuItem::with_id(EXIT_ID, "Exit", true, None);

        menu.append_items(&[
            &start_item,
            &stop_item,
            &play_item,
            &PredefinedMenuItem::separator(),
            &recordings_menu,
            &refresh_item,
            &open_folder_item,
            &PredefinedMenuItem::separator(),
            &exit_item,
        ])
        .map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let icon = Self::load_icon(TrayIconState::Idle)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(TrayIconState::Idle.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        let mut manager = Self {
            tray_icon,
            start_item,
            stop_item,
            play_item,
            recordings_menu,
            recording_items: Vec::new(),
            empty_item: None,
        };
        manager.set_recordings(&[])?;

        Ok(manager)
    }

    /// Update the icon, tooltip and enabled controls.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState, can_play: bool) -> AppResult<()> {
        let icon = Self::load_icon(state)?;

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let controls = ControlVisibility::for_state(state, can_play);
        self.start_item.set_enabled(controls.start);
        self.stop_item.set_enabled(controls.stop);
        self.play_item.set_enabled(controls.play);
        self.recordings_menu.set_enabled(controls.recordings);

        debug!(?controls, "Controls updated");

        Ok(())
    }

    /// Replace the recordings submenu with `entries`.
    #[track_caller]
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub fn set_recordings(&mut self, entries: &[RecordingEntry]) -> AppResult<()> {
        for item in self.recording_items.drain(..) {
            self.recordings_menu
                .remove(&item)
                .map_err(|e| AppError::TrayError {
                    reason: format!("Failed to remove recording item: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        if let Some(empty) = self.empty_item.take() {
            self.recordings_menu
                .remove(&empty)
                .map_err(|e| AppError::TrayError {
                    reason: format!("Failed to remove placeholder item: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        for entry in entries {
            let Some(id) = recording_item_id(entry.path()) else {
                warn!(path = ?entry.path(), "Skipping recording with a non UTF-8 path");
                continue;
            };
            let item = MenuItem::with_id(id, entry.file_name(), true, None);
            self.recordings_menu
                .append(&item)
                .map_err(|e| AppError::TrayError {
                    reason: format!("Failed to add recording item: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            self.recording_items.push(item);
        }

        if self.recording_items.is_empty() {
            let empty = MenuItem::new("No recordings", false, None);
            self.recordings_menu
                .append(&empty)
                .map_err(|e| AppError::TrayError {
                    reason: format!("Failed to add placeholder item: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            self.empty_item = Some(empty);
        }

        Ok(())
    }

    /// Draw a filled circle in the state's color.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let color = Rgba(state.icon_color());
        let center = (ICON_SIZE as f32 - 1.0) / 2.0;
        let radius = ICON_SIZE as f32 / 2.0 - 2.0;

        let img = RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            if dx * dx + dy * dy <= radius * radius {
                color
            } else {
                Rgba([0, 0, 0, 0])
            }
        });

        Icon::from_rgba(img.into_raw(), ICON_SIZE, ICON_SIZE).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
