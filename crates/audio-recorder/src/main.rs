//! Audio Recorder: record, list and play back microphone recordings from the
//! system tray, with a global hotkey to toggle recording.

mod app;
mod app_command;
mod config;
mod error;
mod hotkey_handler;
mod logging;
mod menu;
mod notifier;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    notifier::Notifier,
    tray_command::TrayCommand,
    tray_icon_state::{ControlVisibility, TrayIconState},
    tray_manager::TrayManager,
};

use crate::config::Config;

use global_hotkey::GlobalHotKeyManager;
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

/// Application entry point.
fn main() {
    // Dropped on Shutdown so the file writer flushes before the loop exits.
    let mut log_guard = logging::init();

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Persists across event loop iterations; dropping it unregisters the hotkey.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::SetState { state, can_play } => {
                        if let Err(e) = tray_manager.update_state(state, can_play) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::ShowRecordings(entries) => {
                        if let Err(e) = tray_manager.set_recordings(&entries) {
                            error!(error = ?e, "Failed to update recordings list");
                        }
                    }
                    TrayCommand::Shutdown => {
                        info!("Exiting event loop");
                        drop(log_guard.take());
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let (command_tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                // Register hotkey on the main thread; tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                let (manager, hotkey_id) = match HotkeyHandler::register_hotkey() {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to register hotkey: {:?}", e);
                        std::process::exit(1);
                    }
                };
                hotkey_manager = Some(manager);

                let tray_proxy = tray_proxy.clone();

                // The recorder holds the audio output stream, which is !Send,
                // so it is built on the runtime thread and never leaves it.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let controller = match app::desktop_recorder(&config.storage) {
                            Ok(controller) => controller,
                            Err(e) => {
                                error!("Failed to create recorder: {:?}", e);
                                std::process::exit(1);
                            }
                        };

                        let hotkey_handler = HotkeyHandler::new(hotkey_id, command_tx);

                        let app = App {
                            controller,
                            notifier: Notifier::new(config.behavior.notifications),
                            tray_proxy,
                            command_rx,
                            shutdown_tx,
                            tray_state: TrayIconState::Idle,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}
