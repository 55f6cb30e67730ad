use crate::{
    AppCommand, AppResult, Notifier, TrayCommand, TrayIconState, config::StorageConfig, menu,
};

use std::{path::Path, time::Duration};

use audio_recorder_core::{CpalCapture, DesktopRecorder, LibraryIndex, RodioPlayback};
use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// How often to check whether playback reached the end of the file.
const PLAYBACK_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Build the recorder from the configured storage locations.
#[track_caller]
pub(crate) fn desktop_recorder(storage: &StorageConfig) -> AppResult<DesktopRecorder> {
    let index = LibraryIndex::open(&storage.library_dir)?;
    let recorder = DesktopRecorder::new(
        &storage.recordings_dir,
        CpalCapture::new(),
        RodioPlayback::new(),
        index,
    )?;
    Ok(recorder)
}

/// Main application state.
///
/// Runs on the async runtime thread and owns the recorder, which is never
/// shared. Tray updates go back to the main thread via `tray_proxy` because
/// `TrayIcon` is `!Send` and must remain on the UI thread.
pub struct App {
    pub(crate) controller: DesktopRecorder,
    pub(crate) notifier: Notifier,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) tray_state: TrayIconState,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Audio Recorder starting");

        // MenuEvent::receiver() is a crossbeam receiver with a blocking
        // recv(). The task exits on the first failed send after
        // tray_event_rx is dropped.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        self.refresh_recordings();
        self.render(TrayIconState::Idle);

        let mut playback_poll = tokio::time::interval(PLAYBACK_POLL_INTERVAL);

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    match menu::command_for(&event.id) {
                        Some(cmd) => {
                            if !self.handle_command(cmd) {
                                break;
                            }
                        }
                        None => debug!(id = ?event.id, "Ignoring unknown menu item"),
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd) {
                        break;
                    }
                }

                _ = playback_poll.tick() => {
                    self.check_playback_finished();
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.shutdown_tx.send(true);
        info!("Audio Recorder shut down successfully");

        Ok(())
    }

    /// Dispatch one command. Returns `false` when the app should exit.
    #[instrument(skip(self))]
    fn handle_command(&mut self, cmd: AppCommand) -> bool {
        let result = match cmd {
            AppCommand::StartRecording => self.start_recording(),
            AppCommand::StopRecording => self.stop_recording(),
            AppCommand::ToggleRecording => {
                if self.controller.is_recording() {
                    self.stop_recording()
                } else {
                    self.start_recording()
                }
            }
            AppCommand::PlayLastRecording => self.play_last_recording(),
            AppCommand::PlayRecording { path } => self.play_selected_recording(&path),
            AppCommand::RefreshRecordings => {
                self.refresh_recordings();
                Ok(())
            }
            AppCommand::OpenRecordingsFolder => self.open_recordings_folder(),
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                self.shutdown();
                return false;
            }
        };

        if let Err(e) = result {
            error!(error = ?e, "Command failed");
        }

        true
    }

    fn start_recording(&mut self) -> AppResult<()> {
        let path = self.controller.start_recording()?;

        self.render(TrayIconState::Recording);
        self.notifier.notify("Recording...");

        info!(path = ?path, "Recording started");

        Ok(())
    }

    fn stop_recording(&mut self) -> AppResult<()> {
        // The controller is idle after stop even when finalizing or
        // publishing fails, and the file may already be on disk.
        let result = self.controller.stop_recording();
        self.render(TrayIconState::Idle);
        self.refresh_recordings();

        let Some(stopped) = result? else {
            return Ok(());
        };

        self.notifier.notify("Recording saved!");

        info!(
            session_id = %stopped.session_id,
            duration_ms = stopped.duration.as_millis(),
            display_name = %stopped.media_entry.display_name,
            "Recording saved"
        );

        Ok(())
    }

    fn play_last_recording(&mut self) -> AppResult<()> {
        if let Err(e) = self.controller.play_recording() {
            self.render(TrayIconState::Idle);
            return Err(e.into());
        }

        self.render(TrayIconState::Playing);
        self.notifier.notify("Playing back...");

        Ok(())
    }

    fn play_selected_recording(&mut self, path: &Path) -> AppResult<()> {
        if let Err(e) = self.controller.play_selected_recording(path) {
            // A failed switch has already released the previous playback.
            self.render(TrayIconState::Idle);
            return Err(e.into());
        }

        self.render(TrayIconState::Playing);
        self.notifier.notify(&format!("Playing: {}", path.display()));

        Ok(())
    }

    fn refresh_recordings(&mut self) {
        match self.controller.load_recordings() {
            Ok(entries) => {
                debug!(count = entries.len(), "Recordings list refreshed");
                self.send_tray(TrayCommand::ShowRecordings(entries));
            }
            Err(e) => error!(error = ?e, "Failed to load recordings"),
        }
    }

    fn open_recordings_folder(&self) -> AppResult<()> {
        let dir = self.controller.output_dir();
        open::that(dir)?;
        info!(dir = ?dir, "Opened recordings folder");
        Ok(())
    }

    fn check_playback_finished(&mut self) {
        if self.tray_state == TrayIconState::Playing && !self.controller.is_playing() {
            self.controller.stop_playback();
            self.render(TrayIconState::Idle);
            debug!("Playback finished");
        }
    }

    fn shutdown(&mut self) {
        match self.controller.shutdown() {
            Ok(Some(stopped)) => info!(path = ?stopped.path, "Recording saved on exit"),
            Ok(None) => {}
            Err(e) => error!(error = ?e, "Failed to finalize recording on exit"),
        }
        self.send_tray(TrayCommand::Shutdown);
    }

    fn render(&mut self, state: TrayIconState) {
        self.tray_state = state;
        let can_play = self.controller.last_recording().is_some();
        self.send_tray(TrayCommand::SetState { state, can_play });
    }

    fn send_tray(&self, cmd: TrayCommand) {
        if self.tray_proxy.send_event(cmd).is_err() {
            warn!("Tray event loop closed, dropping update");
        }
    }
}
