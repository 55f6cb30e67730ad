//! Transient desktop notifications for record and playback events.

use notify_rust::{Notification, Timeout};
use tracing::{debug, instrument, warn};

/// Application name shown as the notification title.
pub(crate) const APP_NAME: &str = "Audio Recorder";

/// How long a notification stays on screen.
const NOTIFICATION_TIMEOUT_MS: u32 = 2_000;

/// Shows short-lived notifications when enabled in config.
#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    /// Create a notifier. A disabled notifier drops every message.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Show `body` without blocking the caller.
    ///
    /// Must be called from within the tokio runtime. Failures are logged;
    /// a missing notification daemon never fails the user's action.
    #[instrument(skip(self))]
    pub fn notify(&self, body: &str) {
        if !self.enabled {
            debug!("Notifications disabled, skipping");
            return;
        }

        let body = body.to_string();

        // Showing a notification can block on the session bus.
        tokio::task::spawn_blocking(move || {
            let result = Notification::new()
                .appname(APP_NAME)
                .summary(APP_NAME)
                .body(&body)
                .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS))
                .show();

            if let Err(e) = result {
                warn!(error = %e, "Failed to show notification");
            }
        });
    }
}
