//! Tracing setup: human-readable stdout plus a JSON daily log file.

use crate::config::project_dirs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub(crate) const DEFAULT_LOG_FILTER: &str = "audio_recorder=debug,audio_recorder_core=debug";

const LOG_FILE_PREFIX: &str = "audio-recorder.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live for the
/// whole process. `None` when no data directory is available, in which case
/// only stdout logging is installed.
pub(crate) fn init() -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (file_layer, guard) = match project_dirs() {
        Some(dirs) => {
            let appender =
                tracing_appender::rolling::daily(dirs.data_local_dir().join("logs"), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}
