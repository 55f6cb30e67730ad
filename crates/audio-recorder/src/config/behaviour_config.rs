use crate::config::{DEFAULT_NOTIFICATIONS, default_notifications};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether to show desktop notifications on record and playback.
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            notifications: DEFAULT_NOTIFICATIONS,
        }
    }
}
