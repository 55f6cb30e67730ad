/// Tray icon states corresponding to application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready to start recording.
    Idle,
    /// Currently recording audio.
    Recording,
    /// Playing a recording back.
    Playing,
}

/// Which menu controls are enabled, the tray counterpart of showing and
/// hiding the record, stop and play buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlVisibility {
    /// "Start Recording" item.
    pub start: bool,
    /// "Stop Recording" item.
    pub stop: bool,
    /// "Play Last Recording" item.
    pub play: bool,
    /// "Recordings" submenu.
    pub recordings: bool,
}

impl ControlVisibility {
    /// Controls for `state`. Play needs a recording from this session.
    pub fn for_state(state: TrayIconState, can_play: bool) -> Self {
        match state {
            TrayIconState::Recording => Self {
                start: false,
                stop: true,
                play: false,
                recordings: false,
            },
            TrayIconState::Idle | TrayIconState::Playing => Self {
                start: true,
                stop: false,
                play: can_play,
                recordings: true,
            },
        }
    }
}

impl TrayIconState {
    /// Tooltip shown while in this state.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayIconState::Idle => "Audio Recorder - Ready",
            TrayIconState::Recording => "Audio Recorder - Recording...",
            TrayIconState::Playing => "Audio Recorder - Playing...",
        }
    }

    /// RGBA fill of the generated icon.
    pub(crate) fn icon_color(self) -> [u8; 4] {
        match self {
            TrayIconState::Idle => [128, 128, 128, 255],
            TrayIconState::Recording => [220, 40, 40, 255],
            TrayIconState::Playing => [40, 170, 80, 255],
        }
    }
}
