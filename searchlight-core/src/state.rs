//! Controller state snapshot.

use crate::modes::Mode;

/// Whether the light is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightState {
    /// Torch lit.
    On,
    /// Torch dark.
    #[default]
    Off,
}

impl LightState {
    /// Whether this is [`LightState::On`].
    pub fn is_on(self) -> bool {
        self == LightState::On
    }
}

impl From<bool> for LightState {
    fn from(on: bool) -> Self {
        if on { LightState::On } else { LightState::Off }
    }
}

/// A snapshot of the controller's current state.
///
/// Use [`LightController::state`](crate::LightController::state) to obtain a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// The mode this controller was created for.
    pub mode: Mode,
    /// Whether the light is on.
    pub light: LightState,
    /// Set when the screen lost the foreground; cleared once the preview restarts.
    pub paused: bool,
    /// Suppresses the next blackout hint fade (set when a selector closes).
    pub skip_animate: bool,
    /// Touch input is ignored while a delayed chrome hide is pending.
    pub ignore_touch: bool,
    /// Whether the chrome is currently visible.
    pub chrome_visible: bool,
    /// Whether a camera acquisition is outstanding.
    pub acquiring: bool,
    /// The camera-unavailable dialog is showing.
    pub dialog_shown: bool,
    /// The screen has finished or is restarting; further input is ignored.
    pub finished: bool,
}
