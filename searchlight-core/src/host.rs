//! Screen-level effects requested by the controller.

use crate::modes::{Mode, ModeBinding};

use std::time::Duration;

/// A visual transition played when the light changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Cross-fade towards the lit drawable (`forward`) or back to the dark one.
    CrossFade {
        /// `true` when fading to the lit image.
        forward: bool,
        /// Fade duration.
        duration: Duration,
    },
    /// Move the switch widget.
    Switch {
        /// New checked state.
        checked: bool,
    },
}

/// One of the two chrome elements hidden in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeLayer {
    /// Status bar and system bar, hidden last.
    Primary,
    /// Action bar, hidden first.
    Secondary,
}

/// The window hosting the light screen.
///
/// Implemented by the front-end; [`MockHost`](crate::MockHost) records calls for tests.
pub trait ScreenHost {
    /// Inflate the layout for `mode`.
    fn bind_layout(&mut self, mode: Mode, binding: ModeBinding);

    /// Animate the light widget.
    fn play_transition(&mut self, transition: Transition);

    /// Show all chrome.
    fn show_chrome(&mut self);

    /// Hide one chrome layer.
    fn hide_chrome(&mut self, layer: ChromeLayer);

    /// Fade out the blackout toggle hint.
    fn fade_out_hint(&mut self);

    /// Show the blocking camera-unavailable dialog.
    fn show_camera_unavailable(&mut self, message: &str);

    /// Replace this screen with a fresh one in `mode`.
    fn restart_with(&mut self, mode: Mode);

    /// Close the screen.
    fn finish(&mut self);
}
