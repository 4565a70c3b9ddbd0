//! Display mode definitions.

use serde::{Deserialize, Serialize};

/// The visual presentation of the light screen.
///
/// Exactly one mode is active per controller. Switching modes recreates the
/// controller rather than changing it in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Glowing bulb button.
    #[default]
    Normal,
    /// Fullscreen black with a fading toggle hint.
    Blackout,
    /// Camera preview overlay.
    Viewfinder,
    /// Toggle-switch widget.
    LightSwitch,
}

/// Identifier meaning "no mode", as carried by a cold launch.
pub const NO_MODE_ID: i32 = 0;

impl Mode {
    /// Every mode, in the order offered by the mode dialog.
    pub const ALL: [Mode; 4] = [
        Mode::Normal,
        Mode::Blackout,
        Mode::Viewfinder,
        Mode::LightSwitch,
    ];

    /// Stable integer identifier used for navigation and persistence.
    pub fn id(self) -> i32 {
        match self {
            Mode::Normal => 1,
            Mode::Blackout => 2,
            Mode::Viewfinder => 3,
            Mode::LightSwitch => 4,
        }
    }

    /// Look up a mode by identifier.
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.id() == id)
    }

    /// Look up a mode by identifier, falling back to [`Mode::Normal`] for
    /// `0` and unknown values.
    pub fn from_id_or_default(id: i32) -> Self {
        Self::from_id(id).unwrap_or_default()
    }

    /// Human readable label for menus.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "Light bulb",
            Mode::Blackout => "Blackout",
            Mode::Viewfinder => "Viewfinder",
            Mode::LightSwitch => "Light switch",
        }
    }

    /// The UI binding for this mode.
    pub fn binding(self) -> ModeBinding {
        match self {
            Mode::Normal => ModeBinding {
                layout: "main",
                widget: Widget::Bulb,
                transition: TransitionKind::CrossFade,
                immersive: false,
                viewfinder: false,
            },
            Mode::Blackout => ModeBinding {
                layout: "black",
                widget: Widget::ToggleHint,
                transition: TransitionKind::None,
                immersive: true,
                viewfinder: false,
            },
            Mode::Viewfinder => ModeBinding {
                layout: "viewfinder",
                widget: Widget::Bulb,
                transition: TransitionKind::CrossFade,
                immersive: true,
                viewfinder: true,
            },
            Mode::LightSwitch => ModeBinding {
                layout: "switch",
                widget: Widget::Switch,
                transition: TransitionKind::Switch,
                immersive: false,
                viewfinder: false,
            },
        }
    }

    /// Modes shown by the options menu: every mode except the current one.
    pub fn menu_choices(self) -> Vec<Mode> {
        Self::ALL.into_iter().filter(|&mode| mode != self).collect()
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The widget a mode toggles the light with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    /// Bulb image button with a cross-fading drawable.
    Bulb,
    /// Invisible fullscreen button with a hint that fades out.
    ToggleHint,
    /// Two-state switch.
    Switch,
}

/// How a mode animates the light turning on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Cross-fade between the off and on drawables.
    CrossFade,
    /// Check or uncheck the switch.
    Switch,
    /// Nothing to animate.
    None,
}

/// Mode to layout/widget table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeBinding {
    /// Layout name bound by the host.
    pub layout: &'static str,
    /// Widget used to toggle the light.
    pub widget: Widget,
    /// Transition played on toggle.
    pub transition: TransitionKind,
    /// Whether chrome is hidden when the screen is created.
    pub immersive: bool,
    /// Whether the torch surface shows the camera preview.
    pub viewfinder: bool,
}

/// Result of the mode selector (options menu or dialog).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSelection {
    /// The user picked a mode.
    Chosen(Mode),
    /// The selector closed without a choice.
    Cancelled,
}
