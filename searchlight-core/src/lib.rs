//! Torch controller for the SearchLight flashlight.
//!
//! This crate holds the state machine behind a flashlight screen: it toggles
//! a camera flash LED, presents one of four display modes and remembers the
//! last-used mode across restarts.
//!
//! # Collaborators
//!
//! The controller talks to the outside world through three traits:
//!
//! - [`TorchSurface`] - the camera handle whose LED is the light
//!   ([`SysfsTorch`] drives a Linux LED class device)
//! - [`ModePreferenceStore`] - persistence of the last-used mode
//!   ([`JsonPreferenceStore`] keeps it in a JSON file)
//! - [`ScreenHost`] - layouts, transitions, chrome and dialogs
//!
//! # Example
//!
//! ```no_run
//! use searchlight_core::{
//!     JsonPreferenceStore, LightConfig, LightController, MockHost, SysfsTorch,
//! };
//! use std::sync::mpsc;
//!
//! fn main() -> Result<(), searchlight_core::LightError> {
//!     let config = LightConfig::load()?;
//!     let torch = SysfsTorch::open(&config.led_class_dir, config.led_name.as_deref())?;
//!     let store = JsonPreferenceStore::new(&config.prefs_dir, &config.screen);
//!     let (chrome_tx, _chrome_rx) = mpsc::channel();
//!
//!     let mut controller = LightController::new(torch, store, MockHost::new(), &config, chrome_tx);
//!
//!     // Resolve the mode from the stored preference; the LED lights once acquired
//!     let mode = controller.initialize(None);
//!     println!("running in {mode} mode, light on: {}", controller.is_on());
//!
//!     // Leaving the screen turns the light off and remembers the mode
//!     controller.on_foreground_lost();
//!     controller.on_screen_stopping();
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockTorch`], [`MockHost`] and [`MemoryPreferenceStore`] to test code
//! without hardware:
//!
//! ```
//! use searchlight_core::{
//!     LightConfig, LightController, MemoryPreferenceStore, MockHost, MockTorch, Mode,
//! };
//! use std::sync::mpsc;
//!
//! let (chrome_tx, _chrome_rx) = mpsc::channel();
//! let mut controller = LightController::new(
//!     MockTorch::ready(),
//!     MemoryPreferenceStore::with_mode(Mode::LightSwitch.id()),
//!     MockHost::new(),
//!     &LightConfig::default(),
//!     chrome_tx,
//! );
//! assert_eq!(controller.initialize(None), Mode::LightSwitch);
//! assert!(controller.is_on());
//! ```

#![warn(missing_docs)]

mod chrome;
mod config;
mod controller;
mod error;
mod host;
mod mock;
mod modes;
mod prefs;
mod state;
mod sysfs;
mod torch;

// Re-export public API
pub use chrome::{ChromeEvent, ChromeScheduler, ChromeStyle, ChromeTimings};
pub use config::{CONFIG_ENV, LightConfig};
pub use controller::LightController;
pub use error::{CAMERA_UNAVAILABLE_MESSAGE, LightError, Result};
pub use host::{ChromeLayer, ScreenHost, Transition};
pub use mock::{HostEffect, MemoryPreferenceStore, MockHost, MockTorch, TorchCall};
pub use modes::{Mode, ModeBinding, ModeSelection, NO_MODE_ID, TransitionKind, Widget};
pub use prefs::{JsonPreferenceStore, MODE_KEY, ModePreferenceStore};
pub use state::{ControllerState, LightState};
pub use sysfs::{LED_CLASS_DIR, SysfsTorch};
pub use torch::{AcquireTicket, Acquisition, TorchSurface};
