//! Example: Toggle the torch LED on and off.
//!
//! Run with: `cargo run --example toggle_torch`

use searchlight_core::{
    ChromeLayer, JsonPreferenceStore, LightConfig, LightController, LightError, Mode, ModeBinding,
    ScreenHost, SysfsTorch, Transition,
};
use std::sync::mpsc;

/// Prints what a window would show.
struct ConsoleHost;

impl ScreenHost for ConsoleHost {
    fn bind_layout(&mut self, mode: Mode, binding: ModeBinding) {
        println!("Layout: {} ({})", binding.layout, mode);
    }

    fn play_transition(&mut self, transition: Transition) {
        println!("Transition: {:?}", transition);
    }

    fn show_chrome(&mut self) {}

    fn hide_chrome(&mut self, _layer: ChromeLayer) {}

    fn fade_out_hint(&mut self) {}

    fn show_camera_unavailable(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn restart_with(&mut self, mode: Mode) {
        println!("Restart requested in {} mode", mode);
    }

    fn finish(&mut self) {
        println!("Finished");
    }
}

fn main() -> Result<(), LightError> {
    // Initialize logging (optional)
    env_logger::init();

    let config = LightConfig::load()?;

    // Open the LED
    let torch = SysfsTorch::open(&config.led_class_dir, config.led_name.as_deref())?;
    println!("Using LED at {}", torch.led_dir().display());

    let store = JsonPreferenceStore::new(&config.prefs_dir, &config.screen);
    let (chrome_tx, _chrome_rx) = mpsc::channel();
    let mut controller = LightController::new(torch, store, ConsoleHost, &config, chrome_tx);

    // Acquiring the LED turns it on
    let mode = controller.initialize(None);
    println!("Mode: {}, light on: {}", mode, controller.is_on());

    if controller.state().dialog_shown {
        controller.acknowledge_camera_unavailable();
        return Ok(());
    }

    // Toggle the light
    controller.toggle();
    println!("Toggled, light on: {}", controller.is_on());

    controller.on_foreground_lost();
    controller.on_screen_stopping();
    Ok(())
}
