//! Linux LED class torch backend.
//!
//! Drives a flash LED through `/sys/class/leds/<name>/brightness`. The
//! "camera" is considered acquired once the LED's `max_brightness` has been
//! read and its `brightness` file opened for writing.

use crate::error::{LightError, Result};
use crate::torch::{AcquireTicket, Acquisition, TorchSurface};

use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Default location of the LED class.
pub const LED_CLASS_DIR: &str = "/sys/class/leds";

const NAME_HINTS: [&str; 2] = ["torch", "flash"];

/// Torch surface backed by a sysfs LED.
#[derive(Debug)]
pub struct SysfsTorch {
    led_dir: PathBuf,
    max_brightness: u32,
    acquired: bool,
    lit: bool,
    viewfinder: bool,
}

impl SysfsTorch {
    /// Use the LED at `led_dir` (e.g. `/sys/class/leds/led:torch_0`).
    pub fn new(led_dir: impl Into<PathBuf>) -> Self {
        Self {
            led_dir: led_dir.into(),
            max_brightness: 0,
            acquired: false,
            lit: false,
            viewfinder: false,
        }
    }

    /// Find the first LED under `class_dir` whose name mentions a torch or flash.
    ///
    /// # Errors
    ///
    /// - [`LightError::LedNotFound`] if no matching LED exists
    /// - [`LightError::Io`] if the directory can't be listed
    pub fn discover(class_dir: impl AsRef<Path>) -> Result<Self> {
        let class_dir = class_dir.as_ref();
        let mut names: Vec<String> = fs::read_dir(class_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| {
                let lower = name.to_lowercase();
                NAME_HINTS.iter().any(|hint| lower.contains(hint))
            })
            .collect();
        names.sort();

        match names.first() {
            Some(name) => {
                info!("using torch LED {}", name);
                Ok(Self::new(class_dir.join(name)))
            }
            None => Err(LightError::LedNotFound(class_dir.to_path_buf())),
        }
    }

    /// Open the named LED, or discover one when `name` is `None`.
    pub fn open(class_dir: impl AsRef<Path>, name: Option<&str>) -> Result<Self> {
        let class_dir = class_dir.as_ref();
        match name {
            Some(name) => {
                let led_dir = class_dir.join(name);
                if !led_dir.exists() {
                    return Err(LightError::LedNotFound(led_dir));
                }
                Ok(Self::new(led_dir))
            }
            None => Self::discover(class_dir),
        }
    }

    /// The LED directory in use.
    pub fn led_dir(&self) -> &Path {
        &self.led_dir
    }

    /// Whether the viewfinder preview was requested.
    pub fn is_viewfinder(&self) -> bool {
        self.viewfinder
    }

    fn read_max_brightness(&self) -> Result<u32> {
        let path = self.led_dir.join("max_brightness");
        let raw = fs::read_to_string(&path)?;
        let trimmed = raw.trim();
        match trimmed.parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(LightError::InvalidBrightness {
                path,
                value: trimmed.to_string(),
            }),
        }
    }

    fn write_brightness(&self, value: u32) -> Result<()> {
        let path = self.led_dir.join("brightness");
        fs::write(&path, value.to_string())?;
        debug!("wrote brightness {} to {}", value, path.display());
        Ok(())
    }

    fn probe(&mut self) -> Result<()> {
        self.max_brightness = self.read_max_brightness()?;
        OpenOptions::new()
            .write(true)
            .open(self.led_dir.join("brightness"))?;
        Ok(())
    }
}

impl TorchSurface for SysfsTorch {
    fn init_camera(&mut self, ticket: AcquireTicket) -> Acquisition {
        match self.probe() {
            Ok(()) => {
                self.acquired = true;
                debug!(
                    "acquired {} (ticket {}, max brightness {})",
                    self.led_dir.display(),
                    ticket.get(),
                    self.max_brightness
                );
                Acquisition::Ready
            }
            Err(e) => {
                warn!("torch LED {} unavailable: {}", self.led_dir.display(), e);
                Acquisition::Unavailable
            }
        }
    }

    fn release_camera(&mut self) {
        if self.lit {
            if let Err(e) = self.write_brightness(0) {
                warn!("failed to darken LED on release: {}", e);
            }
            self.lit = false;
        }
        self.acquired = false;
    }

    fn start_preview(&mut self) {
        // An LED has no preview stream.
        debug!("preview restart requested (viewfinder={})", self.viewfinder);
    }

    fn light_on(&mut self) -> Result<()> {
        if !self.acquired {
            return Err(LightError::CameraNotAcquired);
        }
        self.write_brightness(self.max_brightness)?;
        self.lit = true;
        Ok(())
    }

    fn light_off(&mut self) -> Result<()> {
        if !self.acquired {
            return Err(LightError::CameraNotAcquired);
        }
        self.write_brightness(0)?;
        self.lit = false;
        Ok(())
    }

    fn set_viewfinder(&mut self, enabled: bool) {
        self.viewfinder = enabled;
    }

    fn is_lit(&self) -> bool {
        self.lit
    }
}
