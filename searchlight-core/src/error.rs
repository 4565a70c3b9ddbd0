//! Error types for the torch controller.

use std::path::PathBuf;

/// Errors that can occur in the torch backends, preference store and configuration.
#[derive(Debug, thiserror::Error)]
pub enum LightError {
    /// No usable torch LED was found under the sysfs LED class.
    #[error("No torch LED found under {0}")]
    LedNotFound(PathBuf),

    /// The LED reported a brightness value that could not be parsed.
    #[error("Invalid brightness value {value:?} in {path}")]
    InvalidBrightness {
        /// The file the value was read from.
        path: PathBuf,
        /// The raw contents.
        value: String,
    },

    /// The torch was driven before the camera was acquired.
    #[error("Camera not acquired")]
    CameraNotAcquired,

    /// A configuration value was rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred (e.g., writing the LED or the preference file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The preference or configuration file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for torch controller operations.
pub type Result<T> = std::result::Result<T, LightError>;

/// Message shown in the acknowledgement dialog when the torch can't be acquired.
pub const CAMERA_UNAVAILABLE_MESSAGE: &str =
    "The camera is not available. Another application may be using it.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = LightError::LedNotFound(PathBuf::from("/sys/class/leds"));
        assert_eq!(error.to_string(), "No torch LED found under /sys/class/leds");

        let error = LightError::InvalidBrightness {
            path: PathBuf::from("max_brightness"),
            value: "abc".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid brightness value \"abc\" in max_brightness"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: LightError = io_error.into();
        assert!(matches!(error, LightError::Io(_)));
    }
}
