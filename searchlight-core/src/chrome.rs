//! Delayed chrome hiding.
//!
//! Some platforms animate chrome away more smoothly when the action bar and
//! the status bar are hidden one after the other. The scheduler runs the two
//! one-shot delays on a background thread and posts a [`ChromeEvent`] per
//! stage; the UI thread feeds them back into
//! [`LightController::on_chrome_event`](crate::LightController::on_chrome_event).

use crate::host::ChromeLayer;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

// Shared by all schedulers so events from one screen never match another's.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// How chrome is hidden on this platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromeStyle {
    /// Hide both layers at once.
    Immediate,
    /// Hide the secondary layer after a delay, then the primary one.
    #[default]
    Delayed,
    /// The platform manages the transition; hide at once and never schedule timers.
    Platform,
}

/// Delays of the two hide stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeTimings {
    /// Delay before the secondary layer is hidden.
    pub secondary: Duration,
    /// Further delay before the primary layer is hidden.
    pub primary: Duration,
}

impl Default for ChromeTimings {
    fn default() -> Self {
        Self {
            secondary: Duration::from_millis(2500),
            primary: Duration::from_millis(200),
        }
    }
}

/// A hide stage that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeEvent {
    /// Schedule this stage belongs to, unique within the process.
    pub generation: u64,
    /// Layer to hide.
    pub layer: ChromeLayer,
}

/// Runs delayed hide sequences, at most one at a time.
#[derive(Debug)]
pub struct ChromeScheduler {
    events: mpsc::Sender<ChromeEvent>,
    timings: ChromeTimings,
    generation: u64,
    // Dropping the sender wakes the timer thread and cancels it.
    cancel: Option<mpsc::Sender<()>>,
}

impl ChromeScheduler {
    /// Create a scheduler posting stages to `events`.
    pub fn new(events: mpsc::Sender<ChromeEvent>, timings: ChromeTimings) -> Self {
        Self {
            events,
            timings,
            generation: 0,
            cancel: None,
        }
    }

    /// Start a two-stage hide, superseding any pending one.
    ///
    /// Returns the generation of the new schedule.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the timer thread could not be started.
    pub fn schedule_hide(&mut self) -> std::io::Result<u64> {
        self.cancel();
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let events = self.events.clone();
        let stages = [
            (self.timings.secondary, ChromeLayer::Secondary),
            (self.timings.primary, ChromeLayer::Primary),
        ];

        thread::Builder::new()
            .name("chrome-hide".to_string())
            .spawn(move || {
                for (delay, layer) in stages {
                    match cancel_rx.recv_timeout(delay) {
                        Err(RecvTimeoutError::Timeout) => {
                            if events.send(ChromeEvent { generation, layer }).is_err() {
                                debug!("chrome hide {}: receiver gone", generation);
                                return;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                            debug!("chrome hide {} cancelled", generation);
                            return;
                        }
                    }
                }
            })?;

        self.generation = generation;
        self.cancel = Some(cancel_tx);
        debug!("scheduled chrome hide {}", generation);
        Ok(generation)
    }

    /// Cancel the pending schedule. Stages already posted become stale.
    pub fn cancel(&mut self) {
        if self.cancel.take().is_some() {
            debug!("cancelling chrome hide {}", self.generation);
        }
    }

    /// Whether `generation` is the live schedule.
    pub fn is_current(&self, generation: u64) -> bool {
        self.cancel.is_some() && generation == self.generation
    }

    /// Mark the live schedule as complete.
    pub fn complete(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.cancel = None;
        } else {
            warn!("completing stale chrome hide {}", generation);
        }
    }
}

impl Drop for ChromeScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
