//! Mock collaborators for testing.

use crate::error::{LightError, Result};
use crate::host::{ChromeLayer, ScreenHost, Transition};
use crate::modes::{Mode, ModeBinding};
use crate::prefs::ModePreferenceStore;
use crate::torch::{AcquireTicket, Acquisition, TorchSurface};

use std::sync::{Arc, Mutex};

/// A call made on a [`MockTorch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorchCall {
    /// `init_camera` with its ticket.
    InitCamera(AcquireTicket),
    /// `release_camera`.
    ReleaseCamera,
    /// `start_preview`.
    StartPreview,
    /// `light_on`.
    LightOn,
    /// `light_off`.
    LightOff,
    /// `set_viewfinder`.
    SetViewfinder(bool),
}

/// A mock torch surface for testing.
///
/// This allows testing code that depends on [`TorchSurface`] without a
/// camera or LED. Every call is recorded.
///
/// # Example
///
/// ```
/// use searchlight_core::{MockTorch, TorchCall, TorchSurface};
///
/// let mut torch = MockTorch::new();
/// torch.light_on().unwrap();
/// assert!(torch.is_lit());
/// assert_eq!(torch.count(&TorchCall::LightOn), 1);
/// ```
#[derive(Debug)]
pub struct MockTorch {
    answer: Acquisition,
    lit: bool,
    calls: Arc<Mutex<Vec<TorchCall>>>,
}

impl MockTorch {
    /// A torch whose acquisitions stay pending until reported.
    pub fn new() -> Self {
        Self::answering(Acquisition::Pending)
    }

    /// A torch that is ready as soon as it is acquired.
    pub fn ready() -> Self {
        Self::answering(Acquisition::Ready)
    }

    /// A torch that can never be acquired.
    pub fn unavailable() -> Self {
        Self::answering(Acquisition::Unavailable)
    }

    /// A torch answering every acquisition with `answer`.
    pub fn answering(answer: Acquisition) -> Self {
        Self {
            answer,
            lit: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Change the answer for later acquisitions.
    pub fn set_answer(&mut self, answer: Acquisition) {
        self.answer = answer;
    }

    /// Recorded calls, oldest first.
    pub fn calls(&self) -> Vec<TorchCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The call log, readable after the torch has been moved or dropped.
    pub fn shared_log(&self) -> Arc<Mutex<Vec<TorchCall>>> {
        Arc::clone(&self.calls)
    }

    /// How many times `call` was made.
    pub fn count(&self, call: &TorchCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    /// How many acquisitions were started.
    pub fn init_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, TorchCall::InitCamera(_)))
            .count()
    }

    /// Ticket of the latest acquisition.
    pub fn last_ticket(&self) -> Option<AcquireTicket> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|c| match c {
                TorchCall::InitCamera(ticket) => Some(*ticket),
                _ => None,
            })
    }

    fn record(&self, call: TorchCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockTorch {
    fn default() -> Self {
        Self::new()
    }
}

impl TorchSurface for MockTorch {
    fn init_camera(&mut self, ticket: AcquireTicket) -> Acquisition {
        self.record(TorchCall::InitCamera(ticket));
        self.answer
    }

    fn release_camera(&mut self) {
        self.record(TorchCall::ReleaseCamera);
        self.lit = false;
    }

    fn start_preview(&mut self) {
        self.record(TorchCall::StartPreview);
    }

    fn light_on(&mut self) -> Result<()> {
        self.record(TorchCall::LightOn);
        self.lit = true;
        Ok(())
    }

    fn light_off(&mut self) -> Result<()> {
        self.record(TorchCall::LightOff);
        self.lit = false;
        Ok(())
    }

    fn set_viewfinder(&mut self, enabled: bool) {
        self.record(TorchCall::SetViewfinder(enabled));
    }

    fn is_lit(&self) -> bool {
        self.lit
    }
}

/// An effect requested from a [`MockHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEffect {
    /// `bind_layout`.
    BindLayout(Mode),
    /// `play_transition`.
    Transition(Transition),
    /// `show_chrome`.
    ShowChrome,
    /// `hide_chrome`.
    HideChrome(ChromeLayer),
    /// `fade_out_hint`.
    FadeOutHint,
    /// `show_camera_unavailable`.
    ShowCameraUnavailable,
    /// `restart_with`.
    RestartWith(Mode),
    /// `finish`.
    Finish,
}

/// A screen host that records requested effects.
#[derive(Debug, Default)]
pub struct MockHost {
    effects: Vec<HostEffect>,
    dialog_message: Option<String>,
}

impl MockHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded effects, oldest first.
    pub fn effects(&self) -> &[HostEffect] {
        &self.effects
    }

    /// How many times `effect` was requested.
    pub fn count(&self, effect: &HostEffect) -> usize {
        self.effects.iter().filter(|e| *e == effect).count()
    }

    /// The latest transition played.
    pub fn last_transition(&self) -> Option<Transition> {
        self.effects.iter().rev().find_map(|e| match e {
            HostEffect::Transition(transition) => Some(*transition),
            _ => None,
        })
    }

    /// Modes the screen asked to restart with.
    pub fn restarts(&self) -> Vec<Mode> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                HostEffect::RestartWith(mode) => Some(*mode),
                _ => None,
            })
            .collect()
    }

    /// Message of the camera-unavailable dialog, if shown.
    pub fn dialog_message(&self) -> Option<&str> {
        self.dialog_message.as_deref()
    }
}

impl ScreenHost for MockHost {
    fn bind_layout(&mut self, mode: Mode, _binding: ModeBinding) {
        self.effects.push(HostEffect::BindLayout(mode));
    }

    fn play_transition(&mut self, transition: Transition) {
        self.effects.push(HostEffect::Transition(transition));
    }

    fn show_chrome(&mut self) {
        self.effects.push(HostEffect::ShowChrome);
    }

    fn hide_chrome(&mut self, layer: ChromeLayer) {
        self.effects.push(HostEffect::HideChrome(layer));
    }

    fn fade_out_hint(&mut self) {
        self.effects.push(HostEffect::FadeOutHint);
    }

    fn show_camera_unavailable(&mut self, message: &str) {
        self.dialog_message = Some(message.to_string());
        self.effects.push(HostEffect::ShowCameraUnavailable);
    }

    fn restart_with(&mut self, mode: Mode) {
        self.effects.push(HostEffect::RestartWith(mode));
    }

    fn finish(&mut self) {
        self.effects.push(HostEffect::Finish);
    }
}

/// In-memory preference store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    value: Option<i32>,
    failing: bool,
}

impl MemoryPreferenceStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `mode_id`.
    pub fn with_mode(mode_id: i32) -> Self {
        Self {
            value: Some(mode_id),
            failing: false,
        }
    }

    /// A store whose reads and writes always fail.
    pub fn failing() -> Self {
        Self {
            value: None,
            failing: true,
        }
    }

    /// The stored identifier.
    pub fn stored(&self) -> Option<i32> {
        self.value
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(LightError::Io(std::io::Error::other("preference store offline")));
        }
        Ok(())
    }
}

impl ModePreferenceStore for MemoryPreferenceStore {
    fn read_mode(&self) -> Result<Option<i32>> {
        self.check()?;
        Ok(self.value)
    }

    fn write_mode(&mut self, mode_id: i32) -> Result<()> {
        self.check()?;
        self.value = Some(mode_id);
        Ok(())
    }
}
