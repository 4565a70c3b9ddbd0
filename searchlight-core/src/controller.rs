//! Light controller implementation.

use crate::chrome::{ChromeEvent, ChromeScheduler, ChromeStyle};
use crate::config::LightConfig;
use crate::error::CAMERA_UNAVAILABLE_MESSAGE;
use crate::host::{ChromeLayer, ScreenHost, Transition};
use crate::modes::{Mode, ModeSelection, TransitionKind, Widget};
use crate::prefs::ModePreferenceStore;
use crate::state::{ControllerState, LightState};
use crate::torch::{AcquireTicket, Acquisition, TorchSurface};

use log::{debug, info, trace, warn};
use std::sync::mpsc;
use std::time::Duration;

/// The light controller.
///
/// Owns the on/off state and the mode of one light screen, and keeps the
/// torch, the mode widget and the persisted preference consistent as
/// lifecycle and input events arrive. All methods run on the UI thread.
///
/// # Example
///
/// ```
/// use searchlight_core::{
///     LightConfig, LightController, MemoryPreferenceStore, MockHost, MockTorch, Mode,
/// };
/// use std::sync::mpsc;
///
/// let (chrome_tx, _chrome_rx) = mpsc::channel();
/// let mut controller = LightController::new(
///     MockTorch::new(),
///     MemoryPreferenceStore::new(),
///     MockHost::new(),
///     &LightConfig::default(),
///     chrome_tx,
/// );
///
/// assert_eq!(controller.initialize(None), Mode::Normal);
/// controller.toggle();
/// assert!(controller.is_on());
/// ```
///
/// # Lifecycle
///
/// A mode switch never changes a controller in place: [`select_mode`](Self::select_mode)
/// asks the host to build a fresh controller for the new mode. The camera is
/// acquired in [`initialize`](Self::initialize) and after a foreground loss,
/// and released on foreground loss, mode switch and teardown.
pub struct LightController<T: TorchSurface, P: ModePreferenceStore, H: ScreenHost> {
    torch: T,
    store: P,
    host: H,
    chrome: ChromeScheduler,
    chrome_style: ChromeStyle,
    fade_in: Duration,
    fade_out: Duration,
    torch_on_when_ready: bool,
    state: ControllerState,
    initialized: bool,
    camera_held: bool,
    next_ticket: u64,
    pending: Option<AcquireTicket>,
}

impl<T: TorchSurface, P: ModePreferenceStore, H: ScreenHost> LightController<T, P, H> {
    /// Create a controller. Delayed chrome stages are posted to `chrome_events`.
    pub fn new(
        torch: T,
        store: P,
        host: H,
        config: &LightConfig,
        chrome_events: mpsc::Sender<ChromeEvent>,
    ) -> Self {
        Self {
            torch,
            store,
            host,
            chrome: ChromeScheduler::new(chrome_events, config.chrome_timings()),
            chrome_style: config.chrome_style,
            fade_in: Duration::from_millis(config.fade_in_ms),
            fade_out: Duration::from_millis(config.fade_out_ms),
            torch_on_when_ready: config.torch_on_when_ready,
            state: ControllerState {
                chrome_visible: true,
                ..Default::default()
            },
            initialized: false,
            camera_held: false,
            next_ticket: 0,
            pending: None,
        }
    }

    /// Resolve the mode and set the screen up for it.
    ///
    /// A requested mode (the navigation parameter) wins; otherwise the stored
    /// preference is used. Missing, unreadable or unknown preferences resolve
    /// to [`Mode::Normal`]. Binds the layout, hides chrome for immersive
    /// modes and starts acquiring the camera.
    pub fn initialize(&mut self, requested: Option<Mode>) -> Mode {
        if self.initialized {
            warn!("controller already initialized in {:?}", self.state.mode);
            return self.state.mode;
        }
        self.initialized = true;

        let mode = match requested {
            Some(mode) => mode,
            None => self.stored_mode(),
        };
        self.state.mode = mode;

        let binding = mode.binding();
        self.host.bind_layout(mode, binding);
        self.torch.set_viewfinder(binding.viewfinder);
        if binding.immersive {
            self.hide_chrome();
        }
        info!("light screen created in {:?} mode", mode);

        self.acquire_camera();
        mode
    }

    fn stored_mode(&self) -> Mode {
        match self.store.read_mode() {
            Ok(Some(id)) => Mode::from_id(id).unwrap_or_else(|| {
                warn!("unknown stored mode id {}, using Normal", id);
                Mode::Normal
            }),
            Ok(None) => Mode::Normal,
            Err(e) => {
                warn!("failed to read mode preference: {}", e);
                Mode::Normal
            }
        }
    }

    // =========================================================================
    // Light
    // =========================================================================

    /// Flip the light.
    pub fn toggle(&mut self) {
        if !self.accepts_input() {
            debug!("toggle ignored");
            return;
        }
        if self.state.light.is_on() {
            self.turn_off();
        } else {
            self.turn_on();
        }
    }

    fn turn_on(&mut self) {
        if self.state.light.is_on() {
            return;
        }
        self.state.light = LightState::On;
        self.play_transition(true);
        if let Err(e) = self.torch.light_on() {
            warn!("failed to light torch: {}", e);
        }
        debug!("light on");
    }

    fn turn_off(&mut self) {
        if !self.state.light.is_on() {
            return;
        }
        self.state.light = LightState::Off;
        self.play_transition(false);
        if let Err(e) = self.torch.light_off() {
            warn!("failed to darken torch: {}", e);
        }
        debug!("light off");
    }

    fn play_transition(&mut self, on: bool) {
        let transition = match self.state.mode.binding().transition {
            TransitionKind::CrossFade => Transition::CrossFade {
                forward: on,
                duration: if on { self.fade_in } else { self.fade_out },
            },
            TransitionKind::Switch => Transition::Switch { checked: on },
            TransitionKind::None => return,
        };
        self.host.play_transition(transition);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// The screen left the foreground: force the light off and release the camera.
    pub fn on_foreground_lost(&mut self) {
        self.turn_off();
        self.release_camera();
        if self.is_blocked() {
            return;
        }
        self.state.paused = true;
        debug!("paused");
    }

    /// The screen returned to the foreground: re-acquire the camera if it was paused.
    ///
    /// The preview restarts on the next focus gain, see [`on_focus_changed`](Self::on_focus_changed).
    pub fn on_foreground_gained(&mut self) {
        if self.is_blocked() {
            return;
        }
        if self.state.paused {
            self.acquire_camera();
        }
    }

    /// Window focus changed.
    ///
    /// Gaining focus in [`Mode::Blackout`] fades the toggle hint out unless a
    /// mode selector just closed. The first focus gain after a pause restarts
    /// the camera preview.
    pub fn on_focus_changed(&mut self, has_focus: bool) {
        if self.is_blocked() {
            return;
        }
        let hint = self.state.mode.binding().widget == Widget::ToggleHint;
        if has_focus && hint && !self.state.skip_animate {
            self.host.fade_out_hint();
        }
        self.state.skip_animate = false;

        if has_focus && self.state.paused {
            self.torch.start_preview();
            self.state.paused = false;
            debug!("preview restarted");
        }
    }

    /// The screen is stopping: persist the mode. Failures are logged and dropped.
    pub fn on_screen_stopping(&mut self) {
        let id = self.state.mode.id();
        match self.store.write_mode(id) {
            Ok(()) => debug!("persisted mode {:?}", self.state.mode),
            Err(e) => warn!("failed to persist mode {:?}: {}", self.state.mode, e),
        }
    }

    // =========================================================================
    // Camera
    // =========================================================================

    fn acquire_camera(&mut self) {
        self.next_ticket += 1;
        let ticket = AcquireTicket(self.next_ticket);
        self.pending = Some(ticket);
        self.camera_held = true;
        debug!("acquiring camera (ticket {})", ticket.get());

        match self.torch.init_camera(ticket) {
            Acquisition::Ready => self.on_camera_ready(ticket),
            Acquisition::Unavailable => self.on_camera_unavailable(ticket),
            Acquisition::Pending => {}
        }
    }

    fn release_camera(&mut self) {
        self.pending = None;
        if self.camera_held {
            self.torch.release_camera();
            self.camera_held = false;
            debug!("camera released");
        }
    }

    fn take_ticket(&mut self, ticket: AcquireTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            trace!("dropping stale camera outcome (ticket {})", ticket.get());
            false
        }
    }

    /// The camera acquired for `ticket` is ready. Turns the light on.
    pub fn on_camera_ready(&mut self, ticket: AcquireTicket) {
        if !self.take_ticket(ticket) {
            return;
        }
        info!("camera ready");
        if self.torch_on_when_ready {
            self.turn_on();
        }
    }

    /// The camera for `ticket` can't be used.
    ///
    /// Shows the blocking dialog; from here on only
    /// [`acknowledge_camera_unavailable`](Self::acknowledge_camera_unavailable) has an effect.
    pub fn on_camera_unavailable(&mut self, ticket: AcquireTicket) {
        if !self.take_ticket(ticket) || self.is_blocked() {
            return;
        }
        warn!("camera not available");
        self.turn_off();
        self.state.dialog_shown = true;
        self.host.show_camera_unavailable(CAMERA_UNAVAILABLE_MESSAGE);
    }

    /// The user acknowledged the camera-unavailable dialog. Finishes the screen.
    pub fn acknowledge_camera_unavailable(&mut self) {
        if self.state.dialog_shown && !self.state.finished {
            self.finish();
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Modes offered by the options menu.
    pub fn mode_menu(&self) -> Vec<Mode> {
        self.state.mode.menu_choices()
    }

    /// Handle the outcome of a mode selector.
    pub fn on_mode_selection(&mut self, selection: ModeSelection) {
        match selection {
            ModeSelection::Chosen(mode) => {
                self.select_mode(mode);
            }
            ModeSelection::Cancelled => {
                if !self.is_blocked() {
                    self.state.skip_animate = true;
                }
            }
        }
    }

    /// Switch to `mode` by restarting the screen.
    ///
    /// Returns `false` when nothing happened: the mode is already current or
    /// the screen no longer accepts input.
    pub fn select_mode(&mut self, mode: Mode) -> bool {
        if self.is_blocked() {
            return false;
        }
        if mode == self.state.mode {
            debug!("already in {:?} mode", mode);
            return false;
        }

        info!("switching from {:?} to {:?}", self.state.mode, mode);
        self.teardown();
        self.state.finished = true;
        self.host.restart_with(mode);
        true
    }

    /// Back navigation. Returns whether the event was consumed.
    ///
    /// The camera-unavailable dialog can't be dismissed this way.
    pub fn on_back_pressed(&mut self) -> bool {
        if self.state.dialog_shown {
            return true;
        }
        if self.state.finished {
            return false;
        }
        self.finish();
        true
    }

    fn finish(&mut self) {
        self.teardown();
        self.state.finished = true;
        self.host.finish();
        info!("light screen finished");
    }

    /// Release everything the screen holds. Runs on drop as well.
    ///
    /// Late camera outcomes and chrome stages are ignored afterwards.
    pub fn teardown(&mut self) {
        self.turn_off();
        self.release_camera();
        self.chrome.cancel();
        self.state.ignore_touch = false;
    }

    // =========================================================================
    // Touch & chrome
    // =========================================================================

    /// A touch anywhere on the screen. Returns whether it was handled.
    ///
    /// Ignored while a delayed chrome hide is pending. In [`Mode::Blackout`]
    /// the whole screen is the light switch.
    pub fn on_screen_touched(&mut self) -> bool {
        if !self.accepts_input() || self.state.ignore_touch {
            return false;
        }
        if self.state.mode.binding().widget == Widget::ToggleHint {
            self.toggle();
            return true;
        }
        false
    }

    /// Show all chrome. With [`ChromeStyle::Delayed`] it hides itself again.
    pub fn show_chrome(&mut self) {
        if self.is_blocked() {
            return;
        }
        self.host.show_chrome();
        self.state.chrome_visible = true;
        if self.chrome_style == ChromeStyle::Delayed {
            self.schedule_chrome_hide();
        }
    }

    /// Hide all chrome, in stages when the style asks for it.
    pub fn hide_chrome(&mut self) {
        if self.is_blocked() {
            return;
        }
        match self.chrome_style {
            ChromeStyle::Delayed => self.schedule_chrome_hide(),
            ChromeStyle::Immediate | ChromeStyle::Platform => self.hide_chrome_now(),
        }
    }

    fn schedule_chrome_hide(&mut self) {
        match self.chrome.schedule_hide() {
            Ok(_) => self.state.ignore_touch = true,
            Err(e) => {
                warn!("failed to start chrome timer, hiding at once: {}", e);
                self.chrome.cancel();
                self.hide_chrome_now();
            }
        }
    }

    fn hide_chrome_now(&mut self) {
        self.host.hide_chrome(ChromeLayer::Secondary);
        self.host.hide_chrome(ChromeLayer::Primary);
        self.state.chrome_visible = false;
        self.state.ignore_touch = false;
    }

    /// A delayed chrome stage came due.
    pub fn on_chrome_event(&mut self, event: ChromeEvent) {
        if self.state.finished || !self.chrome.is_current(event.generation) {
            trace!("dropping stale chrome event {:?}", event);
            return;
        }
        self.host.hide_chrome(event.layer);
        if event.layer == ChromeLayer::Primary {
            self.chrome.complete(event.generation);
            self.state.chrome_visible = false;
            self.state.ignore_touch = false;
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// A snapshot of the controller state.
    pub fn state(&self) -> ControllerState {
        ControllerState {
            acquiring: self.pending.is_some(),
            ..self.state.clone()
        }
    }

    /// The mode of this screen.
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Whether the light is on.
    pub fn is_on(&self) -> bool {
        self.state.light.is_on()
    }

    /// Whether the camera is held (acquired or being acquired).
    pub fn holds_camera(&self) -> bool {
        self.camera_held
    }

    /// The torch surface.
    pub fn torch(&self) -> &T {
        &self.torch
    }

    /// The preference store.
    pub fn store(&self) -> &P {
        &self.store
    }

    /// The screen host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The screen host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn accepts_input(&self) -> bool {
        !self.is_blocked()
    }

    fn is_blocked(&self) -> bool {
        self.state.finished || self.state.dialog_shown
    }
}

impl<T: TorchSurface, P: ModePreferenceStore, H: ScreenHost> Drop for LightController<T, P, H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{HostEffect, MemoryPreferenceStore, MockHost, MockTorch, TorchCall};

    type TestController = LightController<MockTorch, MemoryPreferenceStore, MockHost>;

    fn controller_with(
        torch: MockTorch,
        store: MemoryPreferenceStore,
        config: LightConfig,
    ) -> (TestController, mpsc::Receiver<ChromeEvent>) {
        let (tx, rx) = mpsc::channel();
        let controller = LightController::new(torch, store, MockHost::new(), &config, tx);
        (controller, rx)
    }

    fn controller() -> TestController {
        controller_with(
            MockTorch::new(),
            MemoryPreferenceStore::new(),
            LightConfig::default(),
        )
        .0
    }

    fn pending_ticket(controller: &TestController) -> AcquireTicket {
        controller
            .torch()
            .last_ticket()
            .expect("camera acquisition started")
    }

    #[test]
    fn test_requested_mode_wins_over_preference() {
        let (mut controller, _rx) = controller_with(
            MockTorch::new(),
            MemoryPreferenceStore::with_mode(Mode::Viewfinder.id()),
            LightConfig::default(),
        );
        assert_eq!(controller.initialize(Some(Mode::Blackout)), Mode::Blackout);
    }

    #[test]
    fn test_stored_mode_is_used() {
        let (mut controller, _rx) = controller_with(
            MockTorch::new(),
            MemoryPreferenceStore::with_mode(Mode::LightSwitch.id()),
            LightConfig::default(),
        );
        assert_eq!(controller.initialize(None), Mode::LightSwitch);
        assert!(
            controller
                .host()
                .effects()
                .contains(&HostEffect::BindLayout(Mode::LightSwitch))
        );
    }

    #[test]
    fn test_bad_preferences_fall_back_to_normal() {
        let (mut unknown, _rx) = controller_with(
            MockTorch::new(),
            MemoryPreferenceStore::with_mode(99),
            LightConfig::default(),
        );
        assert_eq!(unknown.initialize(None), Mode::Normal);

        let (mut failing, _rx) = controller_with(
            MockTorch::new(),
            MemoryPreferenceStore::failing(),
            LightConfig::default(),
        );
        assert_eq!(failing.initialize(None), Mode::Normal);
    }

    #[test]
    fn test_viewfinder_configures_surface() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Viewfinder));
        assert_eq!(
            controller.torch().calls()[0],
            TorchCall::SetViewfinder(true)
        );
    }

    #[test]
    fn test_toggle_drives_torch_and_transition() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Normal));

        controller.toggle();
        assert!(controller.is_on());
        assert!(controller.torch().is_lit());
        assert_eq!(
            controller.host().last_transition(),
            Some(Transition::CrossFade {
                forward: true,
                duration: Duration::from_millis(200)
            })
        );

        controller.toggle();
        assert!(!controller.is_on());
        assert_eq!(
            controller.host().last_transition(),
            Some(Transition::CrossFade {
                forward: false,
                duration: Duration::from_millis(300)
            })
        );
    }

    #[test]
    fn test_switch_mode_checks_switch() {
        let mut controller = controller();
        controller.initialize(Some(Mode::LightSwitch));

        controller.toggle();
        assert_eq!(
            controller.host().last_transition(),
            Some(Transition::Switch { checked: true })
        );
    }

    #[test]
    fn test_blackout_has_no_transition() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Blackout));

        controller.toggle();
        assert!(controller.is_on());
        assert_eq!(controller.host().last_transition(), None);
    }

    #[test]
    fn test_camera_ready_turns_light_on() {
        let mut controller = controller();
        controller.initialize(None);
        let ticket = pending_ticket(&controller);

        controller.on_camera_ready(ticket);
        assert!(controller.is_on());
        assert_eq!(controller.torch().count(&TorchCall::LightOn), 1);

        // A duplicate delivery is stale.
        controller.on_camera_ready(ticket);
        assert_eq!(controller.torch().count(&TorchCall::LightOn), 1);
    }

    #[test]
    fn test_camera_ready_respects_config() {
        let config = LightConfig {
            torch_on_when_ready: false,
            ..Default::default()
        };
        let (mut controller, _rx) =
            controller_with(MockTorch::ready(), MemoryPreferenceStore::new(), config);
        controller.initialize(None);
        assert!(!controller.is_on());
        assert!(!controller.state().acquiring);
    }

    #[test]
    fn test_synchronous_ready_turns_light_on() {
        let (mut controller, _rx) = controller_with(
            MockTorch::ready(),
            MemoryPreferenceStore::new(),
            LightConfig::default(),
        );
        controller.initialize(None);
        assert!(controller.is_on());
    }

    #[test]
    fn test_stale_ready_after_release_is_ignored() {
        let mut controller = controller();
        controller.initialize(None);
        let ticket = pending_ticket(&controller);

        controller.on_foreground_lost();
        controller.on_camera_ready(ticket);
        assert!(!controller.is_on());
        assert_eq!(controller.torch().count(&TorchCall::LightOn), 0);
    }

    #[test]
    fn test_foreground_lost_forces_off() {
        let mut controller = controller();
        controller.initialize(None);
        controller.toggle();

        controller.on_foreground_lost();
        let state = controller.state();
        assert_eq!(state.light, LightState::Off);
        assert!(state.paused);
        assert!(!controller.holds_camera());
        assert!(!controller.torch().is_lit());
        assert_eq!(controller.torch().count(&TorchCall::ReleaseCamera), 1);
    }

    #[test]
    fn test_foreground_gained_reacquires_only_when_paused() {
        let mut controller = controller();
        controller.initialize(None);
        controller.on_foreground_gained();
        assert_eq!(controller.torch().init_count(), 1);

        controller.on_foreground_lost();
        controller.on_foreground_gained();
        assert_eq!(controller.torch().init_count(), 2);
        assert!(controller.state().paused);

        controller.on_focus_changed(true);
        assert!(!controller.state().paused);
        assert_eq!(controller.torch().count(&TorchCall::StartPreview), 1);

        controller.on_focus_changed(true);
        assert_eq!(controller.torch().count(&TorchCall::StartPreview), 1);
    }

    #[test]
    fn test_screen_stopping_persists_mode() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Viewfinder));
        controller.on_screen_stopping();
        assert_eq!(controller.store().stored(), Some(Mode::Viewfinder.id()));
    }

    #[test]
    fn test_screen_stopping_swallows_write_failure() {
        let (mut controller, _rx) = controller_with(
            MockTorch::new(),
            MemoryPreferenceStore::failing(),
            LightConfig::default(),
        );
        controller.initialize(Some(Mode::Blackout));
        controller.on_screen_stopping();
        assert_eq!(controller.store().stored(), None);
    }

    #[test]
    fn test_select_current_mode_is_noop() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Normal));

        assert!(!controller.select_mode(Mode::Normal));
        assert!(!controller.state().finished);
        assert_eq!(controller.host().restarts(), Vec::<Mode>::new());
        assert_eq!(controller.torch().count(&TorchCall::ReleaseCamera), 0);
    }

    #[test]
    fn test_select_mode_restarts() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Normal));
        controller.toggle();

        assert!(controller.select_mode(Mode::Blackout));
        assert_eq!(controller.host().restarts(), vec![Mode::Blackout]);
        assert!(!controller.is_on());
        assert!(!controller.holds_camera());
        assert!(controller.state().finished);

        // The old screen ignores further input.
        controller.toggle();
        assert!(!controller.is_on());
        assert!(!controller.select_mode(Mode::Viewfinder));
    }

    #[test]
    fn test_menu_cancel_skips_blackout_fade() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Blackout));
        assert_eq!(controller.mode_menu().len(), 3);

        controller.on_focus_changed(true);
        assert_eq!(controller.host().count(&HostEffect::FadeOutHint), 1);

        controller.on_mode_selection(ModeSelection::Cancelled);
        controller.on_focus_changed(true);
        assert_eq!(controller.host().count(&HostEffect::FadeOutHint), 1);

        controller.on_focus_changed(true);
        assert_eq!(controller.host().count(&HostEffect::FadeOutHint), 2);
    }

    #[test]
    fn test_fade_only_in_blackout() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Normal));
        controller.on_focus_changed(true);
        assert_eq!(controller.host().count(&HostEffect::FadeOutHint), 0);
    }

    #[test]
    fn test_camera_unavailable_blocks_everything() {
        let mut controller = controller();
        controller.initialize(None);
        let ticket = pending_ticket(&controller);

        controller.on_camera_unavailable(ticket);
        let before = controller.state();
        assert!(before.dialog_shown);
        assert_eq!(controller.host().count(&HostEffect::ShowCameraUnavailable), 1);

        controller.toggle();
        controller.show_chrome();
        controller.on_focus_changed(true);
        controller.on_foreground_gained();
        assert!(!controller.select_mode(Mode::Blackout));
        assert!(controller.on_back_pressed());
        assert_eq!(controller.state(), before);
        assert_eq!(controller.host().count(&HostEffect::Finish), 0);

        controller.acknowledge_camera_unavailable();
        assert!(controller.state().finished);
        assert_eq!(controller.host().count(&HostEffect::Finish), 1);
    }

    #[test]
    fn test_unavailable_on_init_shows_dialog() {
        let (mut controller, _rx) = controller_with(
            MockTorch::unavailable(),
            MemoryPreferenceStore::new(),
            LightConfig::default(),
        );
        controller.initialize(None);
        assert!(controller.state().dialog_shown);
        assert!(!controller.is_on());
    }

    #[test]
    fn test_back_finishes_screen() {
        let mut controller = controller();
        controller.initialize(None);
        controller.toggle();

        assert!(controller.on_back_pressed());
        assert!(!controller.is_on());
        assert_eq!(controller.host().count(&HostEffect::Finish), 1);
        assert!(!controller.on_back_pressed());
    }

    #[test]
    fn test_immediate_chrome_hides_at_once() {
        let config = LightConfig {
            chrome_style: ChromeStyle::Immediate,
            ..Default::default()
        };
        let (mut controller, rx) =
            controller_with(MockTorch::new(), MemoryPreferenceStore::new(), config);
        controller.initialize(Some(Mode::Blackout));

        let state = controller.state();
        assert!(!state.chrome_visible);
        assert!(!state.ignore_touch);
        assert_eq!(
            controller.host().count(&HostEffect::HideChrome(ChromeLayer::Primary)),
            1
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_delayed_chrome_ignores_touch_until_hidden() {
        let config = LightConfig {
            chrome_secondary_delay_ms: 10,
            chrome_primary_delay_ms: 5,
            ..Default::default()
        };
        let (mut controller, rx) =
            controller_with(MockTorch::new(), MemoryPreferenceStore::new(), config);
        controller.initialize(Some(Mode::Blackout));

        assert!(controller.state().ignore_touch);
        assert!(!controller.on_screen_touched());
        assert!(!controller.is_on());

        let secondary = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        controller.on_chrome_event(secondary);
        assert!(controller.state().ignore_touch);
        assert!(controller.state().chrome_visible);

        let primary = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        controller.on_chrome_event(primary);
        assert!(!controller.state().ignore_touch);
        assert!(!controller.state().chrome_visible);

        assert!(controller.on_screen_touched());
        assert!(controller.is_on());
    }

    #[test]
    fn test_chrome_events_after_teardown_are_ignored() {
        let config = LightConfig {
            chrome_secondary_delay_ms: 10,
            chrome_primary_delay_ms: 2000,
            ..Default::default()
        };
        let (mut controller, rx) =
            controller_with(MockTorch::new(), MemoryPreferenceStore::new(), config);
        controller.initialize(Some(Mode::Viewfinder));
        let stale = rx.recv_timeout(Duration::from_secs(2)).unwrap();

        controller.on_back_pressed();
        let effects = controller.host().effects().len();
        controller.on_chrome_event(stale);
        assert_eq!(controller.host().effects().len(), effects);
    }

    #[test]
    fn test_restarted_screen_ignores_previous_screen_chrome() {
        let (tx, rx) = mpsc::channel();
        let fast = LightConfig {
            chrome_secondary_delay_ms: 10,
            chrome_primary_delay_ms: 2000,
            ..Default::default()
        };
        let mut old = LightController::new(
            MockTorch::new(),
            MemoryPreferenceStore::new(),
            MockHost::new(),
            &fast,
            tx.clone(),
        );
        old.initialize(Some(Mode::Blackout));
        let queued = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(old.select_mode(Mode::Viewfinder));
        drop(old);

        let slow = LightConfig {
            chrome_secondary_delay_ms: 5000,
            ..Default::default()
        };
        let mut new = LightController::new(
            MockTorch::new(),
            MemoryPreferenceStore::new(),
            MockHost::new(),
            &slow,
            tx,
        );
        new.initialize(Some(Mode::Viewfinder));
        assert!(new.state().ignore_touch);

        new.on_chrome_event(queued);
        let secondary = HostEffect::HideChrome(ChromeLayer::Secondary);
        assert_eq!(new.host().count(&secondary), 0);
        assert!(new.state().ignore_touch);
        assert!(new.state().chrome_visible);
    }

    #[test]
    fn test_touch_outside_blackout_is_not_handled() {
        let mut controller = controller();
        controller.initialize(Some(Mode::Normal));
        assert!(!controller.on_screen_touched());
        assert!(!controller.is_on());
    }

    #[test]
    fn test_drop_releases_camera() {
        let torch = MockTorch::new();
        let log = torch.shared_log();
        {
            let (mut controller, _rx) =
                controller_with(torch, MemoryPreferenceStore::new(), LightConfig::default());
            controller.initialize(None);
            controller.toggle();
        }
        let calls = log.lock().unwrap();
        assert_eq!(calls.last(), Some(&TorchCall::ReleaseCamera));
    }
}
