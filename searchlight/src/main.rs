//! SearchLight desktop flashlight built on iced.

use std::sync::mpsc;

use searchlight_core::{
    AcquireTicket, Acquisition, ChromeEvent, ChromeLayer, JsonPreferenceStore, LightConfig,
    LightController, Mode, ModeBinding, ModeSelection, ScreenHost, SysfsTorch, TorchSurface,
    Transition, Widget,
};
use iced::keyboard::{self, Event as KeyboardEvent, Key, key::Named};
use iced::widget::{button, column, container, mouse_area, row, text, toggler};
use iced::{Color, Element, Length, Subscription, Task, Theme, window};
use log::{info, warn};

pub fn main() -> iced::Result {
    env_logger::init();

    iced::application(SearchLight::new, SearchLight::update, SearchLight::view)
        .title("SearchLight")
        .subscription(SearchLight::subscription)
        .theme(SearchLight::theme)
        .window(window_settings())
        .run()
}

/// Close requests are delivered to `update`, which persists the mode and exits.
fn window_settings() -> window::Settings {
    window::Settings {
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

type Controller = LightController<AppTorch, JsonPreferenceStore, WindowHost>;

// =============================================================================
// Torch
// =============================================================================

/// The LED when one is present, otherwise an on-screen stand-in.
enum AppTorch {
    Led(SysfsTorch),
    Simulated { lit: bool },
}

impl AppTorch {
    fn open(config: &LightConfig) -> Self {
        match SysfsTorch::open(&config.led_class_dir, config.led_name.as_deref()) {
            Ok(torch) => AppTorch::Led(torch),
            Err(e) => {
                warn!("no torch LED ({}), simulating one", e);
                AppTorch::Simulated { lit: false }
            }
        }
    }
}

impl TorchSurface for AppTorch {
    fn init_camera(&mut self, ticket: AcquireTicket) -> Acquisition {
        match self {
            AppTorch::Led(torch) => torch.init_camera(ticket),
            AppTorch::Simulated { .. } => Acquisition::Ready,
        }
    }

    fn release_camera(&mut self) {
        match self {
            AppTorch::Led(torch) => torch.release_camera(),
            AppTorch::Simulated { lit } => *lit = false,
        }
    }

    fn start_preview(&mut self) {
        if let AppTorch::Led(torch) = self {
            torch.start_preview();
        }
    }

    fn light_on(&mut self) -> searchlight_core::Result<()> {
        match self {
            AppTorch::Led(torch) => torch.light_on(),
            AppTorch::Simulated { lit } => {
                *lit = true;
                Ok(())
            }
        }
    }

    fn light_off(&mut self) -> searchlight_core::Result<()> {
        match self {
            AppTorch::Led(torch) => torch.light_off(),
            AppTorch::Simulated { lit } => {
                *lit = false;
                Ok(())
            }
        }
    }

    fn set_viewfinder(&mut self, enabled: bool) {
        if let AppTorch::Led(torch) = self {
            torch.set_viewfinder(enabled);
        }
    }

    fn is_lit(&self) -> bool {
        match self {
            AppTorch::Led(torch) => torch.is_lit(),
            AppTorch::Simulated { lit } => *lit,
        }
    }
}

// =============================================================================
// Window host
// =============================================================================

/// What the window currently shows, as requested by the controller.
struct WindowHost {
    binding: Option<ModeBinding>,
    bulb_lit: bool,
    switch_checked: bool,
    hint_visible: bool,
    action_bar_visible: bool,
    status_bar_visible: bool,
    dialog: Option<String>,
    restart: Option<Mode>,
    finished: bool,
}

impl WindowHost {
    fn new() -> Self {
        Self {
            binding: None,
            bulb_lit: false,
            switch_checked: false,
            hint_visible: true,
            action_bar_visible: true,
            status_bar_visible: true,
            dialog: None,
            restart: None,
            finished: false,
        }
    }
}

impl ScreenHost for WindowHost {
    fn bind_layout(&mut self, mode: Mode, binding: ModeBinding) {
        info!("binding layout {} for {}", binding.layout, mode);
        self.binding = Some(binding);
    }

    fn play_transition(&mut self, transition: Transition) {
        match transition {
            Transition::CrossFade { forward, .. } => self.bulb_lit = forward,
            Transition::Switch { checked } => self.switch_checked = checked,
        }
    }

    fn show_chrome(&mut self) {
        self.action_bar_visible = true;
        self.status_bar_visible = true;
    }

    fn hide_chrome(&mut self, layer: ChromeLayer) {
        match layer {
            ChromeLayer::Secondary => self.action_bar_visible = false,
            ChromeLayer::Primary => self.status_bar_visible = false,
        }
    }

    fn fade_out_hint(&mut self) {
        self.hint_visible = false;
    }

    fn show_camera_unavailable(&mut self, message: &str) {
        self.dialog = Some(message.to_string());
    }

    fn restart_with(&mut self, mode: Mode) {
        self.restart = Some(mode);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

// =============================================================================
// Application
// =============================================================================

struct SearchLight {
    config: LightConfig,
    controller: Controller,
    chrome_tx: mpsc::Sender<ChromeEvent>,
    chrome_rx: mpsc::Receiver<ChromeEvent>,
    picker_open: bool,
}

#[derive(Debug, Clone)]
enum Message {
    // Light
    Toggle,
    SwitchToggled(bool),
    ScreenTouched,

    // Mode selection
    OpenModePicker,
    ModePicked(Mode),
    CancelModePicker,

    // Chrome
    ShowChrome,
    Tick,

    // Dialog
    AcknowledgeDialog,

    // Platform events
    Window(window::Event),
    KeyboardEvent(KeyboardEvent),
}

impl SearchLight {
    fn new() -> Self {
        let config = LightConfig::load().unwrap_or_else(|e| {
            warn!("failed to load configuration: {}", e);
            LightConfig::default()
        });
        Self::with_config(config)
    }

    fn with_config(config: LightConfig) -> Self {
        let (chrome_tx, chrome_rx) = mpsc::channel();
        let controller = Self::create_screen(&config, chrome_tx.clone(), None);

        Self {
            config,
            controller,
            chrome_tx,
            chrome_rx,
            picker_open: false,
        }
    }

    fn create_screen(
        config: &LightConfig,
        chrome_tx: mpsc::Sender<ChromeEvent>,
        requested: Option<Mode>,
    ) -> Controller {
        let store = JsonPreferenceStore::new(&config.prefs_dir, &config.screen);
        let mut controller =
            LightController::new(AppTorch::open(config), store, WindowHost::new(), config, chrome_tx);
        controller.initialize(requested);
        controller
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Toggle => self.controller.toggle(),

            Message::SwitchToggled(checked) => {
                if checked != self.controller.is_on() {
                    self.controller.toggle();
                }
            }

            Message::ScreenTouched => {
                self.controller.on_screen_touched();
            }

            Message::OpenModePicker => {
                if !self.controller.state().dialog_shown {
                    self.picker_open = true;
                }
            }

            Message::ModePicked(mode) => {
                self.picker_open = false;
                if !self.controller.select_mode(mode) {
                    // Current mode picked: the selector just closed
                    self.controller.on_mode_selection(ModeSelection::Cancelled);
                }
            }

            Message::CancelModePicker => {
                self.picker_open = false;
                self.controller.on_mode_selection(ModeSelection::Cancelled);
            }

            Message::ShowChrome => self.controller.show_chrome(),

            Message::Tick => {
                while let Ok(event) = self.chrome_rx.try_recv() {
                    self.controller.on_chrome_event(event);
                }
            }

            Message::AcknowledgeDialog => self.controller.acknowledge_camera_unavailable(),

            Message::Window(event) => match event {
                window::Event::Focused => {
                    self.controller.on_foreground_gained();
                    self.controller.on_focus_changed(true);
                }
                window::Event::Unfocused => {
                    self.controller.on_focus_changed(false);
                    self.controller.on_foreground_lost();
                    self.controller.on_screen_stopping();
                }
                window::Event::CloseRequested => {
                    info!("window closing in {} mode", self.controller.mode());
                    self.controller.on_screen_stopping();
                    self.controller.teardown();
                    return iced::exit();
                }
                _ => {}
            },

            Message::KeyboardEvent(event) => {
                if let KeyboardEvent::KeyPressed { key, .. } = event {
                    match key.as_ref() {
                        Key::Named(Named::Space) => return self.update(Message::Toggle),
                        Key::Named(Named::Escape) => {
                            if self.picker_open {
                                return self.update(Message::CancelModePicker);
                            }
                            self.controller.on_back_pressed();
                        }
                        Key::Character(c) if c == "m" => {
                            return self.update(Message::OpenModePicker);
                        }
                        Key::Character(c) if c == "c" => {
                            return self.update(Message::ShowChrome);
                        }
                        _ => {}
                    }
                }
            }
        }

        self.apply_host_requests()
    }

    /// Act on restart and finish requests left on the host.
    fn apply_host_requests(&mut self) -> Task<Message> {
        if let Some(mode) = self.controller.host_mut().restart.take() {
            self.controller.on_screen_stopping();
            self.controller =
                Self::create_screen(&self.config, self.chrome_tx.clone(), Some(mode));
            return Task::none();
        }

        if self.controller.host().finished {
            self.controller.on_screen_stopping();
            return iced::exit();
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let host = self.controller.host();
        let state = self.controller.state();

        // Blocking dialog: nothing else is interactive
        if let Some(ref message) = host.dialog {
            let dialog = column![
                text(message).size(16),
                button("OK").on_press(Message::AcknowledgeDialog),
            ]
            .spacing(15)
            .padding(20);
            return container(dialog).center(Length::Fill).into();
        }

        if self.picker_open {
            return self.mode_picker();
        }

        let widget = host.binding.map(|binding| binding.widget).unwrap_or(Widget::Bulb);
        let body: Element<'_, Message> = match widget {
            Widget::Bulb => {
                let label = if host.bulb_lit { "ON" } else { "OFF" };
                let bulb = button(text(label).size(64)).on_press(Message::Toggle);
                let viewfinder = host.binding.is_some_and(|binding| binding.viewfinder);
                if viewfinder {
                    column![text("[ camera preview ]").size(14), bulb]
                        .spacing(20)
                        .into()
                } else {
                    bulb.into()
                }
            }
            Widget::ToggleHint => {
                let hint = if host.hint_visible {
                    text("Tap anywhere to toggle the light").color(Color::WHITE)
                } else {
                    text("")
                };
                mouse_area(
                    container(hint)
                        .center(Length::Fill)
                        .style(|_theme: &Theme| container::Style {
                            background: Some(Color::BLACK.into()),
                            ..container::Style::default()
                        }),
                )
                .on_press(Message::ScreenTouched)
                .into()
            }
            Widget::Switch => toggler(host.switch_checked)
                .label("Light")
                .on_toggle(Message::SwitchToggled)
                .into(),
        };

        let mut content = column![].spacing(10);

        // Action bar (secondary chrome)
        if host.action_bar_visible {
            content = content.push(
                row![
                    text("SearchLight").size(20),
                    button("Mode").on_press(Message::OpenModePicker),
                ]
                .spacing(15),
            );
        }

        // Status line (primary chrome)
        if host.status_bar_visible {
            let status = format!(
                "{} | light {}",
                state.mode,
                if state.light.is_on() { "on" } else { "off" }
            );
            content = content.push(text(status).size(12));
        }

        content = content.push(container(body).center(Length::Fill));

        let shortcuts_hint = text("Shortcuts: Space (toggle) | M (mode) | C (chrome) | Esc (back)")
            .size(12);
        if host.status_bar_visible {
            content = content.push(shortcuts_hint);
        }

        container(content.padding(20)).into()
    }

    fn mode_picker(&self) -> Element<'_, Message> {
        let current = self.controller.mode();
        let mut choices = column![text("Choose a mode").size(20)].spacing(10);
        for mode in Mode::ALL {
            let label = if mode == current {
                format!("{} (current)", mode)
            } else {
                mode.to_string()
            };
            choices = choices.push(button(text(label)).on_press(Message::ModePicked(mode)));
        }
        choices = choices.push(button("Cancel").on_press(Message::CancelModePicker));

        container(choices.padding(20)).center(Length::Fill).into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let base = Subscription::batch([
            keyboard::listen().map(Message::KeyboardEvent),
            window::events().map(|(_id, event)| Message::Window(event)),
        ]);

        // Poll for chrome stages only while one is pending
        if self.controller.state().ignore_touch {
            Subscription::batch([base, window::frames().map(|_| Message::Tick)])
        } else {
            base
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
