use tracing::{debug, info};

use crate::clock::{SessionClock, TickEvent};
use crate::notify::{notification_for, Notifier};
use crate::prefs::DisplayMode;

// ============================================================================
// User Actions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartWork,
    StartBreak,
    TogglePause,
    OpenSettings,
    CloseSettings,
    Quit,
    SetWorkMinutes(i64),
    SetBreakMinutes(i64),
    SetDisplayMode(DisplayMode),
    SetNotificationsEnabled(bool),
    SetOneMinuteWarningEnabled(bool),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum View {
    Menu,
    Settings,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MenuItem {
    StartWork,
    StartBreak,
    PauseResume,
    Settings,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        Self::StartWork,
        Self::StartBreak,
        Self::PauseResume,
        Self::Settings,
        Self::Quit,
    ];

    pub fn action(self) -> Action {
        match self {
            Self::StartWork => Action::StartWork,
            Self::StartBreak => Action::StartBreak,
            Self::PauseResume => Action::TogglePause,
            Self::Settings => Action::OpenSettings,
            Self::Quit => Action::Quit,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SettingsField {
    WorkMinutes,
    BreakMinutes,
    DisplayMode,
    Notifications,
    OneMinuteWarning,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            Self::WorkMinutes => Self::BreakMinutes,
            Self::BreakMinutes => Self::DisplayMode,
            Self::DisplayMode => Self::Notifications,
            Self::Notifications => Self::OneMinuteWarning,
            Self::OneMinuteWarning => Self::WorkMinutes,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::WorkMinutes => Self::OneMinuteWarning,
            Self::BreakMinutes => Self::WorkMinutes,
            Self::DisplayMode => Self::BreakMinutes,
            Self::Notifications => Self::DisplayMode,
            Self::OneMinuteWarning => Self::Notifications,
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Owns the clock and the notifier and routes every heartbeat and user
/// action to them. All calls happen on the event-loop thread.
pub struct App {
    clock: SessionClock,
    notifier: Box<dyn Notifier>,
    pub view: View,
    pub menu_index: usize,
    pub settings_field: SettingsField,
    pub settings_editing: bool,
    pub settings_input: String,
}

impl App {
    pub fn new(clock: SessionClock, notifier: Box<dyn Notifier>) -> Self {
        Self {
            clock,
            notifier,
            view: View::Menu,
            menu_index: 0,
            settings_field: SettingsField::WorkMinutes,
            settings_editing: false,
            settings_input: String::new(),
        }
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn status_line(&self) -> String {
        self.clock.format_status()
    }

    pub fn pause_label(&self) -> &'static str {
        if self.clock.is_paused() { "Resume" } else { "Pause" }
    }

    pub fn menu_label(&self, item: MenuItem) -> &'static str {
        match item {
            MenuItem::StartWork => "Start Work",
            MenuItem::StartBreak => "Start Break",
            MenuItem::PauseResume => self.pause_label(),
            MenuItem::Settings => "Settings",
            MenuItem::Quit => "Quit",
        }
    }

    pub fn selected_menu_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_index % MenuItem::ALL.len()]
    }

    /// Warning toggle is only editable while notifications are on.
    pub fn warning_editable(&self) -> bool {
        self.clock.notifications_enabled()
    }

    /// One heartbeat: advance the clock and hand any resulting message to the
    /// notifier.
    pub fn on_heartbeat(&mut self) -> TickEvent {
        let event = self.clock.tick();
        if let Some(message) = notification_for(event, &self.clock) {
            info!(title = %message.title, "notifying");
            self.notifier.deliver(&message);
        }
        event
    }

    /// Applies a user action. Returns true when the app should exit.
    pub fn apply(&mut self, action: Action) -> bool {
        debug!(?action, "action");
        match action {
            Action::StartWork => self.clock.start_work(),
            Action::StartBreak => self.clock.start_break(),
            Action::TogglePause => self.clock.toggle_pause(),
            Action::OpenSettings => {
                self.view = View::Settings;
                self.settings_editing = false;
                self.settings_input.clear();
            }
            Action::CloseSettings => {
                self.view = View::Menu;
                self.settings_editing = false;
                self.settings_input.clear();
            }
            Action::Quit => return true,
            Action::SetWorkMinutes(m) => self.clock.set_work_duration(m),
            Action::SetBreakMinutes(m) => self.clock.set_break_duration(m),
            Action::SetDisplayMode(mode) => self.clock.set_display_mode(mode),
            Action::SetNotificationsEnabled(enabled) => {
                self.clock.set_notifications_enabled(enabled);
                if !enabled {
                    self.notifier.clear_all();
                }
            }
            Action::SetOneMinuteWarningEnabled(enabled) => {
                if self.warning_editable() {
                    self.clock.set_one_minute_warning_enabled(enabled);
                } else {
                    debug!("warning toggle ignored while notifications are off");
                }
            }
        }
        false
    }
}
