use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, App, MenuItem, SettingsField, View};
use crate::clock::SessionKind;

const MAX_INPUT_DIGITS: usize = 4;

// ============================================================================
// Event Handlers
// ============================================================================

/// Routes a key press. Returns true when the app should exit.
pub fn handle_input(key: KeyEvent, app: &mut App) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return app.apply(Action::Quit);
    }

    if app.settings_editing {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if app.settings_input.len() < MAX_INPUT_DIGITS {
                    app.settings_input.push(c);
                }
            }
            KeyCode::Backspace => {
                app.settings_input.pop();
            }
            KeyCode::Enter => apply_setting(app),
            KeyCode::Esc => {
                app.settings_editing = false;
                app.settings_input.clear();
            }
            _ => {}
        }
        return false;
    }

    match app.view {
        View::Menu => handle_menu_view(key, app),
        View::Settings => handle_settings_view(key, app),
    }
}

fn handle_menu_view(key: KeyEvent, app: &mut App) -> bool {
    let items = MenuItem::ALL.len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.apply(Action::Quit),
        KeyCode::Char('w') => app.apply(Action::StartWork),
        KeyCode::Char('b') => app.apply(Action::StartBreak),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.apply(Action::TogglePause),
        KeyCode::Char('s') | KeyCode::Char(',') => app.apply(Action::OpenSettings),
        KeyCode::Down | KeyCode::Char('j') => {
            app.menu_index = (app.menu_index + 1) % items;
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.menu_index = (app.menu_index + items - 1) % items;
            false
        }
        KeyCode::Enter => {
            let action = app.selected_menu_item().action();
            app.apply(action)
        }
        _ => false,
    }
}

fn handle_settings_view(key: KeyEvent, app: &mut App) -> bool {
    let clock = app.clock();
    let (notifications, warning, mode) = (
        clock.notifications_enabled(),
        clock.one_minute_warning_enabled(),
        clock.display_mode(),
    );

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.apply(Action::CloseSettings);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.settings_field = app.settings_field.next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_field = app.settings_field.prev();
        }
        KeyCode::Enter | KeyCode::Char('e') => start_editing(app),
        KeyCode::Char(' ') => match app.settings_field {
            SettingsField::Notifications => {
                app.apply(Action::SetNotificationsEnabled(!notifications));
            }
            SettingsField::OneMinuteWarning => {
                app.apply(Action::SetOneMinuteWarningEnabled(!warning));
            }
            SettingsField::DisplayMode => {
                app.apply(Action::SetDisplayMode(mode.next()));
            }
            _ => {}
        },
        KeyCode::Left | KeyCode::Char('h') => {
            if app.settings_field == SettingsField::DisplayMode {
                app.apply(Action::SetDisplayMode(mode.prev()));
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if app.settings_field == SettingsField::DisplayMode {
                app.apply(Action::SetDisplayMode(mode.next()));
            }
        }
        _ => {}
    }
    false
}

fn start_editing(app: &mut App) {
    let clock = app.clock();
    let input = match app.settings_field {
        SettingsField::WorkMinutes => clock.duration_minutes(SessionKind::Work),
        SettingsField::BreakMinutes => clock.duration_minutes(SessionKind::Break),
        _ => return,
    };

    app.settings_input = input.to_string();
    app.settings_editing = true;
}

fn apply_setting(app: &mut App) {
    if let Ok(minutes) = app.settings_input.parse::<i64>() {
        match app.settings_field {
            SettingsField::WorkMinutes => {
                app.apply(Action::SetWorkMinutes(minutes));
            }
            SettingsField::BreakMinutes => {
                app.apply(Action::SetBreakMinutes(minutes));
            }
            _ => {}
        }
    }

    app.settings_editing = false;
    app.settings_input.clear();
}
