use ratatui::{prelude::*, widgets::*};

use crate::app::{App, MenuItem, SettingsField, View};
use crate::clock::SessionKind;

const WORK_COLOR: Color = Color::Rgb(100, 181, 246);
const BREAK_COLOR: Color = Color::Rgb(0, 255, 150);
const BORDER_COLOR: Color = Color::Rgb(0, 200, 255);
const ACCENT_COLOR: Color = Color::Rgb(255, 100, 0);

// ============================================================================
// UI Rendering
// ============================================================================

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(f.size());

    render_status_strip(f, app, chunks[0]);
    match app.view {
        View::Menu => render_menu(f, app, chunks[1]),
        View::Settings => render_settings(f, app, chunks[1]),
    }
    render_controls(f, app, chunks[2]);
}

fn kind_color(kind: SessionKind) -> Color {
    match kind {
        SessionKind::Work => WORK_COLOR,
        SessionKind::Break => BREAK_COLOR,
    }
}

fn kind_title(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Work => "🎯 FOCUS TIME",
        SessionKind::Break => "☕ BREAK",
    }
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// The menu-bar strip: app name on the left, status text on the right.
fn render_status_strip(f: &mut Frame, app: &App, area: Rect) {
    let clock = app.clock();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(Span::styled(" 🍅 POMOBAR ", bold(ACCENT_COLOR)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut status = vec![Span::styled(
        app.status_line(),
        bold(kind_color(clock.kind())),
    )];
    if clock.is_paused() {
        status.insert(0, Span::styled("⏸ ", Style::default().fg(Color::Yellow)));
    }
    status.push(Span::raw(" "));

    f.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Right),
        inner,
    );
}

fn render_menu(f: &mut Frame, app: &App, area: Rect) {
    let clock = app.clock();
    let color = kind_color(clock.kind());

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(MenuItem::ALL.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(kind_title(clock.kind()))
            .style(bold(color))
            .alignment(Alignment::Center),
        sections[1],
    );

    let secs = clock.remaining_secs();
    f.render_widget(
        Paragraph::new(format!("{:02}:{:02}", secs / 60, secs % 60))
            .style(bold(color))
            .alignment(Alignment::Center),
        sections[3],
    );

    f.render_widget(
        Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent((clock.progress_ratio() * 100.0) as u16),
        centered_rect(60, 100, sections[5]),
    );

    let now = chrono::Local::now();
    let date_lines = vec![
        Line::from(Span::styled(
            now.format("%A, %B %d, %Y").to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            now.format("%I:%M %p").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(date_lines).alignment(Alignment::Center),
        sections[7],
    );

    let selected = app.selected_menu_item();
    let lines: Vec<Line> = MenuItem::ALL
        .iter()
        .map(|&item| {
            let label = app.menu_label(item);
            if item == selected {
                Line::from(vec![
                    Span::styled("► ", bold(ACCENT_COLOR)),
                    Span::styled(label, bold(Color::White)),
                ])
            } else {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(label, Style::default().fg(Color::Gray)),
                ])
            }
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        ),
        centered_rect(30, 100, sections[9]),
    );
}

fn warning_value(app: &App) -> String {
    let clock = app.clock();
    if !clock.one_minute_warning_enabled() {
        "OFF".into()
    } else if clock.warning_sent() && app.warning_editable() {
        "ON (sent this session)".into()
    } else {
        "ON".into()
    }
}

fn render_settings(f: &mut Frame, app: &App, area: Rect) {
    let area = centered_rect(70, 90, area);
    let clock = app.clock();
    let on_off = |flag: bool| if flag { "ON" } else { "OFF" }.to_string();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("⚙️  SETTINGS", bold(ACCENT_COLOR))),
        Line::from(""),
        Line::from(Span::styled(
            "  ↑↓/jk: Navigate  •  Enter: Edit  •  Space: Toggle  •  ←→/hl: Display",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let settings = [
        (
            SettingsField::WorkMinutes,
            "🎯 Work Duration",
            format!("{} min", clock.duration_minutes(SessionKind::Work)),
        ),
        (
            SettingsField::BreakMinutes,
            "☕ Break Duration",
            format!("{} min", clock.duration_minutes(SessionKind::Break)),
        ),
        (
            SettingsField::DisplayMode,
            "🖥  Display",
            format!("< {} >", clock.display_mode().label()),
        ),
        (
            SettingsField::Notifications,
            "🔔 Notifications",
            on_off(clock.notifications_enabled()),
        ),
        (
            SettingsField::OneMinuteWarning,
            "⏰ One-Minute Warning",
            warning_value(app),
        ),
    ];

    for (field, label, value) in settings {
        let selected = app.settings_field == field;
        let editing = selected && app.settings_editing;
        let inert = field == SettingsField::OneMinuteWarning && !app.warning_editable();

        lines.push(Line::from(""));

        if editing {
            lines.push(Line::from(vec![
                Span::styled("  > ", bold(Color::Yellow)),
                Span::styled(label, bold(Color::Yellow)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(app.settings_input.as_str(), bold(Color::Green)),
                Span::styled("█", Style::default().fg(Color::Green)),
            ]));
        } else {
            let dimmed = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM);
            let (prefix, label_style, value_style) = if inert {
                (if selected { "  > " } else { "    " }, dimmed, dimmed)
            } else if selected {
                ("  > ", bold(ACCENT_COLOR), bold(Color::White))
            } else {
                (
                    "    ",
                    Style::default().fg(Color::Gray),
                    Style::default().fg(Color::DarkGray),
                )
            };

            lines.push(Line::from(vec![
                Span::styled(prefix, label_style),
                Span::styled(label, label_style),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(value, value_style),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  💾 Auto-saved",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Settings ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        ),
        area,
    );
}

fn render_controls(f: &mut Frame, app: &App, area: Rect) {
    let controls = match app.view {
        View::Menu => Line::from(vec![
            span_key("W"),
            Span::raw(" Work  •  "),
            span_key("B"),
            Span::raw(" Break  •  "),
            span_key("Space"),
            Span::raw(format!(" {}  •  ", app.pause_label())),
            span_key("S"),
            Span::raw(" Settings  •  "),
            span_key("Q"),
            Span::raw(" Quit"),
        ]),
        View::Settings => Line::from(vec![
            span_key("Esc"),
            Span::raw(" Back  •  "),
            span_key("Ctrl+C"),
            Span::raw(" Quit"),
        ]),
    };
    f.render_widget(
        Paragraph::new(controls)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn span_key(text: &str) -> Span<'_> {
    Span::styled(text, bold(ACCENT_COLOR))
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}
