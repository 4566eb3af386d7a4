use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod clock;
mod error;
mod input;
mod notify;
mod prefs;
mod ui;

use app::App;
use clock::SessionClock;
use error::Result;
use notify::DesktopNotifier;
use prefs::{DisplayMode, PreferenceStore, Preferences};

// ============================================================================
// Constants
// ============================================================================

const POLL_RATE: Duration = Duration::from_millis(50);
const HEARTBEAT: Duration = Duration::from_secs(1);
const LOG_FILE: &str = "pomobar.log";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone)]
#[command(author, version, about = "🍅 pomobar - a status-bar work/break timer")]
struct Args {
    /// Work session length, e.g. 25, 25m, 1h30m
    #[arg(short, long, value_parser = parse_duration)]
    work: Option<u32>,
    /// Break session length, e.g. 5, 5m
    #[arg(short = 'b', long = "break", value_parser = parse_duration)]
    break_len: Option<u32>,
    /// Show percent progress instead of remaining time
    #[arg(short, long)]
    progress: bool,
    /// Start with desktop notifications turned off
    #[arg(long)]
    no_notify: bool,
    /// Directory holding preferences.json and the log file
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

/// Parses whole minutes from `25`, `25m`, `1h` or `1h30m`.
fn parse_duration(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim().to_lowercase();
    let mut total: u32 = 0;
    let mut num = String::new();

    for c in s.chars() {
        match c {
            '0'..='9' => num.push(c),
            'h' => {
                let hours = num.parse::<u32>().map_err(|_| "Invalid hours")?;
                total = total.saturating_add(hours.saturating_mul(60));
                num.clear();
            }
            'm' => {
                total = total.saturating_add(num.parse::<u32>().map_err(|_| "Invalid minutes")?);
                num.clear();
            }
            _ => return Err("Invalid format".into()),
        }
    }

    if !num.is_empty() {
        total = total.saturating_add(num.parse::<u32>().map_err(|_| "Invalid minutes")?);
    }

    if total > 0 {
        Ok(total)
    } else {
        Err("Duration must be > 0".into())
    }
}

/// CLI overrides go through the regular setters so they persist like any
/// other edit.
fn apply_overrides(clock: &mut SessionClock, args: &Args) {
    if let Some(w) = args.work {
        clock.set_work_duration(w.into());
    }
    if let Some(b) = args.break_len {
        clock.set_break_duration(b.into());
    }
    if args.progress {
        clock.set_display_mode(DisplayMode::Progress);
    }
    if args.no_notify {
        clock.set_notifications_enabled(false);
    }
}

// ============================================================================
// Logging
// ============================================================================

type InitError = Box<dyn std::error::Error + Send + Sync>;

/// The terminal belongs to the UI, so logs go to a file next to the
/// preferences. Filter with RUST_LOG; defaults to info.
fn init_logging(dir: &Path) -> std::result::Result<(), InitError> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
}

/// Creates the config directory and starts file logging. Neither is required
/// to run the timer, so failures are reported on stderr before the UI takes
/// the terminal. Returns whether logging is active.
fn prepare_config_dir(dir: &Path) -> bool {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("pomobar: cannot create {}: {e}; settings will not be saved", dir.display());
    }
    match init_logging(dir) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("pomobar: logging disabled: {e}");
            false
        }
    }
}

fn save_on_quit(store: &PreferenceStore, prefs: &Preferences) {
    match store.save(prefs) {
        Ok(()) => info!("exiting"),
        Err(e) => warn!(error = %e, "could not save preferences on exit"),
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let dir = args.config_dir.clone().unwrap_or_else(PreferenceStore::default_dir);
    prepare_config_dir(&dir);

    let store = PreferenceStore::in_dir(&dir);
    let prefs = store.load();
    info!(path = %store.path().display(), ?prefs, "starting");

    let saver = store.clone();
    let mut clock = SessionClock::new(prefs, move |p| {
        if let Err(e) = saver.save(p) {
            warn!(error = %e, "could not save preferences");
        }
    });
    apply_overrides(&mut clock, &args);

    let mut app = App::new(clock, Box::new(DesktopNotifier::new()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    save_on_quit(&store, &app.clock().preferences());
    res
}

/// Input is polled every 50 ms; the heartbeat fires once per elapsed second
/// regardless of which view is open.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_beat = Instant::now();

    loop {
        terminal.draw(|f| ui::render_ui(f, app))?;

        let timeout = POLL_RATE.min(HEARTBEAT.saturating_sub(last_beat.elapsed()));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && input::handle_input(key, app) {
                    return Ok(());
                }
            }
        }

        if last_beat.elapsed() >= HEARTBEAT {
            app.on_heartbeat();
            last_beat = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn parses_plain_and_suffixed_minutes() {
        assert_eq!(parse_duration("25"), Ok(25));
        assert_eq!(parse_duration("25m"), Ok(25));
        assert_eq!(parse_duration(" 1H "), Ok(60));
        assert_eq!(parse_duration("1h30m"), Ok(90));
        assert_eq!(parse_duration("1h30"), Ok(90));
    }

    #[test]
    fn rejects_bad_durations() {
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10s").is_err());
        assert!(parse_duration("1.5m").is_err());
        assert!(parse_duration("h").is_err());
    }

    #[test]
    fn overrides_apply_and_persist() {
        let args = Args::parse_from(["pomobar", "-w", "50", "--break", "10m", "-p", "--no-notify"]);
        let saved = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&saved);
        let mut clock = SessionClock::new(Preferences::default(), move |p| {
            *sink.borrow_mut() = Some(p.clone());
        });

        apply_overrides(&mut clock, &args);

        let last = saved.borrow().clone().unwrap();
        assert_eq!(last.work_minutes, 50);
        assert_eq!(last.break_minutes, 10);
        assert_eq!(last.display_mode, DisplayMode::Progress);
        assert!(!last.notifications_enabled);
        assert_eq!(clock.remaining_secs(), 50 * 60);
    }

    #[test]
    fn unwritable_config_dir_does_not_stop_startup() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "").unwrap();
        let blocked = file.join("pomobar");

        assert!(init_logging(&blocked).is_err());
        assert!(!prepare_config_dir(&blocked));

        let store = PreferenceStore::in_dir(&blocked);
        assert_eq!(store.load(), Preferences::default());
        save_on_quit(&store, &Preferences::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn no_overrides_leave_prefs_untouched() {
        let args = Args::parse_from(["pomobar"]);
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let mut clock = SessionClock::new(Preferences::default(), move |_| {
            *sink.borrow_mut() += 1;
        });
        apply_overrides(&mut clock, &args);
        assert_eq!(*calls.borrow(), 0);
    }
}
