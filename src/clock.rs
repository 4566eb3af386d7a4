//! The work/break session state machine.
//!
//! `SessionClock` is advanced by an external one-second heartbeat. It owns
//! every piece of runtime timer state and is only ever touched from one
//! execution context, so it needs no locking. Settings that survive a restart
//! are mirrored out through the save callback handed to [`SessionClock::new`].
//!
//! ```text
//! Work --(remaining hits 0)--> Break --(remaining hits 0)--> Work ...
//! ```

use tracing::{debug, info};

use crate::prefs::{clamp_minutes, DisplayMode, Preferences};

const SECS_PER_MINUTE: u32 = 60;
const WARNING_AT_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    pub fn other(self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::Break => "BREAK",
        }
    }
}

/// What a single heartbeat produced. At most one event per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    None,
    OneMinuteWarning(SessionKind),
    SessionComplete(SessionKind),
}

type SaveFn = Box<dyn FnMut(&Preferences)>;

pub struct SessionClock {
    kind: SessionKind,
    remaining_secs: u32,
    paused: bool,
    work_secs: u32,
    break_secs: u32,
    display_mode: DisplayMode,
    notifications_enabled: bool,
    warning_enabled: bool,
    warning_sent: bool,
    on_change: SaveFn,
}

impl std::fmt::Debug for SessionClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClock")
            .field("kind", &self.kind)
            .field("remaining_secs", &self.remaining_secs)
            .field("paused", &self.paused)
            .field("work_secs", &self.work_secs)
            .field("break_secs", &self.break_secs)
            .field("display_mode", &self.display_mode)
            .field("notifications_enabled", &self.notifications_enabled)
            .field("warning_enabled", &self.warning_enabled)
            .field("warning_sent", &self.warning_sent)
            .finish_non_exhaustive()
    }
}

fn minutes_to_secs(minutes: u32) -> u32 {
    minutes.max(1).saturating_mul(SECS_PER_MINUTE)
}

impl SessionClock {
    /// Builds a clock from loaded preferences, positioned at the start of a
    /// work session. `on_change` receives a full snapshot after every change
    /// to a persisted field; constructing the clock does not call it.
    pub fn new(prefs: Preferences, on_change: impl FnMut(&Preferences) + 'static) -> Self {
        let work_secs = minutes_to_secs(prefs.work_minutes);
        Self {
            kind: SessionKind::Work,
            remaining_secs: work_secs,
            paused: prefs.paused,
            work_secs,
            break_secs: minutes_to_secs(prefs.break_minutes),
            display_mode: prefs.display_mode,
            notifications_enabled: prefs.notifications_enabled,
            warning_enabled: prefs.one_minute_warning_enabled,
            warning_sent: false,
            on_change: Box::new(on_change),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn one_minute_warning_enabled(&self) -> bool {
        self.warning_enabled
    }

    /// Whether this session's one-minute warning has fired or is suppressed.
    pub fn warning_sent(&self) -> bool {
        self.warning_sent
    }

    pub fn duration_secs(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.work_secs,
            SessionKind::Break => self.break_secs,
        }
    }

    pub fn duration_minutes(&self, kind: SessionKind) -> u32 {
        self.duration_secs(kind) / SECS_PER_MINUTE
    }

    /// Configured length of the session currently running.
    pub fn total_secs(&self) -> u32 {
        self.duration_secs(self.kind)
    }

    /// 0.0 .. 1.0 elapsed fraction of the current session.
    pub fn progress_ratio(&self) -> f64 {
        let total = self.total_secs() as f64;
        let remaining = self.remaining_secs as f64;
        (1.0 - remaining / total).clamp(0.0, 1.0)
    }

    /// The persisted subset of the current state.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            work_minutes: self.duration_minutes(SessionKind::Work),
            break_minutes: self.duration_minutes(SessionKind::Break),
            display_mode: self.display_mode,
            notifications_enabled: self.notifications_enabled,
            one_minute_warning_enabled: self.warning_enabled,
            paused: self.paused,
        }
    }

    /// Status-line text: `MM:SS` or a bracketed, right-aligned percentage.
    pub fn format_status(&self) -> String {
        match self.display_mode {
            DisplayMode::Time => {
                let secs = self.remaining_secs;
                format!("{:02}:{:02}", secs / 60, secs % 60)
            }
            DisplayMode::Progress => {
                let total = self.total_secs() as f64;
                let elapsed = total - self.remaining_secs as f64;
                let percent = (100.0 * elapsed / total).round() as u32;
                format!("[{:>3}%]", percent)
            }
        }
    }

    // ── Heartbeat ────────────────────────────────────────────────────

    /// Advances the clock by one second.
    pub fn tick(&mut self) -> TickEvent {
        if self.paused {
            return TickEvent::None;
        }

        if self.remaining_secs == 0 {
            return self.roll_over();
        }

        self.remaining_secs -= 1;

        if self.remaining_secs == 0 {
            return self.roll_over();
        }

        if self.remaining_secs == WARNING_AT_SECS
            && self.warning_enabled
            && self.notifications_enabled
            && !self.warning_sent
        {
            self.warning_sent = true;
            debug!(kind = self.kind.name(), "one minute left");
            return TickEvent::OneMinuteWarning(self.kind);
        }

        TickEvent::None
    }

    fn roll_over(&mut self) -> TickEvent {
        let finished = self.kind;
        self.enter(finished.other());
        info!(
            finished = finished.name(),
            next = self.kind.name(),
            secs = self.remaining_secs,
            "session complete"
        );
        TickEvent::SessionComplete(finished)
    }

    fn enter(&mut self, kind: SessionKind) {
        self.kind = kind;
        self.remaining_secs = self.duration_secs(kind);
        self.warning_sent = false;
    }

    fn persist(&mut self) {
        let prefs = self.preferences();
        (self.on_change)(&prefs);
    }

    // ── User actions ─────────────────────────────────────────────────

    pub fn start_work(&mut self) {
        self.start(SessionKind::Work);
    }

    pub fn start_break(&mut self) {
        self.start(SessionKind::Break);
    }

    fn start(&mut self, kind: SessionKind) {
        self.enter(kind);
        self.paused = false;
        info!(kind = kind.name(), secs = self.remaining_secs, "session started");
        self.persist();
    }

    /// Flips pause without touching the remaining time or the warning flag.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!(paused = self.paused, "pause toggled");
        self.persist();
    }

    pub fn set_work_duration(&mut self, minutes: i64) {
        self.set_duration(SessionKind::Work, minutes);
    }

    pub fn set_break_duration(&mut self, minutes: i64) {
        self.set_duration(SessionKind::Break, minutes);
    }

    /// Clamps to at least one minute. Editing the running session's kind
    /// restarts its countdown at the new length.
    fn set_duration(&mut self, kind: SessionKind, minutes: i64) {
        let secs = minutes_to_secs(clamp_minutes(minutes));
        match kind {
            SessionKind::Work => self.work_secs = secs,
            SessionKind::Break => self.break_secs = secs,
        }
        if self.kind == kind {
            self.remaining_secs = secs;
            self.warning_sent = !self.warning_enabled;
        }
        debug!(kind = kind.name(), secs, "duration changed");
        self.persist();
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
        self.persist();
    }

    /// Turning notifications off re-arms the warning so it can fire again if
    /// they come back on before the one-minute mark. Clearing already shown
    /// notifications is the notifier's job.
    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
        if !enabled {
            self.warning_sent = false;
        }
        debug!(enabled, "notifications toggled");
        self.persist();
    }

    pub fn set_one_minute_warning_enabled(&mut self, enabled: bool) {
        self.warning_enabled = enabled;
        if !enabled {
            self.warning_sent = true;
        } else if self.remaining_secs > WARNING_AT_SECS {
            self.warning_sent = false;
        }
        debug!(enabled, "one-minute warning toggled");
        self.persist();
    }
}
