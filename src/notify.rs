use notify_rust::Notification;
use tracing::debug;

use crate::clock::{SessionClock, SessionKind, TickEvent};

const APP_NAME: &str = "pomobar";
const ICON: &str = "alarm-clock";
#[cfg(all(unix, not(target_os = "macos")))]
const MAX_TRACKED: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

impl Message {
    fn new(title: &str, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Decides what, if anything, to show for a tick event.
///
/// `clock` must already reflect the tick, so after a rollover its current
/// kind is the session that is about to run.
pub fn notification_for(event: TickEvent, clock: &SessionClock) -> Option<Message> {
    if !clock.notifications_enabled() {
        return None;
    }

    match event {
        TickEvent::None => None,
        TickEvent::SessionComplete(finished) => {
            let next_minutes = clock.duration_minutes(finished.other());
            Some(match finished {
                SessionKind::Work => Message::new(
                    "Work Session Complete",
                    format!("Time for a break ({} min).", next_minutes),
                ),
                SessionKind::Break => Message::new(
                    "Break Over",
                    format!("Back to work ({} min).", next_minutes),
                ),
            })
        }
        TickEvent::OneMinuteWarning(kind) => Some(match kind {
            SessionKind::Work => Message::new("Work Almost Done", "1 minute remaining"),
            SessionKind::Break => Message::new("Break Ending Soon", "1 minute remaining"),
        }),
    }
}

/// Delivery side of notifications. Implementations must not block.
pub trait Notifier {
    fn deliver(&mut self, message: &Message);

    /// Withdraws everything this notifier has put on screen.
    fn clear_all(&mut self);
}

/// Desktop notifications through the platform notification service.
#[derive(Default)]
pub struct DesktopNotifier {
    #[cfg(all(unix, not(target_os = "macos")))]
    shown: Vec<notify_rust::NotificationHandle>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn build(message: &Message) -> Notification {
        let mut n = Notification::new();
        n.summary(&message.title)
            .body(&message.body)
            .appname(APP_NAME)
            .icon(ICON);
        n
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
impl Notifier for DesktopNotifier {
    fn deliver(&mut self, message: &Message) {
        match Self::build(message).urgency(notify_rust::Urgency::Normal).show() {
            Ok(handle) => {
                if self.shown.len() >= MAX_TRACKED {
                    self.shown.remove(0);
                }
                self.shown.push(handle);
            }
            Err(e) => debug!(error = %e, title = %message.title, "notification not delivered"),
        }
    }

    fn clear_all(&mut self) {
        let count = self.shown.len();
        for handle in self.shown.drain(..) {
            handle.close();
        }
        debug!(count, "notifications cleared");
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
impl Notifier for DesktopNotifier {
    fn deliver(&mut self, message: &Message) {
        if let Err(e) = Self::build(message).show().map(|_| ()) {
            debug!(error = %e, title = %message.title, "notification not delivered");
        }
    }

    // The platform offers no handle to withdraw a shown notification.
    fn clear_all(&mut self) {}
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::prefs::Preferences;

    /// Captures deliveries instead of showing them.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        pub delivered: Vec<Message>,
        pub on_screen: Vec<Message>,
        pub clears: usize,
    }

    impl Notifier for RecordingNotifier {
        fn deliver(&mut self, message: &Message) {
            self.delivered.push(message.clone());
            self.on_screen.push(message.clone());
        }

        fn clear_all(&mut self) {
            self.on_screen.clear();
            self.clears += 1;
        }
    }

    fn clock(work: u32, brk: u32) -> SessionClock {
        let prefs = Preferences {
            work_minutes: work,
            break_minutes: brk,
            ..Preferences::default()
        };
        SessionClock::new(prefs, |_| {})
    }

    #[test]
    fn work_completion_announces_break_length() {
        let c = clock(25, 5);
        let msg = notification_for(TickEvent::SessionComplete(SessionKind::Work), &c).unwrap();
        assert_eq!(msg.title, "Work Session Complete");
        assert_eq!(msg.body, "Time for a break (5 min).");
    }

    #[test]
    fn break_completion_announces_work_length() {
        let c = clock(50, 10);
        let msg = notification_for(TickEvent::SessionComplete(SessionKind::Break), &c).unwrap();
        assert_eq!(msg.title, "Break Over");
        assert_eq!(msg.body, "Back to work (50 min).");
    }

    #[test]
    fn warnings_name_the_session() {
        let c = clock(25, 5);
        let work = notification_for(TickEvent::OneMinuteWarning(SessionKind::Work), &c).unwrap();
        assert_eq!(work, Message::new("Work Almost Done", "1 minute remaining"));

        let brk = notification_for(TickEvent::OneMinuteWarning(SessionKind::Break), &c).unwrap();
        assert_eq!(brk, Message::new("Break Ending Soon", "1 minute remaining"));
    }

    #[test]
    fn nothing_for_quiet_ticks() {
        let c = clock(25, 5);
        assert_eq!(notification_for(TickEvent::None, &c), None);
    }

    #[test]
    fn disabled_notifications_suppress_everything() {
        let mut c = clock(25, 5);
        c.set_notifications_enabled(false);
        for event in [
            TickEvent::SessionComplete(SessionKind::Work),
            TickEvent::SessionComplete(SessionKind::Break),
            TickEvent::OneMinuteWarning(SessionKind::Work),
        ] {
            assert_eq!(notification_for(event, &c), None);
        }
    }

    #[test]
    fn recording_notifier_clears() {
        let mut n = RecordingNotifier::default();
        n.deliver(&Message::new("a", "b"));
        n.clear_all();
        assert_eq!(n.delivered.len(), 1);
        assert!(n.on_screen.is_empty());
        assert_eq!(n.clears, 1);
    }
}
