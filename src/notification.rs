use notify_rust::{Notification, Urgency};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const TOAST_AUTO_CLOSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationMessage {
    pub title: &'static str,
    pub body: &'static str,
}

const TIMER_FINISHED: NotificationMessage = NotificationMessage {
    title: "Timer Finished!",
    body: "Your timer has completed.",
};
const SHORT_BREAK: NotificationMessage = NotificationMessage {
    title: "Break Time!",
    body: "Take a short break.",
};
const LONG_BREAK: NotificationMessage = NotificationMessage {
    title: "Long Break!",
    body: "Great work! Take a longer break.",
};
const BACK_TO_WORK: NotificationMessage = NotificationMessage {
    title: "Back to Work!",
    body: "Time to focus.",
};

/// Message for a `from -> to` transition. Exact, case-sensitive match;
/// anything unrecognized means "don't notify".
pub fn get_notification_message(from: &str, to: &str) -> Option<NotificationMessage> {
    match (from, to) {
        ("timer", "finished") => Some(TIMER_FINISHED),
        ("Work", "ShortBreak") => Some(SHORT_BREAK),
        ("Work", "LongBreak") => Some(LONG_BREAK),
        ("ShortBreak" | "LongBreak", "Work") => Some(BACK_TO_WORK),
        _ => None,
    }
}

/// Desktop notification sender.
#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Shows `message` from a background thread; the notification daemon
    /// can stall and the UI thread must not wait on it.
    pub fn send(&self, message: &NotificationMessage) -> Option<JoinHandle<()>> {
        if !self.enabled {
            debug!(title = message.title, "desktop notifications disabled");
            return None;
        }
        let message = *message;
        Some(thread::spawn(move || {
            let shown = Notification::new()
                .summary(message.title)
                .body(message.body)
                .appname("ringtimer")
                .icon("alarm-clock")
                .urgency(Urgency::Critical)
                .show();
            if let Err(err) = shown {
                warn!(error = %err, title = message.title, "failed to show desktop notification");
            }
        }))
    }
}

/// In-terminal notification window; closes itself after a while.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toast {
    pub message: NotificationMessage,
    pub shown_at: Instant,
    pub lifetime: Duration,
}

impl Toast {
    pub fn new(message: NotificationMessage, lifetime: Duration) -> Self {
        Self::shown_at(message, lifetime, Instant::now())
    }

    pub fn shown_at(message: NotificationMessage, lifetime: Duration, shown_at: Instant) -> Self {
        Self { message, shown_at, lifetime }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.lifetime
    }
}
