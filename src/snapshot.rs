use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Basic,
    Pomodoro,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Wire name, also used for `data-phase` and notification lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::ShortBreak => "ShortBreak",
            Self::LongBreak => "LongBreak",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time timer state pushed by the backend on every tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub mode: Mode,
    /// Pre-formatted clock; may be empty, in which case it is derived from
    /// `remaining_secs`.
    #[serde(default)]
    pub display: String,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub is_running: bool,
    #[serde(default)]
    pub is_finished: bool,
    #[serde(default)]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub session_display: Option<String>,
    #[serde(default)]
    pub tray_title: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: String,
    pub to: String,
}

/// One line of the backend event stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "payload")]
pub enum BackendEvent {
    #[serde(rename = "timer:tick")]
    Tick(TimerSnapshot),
    #[serde(rename = "timer:phase-change")]
    PhaseChange(PhaseChange),
}
