//! User intents and the commands they become on the wire.

use crate::snapshot::Mode;
use serde::Serialize;
use std::io::{self, Write};
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    Reset,
    SetDuration(u32),
    SwitchMode,
    Close,
}

/// The handlers a view wires to its controls.
#[derive(Clone)]
pub struct TimerCallbacks {
    pub on_start: Rc<dyn Fn()>,
    pub on_pause: Rc<dyn Fn()>,
    pub on_reset: Rc<dyn Fn()>,
    pub on_set_duration: Rc<dyn Fn(u32)>,
    pub on_switch_mode: Rc<dyn Fn()>,
    pub on_close: Rc<dyn Fn()>,
}

impl TimerCallbacks {
    /// Routes every control through a single intent handler.
    pub fn dispatching(handler: impl Fn(Intent) + 'static) -> Self {
        let handler: Rc<dyn Fn(Intent)> = Rc::new(handler);
        let fire = |intent: Intent| -> Rc<dyn Fn()> {
            let handler = handler.clone();
            Rc::new(move || handler(intent))
        };
        let on_set_duration: Rc<dyn Fn(u32)> = {
            let handler = handler.clone();
            Rc::new(move |secs| handler(Intent::SetDuration(secs)))
        };
        Self {
            on_start: fire(Intent::Start),
            on_pause: fire(Intent::Pause),
            on_reset: fire(Intent::Reset),
            on_set_duration,
            on_switch_mode: fire(Intent::SwitchMode),
            on_close: fire(Intent::Close),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    GetSnapshot,
    StartTimer,
    PauseTimer,
    ResetTimer,
    SetDuration { secs: u32 },
    SwitchToBasic,
    SwitchToPomodoro,
}

impl Command {
    /// Wire command for an intent. `Close` stays local to the front-end.
    pub fn for_intent(intent: Intent, current: Mode) -> Option<Self> {
        Some(match intent {
            Intent::Start => Self::StartTimer,
            Intent::Pause => Self::PauseTimer,
            Intent::Reset => Self::ResetTimer,
            Intent::SetDuration(secs) => Self::SetDuration { secs },
            Intent::SwitchMode => match current {
                Mode::Basic => Self::SwitchToPomodoro,
                Mode::Pomodoro => Self::SwitchToBasic,
            },
            Intent::Close => return None,
        })
    }
}

#[derive(Serialize)]
struct CommandLine<'a> {
    #[serde(flatten)]
    command: &'a Command,
    at: String,
}

/// Writes one JSON object per command, flushing after each.
pub struct CommandSink<W: Write> {
    out: W,
}

impl<W: Write> CommandSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn send(&mut self, command: &Command) -> io::Result<()> {
        let line = CommandLine { command, at: chrono::Local::now().to_rfc3339() };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        debug!(?command, "command sent");
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
