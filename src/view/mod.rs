//! The two timer views and the host that mounts the right one.
//!
//! Both views follow the same contract: when the structural fields of a
//! snapshot (`is_running`, plus `phase` for pomodoro) match what built the
//! current surface, only text and the ring are patched and existing click
//! listeners survive. Otherwise the surface is rebuilt and rewired.

pub mod basic;
pub mod pomodoro;

pub use basic::BasicView;
pub use pomodoro::PomodoroView;

use crate::intent::TimerCallbacks;
use crate::snapshot::{Mode, TimerSnapshot};
use crate::surface::{Node, Selector, Surface};
use tracing::debug;

pub const DISPLAY_CLASS: &str = "timer-display";
pub const BTN_START: &str = "btn-start";
pub const BTN_PAUSE: &str = "btn-pause";
pub const BTN_RESET: &str = "btn-reset";
pub const BTN_SWITCH: &str = "btn-switch";
pub const BTN_CLOSE: &str = "btn-close";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    Patched,
    Rebuilt,
}

fn has_display(surface: &Surface) -> bool {
    surface.query(&Selector::class(DISPLAY_CLASS)).is_some()
}

fn close_button() -> Node {
    Node::button(BTN_CLOSE, "btn-close", "×").attr("aria-label", "Close")
}

/// Start and Pause are mutually exclusive; Reset is always there.
fn timer_controls(is_running: bool) -> Node {
    let toggle = if is_running {
        Node::button(BTN_PAUSE, "btn", "Pause")
    } else {
        Node::button(BTN_START, "btn btn-primary", "Start")
    };
    Node::div("timer-controls")
        .child(toggle)
        .child(Node::button(BTN_RESET, "btn", "Reset"))
}

fn switch_button(label: &str) -> Node {
    Node::button(BTN_SWITCH, "btn btn-mode", label)
}

/// Wires the controls both views share. Absent controls stay inert.
fn wire_common(surface: &mut Surface, callbacks: &TimerCallbacks) {
    surface.on_click(&Selector::id(BTN_START), callbacks.on_start.clone());
    surface.on_click(&Selector::id(BTN_PAUSE), callbacks.on_pause.clone());
    surface.on_click(&Selector::id(BTN_RESET), callbacks.on_reset.clone());
    surface.on_click(&Selector::id(BTN_SWITCH), callbacks.on_switch_mode.clone());
    surface.on_click(&Selector::id(BTN_CLOSE), callbacks.on_close.clone());
}

enum Mounted {
    Basic(BasicView),
    Pomodoro(PomodoroView),
}

impl Mounted {
    fn mode(&self) -> Mode {
        match self {
            Self::Basic(_) => Mode::Basic,
            Self::Pomodoro(_) => Mode::Pomodoro,
        }
    }
}

/// Owns one surface and the retained state of the view mounted on it.
///
/// A mode change discards both together, so a view never patches a surface
/// it did not build.
#[derive(Default)]
pub struct ViewHost {
    surface: Surface,
    mounted: Option<Mounted>,
}

impl ViewHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mounted.as_ref().map(Mounted::mode)
    }

    pub fn render(&mut self, snapshot: &TimerSnapshot, callbacks: &TimerCallbacks) -> RenderPath {
        if self.mode() != Some(snapshot.mode) {
            debug!(from = ?self.mode(), to = ?snapshot.mode, "remounting surface");
            self.surface = Surface::new();
            self.mounted = None;
        }
        let mounted = self.mounted.get_or_insert_with(|| match snapshot.mode {
            Mode::Basic => Mounted::Basic(BasicView::new()),
            Mode::Pomodoro => Mounted::Pomodoro(PomodoroView::new()),
        });
        match mounted {
            Mounted::Basic(view) => view.render(&mut self.surface, snapshot, callbacks),
            Mounted::Pomodoro(view) => view.render(&mut self.surface, snapshot, callbacks),
        }
    }
}
