use super::{RenderPath, DISPLAY_CLASS, close_button, has_display, switch_button, timer_controls, wire_common};
use crate::intent::TimerCallbacks;
use crate::snapshot::TimerSnapshot;
use crate::surface::{Node, Selector, Surface};
use std::rc::Rc;
use tracing::debug;

pub const PRESET_CLASS: &str = "btn-preset";
const DEFAULT_PRESET_SECS: u32 = 300;

/// `(seconds, label)` for the fixed duration presets.
pub const PRESETS: [(u32, &str); 4] = [(300, "5m"), (600, "10m"), (900, "15m"), (1800, "30m")];

/// Simple countdown view: display, Start/Pause, Reset, presets.
#[derive(Debug, Default)]
pub struct BasicView {
    last_is_running: Option<bool>,
}

impl BasicView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the next render to rebuild. Needed when the surface was
    /// replaced behind this view's back.
    pub fn reset(&mut self) {
        self.last_is_running = None;
    }

    pub fn render(&mut self, surface: &mut Surface, snapshot: &TimerSnapshot, callbacks: &TimerCallbacks) -> RenderPath {
        if has_display(surface) && self.last_is_running == Some(snapshot.is_running) {
            surface.set_text(&Selector::class(DISPLAY_CLASS), snapshot.display.as_str());
            return RenderPath::Patched;
        }

        debug!(is_running = snapshot.is_running, previous = ?self.last_is_running, "rebuilding basic view");
        self.last_is_running = Some(snapshot.is_running);
        surface.replace_children(vec![template(snapshot)]);
        wire_common(surface, callbacks);
        wire_presets(surface, callbacks);
        RenderPath::Rebuilt
    }
}

fn template(snapshot: &TimerSnapshot) -> Node {
    let presets = PRESETS.iter().map(|(secs, label)| {
        Node::new("button")
            .class("btn btn-preset")
            .data("secs", secs.to_string())
            .text(*label)
    });

    Node::div("timer-container")
        .child(close_button())
        .child(Node::div("mode-label").text("Basic Timer"))
        .child(Node::div(DISPLAY_CLASS).text(snapshot.display.as_str()))
        .child(timer_controls(snapshot.is_running))
        .child(Node::div("presets").children(presets))
        .child(switch_button("Switch to Pomodoro"))
}

fn wire_presets(surface: &mut Surface, callbacks: &TimerCallbacks) {
    surface.for_each_mut(&Selector::class(PRESET_CLASS), |button| {
        let secs = button
            .data
            .get("secs")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PRESET_SECS);
        let on_set_duration = callbacks.on_set_duration.clone();
        button.add_listener(Rc::new(move || on_set_duration(secs)));
    });
}
