use super::{RenderPath, DISPLAY_CLASS, close_button, has_display, switch_button, timer_controls, wire_common};
use crate::intent::TimerCallbacks;
use crate::ring::{progress_ring, update_progress_ring};
use crate::snapshot::{Phase, TimerSnapshot};
use crate::surface::{Node, Selector, Surface};
use tracing::debug;

pub const SESSION_DOTS_CLASS: &str = "session-dots";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Retained {
    is_running: bool,
    phase: Option<Phase>,
}

/// Session view: progress ring, session dots, Start/Pause, Reset.
#[derive(Debug, Default)]
pub struct PomodoroView {
    last: Option<Retained>,
}

impl PomodoroView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn render(&mut self, surface: &mut Surface, snapshot: &TimerSnapshot, callbacks: &TimerCallbacks) -> RenderPath {
        let current = Retained { is_running: snapshot.is_running, phase: snapshot.phase };

        if has_display(surface) && self.last == Some(current) {
            surface.set_text(&Selector::class(DISPLAY_CLASS), snapshot.display.as_str());
            update_progress_ring(surface, snapshot.remaining_secs, snapshot.total_secs);
            surface.set_text(&Selector::class(SESSION_DOTS_CLASS), session_dots(snapshot));
            return RenderPath::Patched;
        }

        debug!(?current, previous = ?self.last, "rebuilding pomodoro view");
        self.last = Some(current);
        surface.replace_children(vec![template(snapshot)]);
        wire_common(surface, callbacks);
        RenderPath::Rebuilt
    }
}

fn session_dots(snapshot: &TimerSnapshot) -> &str {
    snapshot.session_display.as_deref().unwrap_or("")
}

fn template(snapshot: &TimerSnapshot) -> Node {
    let mut container = Node::div("timer-container");
    if let Some(phase) = snapshot.phase {
        container = container.data("phase", phase.as_str());
    }

    container
        .child(close_button())
        .child(Node::div("mode-label").text("Pomodoro"))
        .child(
            Node::div("timer-ring-wrapper")
                .child(progress_ring(snapshot.remaining_secs, snapshot.total_secs))
                .child(Node::div("timer-ring-content").child(Node::div(DISPLAY_CLASS).text(snapshot.display.as_str()))),
        )
        .child(Node::div(SESSION_DOTS_CLASS).text(session_dots(snapshot)))
        .child(timer_controls(snapshot.is_running))
        .child(switch_button("Switch to Basic"))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{pomodoro_snapshot, recording};
    use super::super::{BTN_CLOSE, BTN_PAUSE, BTN_RESET, BTN_START, BTN_SWITCH};
    use super::*;
    use crate::intent::Intent;
    use crate::ring::{RING_CIRCUMFERENCE, mounted_offset};

    #[test]
    fn renders_label_dots_and_switch() {
        let (callbacks, _) = recording();
        let mut surface = Surface::new();
        PomodoroView::new().render(
            &mut surface,
            &TimerSnapshot { session_display: Some("● ○ ○ ○".into()), ..pomodoro_snapshot() },
            &callbacks,
        );
        assert_eq!(surface.text(&Selector::class("mode-label")), Some("Pomodoro"));
        assert_eq!(surface.text(&Selector::class(SESSION_DOTS_CLASS)), Some("● ○ ○ ○"));
        assert_eq!(surface.text(&Selector::id(BTN_SWITCH)), Some("Switch to Basic"));
        assert!(surface.query(&Selector::class("progress-ring-bg")).is_some());
        assert!(surface.query(&Selector::class("btn-preset")).is_none());
        assert_eq!(surface.query(&Selector::class("timer-container")).unwrap().data["phase"], "Work");
    }

    #[test]
    fn missing_session_display_renders_empty_dots() {
        let (callbacks, _) = recording();
        let mut surface = Surface::new();
        PomodoroView::new().render(&mut surface, &TimerSnapshot { session_display: None, ..pomodoro_snapshot() }, &callbacks);
        assert_eq!(surface.text(&Selector::class(SESSION_DOTS_CLASS)), Some(""));
    }

    #[test]
    fn start_or_pause_by_running_state() {
        let (callbacks, _) = recording();
        let mut surface = Surface::new();
        PomodoroView::new().render(&mut surface, &pomodoro_snapshot(), &callbacks);
        assert!(surface.query(&Selector::id(BTN_START)).is_some());
        assert!(surface.query(&Selector::id(BTN_PAUSE)).is_none());

        PomodoroView::new().render(&mut surface, &TimerSnapshot { is_running: true, ..pomodoro_snapshot() }, &callbacks);
        assert!(surface.query(&Selector::id(BTN_PAUSE)).is_some());
        assert!(surface.query(&Selector::id(BTN_START)).is_none());
    }

    #[test]
    fn wires_all_callback_buttons() {
        let (callbacks, seen) = recording();
        let mut surface = Surface::new();
        let mut view = PomodoroView::new();
        view.render(&mut surface, &pomodoro_snapshot(), &callbacks);
        surface.click(&Selector::id(BTN_START));

        view.reset();
        view.render(&mut surface, &TimerSnapshot { is_running: true, ..pomodoro_snapshot() }, &callbacks);
        surface.click(&Selector::id(BTN_PAUSE));
        surface.click(&Selector::id(BTN_RESET));
        surface.click(&Selector::id(BTN_SWITCH));
        surface.click(&Selector::id(BTN_CLOSE));

        assert_eq!(
            *seen.borrow(),
            vec![Intent::Start, Intent::Pause, Intent::Reset, Intent::SwitchMode, Intent::Close]
        );
    }

    #[test]
    fn tick_patches_display_ring_and_dots() {
        let (callbacks, _) = recording();
        let mut surface = Surface::new();
        let mut view = PomodoroView::new();
        view.render(&mut surface, &pomodoro_snapshot(), &callbacks);
        assert!(mounted_offset(&surface).unwrap().abs() < 1e-9);

        let path = view.render(
            &mut surface,
            &TimerSnapshot {
                display: "12:30".into(),
                remaining_secs: 750,
                session_display: Some("● ○ ○ ○".into()),
                ..pomodoro_snapshot()
            },
            &callbacks,
        );
        assert_eq!(path, RenderPath::Patched);
        assert_eq!(surface.text(&Selector::class(DISPLAY_CLASS)), Some("12:30"));
        assert_eq!(surface.text(&Selector::class(SESSION_DOTS_CLASS)), Some("● ○ ○ ○"));
        assert!((mounted_offset(&surface).unwrap() - RING_CIRCUMFERENCE * 0.5).abs() < 1e-5);
    }

    #[test]
    fn patch_clears_dots_when_session_display_disappears() {
        let (callbacks, _) = recording();
        let mut surface = Surface::new();
        let mut view = PomodoroView::new();
        view.render(&mut surface, &pomodoro_snapshot(), &callbacks);
        view.render(&mut surface, &TimerSnapshot { session_display: None, ..pomodoro_snapshot() }, &callbacks);
        assert_eq!(surface.text(&Selector::class(SESSION_DOTS_CLASS)), Some(""));
    }

    #[test]
    fn phase_change_rebuilds_with_live_controls() {
        let (callbacks, seen) = recording();
        let mut surface = Surface::new();
        let mut view = PomodoroView::new();
        let running = TimerSnapshot { is_running: true, ..pomodoro_snapshot() };
        view.render(&mut surface, &running, &callbacks);

        let path = view.render(&mut surface, &TimerSnapshot { phase: Some(Phase::ShortBreak), ..running }, &callbacks);
        assert_eq!(path, RenderPath::Rebuilt);
        let pause = surface.query(&Selector::id(BTN_PAUSE)).unwrap();
        assert_eq!(pause.listener_count(), 1);
        surface.click(&Selector::id(BTN_PAUSE));
        assert_eq!(*seen.borrow(), vec![Intent::Pause]);
    }

    #[test]
    fn identical_snapshot_twice_is_stable() {
        let (callbacks, _) = recording();
        let mut surface = Surface::new();
        let mut view = PomodoroView::new();
        view.render(&mut surface, &pomodoro_snapshot(), &callbacks);
        let before = surface.to_markup();
        assert_eq!(view.render(&mut surface, &pomodoro_snapshot(), &callbacks), RenderPath::Patched);
        assert_eq!(surface.to_markup(), before);
    }

    #[test]
    fn patch_against_bare_surface_with_display_does_not_panic() {
        let (callbacks, _) = recording();
        let mut view = PomodoroView::new();
        let mut surface = Surface::new();
        view.render(&mut surface, &pomodoro_snapshot(), &callbacks);

        // Display mounted out-of-band, no ring: patch must tolerate it.
        let mut bare = Surface::new();
        bare.replace_children(vec![Node::div(DISPLAY_CLASS)]);
        view.render(&mut bare, &pomodoro_snapshot(), &callbacks);
        view.render(&mut bare, &pomodoro_snapshot(), &callbacks);
        assert_eq!(bare.text(&Selector::class(DISPLAY_CLASS)), Some("25:00"));
        assert_eq!(mounted_offset(&bare), None);
    }
}
