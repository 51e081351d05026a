//! Driver state: feeds backend events into the view host, routes keys and
//! clicks to the surface, and forwards the resulting intents.

use crate::events::SourceItem;
use crate::format::format_display;
use crate::intent::{Command, CommandSink, Intent, TimerCallbacks};
use crate::notification::{Notifier, Toast, get_notification_message};
use crate::snapshot::{BackendEvent, PhaseChange, TimerSnapshot};
use crate::surface::Selector;
use crate::tui::{HitTarget, Theme, hit_test, render_ui};
use crate::view::basic::PRESET_CLASS;
use crate::view::{BTN_CLOSE, BTN_PAUSE, BTN_RESET, BTN_START, BTN_SWITCH, ViewHost};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub struct App<W: Write> {
    host: ViewHost,
    callbacks: TimerCallbacks,
    pending: Rc<RefCell<Vec<Intent>>>,
    sink: CommandSink<W>,
    notifier: Notifier,
    theme: Theme,
    toast: Option<Toast>,
    toast_lifetime: Duration,
    targets: Vec<HitTarget>,
    title: Option<String>,
    title_dirty: bool,
    backend_closed: bool,
    should_quit: bool,
}

impl<W: Write> App<W> {
    pub fn new(sink: CommandSink<W>, notifier: Notifier, theme: Theme, toast_lifetime: Duration) -> Self {
        let pending = Rc::new(RefCell::new(Vec::new()));
        let queue = pending.clone();
        Self {
            host: ViewHost::new(),
            callbacks: TimerCallbacks::dispatching(move |intent| queue.borrow_mut().push(intent)),
            pending,
            sink,
            notifier,
            theme,
            toast: None,
            toast_lifetime,
            targets: Vec::new(),
            title: None,
            title_dirty: false,
            backend_closed: false,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn backend_closed(&self) -> bool {
        self.backend_closed
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn host(&self) -> &ViewHost {
        &self.host
    }

    pub fn sink(&self) -> &CommandSink<W> {
        &self.sink
    }

    /// Initial pull: ask the backend for its current state.
    pub fn request_snapshot(&mut self) {
        self.send(Command::GetSnapshot);
    }

    /// New tray title since the last call, if any.
    pub fn take_title_update(&mut self) -> Option<&str> {
        if !self.title_dirty {
            return None;
        }
        self.title_dirty = false;
        self.title.as_deref()
    }

    pub fn apply(&mut self, item: SourceItem) {
        match item {
            SourceItem::Event(BackendEvent::Tick(snapshot)) => self.on_tick(snapshot),
            SourceItem::Event(BackendEvent::PhaseChange(change)) => self.on_phase_change(&change),
            SourceItem::Error(err) => warn!(error = %err, "skipping backend event"),
            SourceItem::Closed => {
                info!("backend stream ended, keeping last state on screen");
                self.backend_closed = true;
            }
        }
    }

    fn on_tick(&mut self, mut snapshot: TimerSnapshot) {
        if snapshot.display.is_empty() {
            snapshot.display = format_display(snapshot.remaining_secs);
        }
        let path = self.host.render(&snapshot, &self.callbacks);
        debug!(?path, display = %snapshot.display, "rendered tick");
        if self.title.as_deref() != Some(snapshot.tray_title.as_str()) {
            self.title = Some(snapshot.tray_title.clone());
            self.title_dirty = true;
        }
    }

    fn on_phase_change(&mut self, change: &PhaseChange) {
        let Some(message) = get_notification_message(&change.from, &change.to) else {
            debug!(from = %change.from, to = %change.to, "no notification for transition");
            return;
        };
        info!(from = %change.from, to = %change.to, title = message.title, "phase changed");
        self.notifier.send(&message);
        self.toast = Some(Toast::new(message, self.toast_lifetime));
    }

    /// Expires the toast once its lifetime is over.
    pub fn on_tick_elapsed(&mut self, now: Instant) {
        if self.toast.is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.toast.take().is_some() {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.close(),
            KeyCode::Char('q') | KeyCode::Esc => self.close(),
            KeyCode::Char(' ') => {
                if !self.click(&Selector::id(BTN_START)) {
                    self.click(&Selector::id(BTN_PAUSE));
                }
            }
            KeyCode::Char('r') => {
                self.click(&Selector::id(BTN_RESET));
            }
            KeyCode::Char('m') | KeyCode::Tab => {
                self.click(&Selector::id(BTN_SWITCH));
            }
            KeyCode::Char(c @ '1'..='9') => self.click_preset(c as usize - '1' as usize),
            _ => {}
        }
        self.flush_intents();
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.toast.take().is_some() {
            return;
        }
        if let Some(selector) = hit_test(&self.targets, mouse.column, mouse.row).cloned() {
            self.click(&selector);
        }
        self.flush_intents();
    }

    pub fn draw(&mut self, f: &mut Frame) {
        self.targets = render_ui(f, self.host.surface(), &self.theme, self.toast.as_ref());
    }

    fn click(&self, selector: &Selector) -> bool {
        let clicked = self.host.surface().click(selector);
        debug!(%selector, clicked, "click");
        clicked
    }

    fn click_preset(&self, index: usize) {
        let address = self
            .host
            .surface()
            .query_all(&Selector::class(PRESET_CLASS))
            .get(index)
            .and_then(|node| node.address());
        if let Some(selector) = address {
            self.click(&selector);
        }
    }

    /// Closing works even before anything is mounted.
    fn close(&mut self) {
        if !self.click(&Selector::id(BTN_CLOSE)) {
            self.should_quit = true;
        }
    }

    fn flush_intents(&mut self) {
        let intents: Vec<Intent> = self.pending.borrow_mut().drain(..).collect();
        for intent in intents {
            debug!(?intent, "intent");
            if intent == Intent::Close {
                self.should_quit = true;
                continue;
            }
            let Some(mode) = self.host.mode() else {
                continue;
            };
            if let Some(command) = Command::for_intent(intent, mode) {
                self.send(command);
            }
        }
    }

    fn send(&mut self, command: Command) {
        if let Err(err) = self.sink.send(&command) {
            error!(error = %err, ?command, "failed to send command to backend");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::TOAST_AUTO_CLOSE;
    use crate::snapshot::Mode;
    use crate::tui::get_theme;
    use crate::view::testing::{basic_snapshot, pomodoro_snapshot};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::Value;

    fn app() -> App<Vec<u8>> {
        App::new(CommandSink::new(Vec::new()), Notifier::new(false), get_theme("default"), TOAST_AUTO_CLOSE)
    }

    fn commands(app: &App<Vec<u8>>) -> Vec<String> {
        String::from_utf8(app.sink().get_ref().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["command"].as_str().unwrap().to_string())
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tick(snapshot: TimerSnapshot) -> SourceItem {
        SourceItem::Event(BackendEvent::Tick(snapshot))
    }

    fn phase_change(from: &str, to: &str) -> SourceItem {
        SourceItem::Event(BackendEvent::PhaseChange(PhaseChange { from: from.into(), to: to.into() }))
    }

    #[test]
    fn initial_pull_requests_snapshot() {
        let mut app = app();
        app.request_snapshot();
        assert_eq!(commands(&app), vec!["get_snapshot"]);
    }

    #[test]
    fn keys_click_the_mounted_controls() {
        let mut app = app();
        app.apply(tick(basic_snapshot()));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Char('r')));
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Char('m')));
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(commands(&app), vec!["start_timer", "reset_timer", "set_duration", "switch_to_pomodoro"]);
        assert!(!app.should_quit());
    }

    #[test]
    fn space_pauses_a_running_timer() {
        let mut app = app();
        app.apply(tick(TimerSnapshot { is_running: true, ..pomodoro_snapshot() }));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(commands(&app), vec!["pause_timer", "switch_to_basic"]);
    }

    #[test]
    fn close_quits_without_command() {
        let mut app = app();
        app.apply(tick(basic_snapshot()));
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
        assert!(commands(&app).is_empty());
    }

    #[test]
    fn ctrl_c_quits_before_first_snapshot() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn mode_change_from_backend_remounts() {
        let mut app = app();
        app.apply(tick(basic_snapshot()));
        app.apply(tick(pomodoro_snapshot()));
        assert_eq!(app.host().mode(), Some(Mode::Pomodoro));
        app.handle_key(key(KeyCode::Char('1')));
        assert!(commands(&app).is_empty());
    }

    #[test]
    fn phase_change_shows_toast_that_expires_or_is_dismissed() {
        let mut app = app();
        app.apply(tick(pomodoro_snapshot()));
        app.apply(phase_change("Work", "LongBreak"));
        let toast = *app.toast().unwrap();
        assert_eq!(toast.message.title, "Long Break!");

        app.on_tick_elapsed(toast.shown_at + Duration::from_secs(1));
        assert!(app.toast().is_some());
        app.on_tick_elapsed(toast.shown_at + TOAST_AUTO_CLOSE);
        assert!(app.toast().is_none());

        app.apply(phase_change("LongBreak", "Work"));
        // First key only dismisses.
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.toast().is_none());
        assert!(commands(&app).is_empty());
    }

    #[test]
    fn unknown_transition_is_silent() {
        let mut app = app();
        app.apply(phase_change("unknown", "unknown"));
        assert!(app.toast().is_none());
    }

    #[test]
    fn tray_title_reported_once_per_change() {
        let mut app = app();
        app.apply(tick(basic_snapshot()));
        assert_eq!(app.take_title_update(), Some("⏱ 25:00"));
        assert_eq!(app.take_title_update(), None);
        app.apply(tick(basic_snapshot()));
        assert_eq!(app.take_title_update(), None);
        app.apply(tick(TimerSnapshot { tray_title: "⏱ 24:59".into(), ..basic_snapshot() }));
        assert_eq!(app.take_title_update(), Some("⏱ 24:59"));
    }

    #[test]
    fn mouse_click_hits_painted_button() {
        let mut app = app();
        app.apply(tick(basic_snapshot()));
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let reset = app.targets.iter().find(|t| t.selector == Selector::id(BTN_RESET)).unwrap().area;
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: reset.x + 2,
            row: reset.y + 1,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(commands(&app), vec!["reset_timer"]);
    }

    #[test]
    fn missing_display_is_formatted_from_remaining() {
        let mut app = app();
        app.apply(tick(TimerSnapshot { display: String::new(), remaining_secs: 3661, ..basic_snapshot() }));
        assert_eq!(app.host().surface().text(&Selector::class("timer-display")), Some("1:01:01"));
    }

    #[test]
    fn closed_stream_keeps_running() {
        let mut app = app();
        app.apply(tick(basic_snapshot()));
        app.apply(SourceItem::Closed);
        assert!(app.backend_closed());
        assert!(!app.should_quit());
        assert!(app.host().surface().text(&Selector::class("timer-display")).is_some());
    }
}
