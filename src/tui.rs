//! Paints a [`Surface`] into a ratatui frame.
//!
//! The surface stays the single source of truth: the painter only reads
//! it, and reports where each button landed so mouse clicks can be routed
//! back to the element that owns the listeners.

use crate::notification::Toast;
use crate::ring::{mounted_offset, ring_fill_ratio};
use crate::snapshot::Phase;
use crate::surface::{Node, Selector, Surface};
use crate::view::basic::PRESET_CLASS;
use crate::view::pomodoro::SESSION_DOTS_CLASS;
use crate::view::{BTN_CLOSE, BTN_PAUSE, BTN_RESET, BTN_START, BTN_SWITCH, DISPLAY_CLASS};
use ratatui::{prelude::*, widgets::*};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub work_color: Color,
    pub short_break_color: Color,
    pub long_break_color: Color,
    pub border_color: Color,
    pub accent_color: Color,
}

impl Theme {
    pub fn phase_color(&self, phase: Option<Phase>) -> Color {
        match phase {
            Some(Phase::Work) => self.work_color,
            Some(Phase::ShortBreak) => self.short_break_color,
            Some(Phase::LongBreak) => self.long_break_color,
            None => self.accent_color,
        }
    }
}

pub const THEMES: &[&str] = &["default", "nord", "dracula", "gruvbox", "solarized"];

pub fn get_theme(name: &str) -> Theme {
    match name {
        "nord" => Theme {
            work_color: Color::Rgb(136, 192, 255),
            short_break_color: Color::Rgb(255, 20, 60),
            long_break_color: Color::Rgb(0, 255, 100),
            border_color: Color::Rgb(100, 200, 255),
            accent_color: Color::Rgb(255, 100, 255),
        },
        "dracula" => Theme {
            work_color: Color::Rgb(189, 147, 249),
            short_break_color: Color::Rgb(255, 0, 85),
            long_break_color: Color::Rgb(0, 255, 0),
            border_color: Color::Rgb(200, 100, 255),
            accent_color: Color::Rgb(255, 0, 255),
        },
        "gruvbox" => Theme {
            work_color: Color::Rgb(254, 128, 25),
            short_break_color: Color::Rgb(255, 50, 0),
            long_break_color: Color::Rgb(255, 255, 0),
            border_color: Color::Rgb(255, 200, 100),
            accent_color: Color::Rgb(255, 150, 0),
        },
        "solarized" => Theme {
            work_color: Color::Rgb(42, 161, 152),
            short_break_color: Color::Rgb(255, 0, 0),
            long_break_color: Color::Rgb(150, 255, 0),
            border_color: Color::Rgb(100, 200, 255),
            accent_color: Color::Rgb(255, 200, 0),
        },
        _ => Theme {
            work_color: Color::Rgb(100, 181, 246),
            short_break_color: Color::Rgb(255, 0, 100),
            long_break_color: Color::Rgb(0, 255, 150),
            border_color: Color::Rgb(0, 200, 255),
            accent_color: Color::Rgb(255, 100, 0),
        },
    }
}

/// Screen area of a painted button and the selector that clicks it.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTarget {
    pub area: Rect,
    pub selector: Selector,
}

pub fn hit_test(targets: &[HitTarget], column: u16, row: u16) -> Option<&Selector> {
    targets
        .iter()
        .find(|t| {
            column >= t.area.x
                && column < t.area.x.saturating_add(t.area.width)
                && row >= t.area.y
                && row < t.area.y.saturating_add(t.area.height)
        })
        .map(|t| &t.selector)
}

fn key_hint(node: &Node, preset_index: Option<usize>) -> String {
    if let Some(idx) = preset_index {
        return (idx + 1).to_string();
    }
    match node.id.as_deref() {
        Some(BTN_START | BTN_PAUSE) => "space".into(),
        Some(BTN_RESET) => "r".into(),
        Some(BTN_SWITCH) => "m".into(),
        Some(BTN_CLOSE) => "q".into(),
        _ => String::new(),
    }
}

fn surface_phase(surface: &Surface) -> Option<Phase> {
    let container = surface.query(&Selector::class("timer-container"))?;
    match container.data.get("phase")?.as_str() {
        "Work" => Some(Phase::Work),
        "ShortBreak" => Some(Phase::ShortBreak),
        "LongBreak" => Some(Phase::LongBreak),
        _ => None,
    }
}

fn child_buttons<'a>(surface: &'a Surface, container: &str) -> Vec<&'a Node> {
    surface
        .query(&Selector::class(container))
        .map(|n| n.children.iter().filter(|c| c.tag == "button").collect())
        .unwrap_or_default()
}

fn render_button_row(f: &mut Frame, area: Rect, buttons: &[&Node], presets: bool, color: Color) -> Vec<HitTarget> {
    if buttons.is_empty() {
        return Vec::new();
    }

    let labels: Vec<String> = buttons
        .iter()
        .enumerate()
        .map(|(i, b)| format!("[{}] {}", key_hint(b, presets.then_some(i)), b.text))
        .collect();

    let mut constraints = vec![Constraint::Min(0)];
    constraints.extend(labels.iter().map(|l| Constraint::Length(l.chars().count() as u16 + 4)));
    constraints.push(Constraint::Min(0));
    let cells = Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area);

    let mut targets = Vec::new();
    for (i, (button, label)) in buttons.iter().zip(labels).enumerate() {
        let cell = cells[i + 1];
        let primary = button.has_class("btn-primary");
        let style = if primary {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        f.render_widget(
            Paragraph::new(label).style(style).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(if primary { color } else { Color::DarkGray })),
            ),
            cell,
        );
        if let Some(selector) = button.address() {
            targets.push(HitTarget { area: cell, selector });
        }
    }
    targets
}

/// Draws the mounted surface (and a toast, if any). Returns button areas.
pub fn render_ui(f: &mut Frame, surface: &Surface, theme: &Theme, toast: Option<&Toast>) -> Vec<HitTarget> {
    let mut targets = Vec::new();
    let color = theme.phase_color(surface_phase(surface));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(f.size());

    // Header
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(9)])
        .split(chunks[0]);
    let label = surface.text(&Selector::class("mode-label")).unwrap_or("");
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_color))
            .title(Span::styled(
                format!(" 🍅 {label} "),
                Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD),
            )),
        header_cols[0],
    );
    if let Some(close) = surface.query(&Selector::id(BTN_CLOSE)) {
        f.render_widget(
            Paragraph::new(format!("[{}] {}", key_hint(close, None), close.text))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
            header_cols[1],
        );
        if let Some(selector) = close.address() {
            targets.push(HitTarget { area: header_cols[1], selector });
        }
    }

    let offset = mounted_offset(surface);
    let dots = surface.text(&Selector::class(SESSION_DOTS_CLASS));
    let presets: Vec<&Node> = surface.query_all(&Selector::class(PRESET_CLASS));
    let switch: Vec<&Node> = surface.query(&Selector::id(BTN_SWITCH)).into_iter().collect();

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(if offset.is_some() { 3 } else { 0 }),
            Constraint::Length(if dots.is_some() { 2 } else { 0 }),
            Constraint::Length(3),
            Constraint::Length(if presets.is_empty() { 0 } else { 3 }),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    // Timer
    if let Some(display) = surface.text(&Selector::class(DISPLAY_CLASS)) {
        f.render_widget(
            Paragraph::new(display)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(Color::DarkGray))),
            sections[1],
        );
    }

    // Ring
    if let Some(offset) = offset {
        f.render_widget(
            Gauge::default()
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
                .gauge_style(Style::default().fg(color).bg(Color::Black))
                .ratio(ring_fill_ratio(offset)),
            sections[2],
        );
    }

    if let Some(dots) = dots {
        f.render_widget(
            Paragraph::new(dots).style(Style::default().fg(Color::Gray)).alignment(Alignment::Center),
            sections[3],
        );
    }

    targets.extend(render_button_row(f, sections[4], &child_buttons(surface, "timer-controls"), false, color));
    targets.extend(render_button_row(f, sections[5], &presets, true, color));
    targets.extend(render_button_row(f, sections[6], &switch, false, color));

    if let Some(toast) = toast {
        render_toast(f, toast, theme);
    }
    targets
}

fn render_toast(f: &mut Frame, toast: &Toast, theme: &Theme) {
    let area = centered_rect(50, 30, f.size());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            toast.message.title,
            Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(toast.message.body, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border_color)),
        ),
        area,
    );
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}
