//! 🍅 ringtimer - terminal front-end for a pomodoro/countdown timer backend.
//!
//! The backend owns the countdown and pushes [`snapshot::TimerSnapshot`]s;
//! this crate renders them into a [`surface::Surface`], dispatches user
//! intents back as [`intent::Command`]s, and turns phase changes into
//! notifications.

pub mod app;
pub mod config;
pub mod events;
pub mod format;
pub mod intent;
pub mod notification;
pub mod ring;
pub mod snapshot;
pub mod surface;
pub mod tui;
pub mod view;
