use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::prelude::*;
use ringtimer::{
    app::App,
    config::{self, Config, COMMANDS_FILE, LOG_FILE},
    events::{spawn_reader, SourceItem},
    intent::CommandSink,
    notification::Notifier,
    tui::get_theme,
};
use std::{
    env,
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader},
    path::PathBuf,
    sync::mpsc::Receiver,
    time::{Duration, Instant},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Type Aliases & Constants
// ============================================================================

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
const TICK_RATE: Duration = Duration::from_millis(50);

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone)]
#[command(author, version, about = "🍅 ringtimer - terminal front-end for a pomodoro timer backend")]
struct Args {
    /// Backend event stream (JSON lines). Defaults to stdin.
    #[arg(short, long)]
    events: Option<PathBuf>,
    /// Where commands for the backend are appended (file or FIFO).
    #[arg(short, long)]
    commands: Option<PathBuf>,
    #[arg(short = 't', long)]
    theme: Option<String>,
    #[arg(long)]
    no_notify: bool,
    /// How long a notification toast stays up, e.g. `5s` or `1m`.
    #[arg(long, value_parser = parse_secs)]
    toast_secs: Option<u64>,
    /// Persist the effective settings to the config file.
    #[arg(long)]
    save_config: bool,
}

fn parse_secs(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim().to_lowercase();
    let mut total: u64 = 0;
    let mut num = String::new();

    let add = |total: u64, secs: Option<u64>| {
        secs.and_then(|secs| total.checked_add(secs)).ok_or_else(|| "Duration too large".to_string())
    };

    for c in s.chars() {
        match c {
            '0'..='9' => num.push(c),
            'm' => {
                let mins = num.parse::<u64>().map_err(|_| "Invalid minutes")?;
                total = add(total, mins.checked_mul(60))?;
                num.clear();
            }
            's' => {
                let secs = num.parse::<u64>().map_err(|_| "Invalid seconds")?;
                total = add(total, Some(secs))?;
                num.clear();
            }
            _ => return Err("Invalid format".into()),
        }
    }
    if !num.is_empty() {
        let secs = num.parse::<u64>().map_err(|_| "Invalid seconds")?;
        total = add(total, Some(secs))?;
    }

    if total > 0 { Ok(total) } else { Err("Duration must be > 0".into()) }
}

// ============================================================================
// Setup
// ============================================================================

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let debug_enabled = env::var("RINGTIMER_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(config::app_dir(), LOG_FILE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn open_events(path: Option<&PathBuf>) -> io::Result<Box<dyn BufRead + Send>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging();

    let dir = config::app_dir();
    let mut config = Config::load(&dir);

    // CLI overrides
    if let Some(t) = args.theme { config.theme = t; }
    if args.no_notify { config.notifications_enabled = false; }
    if let Some(s) = args.toast_secs { config.toast_secs = s; }
    if let Some(c) = args.commands { config.commands_path = Some(c); }
    if args.save_config { config.save(&dir)?; }

    let commands_path = config.commands_path.clone().unwrap_or_else(|| config::get_path(COMMANDS_FILE));
    let commands = OpenOptions::new().create(true).append(true).open(&commands_path)?;
    let events = spawn_reader(open_events(args.events.as_ref())?);
    info!(commands = %commands_path.display(), theme = %config.theme, "starting ringtimer");

    let mut app = App::new(
        CommandSink::new(commands),
        Notifier::new(config.notifications_enabled),
        get_theme(&config.theme),
        Duration::from_secs(config.toast_secs),
    );
    app.request_snapshot();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    info!("ringtimer stopped");

    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<File>,
    events: &Receiver<SourceItem>,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        while let Ok(item) = events.try_recv() {
            app.apply(item);
        }
        if let Some(title) = app.take_title_update() {
            execute!(terminal.backend_mut(), SetTitle(title))?;
        }

        terminal.draw(|f| app.draw(f))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
        if app.should_quit() {
            return Ok(());
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick_elapsed(Instant::now());
            last_tick = Instant::now();
        }
    }
}
