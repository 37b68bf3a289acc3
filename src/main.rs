mod app;
mod domain;
mod error;
mod input;
mod notifications;
mod persistence;
mod ticker;
mod timer;
mod ui;

use app::AppState;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{Phase, ProgressUpdate, TimerConfig};
use notifications::SystemSoundPlayer;
use persistence::{
    ensure_tomato_dir, init_local_tomato, load_settings, log_file, save_settings, settings_file, TargetLog,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use timer::{FocusTimer, TimerEvent};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "TOMATO_LOG";

#[derive(Parser)]
#[command(name = "tomato")]
#[command(about = "A terminal focus/rest interval timer with a log of focus targets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tomato directory in the current directory
    Init,
    /// Record the next focus target
    Add {
        /// Target text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print the most recent target
    Last,
    /// List targets, optionally filtered by a case-insensitive search
    History {
        query: Option<String>,
    },
    /// Run one focus/rest cycle without the TUI, printing each update
    Run(RunArgs),
    /// Show or change the stored settings
    Config(ConfigArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Focus duration (minutes unless --seconds). Defaults to the stored setting.
    #[arg(long)]
    focus: Option<u32>,
    /// Rest duration (minutes unless --seconds). Defaults to the stored setting.
    #[arg(long)]
    rest: Option<u32>,
    /// Don't play the sound when focus ends
    #[arg(long)]
    mute: bool,
    /// Interpret --focus and --rest as seconds
    #[arg(long)]
    seconds: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Focus time in minutes
    #[arg(long)]
    focus: Option<u32>,
    /// Rest time in minutes
    #[arg(long)]
    rest: Option<u32>,
    /// Mute the end-of-focus sound
    #[arg(long, conflicts_with = "unmute")]
    mute: bool,
    /// Unmute the end-of-focus sound
    #[arg(long)]
    unmute: bool,
    /// Sound file played when focus ends
    #[arg(long)]
    sound: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            init_stderr_logging();
            let tomato_dir = init_local_tomato()?;
            println!("Initialized tomato directory: {}", tomato_dir.display());
            println!();
            println!("Tomato will now use this local directory for targets and settings.");
            println!("Run 'tomato' to start focusing.");
            Ok(())
        }
        Some(Commands::Add { text }) => {
            init_stderr_logging();
            let log = TargetLog::open_default()?;
            let entry = log.append(&text.join(" "))?;
            println!("Target added: {}", entry.text);
            Ok(())
        }
        Some(Commands::Last) => {
            init_stderr_logging();
            match TargetLog::open_default()?.most_recent()? {
                Some(entry) => println!("{}", entry),
                None => println!("No targets yet"),
            }
            Ok(())
        }
        Some(Commands::History { query }) => {
            init_stderr_logging();
            let log = TargetLog::open_default()?;
            for entry in log.search(query.as_deref().unwrap_or("")) {
                println!("{}", entry?);
            }
            Ok(())
        }
        Some(Commands::Run(args)) => {
            init_stderr_logging();
            run_headless(args)
        }
        Some(Commands::Config(args)) => {
            init_stderr_logging();
            configure(args)
        }
        None => run_tui(),
    }
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

/// Log to a file while the TUI owns the terminal
fn init_file_logging(data_dir: &Path) -> Result<()> {
    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn run_headless(args: RunArgs) -> Result<()> {
    let data_dir = ensure_tomato_dir()?;
    let settings = load_settings(settings_file(&data_dir))?;

    let muted = args.mute || settings.muted;
    let focus = args.focus.unwrap_or(settings.focus_minutes);
    let rest = args.rest.unwrap_or(settings.rest_minutes);
    let config = if args.seconds {
        TimerConfig::new(focus.into(), rest.into(), muted)?
    } else {
        TimerConfig::from_minutes(focus, rest, muted)?
    };

    let (timer, events) = FocusTimer::new(Arc::new(SystemSoundPlayer), settings.sound_path(&data_dir));
    let generation = timer.start(config)?;
    println!("{}", ProgressUpdate::new(generation, Phase::Focus, config.focus_seconds));

    for event in events.iter() {
        match event {
            TimerEvent::Progress(update) => println!("{}", update),
            TimerEvent::PhaseBoundary { generation } => {
                notifications::notify_rest_started(config.rest_seconds);
                println!("Focus complete. Time to rest.");
                println!("{}", ProgressUpdate::new(generation, Phase::Rest, config.rest_seconds));
            }
            TimerEvent::Completed { .. } => {
                println!("Session complete");
                break;
            }
        }
    }

    Ok(())
}

fn configure(args: ConfigArgs) -> Result<()> {
    let data_dir = ensure_tomato_dir()?;
    let path = settings_file(&data_dir);
    let mut settings = load_settings(&path)?;

    let changed = args.focus.is_some() || args.rest.is_some() || args.mute || args.unmute || args.sound.is_some();

    if changed {
        let focus = args.focus.unwrap_or(settings.focus_minutes);
        let rest = args.rest.unwrap_or(settings.rest_minutes);
        TimerConfig::from_minutes(focus, rest, settings.muted)?;

        settings.focus_minutes = focus;
        settings.rest_minutes = rest;
        if args.mute {
            settings.muted = true;
        }
        if args.unmute {
            settings.muted = false;
        }
        if let Some(sound) = args.sound {
            settings.sound_file = Some(sound);
        }

        save_settings(&path, &settings)?;
        tracing::info!(path = %path.display(), "settings updated");
        println!("Settings updated!");
    }

    println!("Focus time: {} min", settings.focus_minutes);
    println!("Rest time:  {} min", settings.rest_minutes);
    println!("Sound:      {}", if settings.muted { "muted" } else { "on" });
    println!("Sound file: {}", settings.sound_path(&data_dir).display());
    Ok(())
}

fn run_tui() -> Result<()> {
    let data_dir = ensure_tomato_dir()?;
    init_file_logging(&data_dir)?;

    eprintln!("Using tomato directory: {}", data_dir.display());
    tracing::info!(dir = %data_dir.display(), "starting tomato");

    let settings = load_settings(settings_file(&data_dir))?;
    let (timer, events) = FocusTimer::new(Arc::new(SystemSoundPlayer), settings.sound_path(&data_dir));
    let mut app = AppState::new(data_dir, settings, timer, events);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.timer.cancel();

    if let Err(err) = result {
        tracing::error!(error = %err, "tui exited with an error");
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let poll_rate = ticker::poll_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.drain_timer_events();
    }
}
