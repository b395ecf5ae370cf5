//! # Naval CLI Entry Point
//!
//! A single-screen terminal app: an animated portrait, one input box, and
//! the answer to your question rendered below it.
//!
//! ## Usage
//!
//! ```bash
//! # Ask the default endpoint
//! naval
//!
//! # Point at another OpenAI-compatible chat-completions endpoint
//! naval --endpoint http://localhost:8080/v1/chat/completions
//!
//! # Pick a theme and a log file
//! naval --theme nord --log-file /tmp/naval.log
//! ```
//!
//! ## Key Bindings
//!
//! - Type to edit the question (ignored while an answer is on its way)
//! - `Enter` - Send the question
//! - `Backspace` - Delete the last character
//! - `Ctrl+U` - Clear the question
//! - `Up` / `Down`, `PgUp` / `PgDn` - Scroll the answer
//! - `Ctrl+T` - Cycle the colour theme (remembered across runs)
//! - `Esc` / `Ctrl+C` - Quit
//!
//! ## Logging
//!
//! Logs go to a file, never to the terminal. Set `RUST_LOG` to change the
//! filter (default `naval=info`).

use naval::query::{QueryController, DEFAULT_ENDPOINT};
use naval::ui::{self, config::Config, theme::Theme, Action, App};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::ffi::OsString;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(event::read().context("Failed to read terminal event")?))
        } else {
            Ok(None)
        }
    }
}

/// Naval - ask a question, get an answer in Naval's voice
#[derive(Parser, Debug)]
#[command(name = "naval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Seek wisdom from the terminal", long_about = None)]
struct Args {
    /// Chat-completions endpoint to send questions to
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Colour theme (overrides the saved choice for this run)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Write logs to this file instead of the platform data directory
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = init_logging(args.log_file.clone())?;

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        original_hook(panic_info);
    }));

    let result = run_application(args).await;

    // Restore panic hook
    let _ = panic::take_hook();

    result
}

/// Send `tracing` output to a file. Returns the guard that flushes it on drop.
fn init_logging(log_file: Option<PathBuf>) -> Result<Option<WorkerGuard>> {
    let Some((dir, file_name)) = resolve_log_target(log_file, Config::default_log_path())? else {
        return Ok(None);
    };

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("naval=info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!("Failed to initialise logging: {err}"))?;

    Ok(Some(guard))
}

/// Pick and prepare the log file.
///
/// A `--log-file` that cannot be used is an error. When the default location
/// cannot be used the app runs without file logging; the note goes to stderr
/// since the terminal is not yet in raw mode.
fn resolve_log_target(
    log_file: Option<PathBuf>,
    default_path: Option<PathBuf>,
) -> Result<Option<(PathBuf, OsString)>> {
    if let Some(path) = log_file {
        return prepare_log_file(&path).map(Some);
    }
    let Some(path) = default_path else {
        return Ok(None);
    };
    match prepare_log_file(&path) {
        Ok(target) => Ok(Some(target)),
        Err(err) => {
            eprintln!("naval: file logging disabled: {err:#}");
            Ok(None)
        }
    }
}

/// Split `path` into directory and file name, creating the directory.
fn prepare_log_file(path: &Path) -> Result<(PathBuf, OsString)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?
        .to_os_string();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    Ok((dir, file_name))
}

/// Pick the theme: CLI flag first, then the saved config.
fn resolve_theme(flag: Option<&str>, config: &Config) -> Result<&'static Theme> {
    match flag {
        Some(name) => Theme::by_name(name).with_context(|| {
            let names: Vec<&str> = Theme::all().iter().map(|t| t.name).collect();
            format!("Unknown theme '{}'. Available: {}", name, names.join(", "))
        }),
        None => Ok(config.resolved_theme()),
    }
}

async fn run_application(args: Args) -> Result<()> {
    let mut config = Config::load();
    let theme = resolve_theme(args.theme.as_deref(), &config)?;

    info!(endpoint = %args.endpoint, theme = theme.name, "starting");

    let query = QueryController::with_endpoint(args.endpoint);
    let mut app = App::new(query, theme, Instant::now());

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(&mut terminal, &mut app, &mut event_reader).await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    if app.theme.name != config.theme {
        config.theme = app.theme.name.to_string();
        if let Err(err) = config.save() {
            warn!(error = %err, "failed to save theme choice");
        }
    }

    run_result?;
    cleanup_result?;

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_reader: &mut dyn EventReader,
) -> Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);

        let mut viewport = app.output_viewport();
        terminal
            .draw(|f| {
                viewport = ui::render::output_viewport(f.area());
                ui::render::render_at(f, app, now);
            })
            .map_err(|err| anyhow!("Failed to draw terminal UI: {err}"))?;
        app.set_output_viewport(viewport);

        if app.should_quit {
            return Ok(());
        }

        // Redraw at ~60fps while anything moves, otherwise stay lazy
        let poll_timeout = if app.is_animating(now) {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };

        let Some(event) = event_reader.read_event(poll_timeout)? else {
            // Let the request task make progress between frames
            tokio::task::yield_now().await;
            continue;
        };

        match event {
            Event::Key(key) => {
                if app.handle_key(key, Instant::now()) == Action::ThemeChanged {
                    info!(theme = app.theme.name, "theme changed");
                }
            }
            Event::Paste(text) => app.handle_paste(&text),
            _ => {}
        }
        tokio::task::yield_now().await;
    }
}
