use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io::{self, Write};
use std::path::PathBuf;
use unidux::{LoggingMiddleware, Store};
use unidux_config::AppConfig;

mod counter;
mod deferred;
mod logger;
mod screen;
mod todos;

use counter::{CounterReducer, CounterScreen};
use screen::Screen;
use todos::{TodoScreen, VisibilityFilter};

#[derive(Parser, Debug)]
#[command(name = "unidux-demo", version, about = "Counter and todo list on a unidux store")]
struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    example: Example,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Example {
    /// A single integer you can increment and decrement
    Counter,
    /// A todo list with a visibility filter
    Todos,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = logger::init()?;
    log::info!("Starting unidux-demo {:?}", cli.example);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    logger::set_level(config.log_level_filter());
    log::debug!("Logging to {}, config: {:?}", log_file.display(), config);

    let mut terminal = setup_terminal()?;

    let result = run_example(&mut terminal, cli.example, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("Exiting with error: {:#}", err);
    }

    log::info!("Exiting unidux-demo");
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    enter_alternate_screen(&mut stdout, disable_raw_mode)?;

    match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => Ok(terminal),
        Err(err) => {
            if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
                log::error!("Failed to leave alternate screen: {}", e);
            }
            if let Err(e) = disable_raw_mode() {
                log::error!("Failed to disable raw mode: {}", e);
            }
            Err(err).context("Failed to create terminal")
        }
    }
}

/// Switch `out` to the alternate screen; on failure `leave_raw_mode` runs
/// before the error is returned
fn enter_alternate_screen<W: Write>(
    out: &mut W,
    leave_raw_mode: impl FnOnce() -> io::Result<()>,
) -> Result<()> {
    if let Err(err) = execute!(out, EnterAlternateScreen) {
        if let Err(e) = leave_raw_mode() {
            log::error!("Failed to disable raw mode: {}", e);
        }
        return Err(err).context("Failed to enter alternate screen");
    }
    Ok(())
}

/// Composition root: build the store for `example` and hand it to its screen
fn run_example(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    example: Example,
    config: &AppConfig,
) -> Result<()> {
    match example {
        Example::Counter => {
            let store = Store::new(CounterReducer)?;
            store.add_middleware(LoggingMiddleware::new());
            run(terminal, CounterScreen::new(store, config.async_delay()), config)
        }
        Example::Todos => {
            let filter = config
                .initial_filter
                .parse::<VisibilityFilter>()
                .unwrap_or_else(|e| {
                    log::warn!("{:#}, falling back to {}", e, VisibilityFilter::default().as_str());
                    VisibilityFilter::default()
                });

            let store = Store::new(todos::root_reducer(filter)?)?;
            store.add_middleware(LoggingMiddleware::new());
            run(terminal, TodoScreen::new(store), config)
        }
    }
}

fn run<S: Screen>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut screen: S,
    config: &AppConfig,
) -> Result<()> {
    screen::run(terminal, &mut screen, config.tick_rate())
}
