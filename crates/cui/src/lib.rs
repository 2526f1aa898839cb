mod actions;
mod app;
mod input;
pub mod persistence;
mod view;

pub use app::format_event;

use anyhow::{Context, Result};
use app::{App, AppSettings};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use persistence::default_state_path;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io::{self, stdout, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub assets_dir: Option<PathBuf>,
    pub state_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let log_file = options
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("flip_cui.log"));
    init_file_logger(&log_file)?;
    let settings = AppSettings {
        seed: options.seed.unwrap_or_else(clock_seed),
        assets_dir: options
            .assets_dir
            .unwrap_or_else(|| PathBuf::from("assets")),
        state_path: options.state_path.or_else(default_state_path),
    };
    log::info!(
        "starting flip-cui seed={} assets={} state={:?}",
        settings.seed,
        settings.assets_dir.display(),
        settings.state_path
    );
    let mut app = App::bootstrap(&settings)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

/// Seed for interactive play when none is given.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut options = LaunchOptions {
        log_file: std::env::var_os("FLIP_LOG").map(PathBuf::from),
        ..LaunchOptions::default()
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets_dir = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--state" => {
                if let Some(value) = args.get(idx + 1) {
                    options.state_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--log" => {
                if let Some(value) = args.get(idx + 1) {
                    options.log_file = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

/// The terminal belongs to the UI, so log records only ever go to a file.
fn init_file_logger(path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), file).context("initialize logger")
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_name_prompt_key(key) {
                    let action = input::map_key(key);
                    actions::dispatch(app, action);
                }
            }
        }
        let now = Instant::now();
        app.on_tick(now.duration_since(last_tick));
        last_tick = now;
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "flip-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}
