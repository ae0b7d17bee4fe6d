use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::io::{stdout, BufWriter, Stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fireworks_tui::clock::FrameLoop;
use fireworks_tui::surface::{Surface, TerminalCanvas};
use fireworks_tui::{Color, Error, Fireworks, FireworksConfig, Result};

/// Colorful fireworks display for the terminal.
///
/// Press 'q', ESC or Ctrl+C to exit, 'p' or space to pause, 'r' to reset.
#[derive(Debug, Parser)]
#[command(name = "fireworks", version)]
struct Cli {
    /// Background color as hex (e.g. --bg-color 1a1b26)
    #[arg(long, value_name = "RRGGBB")]
    bg_color: Option<Color>,

    /// Chance of launching a new rocket on each frame
    #[arg(long, value_name = "P", default_value_t = FireworksConfig::default().new_rocket_probability)]
    launch_probability: f32,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Raw mode and alternate screen, undone on drop.
struct TerminalSession {
    out: BufWriter<Stdout>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        let mut out = BufWriter::with_capacity(1024 * 64, stdout());
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self { out })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn is_exit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q')
        || key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn run(cli: &Cli) -> Result<()> {
    let config = FireworksConfig {
        new_rocket_probability: cli.launch_probability,
        ..FireworksConfig::default()
    };
    let background = cli.bg_color.unwrap_or(Color::BLACK);

    let canvas = TerminalCanvas::acquire(background)?;
    let mut session = TerminalSession::enter()?;
    let mut frames = FrameLoop::new(cli.fps);
    let mut show = Fireworks::new(canvas, config, fastrand::Rng::new());

    show.run(&mut frames);

    loop {
        if event::poll(frames.time_until_due())? {
            match event::read()? {
                Event::Key(key) if is_exit(&key) => break,
                Event::Key(key) => match key.code {
                    KeyCode::Char('p') | KeyCode::Char(' ') => {
                        if show.is_running() {
                            show.stop(&mut frames);
                        } else {
                            show.run(&mut frames);
                        }
                    }
                    KeyCode::Char('r') => show.reset(),
                    _ => {}
                },
                Event::Resize(cols, rows) => {
                    info!(cols, rows, "terminal resized");
                    show.surface_mut().set_bounds(cols, rows);
                    show.reset();
                    execute!(session.out, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        if let Some(timestamp) = frames.next_frame() {
            show.frame(&mut frames, timestamp);
            show.surface_mut().present(&mut session.out)?;
        }
    }

    let surface = show.surface();
    info!(
        width = surface.width(),
        height = surface.height(),
        "fireworks closed"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        if let Err(err) = init_logging(path) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    // The terminal session is restored before the error is printed.
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "fireworks failed");
            eprintln!("fireworks: {err}");
            ExitCode::FAILURE
        }
    }
}
