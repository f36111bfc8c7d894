mod app;
mod components;
mod config;
mod error;
mod event;
mod format;
mod fs;
mod handler;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::AppConfig;
use crate::event::{Event, EventHandler, Pane};
use crate::tui::{install_panic_hook, Tui};

/// A terminal UI for moving the contents of one directory into another.
#[derive(Parser, Debug)]
#[command(name = "mover_tui", version, about)]
struct Cli {
    /// Source directory to start with
    source: Option<PathBuf>,

    /// Target directory to start with
    target: Option<PathBuf>,

    /// Path to a config file (overrides the default lookup)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Theme scheme: "dark", "light", or "custom"
    #[arg(long)]
    theme: Option<String>,

    /// Append logs to this file (no logging otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Disable mouse capture
    #[arg(long)]
    no_mouse: bool,
}

impl Cli {
    /// Partial config built from CLI flags; highest merge priority.
    fn overrides(&self) -> AppConfig {
        let mut overrides = AppConfig::default();
        overrides.theme.scheme = self.theme.clone();
        if self.no_mouse {
            overrides.general.mouse = Some(false);
        }
        overrides
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init_tracing(cli.log_file.as_deref());
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    install_panic_hook();

    let mut events = EventHandler::new(Duration::from_millis(16));
    let mut app = App::new(&config, events.sender());

    if let Some(source) = &cli.source {
        app.seed_path(Pane::Source, source);
    }
    if let Some(target) = &cli.target {
        app.seed_path(Pane::Target, target);
    }

    let mut tui = Tui::new(config.mouse_enabled())?;

    loop {
        tui.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick | Event::Resize(_, _) => {}
            Event::MoveProgress(percentage, moved, total) => {
                app.handle_move_progress(percentage, moved, total)
            }
            Event::MoveStatus { message, is_error } => app.set_status(message, is_error),
            Event::MoveComplete(outcome) => app.handle_move_complete(outcome),
            Event::DirSize { pane, path, size } => app.handle_dir_size(pane, &path, size),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
