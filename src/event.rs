use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::fs::operations::MoveSummary;

/// Which of the two directory panes an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Source,
    Target,
}

impl Pane {
    /// Lowercase label for status messages.
    pub fn label(self) -> &'static str {
        match self {
            Pane::Source => "source",
            Pane::Target => "target",
        }
    }

    /// Capitalized label for titles and status messages.
    pub fn title(self) -> &'static str {
        match self {
            Pane::Source => "Source",
            Pane::Target => "Target",
        }
    }
}

/// Application events.
///
/// Background work (size scans, the move engine) never touches application
/// state directly; results come back through these variants so that all
/// mutations happen on the main task.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event.
    Resize(u16, u16),
    /// Progress from the move engine: percentage in [0, 100], moved, total.
    MoveProgress(f64, usize, usize),
    /// A status line from the move engine.
    MoveStatus { message: String, is_error: bool },
    /// The move finished with a summary, or failed outright with a message.
    MoveComplete(std::result::Result<MoveSummary, String>),
    /// A background size scan finished for a directory in `pane`.
    DirSize { pane: Pane, path: PathBuf, size: u64 },
}

/// Event pump: a blocking crossterm poll loop feeding the channel that every
/// background task also reports into.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Spawn the poll loop. `tick_rate` bounds how long the loop waits for
    /// terminal input before emitting a `Tick`.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let poll_tx = tx.clone();
        tokio::task::spawn_blocking(move || poll_loop(tick_rate, poll_tx));
        Self { rx, tx }
    }

    /// Sender clone for background tasks (size scans, the move engine).
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}

/// Runs until the receiving side goes away. `event::poll` blocks, so this
/// lives on a blocking thread rather than an async task.
fn poll_loop(tick_rate: Duration, tx: mpsc::UnboundedSender<Event>) {
    loop {
        let event = if event::poll(tick_rate).unwrap_or(false) {
            match event::read() {
                Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                _ => continue,
            }
        } else {
            Event::Tick
        };
        if tx.send(event).is_err() {
            break;
        }
    }
}
