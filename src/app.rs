use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::event::{Event, Pane};
use crate::fs::operations::{self, MoveProgressFn, MoveStatusFn, MoveSummary};
use crate::fs::scan;
use crate::fs::tree::DirTree;
use crate::theme::{resolve_theme, ThemeColors};

/// Which widget currently receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SourceInput,
    SourceTree,
    TargetInput,
    TargetTree,
}

impl Focus {
    /// The pane this focus slot belongs to.
    pub fn pane(self) -> Pane {
        match self {
            Focus::SourceInput | Focus::SourceTree => Pane::Source,
            Focus::TargetInput | Focus::TargetTree => Pane::Target,
        }
    }

    /// Whether a path input (as opposed to a tree) is focused.
    pub fn is_input(self) -> bool {
        matches!(self, Focus::SourceInput | Focus::TargetInput)
    }
}

/// The kind of dialog being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    /// Confirm moving everything from source into target.
    ConfirmMove,
    /// The target directory no longer exists; create it (with parents)?
    CreateTarget,
}

/// Application mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    Dialog(DialogKind),
}

/// Text input state for one path field.
#[derive(Debug, Default)]
pub struct PathInput {
    pub text: String,
    pub cursor: usize,
}

impl PathInput {
    /// Replace the content and put the cursor at the end.
    pub fn set(&mut self, text: String) {
        self.cursor = text.len();
        self.text = text;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Insert a character at the current cursor position.
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        if let Some(prev) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(next) = self.text[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.text.len();
    }
}

/// One side of the mover: a path input plus the tree bound to it.
#[derive(Default)]
pub struct PaneState {
    pub input: PathInput,
    pub path: Option<PathBuf>,
    pub tree: DirTree,
}

impl PaneState {
    fn clear(&mut self) {
        self.input.clear();
        self.path = None;
        self.tree.reset();
    }
}

/// Main application state: the one owned mutable session.
///
/// All mutation happens on the main task; background work reports back
/// through the event channel and lands here via the `handle_*` methods.
pub struct App {
    pub source: PaneState,
    pub target: PaneState,
    pub focus: Focus,
    pub mode: AppMode,
    /// A move is in flight; a second one is refused until completion.
    pub moving: bool,
    pub status_message: String,
    pub status_is_error: bool,
    /// Percentage, moved, total; present while a move runs.
    pub progress: Option<(f64, usize, usize)>,
    pub should_quit: bool,
    pub theme: ThemeColors,
    pub use_icons: bool,
    confirm_move: bool,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl App {
    pub fn new(config: &AppConfig, event_tx: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            source: PaneState::default(),
            target: PaneState::default(),
            focus: Focus::SourceInput,
            mode: AppMode::Normal,
            moving: false,
            status_message: "Ready".to_string(),
            status_is_error: false,
            progress: None,
            should_quit: false,
            theme: resolve_theme(&config.theme),
            use_icons: config.use_icons(),
            confirm_move: config.confirm_move(),
            event_tx,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn pane(&self, pane: Pane) -> &PaneState {
        match pane {
            Pane::Source => &self.source,
            Pane::Target => &self.target,
        }
    }

    pub fn pane_mut(&mut self, pane: Pane) -> &mut PaneState {
        match pane {
            Pane::Source => &mut self.source,
            Pane::Target => &mut self.target,
        }
    }

    pub fn tree_mut(&mut self, pane: Pane) -> &mut DirTree {
        &mut self.pane_mut(pane).tree
    }

    pub fn set_status(&mut self, message: String, is_error: bool) {
        self.status_message = message;
        self.status_is_error = is_error;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Focus ────────────────────────────────────────────────────────────────

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::SourceInput => Focus::SourceTree,
            Focus::SourceTree => Focus::TargetInput,
            Focus::TargetInput => Focus::TargetTree,
            Focus::TargetTree => Focus::SourceInput,
        };
    }

    pub fn cycle_focus_back(&mut self) {
        self.focus = match self.focus {
            Focus::SourceInput => Focus::TargetTree,
            Focus::SourceTree => Focus::SourceInput,
            Focus::TargetInput => Focus::SourceTree,
            Focus::TargetTree => Focus::TargetInput,
        };
    }

    // ── Path binding ─────────────────────────────────────────────────────────

    /// Bind `pane` to `path`: rebuild its tree and kick off a size scan.
    fn bind_pane(&mut self, pane: Pane, path: &Path) -> Result<()> {
        let scan_request = self.pane_mut(pane).tree.set_root(path)?;
        self.pane_mut(pane).path = Some(path.to_path_buf());
        if let Some(dir) = scan_request {
            let cancel = self.pane(pane).tree.cancel_flag();
            scan::spawn_size_scan(pane, dir, cancel, self.event_tx.clone());
        }
        Ok(())
    }

    /// Apply the text in a pane's path input (Enter).
    ///
    /// An empty input clears the pane; an invalid path becomes an error
    /// status and leaves the previous tree untouched.
    pub fn apply_path_input(&mut self, pane: Pane) {
        let text = self.pane(pane).input.text.trim().to_string();
        if text.is_empty() {
            self.pane_mut(pane).clear();
            self.set_status(format!("Cleared {} selection", pane.label()), false);
            return;
        }

        let path = PathBuf::from(&text);
        match self.bind_pane(pane, &path) {
            Ok(()) => {
                info!("{} bound to {}", pane.label(), path.display());
                self.set_status(format!("{} path updated", pane.title()), false);
            }
            Err(e) => {
                warn!("{} path rejected: {}", pane.label(), e);
                self.set_status(format!("Invalid {} directory", pane.label()), true);
            }
        }
    }

    /// Seed a pane from a CLI start path.
    pub fn seed_path(&mut self, pane: Pane, path: &Path) {
        self.pane_mut(pane).input.set(path.display().to_string());
        self.apply_path_input(pane);
    }

    // ── Tree navigation ──────────────────────────────────────────────────────

    /// Expand the selected directory in `pane`, spawning a size scan for a
    /// freshly loaded level.
    pub fn expand_tree(&mut self, pane: Pane) {
        if let Some(dir) = self.pane_mut(pane).tree.expand_selected() {
            let cancel = self.pane(pane).tree.cancel_flag();
            scan::spawn_size_scan(pane, dir, cancel, self.event_tx.clone());
        }
    }

    // ── Move flow ────────────────────────────────────────────────────────────

    /// Validate the session and open the confirmation dialog (or refuse).
    pub fn request_move(&mut self) {
        if self.moving {
            self.set_status("Another operation is in progress".into(), true);
            return;
        }
        let Some(source) = self.source.path.clone() else {
            self.set_status("Error: No source directory selected".into(), true);
            return;
        };
        let Some(target) = self.target.path.clone() else {
            self.set_status("Error: No target directory selected".into(), true);
            return;
        };
        if source == target {
            self.set_status("Error: Source and target are the same".into(), true);
            return;
        }
        if !source.is_dir() {
            self.set_status("Error: Source directory does not exist".into(), true);
            return;
        }
        if !target.is_dir() {
            // Vanished since it was applied; offer to (re)create it.
            self.mode = AppMode::Dialog(DialogKind::CreateTarget);
            return;
        }
        if self.confirm_move {
            self.mode = AppMode::Dialog(DialogKind::ConfirmMove);
        } else {
            self.start_move();
        }
    }

    /// Resolve the open dialog.
    pub fn confirm_dialog(&mut self, confirmed: bool) {
        let AppMode::Dialog(kind) = std::mem::take(&mut self.mode) else {
            return;
        };
        if !confirmed {
            self.set_status("Operation canceled".into(), false);
            return;
        }
        match kind {
            DialogKind::CreateTarget => {
                let Some(target) = self.target.path.clone() else {
                    return;
                };
                match std::fs::create_dir_all(&target) {
                    Ok(()) => {
                        let _ = self.bind_pane(Pane::Target, &target);
                        self.set_status(
                            format!("Created target directory: {}", target.display()),
                            false,
                        );
                        if self.confirm_move {
                            self.mode = AppMode::Dialog(DialogKind::ConfirmMove);
                        } else {
                            self.start_move();
                        }
                    }
                    Err(e) => {
                        self.set_status(format!("Error creating directory: {}", e), true);
                    }
                }
            }
            DialogKind::ConfirmMove => self.start_move(),
        }
    }

    /// Run the move engine off the main task, forwarding its callbacks as
    /// events. Once started, the move runs to completion.
    fn start_move(&mut self) {
        let (Some(source), Some(target)) = (self.source.path.clone(), self.target.path.clone())
        else {
            return;
        };

        self.moving = true;
        self.progress = Some((0.0, 0, 0));
        info!("moving {} -> {}", source.display(), target.display());

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let status_tx = tx.clone();
            let on_progress: MoveProgressFn = Box::new(move |pct, moved, total| {
                let _ = progress_tx.send(Event::MoveProgress(pct, moved, total));
            });
            let on_status: MoveStatusFn = Box::new(move |message, is_error| {
                let _ = status_tx.send(Event::MoveStatus {
                    message: message.to_string(),
                    is_error,
                });
            });

            let result = tokio::task::spawn_blocking(move || {
                operations::move_contents(&source, &target, &on_progress, &on_status)
            })
            .await;

            let outcome = match result {
                Ok(Ok(summary)) => Ok(summary),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(Event::MoveComplete(outcome));
        });
    }

    // ── Event handling ───────────────────────────────────────────────────────

    pub fn handle_move_progress(&mut self, percentage: f64, moved: usize, total: usize) {
        self.progress = Some((percentage, moved, total));
        if total > 0 && moved < total {
            self.set_status(format!("Moving {} of {} items...", moved, total), false);
        }
    }

    pub fn handle_move_complete(
        &mut self,
        outcome: std::result::Result<MoveSummary, String>,
    ) {
        self.moving = false;
        self.progress = None;
        match outcome {
            Ok(summary) => {
                info!(
                    "move finished: {}/{} moved, {} warnings",
                    summary.moved,
                    summary.total,
                    summary.warnings.len()
                );
            }
            Err(e) => {
                warn!("move failed: {}", e);
                self.set_status(format!("Error: {}", e), true);
            }
        }
        self.refresh_trees();
    }

    pub fn handle_dir_size(&mut self, pane: Pane, path: &Path, size: u64) {
        self.pane_mut(pane).tree.record_size(path, size);
    }

    /// Rebuild both trees against their bound paths (after a move).
    fn refresh_trees(&mut self) {
        for pane in [Pane::Source, Pane::Target] {
            if let Some(path) = self.pane(pane).path.clone() {
                if self.bind_pane(pane, &path).is_err() {
                    self.pane_mut(pane).clear();
                }
            }
        }
    }

    // ── Session actions ──────────────────────────────────────────────────────

    /// Swap source and target (both must be set).
    pub fn swap_panes(&mut self) {
        let (Some(src), Some(tgt)) = (self.source.path.clone(), self.target.path.clone()) else {
            self.set_status("Both paths must be set to swap".into(), true);
            return;
        };
        self.source.input.set(tgt.display().to_string());
        self.target.input.set(src.display().to_string());
        if self.bind_pane(Pane::Source, &tgt).is_err() || self.bind_pane(Pane::Target, &src).is_err()
        {
            self.set_status("Swap failed: a directory no longer exists".into(), true);
            return;
        }
        self.set_status("Source and target swapped".into(), false);
    }

    /// Reset both panes, progress, and status.
    pub fn clear_all(&mut self) {
        self.source.clear();
        self.target.clear();
        self.progress = None;
        self.set_status("Selections cleared".into(), false);
    }
}
