use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::event::{Event, Pane};

/// Shallow aggregate size of a directory: the sizes of its immediate files,
/// plus the immediate files of its immediate subdirectories. Deeper levels
/// are not visited; the label is an annotation, not a full `du`.
///
/// Cooperatively cancelled: the flag is checked before starting and at every
/// iteration step, and a cancelled scan returns `None` so its partial result
/// is never applied. A listing failure on `path` itself also yields `None`
/// ("unknown size"); unreadable subdirectories just contribute nothing.
pub fn aggregate_size(path: &Path, cancel: &AtomicBool) -> Option<u64> {
    if cancel.load(Ordering::Relaxed) {
        return None;
    }
    let entries = fs::read_dir(path).ok()?;

    let mut total: u64 = 0;
    for entry in entries.flatten() {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            let Ok(sub_entries) = fs::read_dir(entry.path()) else {
                continue;
            };
            for sub_entry in sub_entries.flatten() {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                if let Ok(meta) = sub_entry.metadata() {
                    if meta.is_file() {
                        total += meta.len();
                    }
                }
            }
        } else if let Ok(meta) = entry.metadata() {
            if meta.is_file() {
                total += meta.len();
            }
        }
    }

    if cancel.load(Ordering::Relaxed) {
        None
    } else {
        Some(total)
    }
}

/// Compute `path`'s aggregate size off the main task and report it back over
/// the event channel as `Event::DirSize`.
///
/// The result is delivered only if the scan completed and the tree it
/// belongs to has not been cancelled in the meantime; everything else is
/// dropped silently.
pub fn spawn_size_scan(
    pane: Pane,
    path: PathBuf,
    cancel: Arc<AtomicBool>,
    event_tx: mpsc::UnboundedSender<Event>,
) {
    tokio::spawn(async move {
        let scan_path = path.clone();
        let scan_cancel = cancel.clone();
        let result =
            tokio::task::spawn_blocking(move || aggregate_size(&scan_path, &scan_cancel)).await;

        match result {
            Ok(Some(size)) => {
                if !cancel.load(Ordering::Relaxed) {
                    debug!("{} pane: {} is {} bytes", pane.label(), path.display(), size);
                    let _ = event_tx.send(Event::DirSize { pane, path, size });
                }
            }
            Ok(None) => {}
            Err(e) => debug!("size scan for {} died: {}", path.display(), e),
        }
    });
}
