use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;

/// Progress callback for the move engine: `(percentage, moved, total)`.
pub type MoveProgressFn = Box<dyn Fn(f64, usize, usize) + Send>;

/// Status callback for the move engine: `(message, is_error)`.
pub type MoveStatusFn = Box<dyn Fn(&str, bool) + Send>;

/// Outcome of one `move_contents` call.
#[derive(Debug, Clone)]
pub struct MoveSummary {
    pub moved: usize,
    pub total: usize,
    /// One entry per item that failed to move (name plus reason).
    pub warnings: Vec<String>,
}

/// Move every entry of `source` into `target`.
///
/// `target` is created (with parents) if absent. Entries whose name already
/// exists at the target are skipped untouched; the skip is silent. A single
/// item's failure is reported as a warning through `on_status` and never
/// aborts the batch; the item stays in the source. Subdirectories move as a
/// unit.
///
/// Progress: `on_progress(moved/total*100, moved, total)` after each
/// successful move, then a final `on_progress(100.0, moved, total)`
/// unconditionally (also when `total == 0`), followed by one success status.
///
/// Blocking; callers run this off the interactive loop and marshal the
/// callbacks back through the event channel.
pub fn move_contents(
    source: &Path,
    target: &Path,
    on_progress: &MoveProgressFn,
    on_status: &MoveStatusFn,
) -> Result<MoveSummary> {
    fs::create_dir_all(target)?;

    let items: Vec<fs::DirEntry> = fs::read_dir(source)?.filter_map(|e| e.ok()).collect();
    let total = items.len();
    let mut moved = 0usize;
    let mut warnings: Vec<String> = Vec::new();

    info!(
        "moving {} items from {} to {}",
        total,
        source.display(),
        target.display()
    );

    for item in items {
        let name = item.file_name();
        let dest = target.join(&name);
        if dest.exists() {
            // Skip-on-conflict: the source entry stays put, nothing is reported.
            continue;
        }
        match move_item(&item.path(), &dest) {
            Ok(()) => {
                moved += 1;
                on_progress(moved as f64 / total as f64 * 100.0, moved, total);
            }
            Err(e) => {
                let message =
                    format!("Warning: could not move {}: {}", name.to_string_lossy(), e);
                warn!("{}", message);
                on_status(&message, true);
                warnings.push(message);
            }
        }
    }

    on_progress(100.0, moved, total);
    on_status(
        &format!("Moved {}/{} items to: {}", moved, total, target.display()),
        false,
    );

    Ok(MoveSummary {
        moved,
        total,
        warnings,
    })
}

/// Move a single entry to an exact destination path.
///
/// `fs::rename` first (same filesystem, instant); copy+delete fallback when
/// the rename fails (cross-device).
fn move_item(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            if src.is_dir() {
                copy_dir_recursive(src, dest)?;
                fs::remove_dir_all(src)?;
            } else {
                fs::copy(src, dest)?;
                fs::remove_file(src)?;
            }
            Ok(())
        }
    }
}

/// Internal recursive directory copy for the cross-device fallback.
fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type ProgressLog = Arc<Mutex<Vec<(f64, usize, usize)>>>;
    type StatusLog = Arc<Mutex<Vec<(String, bool)>>>;

    fn recording_callbacks() -> (MoveProgressFn, MoveStatusFn, ProgressLog, StatusLog) {
        let progress_log: ProgressLog = Arc::new(Mutex::new(Vec::new()));
        let status_log: StatusLog = Arc::new(Mutex::new(Vec::new()));
        let p = progress_log.clone();
        let s = status_log.clone();
        let on_progress: MoveProgressFn =
            Box::new(move |pct, moved, total| p.lock().unwrap().push((pct, moved, total)));
        let on_status: MoveStatusFn =
            Box::new(move |msg, is_err| s.lock().unwrap().push((msg.to_string(), is_err)));
        (on_progress, on_status, progress_log, status_log)
    }

    fn setup_source() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.txt"), "aaa").unwrap();
        fs::write(source.join("b.txt"), "bbb").unwrap();
        fs::create_dir(source.join("sub")).unwrap();
        fs::write(source.join("sub").join("inner.txt"), "inner").unwrap();
        tmp
    }

    #[test]
    fn moves_all_entries() {
        let tmp = setup_source();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        fs::create_dir(&target).unwrap();

        let (on_progress, on_status, progress_log, status_log) = recording_callbacks();
        let summary = move_contents(&source, &target, &on_progress, &on_status).unwrap();

        assert_eq!(summary.moved, 3);
        assert_eq!(summary.total, 3);
        assert!(summary.warnings.is_empty());

        assert!(target.join("a.txt").exists());
        assert!(target.join("b.txt").exists());
        assert!(target.join("sub").join("inner.txt").exists());
        assert_eq!(fs::read_dir(&source).unwrap().count(), 0);

        // Monotonic moved counts, final event exactly (100.0, 3, 3).
        let progress = progress_log.lock().unwrap();
        assert_eq!(progress.len(), 4);
        for (i, &(_, moved, total)) in progress.iter().take(3).enumerate() {
            assert_eq!(moved, i + 1);
            assert_eq!(total, 3);
        }
        assert_eq!(*progress.last().unwrap(), (100.0, 3, 3));

        let statuses = status_log.lock().unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].1);
        assert!(statuses[0].0.contains("3/3"));
        assert!(statuses[0].0.contains(&target.display().to_string()));
    }

    #[test]
    fn collision_is_skipped_silently() {
        let tmp = setup_source();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("a.txt"), "existing").unwrap();

        let (on_progress, on_status, _progress_log, status_log) = recording_callbacks();
        let summary = move_contents(&source, &target, &on_progress, &on_status).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.moved, 2);
        assert!(summary.warnings.is_empty());

        // The colliding entry stays in the source, the target copy untouched.
        assert_eq!(fs::read_to_string(source.join("a.txt")).unwrap(), "aaa");
        assert_eq!(fs::read_to_string(target.join("a.txt")).unwrap(), "existing");

        // No error status for the skip, just the final success line.
        let statuses = status_log.lock().unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].1);
        assert!(statuses[0].0.contains("2/3"));
    }

    #[test]
    fn empty_source_emits_single_final_progress() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&target).unwrap();

        let (on_progress, on_status, progress_log, status_log) = recording_callbacks();
        let summary = move_contents(&source, &target, &on_progress, &on_status).unwrap();

        assert_eq!(summary.moved, 0);
        assert_eq!(summary.total, 0);

        let progress = progress_log.lock().unwrap();
        assert_eq!(*progress, vec![(100.0, 0, 0)]);

        let statuses = status_log.lock().unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].0.contains("0/0"));
        assert!(!statuses[0].1);
    }

    #[test]
    fn target_is_created_if_missing() {
        let tmp = setup_source();
        let source = tmp.path().join("source");
        let target = tmp.path().join("nested").join("target");

        let (on_progress, on_status, _p, _s) = recording_callbacks();
        let summary = move_contents(&source, &target, &on_progress, &on_status).unwrap();

        assert_eq!(summary.moved, 3);
        assert!(target.join("a.txt").exists());
    }

    #[test]
    fn subdirectory_moves_as_a_unit() {
        let tmp = setup_source();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        fs::create_dir(&target).unwrap();

        let (on_progress, on_status, _p, _s) = recording_callbacks();
        move_contents(&source, &target, &on_progress, &on_status).unwrap();

        assert!(!source.join("sub").exists());
        assert_eq!(
            fs::read_to_string(target.join("sub").join("inner.txt")).unwrap(),
            "inner"
        );
    }

    #[test]
    fn missing_source_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("gone");
        let target = tmp.path().join("target");

        let (on_progress, on_status, progress_log, _s) = recording_callbacks();
        let result = move_contents(&source, &target, &on_progress, &on_status);
        assert!(result.is_err());
        assert!(progress_log.lock().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn per_item_failure_warns_and_continues() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let target = tmp.path().join("target");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&target).unwrap();

        // A read-only target directory makes every rename (and the copy
        // fallback) fail per-item.
        fs::write(source.join("a.txt"), "aaa").unwrap();
        fs::write(source.join("b.txt"), "bbb").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits don't bind a privileged user; nothing to test then.
        if fs::write(target.join("probe"), "").is_ok() {
            fs::remove_file(target.join("probe")).unwrap();
            fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let (on_progress, on_status, _p, status_log) = recording_callbacks();
        let summary = move_contents(&source, &target, &on_progress, &on_status).unwrap();

        fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.moved, 0);
        assert_eq!(summary.warnings.len(), 2);

        // Both items remain in the source.
        assert!(source.join("a.txt").exists());
        assert!(source.join("b.txt").exists());

        let statuses = status_log.lock().unwrap();
        let errors: Vec<_> = statuses.iter().filter(|(_, is_err)| *is_err).collect();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].0.contains("could not move"));
        // The batch still finishes with a success summary.
        assert!(statuses.last().unwrap().0.contains("0/2"));
    }
}
