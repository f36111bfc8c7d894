//! Tracing initialization.
//!
//! The TUI owns stdout, so logs only go to a file, and only when the user
//! asks for one with `--log-file`. The writer is non-blocking; the returned
//! guard must be held until shutdown to flush buffered lines.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Set up the tracing subscriber with a non-blocking file appender.
///
/// Returns `None` (leaving tracing uninitialized, events become no-ops) when
/// no log file was requested or the file can't be opened. Log level defaults
/// to `info` and respects `RUST_LOG`.
pub fn init_tracing(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let path = log_file?;

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_log_file_means_no_guard() {
        assert!(init_tracing(None).is_none());
    }
}
