// SPDX-License-Identifier: MIT
//
// Log file setup.
//
// The editor owns the terminal, so tracing output goes to a file:
// `$XDG_STATE_HOME/n-outline/n-outline.log` (usually
// `~/.local/state/n-outline/`), or the platform's local data dir where
// there is no state dir, or the temp dir as a last resort. `RUST_LOG`
// filters as usual and defaults to `info`.
//
// Nothing here is fatal. If the file can't be opened the editor runs
// without logs.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const APP_DIR: &str = "n-outline";
const LOG_FILE: &str = "n-outline.log";
const DEFAULT_FILTER: &str = "info";

/// Directory the log file lives in. Not created here.
pub fn log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Filter from `RUST_LOG`, or [`DEFAULT_FILTER`] when unset or invalid.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Subscriber writing plain (no ANSI) lines to `file`.
pub fn build_subscriber(file: File, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(file));

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

/// Open `path` for appending, creating parent directories.
fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::options().create(true).append(true).open(path)
}

/// Install the global subscriber. Returns the log path on success.
pub fn init() -> Option<PathBuf> {
    let path = log_dir().join(LOG_FILE);
    let file = open_log(&path).ok()?;
    build_subscriber(file, env_filter()).try_init().ok()?;
    Some(path)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_ends_in_app_dir() {
        assert!(log_dir().ends_with(APP_DIR));
    }

    #[test]
    fn open_log_creates_parents_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(LOG_FILE);

        std::io::Write::write_all(&mut open_log(&path).unwrap(), b"one\n").unwrap();
        std::io::Write::write_all(&mut open_log(&path).unwrap(), b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn subscriber_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let file = open_log(&path).unwrap();

        let subscriber = build_subscriber(file, EnvFilter::new("info"));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(items = 3, "saved outline");
            tracing::debug!("filtered out");
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INFO"));
        assert!(contents.contains("saved outline"));
        assert!(contents.contains("items=3"));
        assert!(!contents.contains("filtered out"));
        assert!(!contents.contains('\x1b'));
    }
}
