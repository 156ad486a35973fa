//! Session options.
//!
//! A handful of tunables with fixed defaults. The binary builds one
//! [`Options`] at startup; nothing reads a config file or command-line flags.
//!
//! | Option           | Default    | Meaning                                  |
//! |------------------|------------|------------------------------------------|
//! | `filename`       | `list.txt` | File loaded at start and written by `s`  |
//! | `escape_timeout` | 25 ms      | How long a lone ESC waits for a sequence |
//! | `show_help`      | true       | Draw the key help line                   |
//! | `welcome`        | true       | Greet on start                           |

use std::path::PathBuf;
use std::time::Duration;

/// Session file used when none is configured.
pub const DEFAULT_FILENAME: &str = "list.txt";

/// Default wait before a lone ESC byte is reported as the Escape key.
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(25);

/// Lines below the outline: status and message, plus help when shown.
const STATUS_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub filename: PathBuf,
    pub escape_timeout: Duration,
    pub show_help: bool,
    pub welcome: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            filename: PathBuf::from(DEFAULT_FILENAME),
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            show_help: true,
            welcome: true,
        }
    }
}

impl Options {
    /// Rows left for the outline on a terminal `height` rows tall. Never 0.
    #[must_use]
    pub const fn text_rows(&self, height: usize) -> usize {
        let chrome = STATUS_ROWS + if self.show_help { 1 } else { 0 };
        let rows = height.saturating_sub(chrome);
        if rows == 0 { 1 } else { rows }
    }
}
