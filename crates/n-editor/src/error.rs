//! Error types for outline persistence.
//!
//! Structural edits never fail (out-of-range indices are ignored and levels
//! clamp), so the only fallible surface in the core is file I/O.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Outline error.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outline result.
pub type Result<T> = std::result::Result<T, OutlineError>;
