//! # n-editor: outline core for n-outline
//!
//! Everything the outliner does that doesn't need a terminal:
//!
//! - **[`item`]**: `ListItem`, one piece of (possibly multi-line) text at a level
//! - **[`numbering`]**: section numbers ("2.1.3") from a sequence of levels
//! - **[`list`]**: `ListManager`, the ordered outline and its structural edits
//! - **[`persist`]**: the indented flat-file format, load and save
//! - **[`mode`]**: Normal / Insert, plus two reserved modes
//! - **[`key`]**: the small key vocabulary dispatch understands
//! - **[`session`]**: outline + mode + cursor + scroll, one value
//! - **[`dispatch`]**: the modal state machine, key in, effects out
//! - **[`projection`]**: rows and cursor for a renderer to paint
//! - **[`options`]**: startup tunables
//! - **[`error`]**: I/O errors from load and save
//!
//! The front end (n-outline's binary) owns the terminal, turns raw input into
//! [`key::Key`]s, feeds them to [`dispatch::dispatch`], acts on the returned
//! effects, and paints [`Session::project`](session::Session::project).

pub mod dispatch;
pub mod error;
pub mod item;
pub mod key;
pub mod list;
pub mod mode;
pub mod numbering;
pub mod options;
pub mod persist;
pub mod projection;
pub mod session;

pub use error::{OutlineError, Result};
