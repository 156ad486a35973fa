//! Session state: everything the key dispatcher reads and writes.
//!
//! A [`Session`] bundles the outline with the editing state around it: the
//! mode, the focused item, the cursor inside that item, the scroll offset, and
//! the bits of multi-key state (the Enter counter and a pending `d`). It is a
//! plain value; [`dispatch`](crate::dispatch::dispatch) takes it by `&mut` and
//! returns whatever the outside world has to act on.
//!
//! # Cursor model
//!
//! `cursor_x` is an absolute char offset into the focused item's content,
//! line breaks included, bounded by the content length. Which displayed
//! sub-line it falls on is derived on demand (see
//! [`cursor_location`](crate::projection::cursor_location)).

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::item::ListItem;
use crate::list::ListManager;
use crate::mode::Mode;

/// A multi-key gesture waiting for its next key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// `d` was pressed in Normal mode; a second `d` deletes the line.
    Delete,
}

/// One editing session over one outline file.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) list: ListManager,
    pub(crate) mode: Mode,
    pub(crate) current_line: usize,
    pub(crate) cursor_x: usize,
    pub(crate) top_line: usize,
    pub(crate) enter_count: u8,
    pub(crate) pending: Option<Pending>,
    filename: PathBuf,
}

impl Session {
    /// Start a session over an already-built outline.
    ///
    /// An empty outline gets one blank item and the session starts in Insert
    /// mode, ready for typing. Otherwise it starts in Normal mode on the
    /// first item.
    #[must_use]
    pub fn new(mut list: ListManager, filename: impl Into<PathBuf>) -> Self {
        let mode = if list.is_empty() {
            list.set_current_position(0);
            list.add_item("", None);
            Mode::Insert
        } else {
            Mode::Normal
        };
        Self {
            list,
            mode,
            current_line: 0,
            cursor_x: 0,
            top_line: 0,
            enter_count: 0,
            pending: None,
            filename: filename.into(),
        }
    }

    /// Load `path` (a missing file means an empty outline) and start a
    /// session over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut list = ListManager::new();
        list.load_from_file(&path)?;
        Ok(Self::new(list, path))
    }

    // -- Read access --------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn list(&self) -> &ListManager {
        &self.list
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the focused item.
    #[inline]
    #[must_use]
    pub const fn current_line(&self) -> usize {
        self.current_line
    }

    /// Char offset of the cursor in the focused item's content.
    #[inline]
    #[must_use]
    pub const fn cursor_x(&self) -> usize {
        self.cursor_x
    }

    /// First visible item.
    #[inline]
    #[must_use]
    pub const fn top_line(&self) -> usize {
        self.top_line
    }

    /// Consecutive Enter presses in Insert mode (0 or 1 between keys).
    #[inline]
    #[must_use]
    pub const fn enter_count(&self) -> u8 {
        self.enter_count
    }

    #[inline]
    #[must_use]
    pub const fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// The file `s` saves to.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// The focused item, if the outline is non-empty.
    #[inline]
    #[must_use]
    pub fn current_item(&self) -> Option<&ListItem> {
        self.list.get(self.current_line)
    }

    /// Write the outline to the session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.list.save_to_file(&self.filename)
    }

    // -- Internal helpers ---------------------------------------------------

    pub(crate) fn current_item_mut(&mut self) -> Option<&mut ListItem> {
        self.list.get_mut(self.current_line)
    }

    /// Content length (chars) of the focused item, 0 when there is none.
    pub(crate) fn current_len(&self) -> usize {
        self.current_item().map_or(0, ListItem::len_chars)
    }

    /// Focus `line` (clamped to the outline) and pull the cursor back inside
    /// the new item's content.
    pub(crate) fn focus(&mut self, line: usize) {
        self.current_line = line.min(self.list.len().saturating_sub(1));
        self.cursor_x = self.cursor_x.min(self.current_len());
    }

    /// Insert a blank item at `at` and focus it with the cursor at 0.
    pub(crate) fn insert_item_at(&mut self, at: usize, level: Option<usize>) {
        self.list.set_current_position(at);
        self.list.add_item("", level);
        self.current_line = at.min(self.list.len() - 1);
        self.cursor_x = 0;
    }

    // -- Scrolling ----------------------------------------------------------

    /// Adjust `top_line` so the cursor's row fits in a viewport of
    /// `text_rows` rows. Multi-line items take one row per line.
    pub fn scroll_into_view(&mut self, text_rows: usize) {
        if self.current_line < self.top_line {
            self.top_line = self.current_line;
            return;
        }
        let Some(item) = self.current_item() else {
            self.top_line = 0;
            return;
        };
        let cursor_row = crate::projection::cursor_location(&item.content, self.cursor_x).sub_line;
        let text_rows = text_rows.max(1);

        while self.top_line < self.current_line {
            let above: usize = self.list.items()[self.top_line..self.current_line]
                .iter()
                .map(|i| i.lines().count())
                .sum();
            if above + cursor_row < text_rows {
                break;
            }
            self.top_line += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
