//! Projection: the read-only view of a session that a renderer consumes.
//!
//! The core never draws. It lays the outline out as a list of [`Row`]s (one
//! per displayed line) and says where the cursor belongs, in display cells.
//! A renderer only has to paint the rows top to bottom and park the cursor.
//!
//! # Row layout
//!
//! ```text
//! 1 Groceries
//!     1.1 Eggs
//!     1.2 Milk, the
//!         good kind          ← continuation row, aligned under the text
//! 2 Chores
//! ```
//!
//! The first row of an item is `indent + number + " " + text`. Later rows of
//! a multi-line item get a blank prefix of the same width.

use unicode_width::UnicodeWidthStr;

use crate::item::LINE_BREAK;
use crate::mode::Mode;
use crate::persist::INDENT_WIDTH;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Cursor location
// ---------------------------------------------------------------------------

/// Where an absolute content offset falls once the content is split on line
/// breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorLocation {
    /// Which line of the item (0 = first).
    pub sub_line: usize,
    /// Char offset within that line.
    pub column: usize,
}

/// Split `content` at char offset `cursor_x` and locate the cursor.
///
/// Offsets past the end are treated as the end.
#[must_use]
pub fn cursor_location(content: &str, cursor_x: usize) -> CursorLocation {
    let mut sub_line = 0;
    let mut column = 0;
    for ch in content.chars().take(cursor_x) {
        if ch == LINE_BREAK {
            sub_line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    CursorLocation { sub_line, column }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One displayed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    /// Index of the item this row belongs to.
    pub item: usize,
    /// Line of the item shown on this row.
    pub sub_line: usize,
    /// Indent plus number (first row) or matching blank padding.
    pub prefix: String,
    /// The item's text for this line.
    pub text: &'a str,
    /// True for every row of the focused item.
    pub is_current: bool,
}

/// Screen position of the cursor relative to the top-left of the outline
/// area, in display cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCursor {
    pub row: usize,
    pub col: usize,
}

/// Everything needed to draw one frame of the outline area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection<'a> {
    pub rows: Vec<Row<'a>>,
    /// `None` when the cursor's row is scrolled out of view.
    pub cursor: Option<ScreenCursor>,
    pub mode: Mode,
}

/// Prefix for the first row of an item: indent, number, one space.
#[must_use]
pub fn first_prefix(level: usize, number: &str) -> String {
    format!("{}{number} ", " ".repeat(level * INDENT_WIDTH))
}

impl Session {
    /// Lay out up to `height` rows starting at `top_line`.
    ///
    /// Call [`scroll_into_view`](Self::scroll_into_view) first so the cursor
    /// lands inside the window. In Insert mode the cursor sits at the text
    /// offset; in the other modes it rests on the first character of the
    /// focused item.
    #[must_use]
    pub fn project(&self, height: usize) -> Projection<'_> {
        let mut rows = Vec::with_capacity(height);
        let mut cursor = None;

        let location = self.current_item().map(|item| {
            if self.mode.is_input() {
                cursor_location(&item.content, self.cursor_x)
            } else {
                CursorLocation { sub_line: 0, column: 0 }
            }
        });

        'items: for (index, item) in self.list.items().iter().enumerate().skip(self.top_line) {
            let first = first_prefix(item.level(), item.number());
            let pad = " ".repeat(first.width());
            let is_current = index == self.current_line;

            for (sub_line, text) in item.content.split(LINE_BREAK).enumerate() {
                if rows.len() >= height {
                    break 'items;
                }
                let prefix = if sub_line == 0 { first.clone() } else { pad.clone() };

                if let Some(loc) = location.filter(|l| is_current && l.sub_line == sub_line) {
                    let before: String = text.chars().take(loc.column).collect();
                    cursor = Some(ScreenCursor {
                        row: rows.len(),
                        col: prefix.width() + before.width(),
                    });
                }

                rows.push(Row {
                    item: index,
                    sub_line,
                    prefix,
                    text,
                    is_current,
                });
            }
        }

        Projection {
            rows,
            cursor,
            mode: self.mode,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
