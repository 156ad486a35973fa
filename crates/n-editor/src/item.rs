//! List item: the atomic node of an outline.
//!
//! An item is a piece of (possibly multi-line) text at some depth. The outline
//! has no tree pointers: hierarchy is implied by the sequence of levels, and
//! each item's `number` is derived from that sequence by
//! [`renumber`](crate::numbering::renumber). Callers never set the number
//! directly.
//!
//! Content is stored as a `String`. Cursor offsets elsewhere in the crate are
//! **char** offsets, never byte offsets; the helpers here do the conversion.

use std::collections::BTreeMap;
use std::fmt;

use crate::numbering::MAX_LEVEL;

/// Line-break marker embedded in item content.
pub const LINE_BREAK: char = '\n';

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Opaque identity of an item, unique within a session.
///
/// Handed out by [`ListManager`](crate::list::ListManager) from a monotonically
/// increasing counter. Nothing orders or looks up items by id yet; it exists so
/// per-item state (collapse, metadata) has something stable to hang off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    #[inline]
    #[must_use]
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ListItem
// ---------------------------------------------------------------------------

/// One entry in the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    id: ItemId,
    /// Item text. May contain [`LINE_BREAK`] for multi-line items.
    pub content: String,
    level: usize,
    number: String,
    /// Display hint. Preserved across every mutation; nothing in the core
    /// acts on it.
    pub collapsed: bool,
    /// Free-form attributes.
    pub metadata: BTreeMap<String, String>,
}

impl ListItem {
    /// Create an item. The level is clamped to `0..=MAX_LEVEL`; the number
    /// stays empty until the owning list renumbers.
    #[must_use]
    pub fn new(id: ItemId, content: impl Into<String>, level: usize) -> Self {
        Self {
            id,
            content: content.into(),
            level: level.min(MAX_LEVEL),
            number: String::new(),
            collapsed: false,
            metadata: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Hierarchical depth, `0..=MAX_LEVEL`.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Set the level, clamped to `0..=MAX_LEVEL`. The number is stale until
    /// the next renumber.
    #[inline]
    pub(crate) fn set_level(&mut self, level: usize) {
        self.level = level.min(MAX_LEVEL);
    }

    /// Section number such as `"2.1.3"`.
    #[inline]
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    #[inline]
    pub(crate) fn set_number(&mut self, number: String) {
        self.number = number;
    }

    // -- Content helpers ----------------------------------------------------

    /// Content length in chars.
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.content.chars().count()
    }

    /// The content split on line-break markers. Always yields at least one
    /// (possibly empty) line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split(LINE_BREAK)
    }

    /// Insert a char at a char offset. Offsets past the end append.
    pub fn insert_char(&mut self, at: usize, ch: char) {
        let byte = byte_offset(&self.content, at);
        self.content.insert(byte, ch);
    }

    /// Remove and return the char at a char offset, if there is one.
    pub fn remove_char(&mut self, at: usize) -> Option<char> {
        let (byte, _) = self.content.char_indices().nth(at)?;
        Some(self.content.remove(byte))
    }

    /// Append another item's text to this one.
    pub fn append(&mut self, text: &str) {
        self.content.push_str(text);
    }
}

/// Byte index of the `char_idx`-th char, or `text.len()` when out of range.
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
