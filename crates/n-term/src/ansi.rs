// SPDX-License-Identifier: MIT
//
// ANSI escape sequences.
//
// Stateless writers for the handful of terminal commands the outliner
// needs. Each takes any `impl Write`; the screen batches them into one
// buffer per frame and flushes once.
//
// Coordinates are 0-indexed here and converted to the 1-indexed form the
// terminal expects.

use std::io::{self, Write};

use crate::screen::Attr;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `x`, row `y` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the whole screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Clear from the cursor to the end of the line (EL 0).
#[inline]
pub fn clear_to_eol(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

/// Reset all SGR attributes (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

/// Emit the SGR codes for `attr` as one CSI sequence, e.g. `\x1b[1;7m`.
/// Writes nothing for an empty set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    if attr.is_empty() {
        return Ok(());
    }

    let codes: Vec<&str> = [
        (Attr::BOLD, "1"),
        (Attr::DIM, "2"),
        (Attr::INVERSE, "7"),
    ]
    .into_iter()
    .filter(|(flag, _)| attr.contains(*flag))
    .map(|(_, code)| code)
    .collect();

    write!(w, "\x1b[{}m", codes.join(";"))
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin a synchronized update (DEC mode 2026). Terminals that support it
/// hold the display until [`end_sync`], so a frame never shows half-drawn.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End a synchronized update.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Switch to the alternate screen buffer (DEC mode 1049). The shell's
/// content comes back on [`exit_alt_screen`].
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Cursor Shape ───────────────────────────────────────────────────────────

/// Cursor shape (DECSCUSR).
///
/// Normal mode shows a block, Insert mode a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Whatever the terminal was configured with.
    #[default]
    Default,
    SteadyBlock,
    SteadyBar,
}

#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    let n: u8 = match shape {
        CursorShape::Default => 0,
        CursorShape::SteadyBlock => 2,
        CursorShape::SteadyBar => 6,
    };
    write!(w, "\x1b[{n} q")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_is_one_indexed() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_does_not_overflow() {
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn screen_sequences() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| clear_to_eol(w)), "\x1b[K");
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    // ── Attributes ──────────────────────────────────────────────────────

    #[test]
    fn attrs_empty_writes_nothing() {
        assert_eq!(emit(|w| attrs(w, Attr::empty())), "");
    }

    #[test]
    fn attrs_single() {
        assert_eq!(emit(|w| attrs(w, Attr::INVERSE)), "\x1b[7m");
    }

    #[test]
    fn attrs_combined_in_code_order() {
        assert_eq!(emit(|w| attrs(w, Attr::INVERSE | Attr::BOLD)), "\x1b[1;7m");
    }

    // ── Modes ───────────────────────────────────────────────────────────

    #[test]
    fn alt_screen_and_sync() {
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
        assert_eq!(emit(|w| begin_sync(w)), "\x1b[?2026h");
        assert_eq!(emit(|w| end_sync(w)), "\x1b[?2026l");
    }

    #[test]
    fn cursor_shapes() {
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::Default)), "\x1b[0 q");
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::SteadyBlock)), "\x1b[2 q");
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::SteadyBar)), "\x1b[6 q");
    }
}
