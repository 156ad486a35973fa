// SPDX-License-Identifier: MIT
//
// Line screen: one styled string per terminal row.
//
// The outliner draws whole lines: an outline row, the help line, the status
// line, the message line. So the frame is a `Vec<Line>` rather than a cell
// grid. Each frame the application fills the lines, and `render` writes only
// the rows that differ from what is already on the terminal.
//
// Lines wider than the screen are cut and end in `...`. Widths are display
// cells (unicode-width), so CJK and emoji truncate at the right column.

use std::borrow::Cow;
use std::io::{self, Write};

use bitflags::bitflags;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ansi;

/// Marker appended to truncated lines.
pub const ELLIPSIS: &str = "...";

bitflags! {
    /// Text attributes for a whole line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD    = 1 << 0;
        const DIM     = 1 << 1;
        /// Reverse video.
        const INVERSE = 1 << 2;
    }
}

// ─── Line ────────────────────────────────────────────────────────────────────

/// One row of the frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub attr: Attr,
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Frame of `height` lines, `width` cells wide.
pub struct Screen {
    width: u16,
    lines: Vec<Line>,
    /// What the terminal currently shows, row by row. `None` forces a repaint.
    shown: Vec<Option<Line>>,
}

impl Screen {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let rows = usize::from(height);
        Self {
            width,
            lines: vec![Line::default(); rows],
            shown: vec![None; rows],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }

    /// Change the frame size. Everything is repainted on the next render.
    pub fn resize(&mut self, width: u16, height: u16) {
        let rows = usize::from(height);
        self.width = width;
        self.lines = vec![Line::default(); rows];
        self.shown = vec![None; rows];
    }

    /// Blank every line of the frame being built.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            *line = Line::default();
        }
    }

    /// Forget what the terminal shows so the next render writes every row.
    pub fn force_redraw(&mut self) {
        self.shown.fill(None);
    }

    /// Set row `row`. Control characters show as `?`; text wider than the
    /// screen is truncated with [`ELLIPSIS`]. Rows off the bottom are ignored.
    pub fn set_line(&mut self, row: u16, text: &str, attr: Attr) {
        let width = usize::from(self.width);
        let Some(line) = self.lines.get_mut(usize::from(row)) else {
            return;
        };
        let clean = sanitize(text);
        line.text = truncate(&clean, width).into_owned();
        line.attr = attr;
    }

    #[must_use]
    pub fn line(&self, row: u16) -> Option<&Line> {
        self.lines.get(usize::from(row))
    }

    /// Write changed rows to `w`. Returns how many rows were written.
    ///
    /// Reverse-video rows are padded to the full width so the highlight
    /// spans the line.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `w`.
    pub fn render(&mut self, w: &mut impl Write) -> io::Result<usize> {
        let mut written = 0;
        for (row, (line, shown)) in self.lines.iter().zip(self.shown.iter_mut()).enumerate() {
            if shown.as_ref() == Some(line) {
                continue;
            }
            let y = u16::try_from(row).unwrap_or(u16::MAX);
            ansi::cursor_to(w, 0, y)?;
            ansi::attrs(w, line.attr)?;
            w.write_all(line.text.as_bytes())?;
            if line.attr.contains(Attr::INVERSE) {
                let fill = usize::from(self.width).saturating_sub(line.text.width());
                write!(w, "{:fill$}", "")?;
            }
            ansi::reset(w)?;
            ansi::clear_to_eol(w)?;

            *shown = Some(line.clone());
            written += 1;
        }
        Ok(written)
    }
}

// ─── Text Helpers ────────────────────────────────────────────────────────────

/// Replace control characters with `?`.
#[must_use]
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_control) {
        Cow::Owned(
            text.chars()
                .map(|c| if c.is_control() { '?' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// Fit `text` into `width` display cells, ending in [`ELLIPSIS`] when it
/// had to be cut. Screens narrower than the ellipsis get a hard cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> Cow<'_, str> {
    if text.width() <= width {
        return Cow::Borrowed(text);
    }

    let ellipsis = ELLIPSIS.width();
    let (budget, suffix) = if width > ellipsis {
        (width - ellipsis, ELLIPSIS)
    } else {
        (width, "")
    };

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(suffix);
    Cow::Owned(out)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
