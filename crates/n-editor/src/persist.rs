//! Flat-file persistence.
//!
//! One item per physical line:
//!
//! ```text
//! <level × 4 spaces><number> <content>
//! ```
//!
//! For example level 1, number `1.2`, content `Buy milk` is written as
//! `    1.2 Buy milk`. Loading reverses it: the level comes from the leading
//! whitespace (`floor(len / 4)`), the first token is taken to be the number
//! and thrown away (numbers are always recomputed), and the remainder is the
//! content.
//!
//! # Multi-line items
//!
//! A line break inside an item would otherwise split it across physical
//! lines and come back as a separate, wrongly-leveled item. Content is
//! escaped on the way out (`\` becomes `\\`, a line break becomes `\n`, a
//! carriage return becomes `\r`) and unescaped on the way in, so any outline
//! survives a save/load round trip. An unknown escape such as `\t` is kept
//! as written.
//!
//! Files written by hand without escapes still load: only a backslash followed
//! by `\`, `n`, or `r` is treated specially.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{OutlineError, Result};
use crate::item::ListItem;
use crate::list::ListManager;
use crate::numbering::MAX_LEVEL;

/// Spaces per level in the file format (and on screen).
pub const INDENT_WIDTH: usize = 4;

impl ListManager {
    /// Serialize the outline in the flat file format. Every line, including
    /// the last, ends with `\n`.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for item in self.items() {
            write_item(&mut out, item);
        }
        out
    }

    /// Replace the outline with the items parsed from `text`. Blank lines are
    /// skipped. Afterwards the insertion position sits past the last item.
    pub fn load_text(&mut self, text: &str) {
        self.clear();
        for (line_no, line) in text.lines().enumerate() {
            let Some(parsed) = parse_line(line) else {
                continue;
            };
            if parsed.level > MAX_LEVEL {
                warn!(
                    line = line_no + 1,
                    level = parsed.level,
                    "indent deeper than the maximum level, clamping"
                );
            }
            self.add_item(parsed.content, Some(parsed.level));
        }
    }

    /// Write the outline to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Write`] if the file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_text()).map_err(|source| OutlineError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), items = self.len(), "saved outline");
        Ok(())
    }

    /// Replace the outline with the contents of `path`.
    ///
    /// A missing file is not an error: the outline is simply left empty.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::Read`] if the file exists but cannot be read
    /// or is not valid UTF-8.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        match fs::read_to_string(path) {
            Ok(text) => {
                self.load_text(&text);
                info!(path = %path.display(), items = self.len(), "loaded outline");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.clear();
                info!(path = %path.display(), "no outline file, starting empty");
                Ok(())
            }
            Err(source) => Err(OutlineError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

fn write_item(out: &mut String, item: &ListItem) {
    for _ in 0..item.level() * INDENT_WIDTH {
        out.push(' ');
    }
    out.push_str(item.number());
    out.push(' ');
    out.push_str(&escape_content(&item.content));
    out.push('\n');
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

/// One non-blank line of an outline file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Level derived from the indent. May exceed [`MAX_LEVEL`]; the list
    /// clamps it on insertion.
    pub level: usize,
    /// Unescaped content with the number token removed.
    pub content: String,
}

/// Parse a physical line. Returns `None` for blank lines.
///
/// Leading whitespace counts one per char. Exactly one whitespace char after
/// the number token is treated as the separator, so content that itself
/// begins with spaces survives.
#[must_use]
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return None;
    }

    let body = line.trim_start();
    let indent = line[..line.len() - body.len()].chars().count();

    let content = match body.find(char::is_whitespace) {
        Some(end) => {
            let mut rest = body[end..].chars();
            rest.next();
            rest.as_str()
        }
        None => "",
    };

    Some(ParsedLine {
        level: indent / INDENT_WIDTH,
        content: unescape_content(content).into_owned(),
    })
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape content so it fits on one physical line.
#[must_use]
pub fn escape_content(content: &str) -> Cow<'_, str> {
    if !content.contains(['\\', '\n', '\r']) {
        return Cow::Borrowed(content);
    }
    let mut out = String::with_capacity(content.len() + 8);
    for ch in content.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Reverse [`escape_content`].
#[must_use]
pub fn unescape_content(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
