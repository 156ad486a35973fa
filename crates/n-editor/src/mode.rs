//! Vim-style modes for the outliner.
//!
//! The session is always in exactly one [`Mode`]:
//!
//! | Mode    | Cursor shape | Purpose                                  |
//! |---------|--------------|------------------------------------------|
//! | Normal  | Block        | Move between items, structural commands  |
//! | Insert  | Bar          | Typing into the focused item             |
//! | Visual  | Block        | Reserved; Esc returns to Normal          |
//! | Command | Bar          | Reserved; Esc returns to Normal          |

use std::fmt;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
///
/// Pure data: which mode we're in, not how keys are handled. Dispatch lives
/// in [`dispatch`](crate::dispatch).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are commands.
    #[default]
    Normal,
    /// Keys edit the focused item's text.
    Insert,
    /// Declared for future selection support. Nothing enters it yet.
    Visual,
    /// Declared for a future `:` prompt. Nothing enters it yet.
    Command,
}

impl Mode {
    /// Name for the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual => "VISUAL",
            Self::Command => "COMMAND",
        }
    }

    /// The terminal cursor shape for this mode.
    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Normal | Self::Visual => CursorShape::SteadyBlock,
            Self::Insert | Self::Command => CursorShape::SteadyBar,
        }
    }

    /// True when keys insert text.
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Insert)
    }

    /// True for the declared-but-unused modes.
    #[inline]
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Visual | Self::Command)
    }

    /// One-line key summary shown above the status line.
    #[must_use]
    pub const fn help_line(self) -> &'static str {
        match self {
            Self::Normal => {
                " i:insert | o:new below | O:new above | dd:delete | s:save | q:quit | \
                 j/↓:down | k/↑:up | >:indent | <:outdent"
            }
            Self::Insert => {
                " ESC:normal | Enter×2:new item | Tab:indent | Shift+Tab:outdent | \
                 Enter:line break | ←→:move | Backspace/Del:edit"
            }
            Self::Visual | Self::Command => " ESC:normal",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// CursorShape
// ---------------------------------------------------------------------------

/// Cursor shape for terminal display.
///
/// Mirrors `n_term::ansi::CursorShape` so the core stays independent of the
/// terminal crate; the front end maps one onto the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShape {
    /// `█`, a solid block.
    SteadyBlock,
    /// `▏`, a thin vertical bar.
    SteadyBar,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display_names() {
        assert_eq!(Mode::Normal.display_name(), "NORMAL");
        assert_eq!(Mode::Insert.display_name(), "INSERT");
        assert_eq!(Mode::Visual.display_name(), "VISUAL");
        assert_eq!(Mode::Command.display_name(), "COMMAND");
        assert_eq!(format!("{}", Mode::Insert), "INSERT");
    }

    #[test]
    fn cursor_shapes() {
        assert_eq!(Mode::Normal.cursor_shape(), CursorShape::SteadyBlock);
        assert_eq!(Mode::Insert.cursor_shape(), CursorShape::SteadyBar);
        assert_eq!(Mode::Visual.cursor_shape(), CursorShape::SteadyBlock);
        assert_eq!(Mode::Command.cursor_shape(), CursorShape::SteadyBar);
    }

    #[test]
    fn only_insert_is_input() {
        assert!(Mode::Insert.is_input());
        assert!(!Mode::Normal.is_input());
        assert!(!Mode::Command.is_input());
    }

    #[test]
    fn reserved_modes() {
        assert!(Mode::Visual.is_reserved());
        assert!(Mode::Command.is_reserved());
        assert!(!Mode::Normal.is_reserved());
        assert!(!Mode::Insert.is_reserved());
    }

    #[test]
    fn help_lines_mention_their_keys() {
        assert!(Mode::Normal.help_line().contains("dd:delete"));
        assert!(Mode::Insert.help_line().contains("Enter×2:new item"));
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }
}
