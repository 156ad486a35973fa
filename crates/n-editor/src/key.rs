//! Keys as the outliner sees them.
//!
//! The terminal layer reports richer events (modifiers, press/release, mouse);
//! the front end boils them down to this enum before dispatch. Keeping the
//! core's vocabulary this small is what lets the state machine be tested
//! without a terminal.

/// A single keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character with no Ctrl/Alt modifier.
    Char(char),
    Enter,
    Tab,
    /// Shift+Tab.
    BackTab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    /// Anything the outliner has no binding for.
    Other,
}

impl Key {
    /// True for characters that insert text: anything that isn't a control
    /// character.
    #[inline]
    #[must_use]
    pub fn is_printable(self) -> bool {
        matches!(self, Self::Char(ch) if !ch.is_control())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_chars() {
        assert!(Key::Char('a').is_printable());
        assert!(Key::Char(' ').is_printable());
        assert!(Key::Char('é').is_printable());
        assert!(!Key::Char('\u{1}').is_printable());
        assert!(!Key::Char('\x7f').is_printable());
        assert!(Key::Char('日').is_printable());
        assert!(!Key::Enter.is_printable());
    }
}
