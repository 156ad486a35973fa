// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. Covers what a plain xterm-style
// terminal sends with no extra protocols enabled:
//
// - ASCII and UTF-8 multi-byte characters
// - Control characters (Ctrl+letter, Enter, Tab, Backspace)
// - CSI sequences: arrows, Home/End, editing keys, Shift+Tab, modifiers
// - SS3 sequences: arrows and Home/End in application cursor mode
// - Alt+key (ESC followed by a printable character)
//
// Escape sequences can arrive split across reads, so the parser keeps the
// unconsumed tail and resumes on the next `advance`. A lone ESC stays
// pending until the caller decides no more bytes are coming and calls
// `flush`, which turns it into the Escape key.

use bitflags::bitflags;

// ─── Key Types ───────────────────────────────────────────────────────────────

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// True for Ctrl+`ch` (lowercase letter).
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.code == KeyCode::Char(ch) && self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Which key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    /// Shift+Tab (`CSI Z`).
    BackTab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Modifier keys, in xterm's CSI encoding (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

const ESC: u8 = 0x1B;

/// Incremental byte-to-key parser.
#[derive(Debug, Default)]
pub struct Parser {
    pending: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes and return every complete key in them. An incomplete
    /// trailing sequence is kept for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.pending.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.pending.len() {
            match parse_one(&self.pending[pos..]) {
                Step::Key(key, used) => {
                    keys.push(key);
                    pos += used;
                }
                Step::Skip(used) => pos += used,
                Step::Incomplete => break,
            }
        }

        self.pending.drain(..pos);
        keys
    }

    /// Bytes waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Give up waiting: a held ESC becomes Escape, anything after it is
    /// parsed as ordinary input, and broken leftovers are dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let bytes = std::mem::take(&mut self.pending);
        let Some((&first, rest)) = bytes.split_first() else {
            return Vec::new();
        };

        let mut keys = Vec::new();
        let rest = if first == ESC {
            keys.push(KeyEvent::plain(KeyCode::Escape));
            rest
        } else {
            &bytes[..]
        };
        keys.extend(self.advance(rest));
        self.pending.clear();
        keys
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

enum Step {
    /// A key, and how many bytes it used.
    Key(KeyEvent, usize),
    /// Unrecognized bytes to drop.
    Skip(usize),
    /// Need more input.
    Incomplete,
}

fn parse_one(buf: &[u8]) -> Step {
    let Some(&lead) = buf.first() else {
        return Step::Incomplete;
    };

    match lead {
        ESC => parse_escape(buf),
        b'\r' | b'\n' => plain(KeyCode::Enter, 1),
        b'\t' => plain(KeyCode::Tab, 1),
        0x08 | 0x7F => plain(KeyCode::Backspace, 1),
        0x00 => Step::Key(KeyEvent::new(KeyCode::Char(' '), Modifiers::CTRL), 1),
        b @ 0x01..=0x1A => Step::Key(
            KeyEvent::new(KeyCode::Char(char::from(b - 1 + b'a')), Modifiers::CTRL),
            1,
        ),
        0x1C..=0x1F => Step::Skip(1),
        b @ 0x20..=0x7E => plain(KeyCode::Char(char::from(b)), 1),
        _ => parse_utf8(buf),
    }
}

const fn plain(code: KeyCode, used: usize) -> Step {
    Step::Key(KeyEvent::plain(code), used)
}

fn parse_escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return Step::Incomplete;
    };

    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        b @ 0x20..=0x7E => Step::Key(KeyEvent::new(KeyCode::Char(char::from(b)), Modifiers::ALT), 2),
        // ESC followed by something that isn't a sequence: the ESC stands
        // alone and the next byte is parsed on its own.
        _ => plain(KeyCode::Escape, 1),
    }
}

/// `ESC [ params final`. Parameters are `;`-separated decimal numbers; the
/// second one, when present, carries the modifiers.
fn parse_csi(buf: &[u8]) -> Step {
    let body = &buf[2..];
    let Some(end) = body.iter().position(|b| !(0x20..=0x3F).contains(b)) else {
        return Step::Incomplete;
    };
    // A byte that is neither parameter nor final breaks the sequence. Drop
    // what came before it and parse it fresh.
    if !(0x40..=0x7E).contains(&body[end]) {
        return Step::Skip(2 + end);
    }

    let used = 2 + end + 1;
    let params = parse_params(&body[..end]);
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match body[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => KeyCode::BackTab,
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            n @ 11..=15 => KeyCode::F(u8::try_from(n - 10).unwrap_or(0)),
            n @ 17..=21 => KeyCode::F(u8::try_from(n - 11).unwrap_or(0)),
            n @ 23..=24 => KeyCode::F(u8::try_from(n - 12).unwrap_or(0)),
            _ => return Step::Skip(used),
        },
        _ => return Step::Skip(used),
    };

    Step::Key(KeyEvent::new(code, modifiers), used)
}

/// `ESC O final`.
fn parse_ss3(buf: &[u8]) -> Step {
    let Some(&final_byte) = buf.get(2) else {
        return Step::Incomplete;
    };

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Step::Skip(3),
    };
    plain(code, 3)
}

fn parse_utf8(buf: &[u8]) -> Step {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Step::Skip(1),
    };
    let Some(bytes) = buf.get(..len) else {
        return if buf[1..].iter().all(|b| b & 0xC0 == 0x80) {
            Step::Incomplete
        } else {
            Step::Skip(1)
        };
    };

    match std::str::from_utf8(bytes).ok().and_then(|s| s.chars().next()) {
        Some(ch) => plain(KeyCode::Char(ch), len),
        None => Step::Skip(1),
    }
}

fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|part| {
            part.iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, b| acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
        })
        .collect()
}

/// `1 + bits`; 0 and 1 both mean no modifiers.
fn decode_modifiers(param: u16) -> Modifiers {
    let bits = u8::try_from(param.saturating_sub(1)).unwrap_or(0);
    Modifiers::from_bits_truncate(bits)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<KeyEvent> {
        Parser::new().advance(data)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    // ── Plain bytes ─────────────────────────────────────────────────────

    #[test]
    fn ascii_chars() {
        assert_eq!(
            parse(b"ab "),
            vec![
                key(KeyCode::Char('a')),
                key(KeyCode::Char('b')),
                key(KeyCode::Char(' '))
            ]
        );
    }

    #[test]
    fn control_keys() {
        assert_eq!(parse(b"\r"), vec![key(KeyCode::Enter)]);
        assert_eq!(parse(b"\n"), vec![key(KeyCode::Enter)]);
        assert_eq!(parse(b"\t"), vec![key(KeyCode::Tab)]);
        assert_eq!(parse(b"\x7f"), vec![key(KeyCode::Backspace)]);
        assert_eq!(parse(b"\x08"), vec![key(KeyCode::Backspace)]);
    }

    #[test]
    fn ctrl_c() {
        let keys = parse(b"\x03");
        assert_eq!(keys.len(), 1);
        assert!(keys[0].is_ctrl('c'));
    }

    #[test]
    fn utf8_chars() {
        assert_eq!(
            parse("é日🎉".as_bytes()),
            vec![
                key(KeyCode::Char('é')),
                key(KeyCode::Char('日')),
                key(KeyCode::Char('🎉'))
            ]
        );
    }

    #[test]
    fn utf8_split_across_reads() {
        let bytes = "日".as_bytes();
        let mut parser = Parser::new();
        assert!(parser.advance(&bytes[..1]).is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.advance(&bytes[1..]), vec![key(KeyCode::Char('日'))]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn invalid_utf8_is_skipped() {
        assert_eq!(parse(b"\xC3(a"), vec![key(KeyCode::Char('(')), key(KeyCode::Char('a'))]);
        assert_eq!(parse(b"\x80x"), vec![key(KeyCode::Char('x'))]);
    }

    // ── CSI ─────────────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(
            parse(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            vec![
                key(KeyCode::Up),
                key(KeyCode::Down),
                key(KeyCode::Right),
                key(KeyCode::Left)
            ]
        );
    }

    #[test]
    fn arrow_with_modifier() {
        assert_eq!(
            parse(b"\x1b[1;5C"),
            vec![KeyEvent::new(KeyCode::Right, Modifiers::CTRL)]
        );
    }

    #[test]
    fn back_tab() {
        assert_eq!(parse(b"\x1b[Z"), vec![key(KeyCode::BackTab)]);
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(parse(b"\x1b[3~"), vec![key(KeyCode::Delete)]);
        assert_eq!(parse(b"\x1b[1~"), vec![key(KeyCode::Home)]);
        assert_eq!(parse(b"\x1b[4~"), vec![key(KeyCode::End)]);
        assert_eq!(parse(b"\x1b[5~"), vec![key(KeyCode::PageUp)]);
        assert_eq!(parse(b"\x1b[15~"), vec![key(KeyCode::F(5))]);
        assert_eq!(parse(b"\x1b[24~"), vec![key(KeyCode::F(12))]);
    }

    #[test]
    fn unknown_csi_is_skipped() {
        assert_eq!(parse(b"\x1b[99~x"), vec![key(KeyCode::Char('x'))]);
        assert_eq!(parse(b"\x1b[?1u"), vec![]);
    }

    #[test]
    fn broken_csi_resyncs_on_next_escape() {
        assert_eq!(parse(b"\x1b[1\x1b[A"), vec![key(KeyCode::Up)]);
    }

    #[test]
    fn csi_split_across_reads() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[").is_empty());
        assert!(parser.advance(b"3").is_empty());
        assert_eq!(parser.advance(b"~"), vec![key(KeyCode::Delete)]);
    }

    // ── SS3 ─────────────────────────────────────────────────────────────

    #[test]
    fn ss3_arrows_and_function_keys() {
        assert_eq!(parse(b"\x1bOA"), vec![key(KeyCode::Up)]);
        assert_eq!(parse(b"\x1bOP"), vec![key(KeyCode::F(1))]);
    }

    // ── Escape ──────────────────────────────────────────────────────────

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), vec![key(KeyCode::Escape)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn flush_after_partial_csi() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[").is_empty());
        assert_eq!(
            parser.flush(),
            vec![key(KeyCode::Escape), key(KeyCode::Char('['))]
        );
    }

    #[test]
    fn flush_empty_is_empty() {
        assert!(Parser::new().flush().is_empty());
    }

    #[test]
    fn alt_letter() {
        assert_eq!(
            parse(b"\x1bx"),
            vec![KeyEvent::new(KeyCode::Char('x'), Modifiers::ALT)]
        );
    }

    #[test]
    fn escape_then_control_byte() {
        assert_eq!(parse(b"\x1b\r"), vec![key(KeyCode::Escape), key(KeyCode::Enter)]);
    }

    // ── Modifiers ───────────────────────────────────────────────────────

    #[test]
    fn modifier_decoding() {
        assert_eq!(decode_modifiers(0), Modifiers::empty());
        assert_eq!(decode_modifiers(1), Modifiers::empty());
        assert_eq!(decode_modifiers(2), Modifiers::SHIFT);
        assert_eq!(decode_modifiers(8), Modifiers::SHIFT | Modifiers::ALT | Modifiers::CTRL);
    }
}
