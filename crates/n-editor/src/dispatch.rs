//! Key dispatch: the modal state machine.
//!
//! [`dispatch`] takes the session and one key, applies whatever the key means
//! in the current mode, renumbers, and returns the [`Effect`]s the caller must
//! carry out. Nothing here touches the terminal or the filesystem; saving and
//! quitting come back as effects.
//!
//! # Normal mode
//!
//! | Key        | Action                                               |
//! |------------|------------------------------------------------------|
//! | `i`        | Insert mode, cursor at end of the item               |
//! | `o` / `O`  | New item below / above, Insert mode                  |
//! | `j` `↓`    | Next item                                            |
//! | `k` `↑`    | Previous item                                        |
//! | `dd`       | Delete the item (never the last one)                 |
//! | `>` / `<`  | Indent / outdent                                     |
//! | `s`        | Save                                                 |
//! | `q`        | Quit                                                 |
//!
//! # Insert mode
//!
//! | Key          | Action                                             |
//! |--------------|----------------------------------------------------|
//! | Esc          | Normal mode                                        |
//! | Enter        | Line break inside the item                         |
//! | Enter Enter  | New sibling item below                             |
//! | Tab / S-Tab  | Indent / outdent                                   |
//! | Backspace    | Outdent, merge into previous item, or delete char  |
//! | Delete       | Delete char under cursor                           |
//! | arrows       | Move within the item / between items               |
//!
//! `dd` is a two-step gesture: the first `d` parks the session in
//! [`Pending::Delete`] and the next key resolves it. Any key other than `d`
//! cancels the gesture and is itself consumed.

use tracing::{debug, trace};

use crate::item::{LINE_BREAK, ListItem};
use crate::key::Key;
use crate::mode::Mode;
use crate::session::{Pending, Session};

/// Something the caller has to do after a key is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Write the outline to [`Session::filename`].
    Save,
    /// End the session.
    Quit,
    /// The mode changed (for status messages).
    ModeChanged(Mode),
}

/// Handle one key.
///
/// The outline is renumbered after every key, whether or not anything moved.
pub fn dispatch(session: &mut Session, key: Key) -> Vec<Effect> {
    trace!(?key, mode = %session.mode, "dispatch");
    let mut effects = Vec::new();

    if let Some(pending) = session.pending.take() {
        resolve_pending(session, pending, key);
    } else if session.mode.is_reserved() {
        handle_reserved(session, key, &mut effects);
    } else if session.mode.is_input() {
        handle_insert(session, key, &mut effects);
    } else {
        handle_normal(session, key, &mut effects);
    }

    session.list.renumber_items();
    effects
}

/// Switch mode, clearing the Enter counter, and report the change.
fn set_mode(session: &mut Session, mode: Mode, effects: &mut Vec<Effect>) {
    session.mode = mode;
    session.enter_count = 0;
    effects.push(Effect::ModeChanged(mode));
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(session: &mut Session, key: Key, effects: &mut Vec<Effect>) {
    match key {
        Key::Char('q') => {
            effects.push(Effect::Quit);
            return;
        }
        Key::Char('s') => {
            effects.push(Effect::Save);
            return;
        }
        Key::Char('i') => {
            if session.list.is_empty() {
                session.insert_item_at(0, None);
            }
            session.cursor_x = session.current_len();
            set_mode(session, Mode::Insert, effects);
            return;
        }
        _ => {}
    }

    if session.list.is_empty() {
        return;
    }
    let line = session.current_line;

    match key {
        Key::Char('o') => {
            session.insert_item_at(line + 1, None);
            set_mode(session, Mode::Insert, effects);
        }
        Key::Char('O') => {
            session.insert_item_at(line, None);
            set_mode(session, Mode::Insert, effects);
        }
        Key::Char('j') | Key::Down => session.focus(line + 1),
        Key::Char('k') | Key::Up => session.focus(line.saturating_sub(1)),
        Key::Char('d') => session.pending = Some(Pending::Delete),
        Key::Char('>') => session.list.indent_item(line),
        Key::Char('<') => session.list.outdent_item(line),
        _ => {}
    }
}

fn resolve_pending(session: &mut Session, pending: Pending, key: Key) {
    match pending {
        Pending::Delete => {
            if key != Key::Char('d') {
                debug!(?key, "delete gesture cancelled");
                return;
            }
            if session.list.len() > 1 {
                session.list.delete_item(session.current_line);
                session.focus(session.current_line);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

fn handle_insert(session: &mut Session, key: Key, effects: &mut Vec<Effect>) {
    if session.list.is_empty() {
        session.insert_item_at(0, None);
        return;
    }
    if key != Key::Enter {
        session.enter_count = 0;
    }

    match key {
        Key::Escape => set_mode(session, Mode::Normal, effects),
        Key::Enter => handle_enter(session),
        Key::Tab => session.list.indent_item(session.current_line),
        Key::BackTab => session.list.outdent_item(session.current_line),
        Key::Backspace => handle_backspace(session),
        Key::Delete => {
            let at = session.cursor_x;
            if let Some(item) = session.current_item_mut() {
                item.remove_char(at);
            }
        }
        Key::Left => session.cursor_x = session.cursor_x.saturating_sub(1),
        Key::Right => session.cursor_x = (session.cursor_x + 1).min(session.current_len()),
        Key::Up => {
            if session.current_line > 0 {
                session.focus(session.current_line - 1);
            }
        }
        Key::Down => {
            if session.current_line + 1 < session.list.len() {
                session.focus(session.current_line + 1);
            }
        }
        Key::Char(ch) if key.is_printable() => {
            let at = session.cursor_x;
            if let Some(item) = session.current_item_mut() {
                item.insert_char(at, ch);
                session.cursor_x += 1;
            }
        }
        _ => {}
    }
}

/// One Enter breaks the line inside the item; a second in a row starts a new
/// sibling item instead.
fn handle_enter(session: &mut Session) {
    session.enter_count += 1;

    if session.enter_count >= 2 {
        let level = session.current_item().map(ListItem::level);
        session.insert_item_at(session.current_line + 1, level);
        session.enter_count = 0;
        return;
    }

    let at = session.cursor_x;
    if let Some(item) = session.current_item_mut() {
        item.insert_char(at, LINE_BREAK);
        session.cursor_x += 1;
    }
}

fn handle_backspace(session: &mut Session) {
    let line = session.current_line;
    let Some(level) = session.current_item().map(ListItem::level) else {
        return;
    };

    if session.cursor_x == 0 && level > 0 {
        session.list.outdent_item(line);
    } else if session.cursor_x == 0 && line > 0 {
        merge_into_previous(session, line);
    } else if session.cursor_x > 0 {
        let at = session.cursor_x - 1;
        if let Some(item) = session.current_item_mut() {
            item.remove_char(at);
        }
        session.cursor_x = at;
    }
}

/// Append item `line` onto item `line - 1`, delete it, and leave the cursor
/// at the seam.
fn merge_into_previous(session: &mut Session, line: usize) {
    let Some(removed) = session.list.delete_item(line) else {
        return;
    };
    let Some(prev) = session.list.get_mut(line - 1) else {
        return;
    };
    let seam = prev.len_chars();
    prev.append(&removed.content);

    session.current_line = line - 1;
    session.cursor_x = seam;
    debug!(into = line - 1, seam, "merged item into previous");
}

// ---------------------------------------------------------------------------
// Reserved modes
// ---------------------------------------------------------------------------

fn handle_reserved(session: &mut Session, key: Key, effects: &mut Vec<Effect>) {
    if key == Key::Escape {
        set_mode(session, Mode::Normal, effects);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
