// SPDX-License-Identifier: MIT
//
// n-outline: a modal terminal outliner with automatic section numbers.
//
// This binary wires the two crates together:
//
//   n-term   → terminal control, key parsing, line screen, event loop
//   n-editor → outline model, modes, key dispatch, projection
//
// `Outliner` implements n-term's App trait. Each keypress flows through:
//
//   stdin → parser → on_key → translate → dispatch → effects (save, quit)
//   paint → scroll_into_view → project → screen lines → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ outline rows                 │  ← h - 3 rows
//   ├──────────────────────────────┤
//   │ key help for the mode (DIM)  │  ← 1 row, optional
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   ├──────────────────────────────┤
//   │ message line                 │  ← 1 row
//   └──────────────────────────────┘

mod logging;

use std::process;

use anyhow::{Context, Result};
use tracing::{error, info};

use n_editor::dispatch::{self, Effect};
use n_editor::key::Key;
use n_editor::mode::{self, Mode};
use n_editor::options::Options;
use n_editor::session::Session;

use n_term::ansi::CursorShape;
use n_term::event_loop::{Action, App, EventLoop, LoopConfig};
use n_term::input::{KeyCode, KeyEvent, Modifiers};
use n_term::screen::{Attr, Screen};
use n_term::terminal::Size;

const WELCOME: &str = "Welcome to n-outline - press 'i' for insert mode, 'q' to quit";

// ─── Outliner ───────────────────────────────────────────────────────────────

struct Outliner {
    session: Session,
    options: Options,
    /// One-shot message for the bottom line. Cleared by the next key.
    message: Option<String>,
    size: Size,
    /// Computed in `paint`, reported through `App::cursor`.
    cursor: Option<(u16, u16, CursorShape)>,
}

impl Outliner {
    fn new(session: Session, options: Options, size: Size) -> Self {
        let message = options.welcome.then(|| WELCOME.to_string());
        Self {
            session,
            options,
            message,
            size,
            cursor: None,
        }
    }

    fn text_rows(&self) -> usize {
        self.options.text_rows(usize::from(self.size.rows))
    }

    fn handle_key(&mut self, key: Key) -> Action {
        self.message = None;

        for effect in dispatch::dispatch(&mut self.session, key) {
            match effect {
                Effect::Quit => {
                    info!(items = self.session.list().len(), "quit");
                    return Action::Quit;
                }
                Effect::Save => self.save(),
                Effect::ModeChanged(mode) => self.message = Some(format!("-- {mode} --")),
            }
        }
        Action::Continue
    }

    fn save(&mut self) {
        let message = match self.session.save() {
            Ok(()) => format!(
                "Saved {} items to {}",
                self.session.list().len(),
                self.session.filename().display()
            ),
            Err(err) => {
                error!(%err, "save failed");
                format!("Error: {err}")
            }
        };
        self.message = Some(message);
    }

    fn status_line(&self) -> String {
        format!(" {} | {}", self.session.mode(), self.session.filename().display())
    }
}

// ─── Key Translation ────────────────────────────────────────────────────────

/// Boil a terminal key event down to the outliner's key vocabulary.
/// Ctrl and Alt chords have no binding.
const fn translate(key: KeyEvent) -> Key {
    let chord = key.modifiers.intersects(Modifiers::CTRL.union(Modifiers::ALT));

    match key.code {
        KeyCode::Char(_) if chord => Key::Other,
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab if key.modifiers.contains(Modifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Escape => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        _ => Key::Other,
    }
}

const fn cursor_shape(mode: Mode) -> CursorShape {
    match mode.cursor_shape() {
        mode::CursorShape::SteadyBlock => CursorShape::SteadyBlock,
        mode::CursorShape::SteadyBar => CursorShape::SteadyBar,
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ─── App ────────────────────────────────────────────────────────────────────

impl App for Outliner {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.is_ctrl('c') {
            info!("interrupted");
            return Action::Quit;
        }
        self.handle_key(translate(key))
    }

    fn on_resize(&mut self, size: Size) {
        self.size = size;
    }

    fn paint(&mut self, screen: &mut Screen) {
        let text_rows = self.text_rows();
        self.session.scroll_into_view(text_rows);

        let projection = self.session.project(text_rows);
        for (y, r) in projection.rows.iter().enumerate() {
            let attr = if r.is_current { Attr::INVERSE } else { Attr::empty() };
            screen.set_line(to_u16(y), &format!("{}{}", r.prefix, r.text), attr);
        }

        let mut y = text_rows;
        if self.options.show_help {
            screen.set_line(to_u16(y), self.session.mode().help_line(), Attr::DIM);
            y += 1;
        }
        screen.set_line(to_u16(y), &self.status_line(), Attr::INVERSE);
        if let Some(message) = &self.message {
            screen.set_line(to_u16(y + 1), message, Attr::BOLD);
        }

        let width = usize::from(screen.width());
        let shape = cursor_shape(projection.mode);
        self.cursor = projection
            .cursor
            .filter(|c| c.col < width)
            .map(|c| (to_u16(c.col), to_u16(c.row), shape));
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        self.cursor
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn run() -> Result<()> {
    let log_path = logging::init();
    let options = Options::default();
    info!(file = %options.filename.display(), log = ?log_path, "starting");

    let session = Session::open(&options.filename)
        .with_context(|| format!("failed to open {}", options.filename.display()))?;

    let mut event_loop = EventLoop::new(LoopConfig {
        escape_timeout: options.escape_timeout,
    });
    let mut outliner = Outliner::new(session, options, event_loop.size());
    event_loop.run(&mut outliner).context("terminal error")?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("n-outline: {err:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
