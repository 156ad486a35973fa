// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: read keys, hand them to the app, repaint.
//
// One thread. The loop blocks in `poll(2)` on stdin until bytes arrive,
// parses them into keys, and calls `App::on_key` for each. After any key
// or resize it asks the app to paint the line screen and writes the rows
// that changed in one synchronized update.
//
// # Escape timeout
//
// A lone ESC byte is either the Escape key or the first byte of a
// sequence. While the parser holds one, the poll uses a short timeout
// (`LoopConfig::escape_timeout`); if nothing else arrives in that window
// the parser is flushed and the app sees Escape.
//
// # SIGWINCH
//
// The handler only sets an atomic flag. The signal also interrupts the
// poll (EINTR), so a resize is picked up right away.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::ansi::{self, CursorShape};
use crate::input::{KeyEvent, Parser};
use crate::screen::Screen;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        // No SA_RESTART: the poll must wake up.
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// An application driven by [`EventLoop`].
pub trait App {
    /// Handle one key. Return [`Action::Quit`] to leave the loop.
    fn on_key(&mut self, key: KeyEvent) -> Action;

    /// The terminal was resized. The screen already has the new size.
    fn on_resize(&mut self, _size: Size) {}

    /// Fill the screen. It has been cleared before the call.
    fn paint(&mut self, screen: &mut Screen);

    /// Where to show the cursor after painting, or `None` to hide it.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// How long a lone ESC waits for the rest of a sequence.
    pub escape_timeout: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            escape_timeout: Duration::from_millis(25),
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, the input parser, and the screen.
///
/// ```no_run
/// use n_term::event_loop::{Action, App, EventLoop, LoopConfig};
/// use n_term::input::{KeyCode, KeyEvent};
/// use n_term::screen::{Attr, Screen};
///
/// struct Hello;
///
/// impl App for Hello {
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key.code == KeyCode::Char('q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, screen: &mut Screen) {
///         screen.set_line(0, "hello, press q", Attr::empty());
///     }
/// }
///
/// EventLoop::new(LoopConfig::default()).run(&mut Hello)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    screen: Screen,
    config: LoopConfig,
}

impl EventLoop {
    #[must_use]
    pub fn new(config: LoopConfig) -> Self {
        let terminal = Terminal::new();
        let size = terminal.size();
        Self {
            terminal,
            parser: Parser::new(),
            screen: Screen::new(size.cols, size.rows),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Take over the terminal and run until the app quits or stdin closes.
    /// The terminal is restored on the way out, error or not.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, reading, or writing fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = self.run_inner(app);
        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let mut dirty = true;

        loop {
            if dirty {
                let mut frame = Vec::with_capacity(4096);
                compose_frame(&mut self.screen, app, &mut frame)?;
                let mut stdout = io::stdout().lock();
                stdout.write_all(&frame)?;
                stdout.flush()?;
                dirty = false;
            }

            let timeout = self
                .parser
                .has_pending()
                .then_some(self.config.escape_timeout);

            let keys = match wait_for_input(timeout)? {
                Input::Bytes(bytes) => self.parser.advance(&bytes),
                Input::Timeout => self.parser.flush(),
                Input::Interrupted => Vec::new(),
                Input::Closed => return Ok(()),
            };

            if !keys.is_empty() {
                dirty = true;
                if deliver(app, &keys) == Action::Quit {
                    return Ok(());
                }
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                self.screen.resize(size.cols, size.rows);
                app.on_resize(size);
                dirty = true;
            }
        }
    }
}

/// Hand keys to the app in order, stopping at the first Quit.
fn deliver(app: &mut impl App, keys: &[KeyEvent]) -> Action {
    for &key in keys {
        if app.on_key(key) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

/// Paint the app into `screen` and write the changed rows plus cursor to
/// `out` as one synchronized update.
fn compose_frame(screen: &mut Screen, app: &mut impl App, out: &mut impl Write) -> io::Result<()> {
    screen.clear();
    app.paint(screen);

    ansi::begin_sync(out)?;
    ansi::cursor_hide(out)?;
    screen.render(out)?;
    if let Some((x, y, shape)) = app.cursor() {
        ansi::cursor_to(out, x, y)?;
        ansi::set_cursor_shape(out, shape)?;
        ansi::cursor_show(out)?;
    }
    ansi::end_sync(out)
}

// ─── Input Wait ──────────────────────────────────────────────────────────────

enum Input {
    Bytes(Vec<u8>),
    Timeout,
    /// A signal woke the poll.
    Interrupted,
    /// EOF on stdin.
    Closed,
}

const READ_BUF_SIZE: usize = 4096;

/// Block until stdin is readable, `timeout` passes, or a signal arrives.
#[cfg(unix)]
fn wait_for_input(timeout: Option<Duration>) -> io::Result<Input> {
    let timeout_ms = timeout.map_or(-1, |t| i32::try_from(t.as_millis()).unwrap_or(i32::MAX));
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };

    let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(Input::Interrupted)
        } else {
            Err(err)
        };
    }
    if ready == 0 {
        return Ok(Input::Timeout);
    }

    let mut buf = [0u8; READ_BUF_SIZE];
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    match usize::try_from(n) {
        Ok(0) => Ok(Input::Closed),
        Ok(n) => Ok(Input::Bytes(buf[..n].to_vec())),
        Err(_) => {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                Ok(Input::Interrupted)
            } else {
                Err(err)
            }
        }
    }
}

/// Without poll there is no timeout: a lone ESC is flushed right away.
#[cfg(not(unix))]
fn wait_for_input(timeout: Option<Duration>) -> io::Result<Input> {
    use std::io::Read;

    if timeout.is_some() {
        return Ok(Input::Timeout);
    }
    let mut buf = [0u8; READ_BUF_SIZE];
    match io::stdin().lock().read(&mut buf)? {
        0 => Ok(Input::Closed),
        n => Ok(Input::Bytes(buf[..n].to_vec())),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
