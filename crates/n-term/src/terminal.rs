// SPDX-License-Identifier: MIT
//
// Terminal session: raw input, alternate screen, and getting both back.
//
// Two pieces:
//
//   RawMode  → RAII guard over stdin's termios; dropping it restores them
//   Terminal → owns the guard plus the screen setup written to stdout
//
// Setup and teardown are plain byte sequences built by `write_setup` and
// `write_teardown`. `Terminal::leave` and the panic hook share the teardown,
// so a crash leaves the terminal in the same state as a clean quit. The hook
// writes straight to fd 1 since stdout's lock may be held by the panicking
// frame.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Assumed when stdout is not a terminal.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    /// Current size of the terminal on stdout, if there is one.
    #[cfg(unix)]
    #[must_use]
    pub fn query() -> Option<Self> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } != 0 {
            return None;
        }
        (ws.ws_col > 0 && ws.ws_row > 0).then_some(Self {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn query() -> Option<Self> {
        None
    }

    /// [`query`](Self::query), or [`FALLBACK`](Self::FALLBACK).
    #[must_use]
    pub fn current() -> Self {
        Self::query().unwrap_or(Self::FALLBACK)
    }
}

// ─── Screen Setup ───────────────────────────────────────────────────────────

/// Alternate screen, hidden cursor, blank page.
///
/// # Errors
///
/// Propagates write errors from `w`.
pub fn write_setup(w: &mut impl Write) -> io::Result<()> {
    ansi::enter_alt_screen(w)?;
    ansi::cursor_hide(w)?;
    ansi::clear_screen(w)
}

/// Undo everything a frame may have left behind, then return to the main
/// screen. The screen switch goes last so the reset applies to the
/// alternate screen's state, not the user's shell.
///
/// # Errors
///
/// Propagates write errors from `w`.
pub fn write_teardown(w: &mut impl Write) -> io::Result<()> {
    ansi::end_sync(w)?;
    ansi::reset(w)?;
    ansi::set_cursor_shape(w, ansi::CursorShape::Default)?;
    ansi::cursor_show(w)?;
    ansi::exit_alt_screen(w)
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// Termios to put back if we panic while raw. The guard that owns the
/// original can't be reached from the hook.
#[cfg(unix)]
static PANIC_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Raw stdin for as long as the guard lives.
#[cfg(unix)]
pub struct RawMode {
    original: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `Ok(None)` when stdin is not a terminal,
    /// which is how tests and pipes run.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the termios can't be read or set.
    pub fn enable() -> io::Result<Option<Self>> {
        let fd = libc::STDIN_FILENO;
        if unsafe { libc::isatty(fd) } == 0 {
            return Ok(None);
        }

        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }

        // cfmakeraw clears ISIG too, so Ctrl+C arrives as a key.
        let mut termios = original;
        unsafe { libc::cfmakeraw(&raw mut termios) };
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut saved) = PANIC_TERMIOS.lock() {
            *saved = Some(original);
        }
        Ok(Some(Self { original }))
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.original);
        }
        if let Ok(mut saved) = PANIC_TERMIOS.lock() {
            *saved = None;
        }
    }
}

#[cfg(not(unix))]
pub struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    /// Raw mode is unix-only; elsewhere this is a no-op.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub const fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }
}

// ─── Panic Hook ─────────────────────────────────────────────────────────────

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

fn restore_after_panic() {
    let mut seq = Vec::new();
    if write_teardown(&mut seq).is_ok() {
        write_stdout_raw(&seq);
    }

    #[cfg(unix)]
    if let Ok(saved) = PANIC_TERMIOS.lock() {
        if let Some(original) = saved.as_ref() {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

#[cfg(unix)]
fn write_stdout_raw(bytes: &[u8]) {
    unsafe {
        let _ = libc::write(libc::STDOUT_FILENO, bytes.as_ptr().cast(), bytes.len());
    }
}

#[cfg(not(unix))]
fn write_stdout_raw(bytes: &[u8]) {
    let mut out = io::stdout();
    let _ = out.write_all(bytes);
    let _ = out.flush();
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The editor's hold on the terminal. Restores it when dropped.
///
/// ```no_run
/// use n_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // paint, read keys
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Read the size. The terminal itself is left alone until
    /// [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: None,
            size: Size::current(),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query after SIGWINCH. Keeps the old size if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = Size::query() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw input plus the alternate screen. No-op when already active.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode fails or stdout can't be written. Raw
    /// mode is rolled back in the second case.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        let raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        write_setup(&mut out)?;
        out.flush()?;

        self.raw = raw;
        self.active = true;
        Ok(())
    }

    /// Back to the main screen and cooked input. No-op when inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout can't be written. Termios are restored
    /// regardless.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let result = {
            let mut out = io::stdout().lock();
            write_teardown(&mut out).and_then(|()| out.flush())
        };
        self.raw = None;
        result
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
