// SPDX-License-Identifier: MIT
//
// n-term: terminal layer for n-outline.
//
// Direct terminal control with ANSI escape sequences and raw termios, no
// TUI framework in between. The outliner paints whole lines, so the frame
// is a line screen that rewrites only the rows that changed.
//
// - `ansi`: escape sequence writers
// - `terminal`: raw mode, alternate screen, panic-safe restore
// - `input`: bytes to key events
// - `screen`: line frame with truncation and row diffing
// - `event_loop`: poll, parse, dispatch to an `App`, repaint

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod screen;
pub mod terminal;
