//! Cursor and clearing sequences for the browser screen.
//!
//! The terminal runs in raw mode, so line breaks need an explicit carriage
//! return.

use crossterm::cursor::{MoveTo, MoveToColumn};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

pub const NEWLINE: &[u8] = b"\r\n";

/// Clear the whole screen and home the cursor.
pub fn clear<W: Write>(w: &mut W) -> io::Result<()> {
    queue!(w, Clear(ClearType::All), MoveTo(0, 0))
}

pub fn newline<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_all(NEWLINE)
}

/// Erase the line under the cursor and return to its first column.
pub fn delete_current_line<W: Write>(w: &mut W) -> io::Result<()> {
    queue!(w, Clear(ClearType::CurrentLine), MoveToColumn(0))
}

/// Redraw the typed-text line in place.
pub fn typed_line<W: Write>(w: &mut W, typed: &[u8]) -> io::Result<()> {
    delete_current_line(w)?;
    w.write_all(typed)?;
    w.flush()
}
