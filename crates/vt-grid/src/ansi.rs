// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; that's `CursorState`'s job. This module
// just knows the byte-level encoding of the commands the renderer needs.
//
// Positions are terminal coordinates (1-based). Default parameters are
// left out, so the origin is `CSI H` rather than `CSI 1;1H`, and a
// one-cell move is `CSI C` rather than `CSI 1C`.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

use crate::escape::Escape;
use crate::grid::Point;

const CUU: Escape = Escape::csi(b'A');
const CUD: Escape = Escape::csi(b'B');
const CUF: Escape = Escape::csi(b'C');
const CUB: Escape = Escape::csi(b'D');
const CUP: Escape = Escape::csi(b'H');
const ED: Escape = Escape::csi(b'J');
const SGR: Escape = Escape::csi(b'm');
const CR: Escape = Escape::control(b'\r');
const LF: Escape = Escape::control(b'\n');

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `p` with CUP (Cursor Position).
#[allow(clippy::cast_sign_loss)] // Terminal coordinates are positive.
pub fn cursor_to(w: &mut impl Write, p: Point) -> io::Result<()> {
    match (p.x, p.y) {
        (1, 1) => CUP.write_with(w, &[]),
        (1, y) => CUP.write_with(w, &[y as u32]),
        (x, y) => CUP.write_with(w, &[y as u32, x as u32]),
    }
}

/// Write a relative move; a count of one is sent without a parameter.
fn relative(w: &mut impl Write, id: Escape, n: u32) -> io::Result<()> {
    match n {
        0 => Ok(()),
        1 => id.write_with(w, &[]),
        n => id.write_with(w, &[n]),
    }
}

/// Move the cursor up `n` rows (CUU).
#[inline]
pub fn cursor_up(w: &mut impl Write, n: u32) -> io::Result<()> {
    relative(w, CUU, n)
}

/// Move the cursor down `n` rows (CUD).
#[inline]
pub fn cursor_down(w: &mut impl Write, n: u32) -> io::Result<()> {
    relative(w, CUD, n)
}

/// Move the cursor right `n` columns (CUF).
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: u32) -> io::Result<()> {
    relative(w, CUF, n)
}

/// Move the cursor left `n` columns (CUB).
#[inline]
pub fn cursor_back(w: &mut impl Write, n: u32) -> io::Result<()> {
    relative(w, CUB, n)
}

/// Return to column 1.
#[inline]
pub fn carriage_return(w: &mut impl Write) -> io::Result<()> {
    CR.write_with(w, &[])
}

/// Line feed.
#[inline]
pub fn newline(w: &mut impl Write) -> io::Result<()> {
    LF.write_with(w, &[])
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    ED.write_with(w, &[2])
}

// ─── Graphic Rendition ───────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
///
/// Whoever tracks the active attribute must forget it after this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    SGR.write_with(w, &[0])
}

/// Emit one SGR sequence carrying `params`. Does nothing when empty.
pub fn sgr(w: &mut impl Write, params: &[u32]) -> io::Result<()> {
    if params.is_empty() {
        return Ok(());
    }
    SGR.write_with(w, params)
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC Private Mode 2026).
///
/// Tells the terminal to hold everything until [`end_sync`], so a frame
/// never shows half-drawn.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output; the terminal shows the buffered frame.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
