// SPDX-License-Identifier: MIT
//
// Cursor/attribute state: what the terminal currently thinks.
//
// The terminal is stateful: it has a cursor position and an active graphic
// rendition, and every byte we send is interpreted against them. A
// `CursorState` mirrors that state for one output stream so emissions can
// be minimal:
//
//   - Cursor moves pick the shortest of an absolute CUP and a relative
//     move (CR, CUU/CUD, CUF/CUB). A move to where the cursor already is
//     costs nothing.
//
//   - Attribute changes pick the shorter of an incremental SGR (clear the
//     groups that lose members, set what's new) and a reset-then-set SGR.
//
// An unknown position (`None`) always takes the absolute form.

use unicode_width::UnicodeWidthChar;

use crate::ansi;
use crate::attr::Attr;
use crate::grid::{Point, Rect};
use crate::output::OutputBuffer;

/// Terminal cursor position and active attribute, as last emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    /// Where the cursor is, or `None` when unknown.
    pub pos: Option<Point>,
    /// The active graphic rendition.
    pub attr: Attr,
}

/// Number of decimal digits in `n`.
const fn digits(mut n: u32) -> usize {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

/// Encoded length of a relative move of `n` cells (`CSI n X`, `CSI X` for 1).
const fn relative_len(n: u32) -> usize {
    match n {
        0 => 0,
        1 => 3,
        n => 3 + digits(n),
    }
}

/// Encoded length of an absolute move to `p`.
#[allow(clippy::cast_sign_loss)]
const fn absolute_len(p: Point) -> usize {
    match (p.x, p.y) {
        (1, 1) => 3,
        (1, y) => 3 + digits(y as u32),
        (x, y) => 4 + digits(y as u32) + digits(x as u32),
    }
}

/// Encoded length of the SGR sequence carrying `params`.
fn sgr_len(params: &[u32]) -> usize {
    if params.is_empty() {
        return 0;
    }
    let digits: usize = params.iter().map(|&p| digits(p)).sum();
    3 + digits + params.len() - 1
}

impl CursorState {
    /// State with a known cursor position and no active attribute.
    #[inline]
    #[must_use]
    pub const fn at(pos: Point) -> Self {
        Self {
            pos: Some(pos),
            attr: Attr::NONE,
        }
    }

    /// Move the cursor to `to`, returning the number of bytes written.
    pub fn move_to(&mut self, out: &mut OutputBuffer, to: Point) -> usize {
        let start = out.len();
        match self.pos {
            Some(from) if from == to => {}
            Some(from) if Self::relative_cost(from, to) < absolute_len(to) => {
                Self::move_relative(out, from, to);
            }
            _ => {
                ansi::cursor_to(out, to).ok();
            }
        }
        self.pos = Some(to);
        out.len() - start
    }

    fn relative_cost(from: Point, to: Point) -> usize {
        let vertical = relative_len(from.y.abs_diff(to.y));
        let horizontal = if to.x == 1 && from.x != 1 {
            1
        } else {
            relative_len(from.x.abs_diff(to.x))
        };
        vertical + horizontal
    }

    fn move_relative(out: &mut OutputBuffer, from: Point, to: Point) {
        let dy = from.y.abs_diff(to.y);
        if to.y < from.y {
            ansi::cursor_up(out, dy).ok();
        } else {
            ansi::cursor_down(out, dy).ok();
        }

        let dx = from.x.abs_diff(to.x);
        if to.x == 1 && from.x != 1 {
            ansi::carriage_return(out).ok();
        } else if to.x < from.x {
            ansi::cursor_back(out, dx).ok();
        } else {
            ansi::cursor_forward(out, dx).ok();
        }
    }

    /// Switch the active attribute to `to` with the shortest SGR, returning
    /// the number of bytes written.
    pub fn merge_attr(&mut self, out: &mut OutputBuffer, to: Attr) -> usize {
        let mut delta = Vec::new();
        self.attr.push_sgr_delta(to, &mut delta);
        self.attr = to;
        if delta.is_empty() {
            return 0;
        }

        let mut full = vec![0];
        to.push_sgr(&mut full);

        let params = if sgr_len(&full) < sgr_len(&delta) { &full } else { &delta };
        let start = out.len();
        ansi::sgr(out, params).ok();
        out.len() - start
    }

    /// Account for `ch` having just been written at the cursor.
    pub fn advance(&mut self, ch: char) {
        if let Some(pos) = &mut self.pos {
            let width = ch.width().unwrap_or(0);
            #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)] // At most 2.
            let width = width as i32;
            pos.x += width;
        }
    }

    /// Forget the position once the cursor has run past the right edge of
    /// `rect`: the terminal may be holding a pending wrap, so only an
    /// absolute move is reliable.
    pub fn forget_outside(&mut self, rect: Rect) {
        if self.pos.is_some_and(|p| p.x >= rect.right()) {
            self.pos = None;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
