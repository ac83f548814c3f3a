// SPDX-License-Identifier: MIT
//
// Screen: a double-buffered full-screen frame.
//
// The pipeline per frame:
//
//   1. The application paints into `grid_mut()` (the "current" frame).
//   2. `render()` diffs it against the frame the terminal is showing and
//      appends the update to the screen's `OutputBuffer`.
//   3. The current frame becomes the prior one. The copy reuses the prior
//      grid's allocation, so steady state allocates nothing.
//   4. The screen is handed to `Output::flush` (it is a `Streamer`), which
//      writes the buffered bytes out. A write that stops part-way resumes
//      on the next flush.
//
// With synchronized output enabled (DEC 2026) every non-empty update is
// bracketed so the terminal never shows a half-drawn frame.

use std::io::{self, Write};

use crate::ansi;
use crate::attr::Attr;
use crate::cursor::CursorState;
use crate::error::RenderError;
use crate::grid::{Grid, GridMut, GridRef, Rect};
use crate::output::{OutputBuffer, Streamer};
use crate::render::render_grid;

/// A full-screen frame plus the state needed to update it minimally.
///
/// ```
/// use vt_grid::attr::Attr;
/// use vt_grid::grid::Point;
/// use vt_grid::screen::Screen;
///
/// let mut screen = Screen::new(10, 2);
/// screen.grid_mut().set_text(Point::new(1, 1), "hi", Attr::NONE);
/// screen.render().unwrap();
/// assert_eq!(screen.pending(), b"\x1b[2J\x1b[Hhi");
/// ```
#[derive(Debug)]
pub struct Screen {
    grid: Grid,
    prior: Grid,
    cursor: CursorState,
    output: OutputBuffer,
    sync: bool,
}

impl Screen {
    /// A blank `width × height` screen. The first render repaints
    /// everything.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            grid: Grid::new(width, height),
            prior: Grid::default(),
            cursor: CursorState::default(),
            output: OutputBuffer::new(),
            sync: false,
        }
    }

    /// Enable or disable synchronized-output framing.
    #[must_use]
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.grid.rect()
    }

    /// The frame being painted.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Paint access to the frame. The view covers the whole screen and
    /// cannot change its shape. Empty (`'\0'`) cells are never written, so
    /// erase shown content with a space or [`clear`](Self::clear).
    #[inline]
    pub fn grid_mut(&mut self) -> GridMut<'_> {
        self.grid.view_mut()
    }

    /// The frame the terminal is believed to show, empty before the first
    /// render and after [`invalidate`](Self::invalidate).
    #[inline]
    #[must_use]
    pub fn prior(&self) -> GridRef<'_> {
        self.prior.view()
    }

    /// Terminal state as of the last render.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> CursorState {
        self.cursor
    }

    /// Rendered bytes not yet flushed.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Blank the frame being painted with plain spaces, so the next render
    /// erases whatever the terminal still shows there.
    pub fn clear(&mut self) {
        self.grid.fill(' ', Attr::NONE);
    }

    /// Append the update from the prior frame to the current one to the
    /// pending output, then make the current frame the prior. Returns the
    /// number of bytes appended.
    ///
    /// # Errors
    ///
    /// The screen's grids always start at (1, 1) with contiguous rows, so
    /// the renderer's shape checks do not fail here; the error is passed
    /// through rather than assumed away.
    pub fn render(&mut self) -> Result<usize, RenderError> {
        let start = self.output.len();
        if self.sync {
            ansi::begin_sync(&mut self.output).ok();
        }

        let (n, cursor) = match render_grid(&mut self.output, self.cursor, self.grid.view(), self.prior.view()) {
            Ok(update) => update,
            Err(e) => {
                self.output.truncate(start);
                return Err(e);
            }
        };
        self.cursor = cursor;

        if n == 0 {
            self.output.truncate(start);
        } else if self.sync {
            ansi::end_sync(&mut self.output).ok();
        }

        self.prior.copy_from(&self.grid);
        Ok(self.output.len() - start)
    }

    /// Forget what the terminal shows, so the next render repaints
    /// everything from an unknown cursor position. Use after anything else
    /// has written to the terminal.
    pub fn invalidate(&mut self) {
        self.prior.resize(0, 0);
        self.cursor.pos = None;
    }

    /// Change the screen size. The frame is blanked and the next render
    /// repaints everything.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.grid.resize(width, height);
        self.invalidate();
    }
}

impl Streamer for Screen {
    fn write_to(&mut self, w: &mut dyn Write) -> io::Result<()> {
        self.output.write_to(w)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
