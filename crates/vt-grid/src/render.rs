// SPDX-License-Identifier: MIT
//
// Differential rendering: the minimal bytes to turn one frame into the next.
//
// `render_grid` walks the current grid in row-major order and compares
// every cell with the same position in the prior frame (what the terminal
// is showing now). Unchanged cells cost nothing: no cursor move, no SGR,
// no character. Changed cells get a cost-minimised cursor move, a minimal
// SGR delta, and the character.
//
// Blank handling: for the comparison only, an empty ('\0') cell counts as
// a space with no attribute, so the two spellings of "blank" never cause
// a rewrite. Empty cells are never written themselves; a cell going from
// content to empty must be painted over with a real space by the caller.
//
// Without a usable prior (empty, or a different size) the screen is
// erased first and every non-empty cell is written.

use crate::ansi;
use crate::attr::Attr;
use crate::bitmap::Bitmap;
use crate::cursor::CursorState;
use crate::error::RenderError;
use crate::grid::{GridRef, Point};
use crate::output::OutputBuffer;
use crate::style::Style;

/// Normalise a cell for comparison.
#[inline]
const fn blank_as_space(rune: char, attr: Attr) -> (char, Attr) {
    if rune == '\0' { (' ', Attr::NONE) } else { (rune, attr) }
}

/// Render `grid` into `out` as an update over `prior`.
///
/// `cur` is the terminal state before the update; the state after it is
/// returned along with the number of bytes written. Pass
/// [`GridRef::empty`] as `prior` to force a full repaint.
///
/// # Errors
///
/// Only whole-screen grids can be rendered: the grid must start at (1, 1)
/// and its rows must be contiguous (`stride == width`). Anything else is a
/// [`RenderError`] and nothing is written.
///
/// ```
/// use vt_grid::attr::Attr;
/// use vt_grid::cursor::CursorState;
/// use vt_grid::grid::{Grid, GridRef, Point};
/// use vt_grid::output::OutputBuffer;
/// use vt_grid::render::render_grid;
///
/// let mut grid = Grid::new(3, 1);
/// grid.set(Point::new(1, 1), 'A', Attr::NONE);
/// grid.set(Point::new(3, 1), 'B', Attr::NONE);
///
/// let mut out = OutputBuffer::new();
/// let (n, _) = render_grid(&mut out, CursorState::default(), grid.view(), GridRef::empty()).unwrap();
/// assert_eq!(out.as_bytes(), b"\x1b[2J\x1b[HA\x1b[CB");
/// assert_eq!(n, out.len());
/// ```
pub fn render_grid(
    out: &mut OutputBuffer,
    mut cur: CursorState,
    grid: GridRef<'_>,
    prior: GridRef<'_>,
) -> Result<(usize, CursorState), RenderError> {
    let rect = grid.rect();
    if grid.stride() != usize::from(rect.width) {
        return Err(RenderError::SubGrid {
            stride: grid.stride(),
            width: rect.width,
        });
    }
    if rect.origin() != Point::new(1, 1) {
        return Err(RenderError::SubScreen { origin: rect.origin() });
    }
    if grid.is_empty() {
        return Ok((0, cur));
    }

    let start = out.len();

    let mut diffing = !prior.is_empty() && prior.rect() == rect;
    if !diffing {
        log::trace!("full repaint of {}x{} grid", rect.width, rect.height);
        ansi::clear_screen(out).ok();
    }

    let cells = grid.runes().iter().zip(grid.attrs());
    for (pt, (&rune, &attr)) in rect.points().zip(cells) {
        if diffing {
            match prior.get(pt) {
                Some((pr, pa)) if blank_as_space(rune, attr) == blank_as_space(pr, pa) => continue,
                Some(_) => {}
                None => diffing = false,
            }
        }

        if rune == '\0' {
            continue;
        }

        cur.move_to(out, pt);
        cur.merge_attr(out, attr);
        out.write_char(rune);
        cur.advance(rune);
        cur.forget_outside(rect);
    }

    Ok((out.len() - start, cur))
}

/// Render `bitmap` as rows of Braille glyphs at the cursor.
///
/// Every glyph goes through `style` over an empty prior; an empty result is
/// written as a space. In `raw` mode rows are joined with a cursor move
/// back to the starting column and down one row, for drawing inside a
/// full-screen frame; otherwise every row ends with a newline. Any
/// attribute set along the way is reset at the end. Returns the number of
/// bytes written.
///
/// Raw mode steps back by the full row width, so it expects each row to
/// leave the cursor that many columns right of where the row began. A row
/// that ends on the terminal's last column leaves a pending wrap instead,
/// and the following rows land one column off; keep raw bitmaps clear of
/// the right margin.
pub fn render_bitmap(out: &mut OutputBuffer, bitmap: &Bitmap, raw: bool, style: &Style) -> usize {
    let start = out.len();
    let (cols, rows) = bitmap.cell_size();
    let mut cur = CursorState::default();

    for cy in 0..i32::from(rows) {
        if raw && cy > 0 {
            ansi::cursor_back(out, u32::from(cols)).ok();
            ansi::cursor_down(out, 1).ok();
        }
        for cx in 0..i32::from(cols) {
            let at = Point::new(cx, cy);
            let (rune, attr) = style.apply(at, ('\0', Attr::NONE), (bitmap.glyph(at), Attr::NONE));
            cur.merge_attr(out, attr);
            out.write_char(if rune == '\0' { ' ' } else { rune });
        }
        if !raw {
            ansi::newline(out).ok();
        }
    }

    if !cur.attr.is_empty() {
        ansi::reset(out).ok();
    }
    out.len() - start
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Color, Flags};
    use crate::bitmap::EMPTY_BRAILLE;
    use crate::grid::{Grid, Rect};
    use pretty_assertions::assert_eq;

    fn text_grid(width: u16, rows: &[&str]) -> Grid {
        let height = u16::try_from(rows.len()).unwrap();
        let mut g = Grid::new(width, height);
        for (y, row) in (1..).zip(rows) {
            g.set_text(Point::new(1, y), row, Attr::NONE);
        }
        g
    }

    fn render(grid: &Grid, prior: GridRef<'_>, cur: CursorState) -> (String, CursorState) {
        let mut out = OutputBuffer::new();
        let (n, cur) = render_grid(&mut out, cur, grid.view(), prior).unwrap();
        assert_eq!(n, out.len());
        (String::from_utf8(out.as_bytes().to_vec()).unwrap(), cur)
    }

    // ── Shape ───────────────────────────────────────────────────────────

    #[test]
    fn sub_grid_is_rejected() {
        let g = Grid::new(4, 3);
        let mut out = OutputBuffer::new();
        let err = render_grid(
            &mut out,
            CursorState::default(),
            g.sub(Rect::new(1, 1, 2, 2)),
            GridRef::empty(),
        )
        .unwrap_err();
        assert_eq!(err, RenderError::SubGrid { stride: 4, width: 2 });
        assert!(out.is_empty());
    }

    #[test]
    fn sub_screen_is_rejected() {
        let g = Grid::with_rect(Rect::new(2, 1, 3, 1));
        let mut out = OutputBuffer::new();
        let err = render_grid(&mut out, CursorState::default(), g.view(), GridRef::empty()).unwrap_err();
        assert_eq!(err, RenderError::SubScreen { origin: Point::new(2, 1) });
        assert!(out.is_empty());
    }

    #[test]
    fn empty_grid_writes_nothing() {
        let g = Grid::default();
        let cur = CursorState::at(Point::new(5, 5));
        assert_eq!(render(&g, GridRef::empty(), cur), (String::new(), cur));
    }

    // ── Full repaint ────────────────────────────────────────────────────

    #[test]
    fn skips_empty_cells() {
        let mut g = Grid::new(3, 1);
        g.set(Point::new(1, 1), 'A', Attr::NONE);
        g.set(Point::new(3, 1), 'B', Attr::NONE);

        let (s, cur) = render(&g, GridRef::empty(), CursorState::default());
        assert_eq!(s, "\x1b[2J\x1b[HA\x1b[CB");
        // Past the last column the position is no longer trusted.
        assert_eq!(cur.pos, None);
    }

    #[test]
    fn empty_prior_repaints_every_rune() {
        let g = text_grid(2, &["ab", "cd"]);
        let (s, _) = render(&g, GridRef::empty(), CursorState::default());
        assert_eq!(s, "\x1b[2J\x1b[Hab\x1b[2Hcd");
    }

    #[test]
    fn resized_prior_forces_repaint() {
        let g = text_grid(2, &["ab"]);
        let prior = text_grid(3, &["ab"]);
        let (s, _) = render(&g, prior.view(), CursorState::default());
        assert!(s.starts_with("\x1b[2J"));
        assert!(s.ends_with("ab"));
    }

    #[test]
    fn attributes_are_emitted_and_tracked() {
        let bold = Attr::from(Flags::BOLD);
        let mut g = Grid::new(2, 1);
        g.set(Point::new(1, 1), 'X', bold);
        g.set(Point::new(2, 1), 'y', Attr::NONE.with_fg(Color::Ansi256(2)));

        let (s, cur) = render(&g, GridRef::empty(), CursorState::default());
        assert_eq!(s, "\x1b[2J\x1b[H\x1b[1mX\x1b[0;32my");
        assert_eq!(cur.attr, Attr::NONE.with_fg(Color::Ansi256(2)));
    }

    #[test]
    fn wide_char_continuation_is_not_written() {
        let g = text_grid(4, &["中x"]);
        let (s, _) = render(&g, GridRef::empty(), CursorState::default());
        assert_eq!(s, "\x1b[2J\x1b[H中x");
    }

    // ── Diffing ─────────────────────────────────────────────────────────

    #[test]
    fn identical_frame_writes_nothing() {
        let g = text_grid(3, &["abc", "def"]);
        let (_, cur) = render(&g, GridRef::empty(), CursorState::default());
        let (s, again) = render(&g, g.view(), cur);
        assert_eq!(s, "");
        assert_eq!(again, cur);
    }

    #[test]
    fn only_changed_cells_are_written() {
        let prior = text_grid(3, &["abc", "def"]);
        let g = text_grid(3, &["abc", "dXf"]);
        let (s, cur) = render(&g, prior.view(), CursorState::default());
        assert_eq!(s, "\x1b[2;2HX");
        assert_eq!(cur.pos, Some(Point::new(3, 2)));
    }

    #[test]
    fn nearby_change_moves_relatively() {
        let prior = text_grid(5, &["abcde"]);
        let g = text_grid(5, &["Abcdx"]);
        let (s, _) = render(&g, prior.view(), CursorState::default());
        assert_eq!(s, "\x1b[HA\x1b[3Cx");
    }

    #[test]
    fn blank_spellings_compare_equal() {
        let spaces = text_grid(2, &["  "]);
        let empty = Grid::new(2, 1);
        assert_eq!(render(&empty, spaces.view(), CursorState::default()).0, "");
        assert_eq!(render(&spaces, empty.view(), CursorState::default()).0, "");
    }

    #[test]
    fn empty_cell_over_content_is_not_written() {
        let prior = text_grid(2, &["ab"]);
        let mut g = text_grid(2, &["ab"]);
        g.set(Point::new(2, 1), '\0', Attr::NONE);
        assert_eq!(render(&g, prior.view(), CursorState::default()).0, "");
    }

    #[test]
    fn attribute_change_alone_rewrites_cell() {
        let prior = text_grid(1, &["a"]);
        let mut g = text_grid(1, &["a"]);
        g.set(Point::new(1, 1), 'a', Attr::from(Flags::ITALIC));
        let (s, _) = render(&g, prior.view(), CursorState::default());
        assert_eq!(s, "\x1b[H\x1b[3ma");
    }

    // ── Bitmaps ─────────────────────────────────────────────────────────

    fn bitmap_string(bm: &Bitmap, raw: bool, style: &Style) -> String {
        let mut out = OutputBuffer::new();
        let n = render_bitmap(&mut out, bm, raw, style);
        assert_eq!(n, out.len());
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn elided_bitmap_is_one_glyph_among_spaces() {
        let mut bm = Bitmap::new(4, 8);
        bm.set(Point::new(0, 0), true);
        let s = bitmap_string(&bm, false, &Style::Elide(EMPTY_BRAILLE));
        assert_eq!(s, "\u{2801} \n  \n");
    }

    #[test]
    fn raw_bitmap_repositions_between_rows() {
        let mut bm = Bitmap::new(4, 8);
        bm.set(Point::new(3, 7), true);
        let s = bitmap_string(&bm, true, &Style::Nop);
        assert_eq!(s, "\u{2800}\u{2800}\x1b[2D\x1b[B\u{2800}\u{2880}");
    }

    #[test]
    fn raw_rows_step_back_by_full_width() {
        let bm = Bitmap::new(6, 12);
        let row = "\u{2800}".repeat(3);
        let s = bitmap_string(&bm, true, &Style::Nop);
        assert_eq!(s, format!("{row}\x1b[3D\x1b[B{row}\x1b[3D\x1b[B{row}"));
    }

    #[test]
    fn styled_bitmap_resets_at_end() {
        let bm = Bitmap::parse('#', &["#"]);
        let red = Attr::NONE.with_fg(Color::Ansi256(1));
        let s = bitmap_string(&bm, true, &Style::ForceAttr(red));
        assert_eq!(s, "\x1b[31m\u{2801}\x1b[0m");
    }
}
