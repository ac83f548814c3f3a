// SPDX-License-Identifier: MIT
//
// Drawing: compositing grids and bitmaps into a destination grid.
//
// Drawing is transparent by default: a '\0' rune or an unset colour in
// the source leaves the destination's value in place. `DrawFlags` makes a
// channel opaque, so that source zeros overwrite. Fully opaque channels
// are copied a whole row slice at a time.

use bitflags::bitflags;

use crate::attr::Attr;
use crate::bitmap::Bitmap;
use crate::grid::{GridMut, GridRef, Point};
use crate::style::Style;

bitflags! {
    /// Per-channel opacity for [`draw_grid`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DrawFlags: u8 {
        /// Zero runes in the source overwrite destination runes.
        const ZERO_RUNES = 1 << 0;
        /// Zero foreground (flags + colour) overwrites the destination's.
        const ZERO_FG    = 1 << 1;
        /// Zero background colour overwrites the destination's.
        const ZERO_BG    = 1 << 2;
    }
}

/// Copy `src` onto `dst`.
///
/// The two views are aligned at their top-left corners and the copy covers
/// their common extent. See [`DrawFlags`] for transparency.
///
/// ```
/// use vt_grid::attr::Attr;
/// use vt_grid::draw::{draw_grid, DrawFlags};
/// use vt_grid::grid::{Grid, Point, Rect};
///
/// let mut dst = Grid::new(3, 1);
/// dst.set_text(Point::new(1, 1), "abc", Attr::NONE);
/// let mut src = Grid::new(3, 1);
/// src.set(Point::new(2, 1), 'X', Attr::NONE);
///
/// draw_grid(&mut dst.view_mut(), &src.view(), DrawFlags::empty());
/// assert_eq!(dst.runes(), &['a', 'X', 'c']);
/// ```
pub fn draw_grid(dst: &mut GridMut<'_>, src: &GridRef<'_>, flags: DrawFlags) {
    let (dr, sr) = (dst.rect(), src.rect());
    let width = usize::from(dr.width.min(sr.width));
    let height = i32::from(dr.height.min(sr.height));

    let opaque_runes = flags.contains(DrawFlags::ZERO_RUNES);
    let opaque_fg = flags.contains(DrawFlags::ZERO_FG);
    let opaque_bg = flags.contains(DrawFlags::ZERO_BG);

    for dy in 0..height {
        let Some((src_runes, src_attrs)) = src.row(sr.y + dy) else {
            break;
        };
        let Some((dst_runes, dst_attrs)) = dst.row_mut(dr.y + dy) else {
            break;
        };
        let (src_runes, dst_runes) = (&src_runes[..width], &mut dst_runes[..width]);
        let (src_attrs, dst_attrs) = (&src_attrs[..width], &mut dst_attrs[..width]);

        if opaque_runes {
            dst_runes.copy_from_slice(src_runes);
        } else {
            for (d, &s) in dst_runes.iter_mut().zip(src_runes) {
                if s != '\0' {
                    *d = s;
                }
            }
        }

        if opaque_fg && opaque_bg {
            dst_attrs.copy_from_slice(src_attrs);
        } else {
            for (d, &s) in dst_attrs.iter_mut().zip(src_attrs) {
                *d = d.merge(s, opaque_fg, opaque_bg);
            }
        }
    }
}

/// Draw `bitmap` into `dst` as Braille glyphs, one cell per 2×4 block,
/// starting at the view's top-left corner.
///
/// Each glyph goes through `style` with the destination cell as prior. A
/// `'\0'` result leaves the cell untouched, so `Style::Elide(EMPTY_BRAILLE)`
/// keeps empty blocks transparent. A non-zero result attribute replaces
/// the destination's.
pub fn draw_bitmap(dst: &mut GridMut<'_>, bitmap: &Bitmap, style: &Style) {
    let rect = dst.rect();
    let (cols, rows) = bitmap.cell_size();
    let cols = i32::from(cols.min(rect.width));
    let rows = i32::from(rows.min(rect.height));

    for cy in 0..rows {
        for cx in 0..cols {
            let at = Point::new(rect.x + cx, rect.y + cy);
            let Some(prior) = dst.get(at) else {
                continue;
            };
            let glyph = bitmap.glyph(Point::new(cx, cy));
            let (rune, attr) = style.apply(at, prior, (glyph, prior.1));
            if rune == '\0' {
                continue;
            }
            dst.set(at, rune, if attr.is_empty() { prior.1 } else { attr });
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
