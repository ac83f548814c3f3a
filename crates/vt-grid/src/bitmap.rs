// SPDX-License-Identifier: MIT
//
// Bitmap: monochrome pixels drawn as Braille glyphs.
//
// Each terminal cell shows a 2-wide × 4-tall block of pixels as one
// character from the Braille Patterns block (U+2800–U+28FF). The low byte
// of the code point is the set of raised dots:
//
//   dot 1 = bit 0   dot 4 = bit 3
//   dot 2 = bit 1   dot 5 = bit 4
//   dot 3 = bit 2   dot 6 = bit 5
//   dot 7 = bit 6   dot 8 = bit 7
//
// Pixel coordinates are 0-based; cell coordinates are the pixel
// coordinates divided by (2, 4).

use crate::grid::Point;

/// The blank Braille pattern, the glyph of a block with no pixels set.
pub const EMPTY_BRAILLE: char = '\u{2800}';

/// Bit for the dot at (column, row) within a 2×4 block.
const DOT_BITS: [[u8; 4]; 2] = [[0, 1, 2, 6], [3, 4, 5, 7]];

/// A `width × height` grid of on/off pixels.
///
/// ```
/// use vt_grid::bitmap::Bitmap;
/// use vt_grid::grid::Point;
///
/// let bm = Bitmap::parse('#', &["#.", ".#"]);
/// assert!(bm.get(Point::new(0, 0)));
/// assert!(!bm.get(Point::new(1, 0)));
/// assert_eq!(bm.glyph(Point::new(0, 0)), '\u{2811}');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    width: u16,
    height: u16,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// An all-off bitmap.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; usize::from(width) * usize::from(height)],
        }
    }

    /// Build a bitmap from rows of text art: `on` marks a set pixel, any
    /// other character a clear one. The width is the longest row.
    #[must_use]
    pub fn parse(on: char, rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let width = u16::try_from(width).unwrap_or(u16::MAX);
        let height = u16::try_from(rows.len()).unwrap_or(u16::MAX);

        let mut bm = Self::new(width, height);
        for (y, row) in (0..i32::from(height)).zip(rows) {
            for (x, ch) in (0..i32::from(width)).zip(row.chars()) {
                if ch == on {
                    bm.set(Point::new(x, y), true);
                }
            }
        }
        bm
    }

    /// Size in pixels.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Size in terminal cells needed to show every pixel.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> (u16, u16) {
        (self.width.div_ceil(2), self.height.div_ceil(4))
    }

    #[allow(clippy::cast_sign_loss)] // Both coordinates are checked non-negative.
    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= i32::from(self.width) || p.y >= i32::from(self.height) {
            return None;
        }
        Some(p.y as usize * usize::from(self.width) + p.x as usize)
    }

    /// Whether the pixel at `p` is set. Out of bounds reads as clear.
    #[inline]
    #[must_use]
    pub fn get(&self, p: Point) -> bool {
        self.index(p).is_some_and(|i| self.pixels[i])
    }

    /// Set or clear the pixel at `p`. Out of bounds is ignored.
    pub fn set(&mut self, p: Point, on: bool) {
        if let Some(i) = self.index(p) {
            self.pixels[i] = on;
        }
    }

    /// The Braille glyph for the block at cell coordinates `cell`.
    #[must_use]
    pub fn glyph(&self, cell: Point) -> char {
        let px = cell.x * 2;
        let py = cell.y * 4;

        let mut bits = 0u32;
        for (dx, column) in (0..).zip(DOT_BITS) {
            for (dy, bit) in (0..).zip(column) {
                if self.get(Point::new(px + dx, py + dy)) {
                    bits |= 1 << bit;
                }
            }
        }
        char::from_u32(EMPTY_BRAILLE as u32 + bits).unwrap_or(EMPTY_BRAILLE)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
