// SPDX-License-Identifier: MIT
//
// Grid: the 2D cell store everything draws into and renders from.
//
// Design:
//
//   - Two parallel flat arrays, runes and attributes, indexed by the same
//     row-major offset. The renderer compares both with plain integer
//     equality; drawing code can copy whole rows of either independently.
//
//   - Coordinates are terminal coordinates: 1-based, so a full-screen grid
//     has its top-left corner at (1, 1) and maps 1:1 onto cursor positions.
//
//   - A rune of '\0' is an empty cell: transparent when drawn onto another
//     grid, skipped by the renderer. Wide characters occupy their cell plus
//     a '\0' continuation cell to the right.
//
//   - Sub-grids are views, not copies. `GridRef` / `GridMut` borrow the
//     backing arrays starting at the view's top-left cell and carry the
//     backing `stride`, so the offset of (x, y) is always
//     `(y - min.y) * stride + (x - min.x)`. Views are clipped to their
//     parent's rectangle when taken, so they can never address past the
//     backing store; lookups outside the view return `None`.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::attr::Attr;

// ─── Point ───────────────────────────────────────────────────────────────────

/// A cell position (column `x`, row `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ─── Rect ────────────────────────────────────────────────────────────────────

/// A rectangle of cells: top-left corner plus extent.
///
/// ```
/// use vt_grid::grid::{Point, Rect};
///
/// let r = Rect::new(10, 5, 80, 24);
/// assert!(r.contains(Point::new(10, 5)));
/// assert!(r.contains(Point::new(89, 28)));
/// assert!(!r.contains(Point::new(90, 5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// A `width × height` rectangle anchored at the screen origin (1, 1).
    #[inline]
    #[must_use]
    pub const fn screen(width: u16, height: u16) -> Self {
        Self::new(1, 1, width, height)
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x + self.width as i32
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y + self.height as i32
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Overlap of two rectangles, or `None` if they don't overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            // Both differences are bounded by the inputs' u16 extents.
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            Some(Self::new(x1, y1, (x2 - x1) as u16, (y2 - y1) as u16))
        } else {
            None
        }
    }

    /// Every cell position in row-major order.
    pub fn points(self) -> impl Iterator<Item = Point> {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| Point::new(x, y)))
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Where a grid or view sits, and how its rows are spaced in the backing
/// arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    rect: Rect,
    stride: usize,
}

impl Layout {
    const fn dense(rect: Rect) -> Self {
        Self {
            rect,
            stride: rect.width as usize,
        }
    }

    /// Offset of `p` relative to the view's first cell.
    #[allow(clippy::cast_sign_loss)] // contains() guarantees both deltas are >= 0.
    const fn offset(&self, p: Point) -> Option<usize> {
        if !self.rect.contains(p) {
            return None;
        }
        let dy = (p.y - self.rect.y) as usize;
        let dx = (p.x - self.rect.x) as usize;
        Some(dy * self.stride + dx)
    }

    /// Offset range of row `y`, if the view has that row.
    fn row(&self, y: i32) -> Option<std::ops::Range<usize>> {
        let start = self.offset(Point::new(self.rect.x, y))?;
        Some(start..start + usize::from(self.rect.width))
    }

    /// Layout of the sub-view `r`, clipped to this one, plus the offset of
    /// its first cell.
    fn sub(&self, r: Rect) -> (Self, usize) {
        match self.rect.intersect(r) {
            Some(clipped) => {
                let start = self.offset(clipped.origin()).unwrap_or(0);
                (
                    Self {
                        rect: clipped,
                        stride: self.stride,
                    },
                    start,
                )
            }
            None => (
                Self {
                    rect: Rect::new(r.x, r.y, 0, 0),
                    stride: self.stride,
                },
                0,
            ),
        }
    }
}

// ─── Grid ────────────────────────────────────────────────────────────────────

/// Owned cell storage: a rune and an attribute per cell.
///
/// ```
/// use vt_grid::attr::Attr;
/// use vt_grid::grid::{Grid, Point};
///
/// let mut grid = Grid::new(80, 24);
/// grid.set(Point::new(5, 3), 'X', Attr::NONE);
/// assert_eq!(grid.get(Point::new(5, 3)), Some(('X', Attr::NONE)));
/// assert_eq!(grid.get(Point::new(0, 0)), None); // origin is (1, 1)
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    layout: Layout,
    runes: Vec<char>,
    attrs: Vec<Attr>,
}

impl Grid {
    /// An empty (all `'\0'`) grid anchored at the screen origin.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_rect(Rect::screen(width, height))
    }

    /// An empty grid covering `rect`.
    #[must_use]
    pub fn with_rect(rect: Rect) -> Self {
        Self {
            layout: Layout::dense(rect),
            runes: vec!['\0'; rect.area()],
            attrs: vec![Attr::NONE; rect.area()],
        }
    }

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.layout.rect
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.layout.rect.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.layout.rect.height
    }

    /// Distance between vertically adjacent cells in the backing arrays.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.layout.stride
    }

    /// Whether the grid has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runes.is_empty()
    }

    /// Backing offset of `p`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub const fn cell_offset(&self, p: Point) -> Option<usize> {
        self.layout.offset(p)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, p: Point) -> Option<(char, Attr)> {
        let i = self.cell_offset(p)?;
        Some((*self.runes.get(i)?, *self.attrs.get(i)?))
    }

    /// Write one cell. Returns `false` if `p` is outside the grid.
    #[inline]
    pub fn set(&mut self, p: Point, ch: char, attr: Attr) -> bool {
        self.view_mut().set(p, ch, attr)
    }

    /// All runes, row-major.
    #[inline]
    #[must_use]
    pub fn runes(&self) -> &[char] {
        &self.runes
    }

    /// All attributes, row-major.
    #[inline]
    #[must_use]
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.fill('\0', Attr::NONE);
    }

    /// Set every cell to `ch` with `attr`.
    pub fn fill(&mut self, ch: char, attr: Attr) {
        self.runes.fill(ch);
        self.attrs.fill(attr);
    }

    /// Change the extent (keeping the origin) and clear all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        let rect = Rect::new(self.layout.rect.x, self.layout.rect.y, width, height);
        self.layout = Layout::dense(rect);
        self.runes.clear();
        self.runes.resize(rect.area(), '\0');
        self.attrs.clear();
        self.attrs.resize(rect.area(), Attr::NONE);
    }

    /// Become a copy of `other`, reusing this grid's allocations.
    pub fn copy_from(&mut self, other: &Self) {
        self.layout = other.layout;
        self.runes.clone_from(&other.runes);
        self.attrs.clone_from(&other.attrs);
    }

    /// Borrow the whole grid as a view.
    #[inline]
    #[must_use]
    pub fn view(&self) -> GridRef<'_> {
        GridRef {
            layout: self.layout,
            runes: &self.runes,
            attrs: &self.attrs,
        }
    }

    /// Borrow the whole grid as a mutable view.
    #[inline]
    pub fn view_mut(&mut self) -> GridMut<'_> {
        GridMut {
            layout: self.layout,
            runes: &mut self.runes,
            attrs: &mut self.attrs,
        }
    }

    /// A view of `rect`, clipped to the grid.
    #[inline]
    #[must_use]
    pub fn sub(&self, rect: Rect) -> GridRef<'_> {
        self.view().sub(rect)
    }

    /// A mutable view of `rect`, clipped to the grid.
    #[inline]
    pub fn sub_mut(&mut self, rect: Rect) -> GridMut<'_> {
        self.view_mut().into_sub(rect)
    }

    /// Write a string starting at `p`. See [`GridMut::set_text`].
    pub fn set_text(&mut self, p: Point, text: &str, attr: Attr) -> u16 {
        self.view_mut().set_text(p, text, attr)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rect", &self.layout.rect)
            .field("stride", &self.layout.stride)
            .finish_non_exhaustive()
    }
}

// ─── GridRef ─────────────────────────────────────────────────────────────────

/// A read-only view of a rectangle of some grid's cells.
#[derive(Debug, Clone, Copy)]
pub struct GridRef<'a> {
    layout: Layout,
    runes: &'a [char],
    attrs: &'a [Attr],
}

impl<'a> GridRef<'a> {
    /// A view with no cells; renders as "no prior frame".
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            layout: Layout::dense(Rect::screen(0, 0)),
            runes: &[],
            attrs: &[],
        }
    }

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.layout.rect
    }

    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.layout.stride
    }

    /// Whether there is nothing to look at: no area or no backing cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.layout.rect.is_empty() || self.runes.is_empty() || self.attrs.is_empty()
    }

    /// Offset of `p` into [`runes`](Self::runes) / [`attrs`](Self::attrs).
    #[inline]
    #[must_use]
    pub fn cell_offset(&self, p: Point) -> Option<usize> {
        self.layout
            .offset(p)
            .filter(|&i| i < self.runes.len() && i < self.attrs.len())
    }

    #[inline]
    #[must_use]
    pub fn get(&self, p: Point) -> Option<(char, Attr)> {
        let i = self.cell_offset(p)?;
        Some((self.runes[i], self.attrs[i]))
    }

    /// Backing runes from this view's first cell onward.
    #[inline]
    #[must_use]
    pub const fn runes(&self) -> &'a [char] {
        self.runes
    }

    /// Backing attributes from this view's first cell onward.
    #[inline]
    #[must_use]
    pub const fn attrs(&self) -> &'a [Attr] {
        self.attrs
    }

    /// The cells of row `y` inside this view.
    #[must_use]
    pub fn row(&self, y: i32) -> Option<(&'a [char], &'a [Attr])> {
        let range = self.layout.row(y)?;
        Some((self.runes.get(range.clone())?, self.attrs.get(range)?))
    }

    /// A narrower view of `rect`, clipped to this one.
    #[must_use]
    pub fn sub(&self, rect: Rect) -> Self {
        let (layout, start) = self.layout.sub(rect);
        if layout.rect.is_empty() {
            return Self { layout, runes: &[], attrs: &[] };
        }
        Self {
            layout,
            runes: self.runes.get(start..).unwrap_or(&[]),
            attrs: self.attrs.get(start..).unwrap_or(&[]),
        }
    }
}

impl Default for GridRef<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

// ─── GridMut ─────────────────────────────────────────────────────────────────

/// A mutable view of a rectangle of some grid's cells.
#[derive(Debug)]
pub struct GridMut<'a> {
    layout: Layout,
    runes: &'a mut [char],
    attrs: &'a mut [Attr],
}

impl<'a> GridMut<'a> {
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.layout.rect
    }

    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.layout.stride
    }

    /// Reborrow as a read-only view.
    #[inline]
    #[must_use]
    pub fn view(&self) -> GridRef<'_> {
        GridRef {
            layout: self.layout,
            runes: &*self.runes,
            attrs: &*self.attrs,
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, p: Point) -> Option<(char, Attr)> {
        self.view().get(p)
    }

    /// Write one cell. Returns `false` if `p` is outside the view.
    pub fn set(&mut self, p: Point, ch: char, attr: Attr) -> bool {
        match self.view().cell_offset(p) {
            Some(i) => {
                self.runes[i] = ch;
                self.attrs[i] = attr;
                true
            }
            None => false,
        }
    }

    /// Write a string starting at `p`, one cell per column.
    ///
    /// Wide characters take two cells (the second is a `'\0'`
    /// continuation); a wide character that would straddle the right edge
    /// becomes a space. Zero-width characters are dropped. Returns the
    /// number of columns written.
    pub fn set_text(&mut self, p: Point, text: &str, attr: Attr) -> u16 {
        let rect = self.rect();
        if !rect.contains(p) {
            return 0;
        }

        let mut x = p.x;
        for ch in text.chars() {
            if x >= rect.right() {
                break;
            }
            match ch.width() {
                Some(0) | None => {}
                Some(2) => {
                    if x + 1 < rect.right() {
                        self.set(Point::new(x, p.y), ch, attr);
                        self.set(Point::new(x + 1, p.y), '\0', attr);
                        x += 2;
                    } else {
                        self.set(Point::new(x, p.y), ' ', attr);
                        x += 1;
                    }
                }
                Some(_) => {
                    self.set(Point::new(x, p.y), ch, attr);
                    x += 1;
                }
            }
        }

        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)] // Bounded by width.
        let written = (x - p.x) as u16;
        written
    }

    /// Mutable cells of row `y` inside this view.
    pub fn row_mut(&mut self, y: i32) -> Option<(&mut [char], &mut [Attr])> {
        let range = self.layout.row(y)?;
        let runes = self.runes.get_mut(range.clone())?;
        let attrs = self.attrs.get_mut(range)?;
        Some((runes, attrs))
    }

    /// A narrower mutable view of `rect`, clipped to this one.
    pub fn sub_mut(&mut self, rect: Rect) -> GridMut<'_> {
        GridMut {
            layout: self.layout,
            runes: &mut *self.runes,
            attrs: &mut *self.attrs,
        }
        .into_sub(rect)
    }

    /// Like [`sub_mut`](Self::sub_mut), consuming this view.
    #[must_use]
    pub fn into_sub(self, rect: Rect) -> GridMut<'a> {
        let Self { layout, runes, attrs } = self;
        let (layout, start) = layout.sub(rect);
        match (runes.get_mut(start..), attrs.get_mut(start..)) {
            (Some(runes), Some(attrs)) if !layout.rect.is_empty() => GridMut { layout, runes, attrs },
            _ => GridMut {
                layout: Layout {
                    rect: Rect::new(rect.x, rect.y, 0, 0),
                    ..layout
                },
                runes: &mut [],
                attrs: &mut [],
            },
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Color, Flags};
    use pretty_assertions::assert_eq;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    // ── Rect ────────────────────────────────────────────────────────────

    #[test]
    fn rect_edges() {
        let r = Rect::new(3, 4, 10, 2);
        assert_eq!(r.right(), 13);
        assert_eq!(r.bottom(), 6);
        assert_eq!(r.area(), 20);
        assert!(!r.is_empty());
        assert!(Rect::new(1, 1, 0, 5).is_empty());
    }

    #[test]
    fn rect_intersect() {
        let a = Rect::new(1, 1, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(b), Some(Rect::new(5, 5, 6, 6)));
        assert_eq!(a.intersect(Rect::new(11, 1, 5, 5)), None);
    }

    #[test]
    fn rect_points_row_major() {
        let pts: Vec<Point> = Rect::new(1, 1, 2, 2).points().collect();
        assert_eq!(pts, vec![p(1, 1), p(2, 1), p(1, 2), p(2, 2)]);
    }

    // ── Grid ────────────────────────────────────────────────────────────

    #[test]
    fn new_grid_is_empty_cells_at_screen_origin() {
        let g = Grid::new(4, 3);
        assert_eq!(g.rect(), Rect::screen(4, 3));
        assert_eq!(g.stride(), 4);
        assert_eq!(g.runes().len(), 12);
        assert!(g.runes().iter().all(|&r| r == '\0'));
        assert!(g.attrs().iter().all(|a| a.is_empty()));
    }

    #[test]
    fn default_grid_has_no_cells() {
        let g = Grid::default();
        assert!(g.is_empty());
        assert!(g.view().is_empty());
    }

    #[test]
    fn cell_offset_formula() {
        let g = Grid::new(4, 3);
        assert_eq!(g.cell_offset(p(1, 1)), Some(0));
        assert_eq!(g.cell_offset(p(4, 1)), Some(3));
        assert_eq!(g.cell_offset(p(1, 2)), Some(4));
        assert_eq!(g.cell_offset(p(3, 3)), Some(10));
    }

    #[test]
    fn out_of_bounds_fails_closed() {
        let mut g = Grid::new(4, 3);
        assert_eq!(g.get(p(0, 1)), None);
        assert_eq!(g.get(p(5, 1)), None);
        assert_eq!(g.get(p(1, 4)), None);
        assert!(!g.set(p(5, 1), 'x', Attr::NONE));
    }

    #[test]
    fn set_and_get() {
        let mut g = Grid::new(4, 3);
        let a = Attr::from(Flags::BOLD);
        assert!(g.set(p(2, 3), 'q', a));
        assert_eq!(g.get(p(2, 3)), Some(('q', a)));
        assert_eq!(g.runes()[9], 'q');
    }

    #[test]
    fn resize_clears_and_keeps_origin() {
        let mut g = Grid::with_rect(Rect::new(3, 2, 2, 2));
        g.set(p(3, 2), 'a', Attr::NONE);
        g.resize(5, 1);
        assert_eq!(g.rect(), Rect::new(3, 2, 5, 1));
        assert_eq!(g.stride(), 5);
        assert!(g.runes().iter().all(|&r| r == '\0'));
    }

    #[test]
    fn fill_then_clear() {
        let mut g = Grid::new(3, 2);
        let a = Attr::from(Flags::ITALIC);
        g.fill(' ', a);
        assert_eq!(g.get(p(3, 2)), Some((' ', a)));
        g.clear();
        assert!(g.runes().iter().all(|&r| r == '\0'));
        assert!(g.attrs().iter().all(|a| a.is_empty()));
    }

    #[test]
    fn copy_from_matches_source() {
        let mut src = Grid::new(3, 2);
        src.set_text(p(1, 1), "abc", Attr::NONE);
        let mut dst = Grid::new(1, 1);
        dst.copy_from(&src);
        assert_eq!(dst, src);
    }

    // ── Text ────────────────────────────────────────────────────────────

    #[test]
    fn set_text_ascii() {
        let mut g = Grid::new(5, 1);
        assert_eq!(g.set_text(p(2, 1), "hey", Attr::NONE), 3);
        assert_eq!(g.runes(), &['\0', 'h', 'e', 'y', '\0']);
    }

    #[test]
    fn set_text_clips_at_edge() {
        let mut g = Grid::new(3, 1);
        assert_eq!(g.set_text(p(2, 1), "hello", Attr::NONE), 2);
        assert_eq!(g.runes(), &['\0', 'h', 'e']);
    }

    #[test]
    fn set_text_wide_char_gets_continuation() {
        let mut g = Grid::new(4, 1);
        assert_eq!(g.set_text(p(1, 1), "中a", Attr::NONE), 3);
        assert_eq!(g.runes(), &['中', '\0', 'a', '\0']);
    }

    #[test]
    fn set_text_wide_char_at_edge_becomes_space() {
        let mut g = Grid::new(2, 1);
        g.set_text(p(2, 1), "中", Attr::NONE);
        assert_eq!(g.runes(), &['\0', ' ']);
    }

    #[test]
    fn set_text_skips_zero_width() {
        let mut g = Grid::new(3, 1);
        assert_eq!(g.set_text(p(1, 1), "e\u{301}x", Attr::NONE), 2);
        assert_eq!(g.runes(), &['e', 'x', '\0']);
    }

    // ── Views ───────────────────────────────────────────────────────────

    #[test]
    fn sub_view_shares_storage_with_stride() {
        let mut g = Grid::new(4, 3);
        g.set(p(3, 2), 'z', Attr::NONE);

        let v = g.sub(Rect::new(2, 2, 2, 2));
        assert_eq!(v.rect(), Rect::new(2, 2, 2, 2));
        assert_eq!(v.stride(), 4);
        assert_eq!(v.cell_offset(p(2, 2)), Some(0));
        assert_eq!(v.cell_offset(p(3, 3)), Some(5));
        assert_eq!(v.get(p(3, 2)), Some(('z', Attr::NONE)));
        assert_eq!(v.get(p(1, 1)), None);
    }

    #[test]
    fn sub_view_is_clipped_to_parent() {
        let g = Grid::new(4, 3);
        let v = g.sub(Rect::new(3, 2, 10, 10));
        assert_eq!(v.rect(), Rect::new(3, 2, 2, 2));
        assert_eq!(v.get(p(5, 2)), None);
    }

    #[test]
    fn disjoint_sub_view_is_empty() {
        let g = Grid::new(4, 3);
        let v = g.sub(Rect::new(10, 10, 2, 2));
        assert!(v.is_empty());
        assert_eq!(v.get(p(10, 10)), None);
    }

    #[test]
    fn sub_of_sub_keeps_absolute_coordinates() {
        let mut g = Grid::new(6, 6);
        g.set(p(4, 5), 'k', Attr::NONE);
        let outer = g.sub(Rect::new(2, 2, 4, 4));
        let inner = outer.sub(Rect::new(4, 4, 2, 2));
        assert_eq!(inner.get(p(4, 5)), Some(('k', Attr::NONE)));
        assert_eq!(inner.row(5).map(|(r, _)| r.to_vec()), Some(vec!['k', '\0']));
    }

    #[test]
    fn sub_mut_writes_through() {
        let mut g = Grid::new(4, 3);
        let red = Attr::NONE.with_fg(Color::Ansi256(1));
        {
            let mut v = g.sub_mut(Rect::new(2, 2, 2, 1));
            assert!(v.set(p(3, 2), 'w', red));
            assert!(!v.set(p(1, 1), 'w', red));
        }
        assert_eq!(g.get(p(3, 2)), Some(('w', red)));
    }

    #[test]
    fn row_mut_is_bounded_by_view_width() {
        let mut g = Grid::new(4, 2);
        let mut v = g.sub_mut(Rect::new(2, 1, 2, 2));
        let (runes, _) = v.row_mut(2).unwrap();
        assert_eq!(runes.len(), 2);
        runes.fill('#');
        assert!(v.row_mut(3).is_none());
        assert_eq!(g.runes(), &['\0', '\0', '\0', '\0', '\0', '#', '#', '\0']);
    }
}
