// SPDX-License-Identifier: MIT
//
// Style: per-cell transforms applied before a cell is committed.
//
// A style maps (position, prior cell, candidate cell) to the cell that is
// actually written. Styles are plain values: a closed set of variants with
// one `apply`, chained in order by `Style::compose`. `Style::Nop` is the
// identity.

use crate::attr::Attr;
use crate::draw::DrawFlags;
use crate::grid::Point;

/// A rune plus its attribute.
pub type Cell = (char, Attr);

/// A stateless cell transform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Style {
    /// Leave the candidate alone.
    #[default]
    Nop,
    /// Map this rune to empty (`'\0'`).
    Elide(char),
    /// Replace an empty rune with this one.
    Fill(char),
    /// Overwrite the attribute of any non-empty rune.
    ForceAttr(Attr),
    /// `attr = (attr & mask) | value` for any non-empty rune.
    MaskedMerge { mask: Attr, value: Attr },
    /// Apply each style in order, feeding each the previous result.
    Chain(Vec<Style>),
}

impl Style {
    /// Combine styles into one.
    ///
    /// Nested chains are flattened and `Nop`s dropped. No styles left gives
    /// `Nop`; one gives that style; more give a `Chain`.
    ///
    /// ```
    /// use vt_grid::style::Style;
    ///
    /// assert_eq!(Style::compose([Style::Nop, Style::Nop]), Style::Nop);
    /// assert_eq!(Style::compose([Style::Nop, Style::Fill('.')]), Style::Fill('.'));
    /// ```
    #[must_use]
    pub fn compose(styles: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for style in styles {
            style.flatten_into(&mut flat);
        }
        match flat.len() {
            0 => Self::Nop,
            1 => flat.pop().unwrap_or_default(),
            _ => Self::Chain(flat),
        }
    }

    fn flatten_into(self, out: &mut Vec<Self>) {
        match self {
            Self::Nop => {}
            Self::Chain(styles) => {
                for style in styles {
                    style.flatten_into(out);
                }
            }
            style => out.push(style),
        }
    }

    /// A merge that overlays `value` onto the existing attribute with
    /// per-channel transparency.
    ///
    /// A channel is replaced when its opacity flag (`ZERO_FG` / `ZERO_BG`)
    /// is set or when `value` carries something in it; otherwise the
    /// existing channel shows through.
    #[must_use]
    pub const fn transparent(flags: DrawFlags, value: Attr) -> Self {
        Self::MaskedMerge {
            mask: Attr::transparency_mask(
                value,
                flags.contains(DrawFlags::ZERO_FG),
                flags.contains(DrawFlags::ZERO_BG),
            ),
            value,
        }
    }

    /// Transform `candidate`, about to be written at `at` over `prior`.
    #[must_use]
    pub fn apply(&self, at: Point, prior: Cell, candidate: Cell) -> Cell {
        let (rune, attr) = candidate;
        match self {
            Self::Nop => candidate,
            Self::Elide(r) if rune == *r => ('\0', attr),
            Self::Fill(r) if rune == '\0' => (*r, attr),
            Self::ForceAttr(a) if rune != '\0' => (rune, *a),
            Self::MaskedMerge { mask, value } if rune != '\0' => (rune, (attr & *mask) | *value),
            Self::Chain(styles) => styles.iter().fold(candidate, |cell, style| style.apply(at, prior, cell)),
            _ => candidate,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Color, Flags};
    use pretty_assertions::assert_eq;

    const AT: Point = Point::new(1, 1);
    const BLANK: Cell = ('\0', Attr::NONE);

    // ── compose ─────────────────────────────────────────────────────────

    #[test]
    fn compose_empty_is_nop() {
        assert_eq!(Style::compose([]), Style::Nop);
    }

    #[test]
    fn compose_flattens_nested_chains() {
        let inner = Style::Chain(vec![Style::Fill('a'), Style::Nop, Style::Elide('b')]);
        let composed = Style::compose([Style::Elide('c'), inner, Style::Nop]);
        assert_eq!(
            composed,
            Style::Chain(vec![Style::Elide('c'), Style::Fill('a'), Style::Elide('b')])
        );
    }

    #[test]
    fn compose_unwraps_single_chain_member() {
        let composed = Style::compose([Style::Chain(vec![Style::Nop, Style::Fill('x')])]);
        assert_eq!(composed, Style::Fill('x'));
    }

    // ── apply ───────────────────────────────────────────────────────────

    #[test]
    fn nop_is_identity() {
        let cell = ('q', Attr::from(Flags::BOLD));
        assert_eq!(Style::Nop.apply(AT, BLANK, cell), cell);
    }

    #[test]
    fn elide_only_matching_rune() {
        let elide = Style::Elide(' ');
        assert_eq!(elide.apply(AT, BLANK, (' ', Attr::NONE)), BLANK);
        assert_eq!(elide.apply(AT, BLANK, ('x', Attr::NONE)), ('x', Attr::NONE));
    }

    #[test]
    fn fill_only_empty_rune() {
        let fill = Style::Fill('.');
        assert_eq!(fill.apply(AT, BLANK, BLANK), ('.', Attr::NONE));
        assert_eq!(fill.apply(AT, BLANK, ('x', Attr::NONE)), ('x', Attr::NONE));
    }

    #[test]
    fn force_attr_skips_empty_rune() {
        let bold = Attr::from(Flags::BOLD);
        let force = Style::ForceAttr(bold);
        assert_eq!(force.apply(AT, BLANK, ('x', Attr::NONE)), ('x', bold));
        assert_eq!(force.apply(AT, BLANK, BLANK), BLANK);
    }

    #[test]
    fn masked_merge_formula() {
        let base = Attr::NONE.with_fg(Color::Ansi256(1)).with_bg(Color::Ansi256(2));
        let merge = Style::MaskedMerge {
            mask: Attr::BG_MASK,
            value: Attr::from(Flags::ITALIC),
        };
        let (_, attr) = merge.apply(AT, BLANK, ('x', base));
        assert_eq!(attr, Attr::NONE.with_bg(Color::Ansi256(2)) | Attr::from(Flags::ITALIC));
    }

    #[test]
    fn chain_threads_in_order() {
        let chain = Style::compose([Style::Elide(' '), Style::Fill('#')]);
        assert_eq!(chain.apply(AT, BLANK, (' ', Attr::NONE)), ('#', Attr::NONE));

        let reversed = Style::compose([Style::Fill('#'), Style::Elide('#')]);
        assert_eq!(reversed.apply(AT, BLANK, BLANK), BLANK);
    }

    // ── transparent ─────────────────────────────────────────────────────

    #[test]
    fn transparent_fg_value_keeps_bg() {
        let base = Attr::NONE.with_fg(Color::Ansi256(1)).with_bg(Color::Ansi256(2));
        let style = Style::transparent(DrawFlags::empty(), Attr::NONE.with_fg(Color::Ansi256(5)));
        let (_, attr) = style.apply(AT, BLANK, ('x', base));
        assert_eq!(attr.fg(), Some(Color::Ansi256(5)));
        assert_eq!(attr.bg(), Some(Color::Ansi256(2)));
    }

    #[test]
    fn transparent_opaque_bg_clears_it() {
        let base = Attr::NONE.with_fg(Color::Ansi256(1)).with_bg(Color::Ansi256(2));
        let style = Style::transparent(DrawFlags::ZERO_BG, Attr::NONE);
        let (_, attr) = style.apply(AT, BLANK, ('x', base));
        assert_eq!(attr, Attr::NONE.with_fg(Color::Ansi256(1)));
    }
}
