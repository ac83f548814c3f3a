// SPDX-License-Identifier: MIT
//
// Attr: graphic rendition packed into one machine word.
//
// Every grid cell carries an `Attr` next to its rune. Packing foreground,
// background, and text flags into a single `u64` keeps the grid a pair of
// flat arrays, makes cell comparison a single integer compare in the diff
// loop, and lets drawing code work on whole channels with plain masks:
//
//   bit  0..8    text flags (bold, dim, italic, …)
//   bit  8..34   foreground color field
//   bit 34..60   background color field
//
// A color field is 24 value bits plus a 2-bit kind: 0 = unset, 1 = palette
// index, 2 = 24-bit RGB, 3 = the terminal's default color. An all-zero
// `Attr` is "no attribute": transparent when drawing, SGR 0 on the wire.
//
// The foreground mask covers the flags as well as the fg color: intensity
// and friends travel with the text, the background is a separate layer.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

// ─── Text Flags ─────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text style flags, one bit per SGR on/off pair.
    ///
    /// ```
    /// use vt_grid::attr::Flags;
    ///
    /// let style = Flags::BOLD | Flags::ITALIC;
    /// assert!(style.contains(Flags::BOLD));
    /// assert!(!style.contains(Flags::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Flags: u8 {
        /// SGR 1: increased intensity.
        const BOLD          = 1 << 0;
        /// SGR 2: decreased intensity (faint).
        const DIM           = 1 << 1;
        /// SGR 3: italic.
        const ITALIC        = 1 << 2;
        /// SGR 4: underline.
        const UNDERLINE     = 1 << 3;
        /// SGR 5: blink.
        const BLINK         = 1 << 4;
        /// SGR 7: swap foreground and background.
        const INVERSE       = 1 << 5;
        /// SGR 8: concealed text.
        const CONCEAL       = 1 << 6;
        /// SGR 9: crossed-out text.
        const STRIKETHROUGH = 1 << 7;
    }
}

/// SGR parameter that turns each flag on, in emission order.
const FLAG_ON: [(Flags, u32); 8] = [
    (Flags::BOLD, 1),
    (Flags::DIM, 2),
    (Flags::ITALIC, 3),
    (Flags::UNDERLINE, 4),
    (Flags::BLINK, 5),
    (Flags::INVERSE, 7),
    (Flags::CONCEAL, 8),
    (Flags::STRIKETHROUGH, 9),
];

/// Mutually exclusive flag groups and the SGR parameter that clears each.
///
/// Bold and dim share SGR 22 ("normal intensity"), so dropping either one
/// means clearing both and re-asserting whatever should survive.
const FLAG_GROUPS: [(Flags, u32); 7] = [
    (Flags::BOLD.union(Flags::DIM), 22),
    (Flags::ITALIC, 23),
    (Flags::UNDERLINE, 24),
    (Flags::BLINK, 25),
    (Flags::INVERSE, 27),
    (Flags::CONCEAL, 28),
    (Flags::STRIKETHROUGH, 29),
];

// ─── Color ──────────────────────────────────────────────────────────────────

/// A color as the terminal understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),
    /// 256-color palette index (0–15 are the classic ANSI colors).
    Ansi256(u8),
    /// The terminal's own default color (SGR 39 / 49).
    #[default]
    Default,
}

const KIND_INDEX: u64 = 1;
const KIND_RGB: u64 = 2;
const KIND_DEFAULT: u64 = 3;
const COLOR_FIELD: u64 = (1 << 26) - 1;

impl Color {
    /// Pack into a 26-bit color field.
    const fn encode(self) -> u64 {
        match self {
            Self::Ansi256(idx) => KIND_INDEX << 24 | idx as u64,
            Self::Rgb(r, g, b) => KIND_RGB << 24 | (r as u64) << 16 | (g as u64) << 8 | b as u64,
            Self::Default => KIND_DEFAULT << 24,
        }
    }

    /// Unpack a 26-bit color field; `None` for an unset field.
    #[allow(clippy::cast_possible_truncation)] // Byte extraction.
    const fn decode(field: u64) -> Option<Self> {
        let value = field & 0x00FF_FFFF;
        match (field >> 24) & 0b11 {
            KIND_INDEX => Some(Self::Ansi256(value as u8)),
            KIND_RGB => Some(Self::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)),
            KIND_DEFAULT => Some(Self::Default),
            _ => None,
        }
    }

    /// Append the SGR parameters selecting this color.
    ///
    /// Compact codes for the 16 classic colors (30–37, 90–97 and their
    /// background twins), `38;5;N` for the rest of the palette, and
    /// `38;2;R;G;B` for RGB.
    pub fn push_sgr(self, background: bool, out: &mut Vec<u32>) {
        let base = if background { 10 } else { 0 };
        match self {
            Self::Default => out.push(39 + base),
            Self::Ansi256(idx) if idx < 8 => out.push(30 + base + u32::from(idx)),
            Self::Ansi256(idx) if idx < 16 => out.push(82 + base + u32::from(idx)),
            Self::Ansi256(idx) => out.extend([38 + base, 5, u32::from(idx)]),
            Self::Rgb(r, g, b) => out.extend([38 + base, 2, u32::from(r), u32::from(g), u32::from(b)]),
        }
    }
}

// ─── Attr ───────────────────────────────────────────────────────────────────

const FLAG_BITS: u64 = 0xFF;
const FG_SHIFT: u32 = 8;
const BG_SHIFT: u32 = 34;
const VALID_BITS: u64 = FLAG_BITS | COLOR_FIELD << FG_SHIFT | COLOR_FIELD << BG_SHIFT;

/// Packed graphic rendition: text flags plus foreground and background.
///
/// ```
/// use vt_grid::attr::{Attr, Color, Flags};
///
/// let a = Attr::NONE.with_fg(Color::Ansi256(1)).with_flags(Flags::BOLD);
/// assert_eq!(a.fg(), Some(Color::Ansi256(1)));
/// assert_eq!(a.bg(), None);
/// assert!(a.flags().contains(Flags::BOLD));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attr(u64);

impl Attr {
    /// No attribute: transparent when drawing, plain text when rendering.
    pub const NONE: Self = Self(0);

    /// Foreground channel: text flags and the foreground color.
    pub const FG_MASK: Self = Self(FLAG_BITS | COLOR_FIELD << FG_SHIFT);

    /// Background channel.
    pub const BG_MASK: Self = Self(COLOR_FIELD << BG_SHIFT);

    /// Every meaningful bit.
    pub const ALL: Self = Self(VALID_BITS);

    /// Build from raw bits, discarding bits outside the encoding.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits & VALID_BITS)
    }

    /// The raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // FLAG_BITS is one byte.
    pub const fn flags(self) -> Flags {
        Flags::from_bits_retain((self.0 & FLAG_BITS) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn fg(self) -> Option<Color> {
        Color::decode(self.0 >> FG_SHIFT & COLOR_FIELD)
    }

    #[inline]
    #[must_use]
    pub const fn bg(self) -> Option<Color> {
        Color::decode(self.0 >> BG_SHIFT & COLOR_FIELD)
    }

    /// Add text flags.
    #[inline]
    #[must_use]
    pub const fn with_flags(self, flags: Flags) -> Self {
        Self(self.0 | flags.bits() as u64)
    }

    /// Replace the foreground color.
    #[inline]
    #[must_use]
    pub const fn with_fg(self, color: Color) -> Self {
        Self(self.0 & !(COLOR_FIELD << FG_SHIFT) | color.encode() << FG_SHIFT)
    }

    /// Replace the background color.
    #[inline]
    #[must_use]
    pub const fn with_bg(self, color: Color) -> Self {
        Self(self.0 & !(COLOR_FIELD << BG_SHIFT) | color.encode() << BG_SHIFT)
    }

    /// Just the foreground channel of this attribute.
    #[inline]
    #[must_use]
    pub const fn foreground(self) -> Self {
        Self(self.0 & Self::FG_MASK.0)
    }

    /// Just the background channel of this attribute.
    #[inline]
    #[must_use]
    pub const fn background(self) -> Self {
        Self(self.0 & Self::BG_MASK.0)
    }

    /// Mask that keeps the channels `value` should not overwrite.
    ///
    /// A channel is cleared (so `value` replaces it) when it is forced
    /// opaque, or when `value` carries anything in that channel. Zero
    /// channels in `value` are otherwise transparent.
    #[must_use]
    pub const fn transparency_mask(value: Self, opaque_fg: bool, opaque_bg: bool) -> Self {
        let mut mask = VALID_BITS;
        if opaque_fg || !value.foreground().is_empty() {
            mask &= !Self::FG_MASK.0;
        }
        if opaque_bg || !value.background().is_empty() {
            mask &= !Self::BG_MASK.0;
        }
        Self(mask)
    }

    /// Layer `src` over `self`, channel by channel.
    #[inline]
    #[must_use]
    pub const fn merge(self, src: Self, opaque_fg: bool, opaque_bg: bool) -> Self {
        Self(self.0 & Self::transparency_mask(src, opaque_fg, opaque_bg).0 | src.0)
    }

    /// SGR parameters that establish this attribute from a reset terminal.
    ///
    /// Unset and default colors need no parameter.
    pub fn push_sgr(self, out: &mut Vec<u32>) {
        push_flags_on(self.flags(), out);
        if let Some(c) = self.fg().filter(|&c| c != Color::Default) {
            c.push_sgr(false, out);
        }
        if let Some(c) = self.bg().filter(|&c| c != Color::Default) {
            c.push_sgr(true, out);
        }
    }

    /// SGR parameters that move the terminal from `self` to `to` without a
    /// full reset.
    ///
    /// Each exclusive group is cleared when one of its members must go, and
    /// then the target's members are (re)asserted; members that merely get
    /// added need no clear.
    pub fn push_sgr_delta(self, to: Self, out: &mut Vec<u32>) {
        let (was, now) = (self.flags(), to.flags());
        for (group, off) in FLAG_GROUPS {
            let (a, b) = (was & group, now & group);
            if a == b {
                continue;
            }
            if a.difference(b).is_empty() {
                push_flags_on(b.difference(a), out);
            } else {
                out.push(off);
                push_flags_on(b, out);
            }
        }

        let (fg0, fg1) = (self.fg().unwrap_or_default(), to.fg().unwrap_or_default());
        if fg0 != fg1 {
            fg1.push_sgr(false, out);
        }
        let (bg0, bg1) = (self.bg().unwrap_or_default(), to.bg().unwrap_or_default());
        if bg0 != bg1 {
            bg1.push_sgr(true, out);
        }
    }
}

fn push_flags_on(flags: Flags, out: &mut Vec<u32>) {
    for (flag, on) in FLAG_ON {
        if flags.contains(flag) {
            out.push(on);
        }
    }
}

impl From<Flags> for Attr {
    fn from(flags: Flags) -> Self {
        Self::NONE.with_flags(flags)
    }
}

impl BitOr for Attr {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Attr {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Attr {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Attr {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for Attr {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0 & VALID_BITS)
    }
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Attr(NONE)");
        }
        let mut t = f.debug_struct("Attr");
        if !self.flags().is_empty() {
            t.field("flags", &self.flags());
        }
        if let Some(c) = self.fg() {
            t.field("fg", &c);
        }
        if let Some(c) = self.bg() {
            t.field("bg", &c);
        }
        t.finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn delta(from: Attr, to: Attr) -> Vec<u32> {
        let mut out = Vec::new();
        from.push_sgr_delta(to, &mut out);
        out
    }

    fn full(a: Attr) -> Vec<u32> {
        let mut out = Vec::new();
        a.push_sgr(&mut out);
        out
    }

    // ── Packing ─────────────────────────────────────────────────────────

    #[test]
    fn none_is_zero() {
        assert!(Attr::NONE.is_empty());
        assert_eq!(Attr::NONE.fg(), None);
        assert_eq!(Attr::NONE.bg(), None);
        assert!(Attr::NONE.flags().is_empty());
    }

    #[test]
    fn colors_round_trip_through_fields() {
        for c in [Color::Default, Color::Ansi256(0), Color::Ansi256(255), Color::Rgb(1, 2, 3)] {
            let a = Attr::NONE.with_fg(c).with_bg(c);
            assert_eq!(a.fg(), Some(c));
            assert_eq!(a.bg(), Some(c));
        }
    }

    #[test]
    fn with_fg_replaces_only_foreground() {
        let a = Attr::NONE
            .with_fg(Color::Rgb(255, 0, 0))
            .with_bg(Color::Ansi256(4))
            .with_flags(Flags::BOLD);
        let b = a.with_fg(Color::Ansi256(2));
        assert_eq!(b.fg(), Some(Color::Ansi256(2)));
        assert_eq!(b.bg(), Some(Color::Ansi256(4)));
        assert_eq!(b.flags(), Flags::BOLD);
    }

    #[test]
    fn channel_masks_are_disjoint_and_complete() {
        assert!((Attr::FG_MASK & Attr::BG_MASK).is_empty());
        assert_eq!(Attr::FG_MASK | Attr::BG_MASK, Attr::ALL);
    }

    #[test]
    fn flags_belong_to_foreground() {
        let a = Attr::from(Flags::UNDERLINE);
        assert_eq!(a.foreground(), a);
        assert!(a.background().is_empty());
    }

    #[test]
    fn from_bits_drops_unknown_bits() {
        assert_eq!(Attr::from_bits(u64::MAX), Attr::ALL);
    }

    // ── Merge ───────────────────────────────────────────────────────────

    #[test]
    fn merge_zero_source_is_transparent() {
        let dst = Attr::NONE.with_fg(Color::Ansi256(1)).with_bg(Color::Ansi256(2));
        assert_eq!(dst.merge(Attr::NONE, false, false), dst);
    }

    #[test]
    fn merge_fg_leaves_bg() {
        let dst = Attr::NONE.with_fg(Color::Ansi256(1)).with_bg(Color::Ansi256(2));
        let src = Attr::NONE.with_fg(Color::Ansi256(3));
        let out = dst.merge(src, false, false);
        assert_eq!(out.fg(), Some(Color::Ansi256(3)));
        assert_eq!(out.bg(), Some(Color::Ansi256(2)));
    }

    #[test]
    fn merge_opaque_bg_clears_it() {
        let dst = Attr::NONE.with_fg(Color::Ansi256(1)).with_bg(Color::Ansi256(2));
        let out = dst.merge(Attr::NONE, false, true);
        assert_eq!(out.fg(), Some(Color::Ansi256(1)));
        assert_eq!(out.bg(), None);
    }

    // ── SGR ─────────────────────────────────────────────────────────────

    #[test]
    fn color_sgr_codes() {
        let mut out = Vec::new();
        Color::Ansi256(1).push_sgr(false, &mut out);
        Color::Ansi256(9).push_sgr(false, &mut out);
        Color::Ansi256(4).push_sgr(true, &mut out);
        Color::Ansi256(12).push_sgr(true, &mut out);
        assert_eq!(out, vec![31, 91, 44, 104]);

        let mut out = Vec::new();
        Color::Ansi256(208).push_sgr(false, &mut out);
        Color::Rgb(10, 20, 30).push_sgr(true, &mut out);
        Color::Default.push_sgr(true, &mut out);
        assert_eq!(out, vec![38, 5, 208, 48, 2, 10, 20, 30, 49]);
    }

    #[test]
    fn full_sgr_skips_default_colors() {
        let a = Attr::NONE.with_fg(Color::Default).with_flags(Flags::BOLD | Flags::INVERSE);
        assert_eq!(full(a), vec![1, 7]);
    }

    #[test]
    fn delta_adds_without_clearing() {
        assert_eq!(delta(Attr::from(Flags::BOLD), Attr::from(Flags::BOLD | Flags::ITALIC)), vec![3]);
    }

    #[test]
    fn delta_drops_bold_with_normal_intensity() {
        assert_eq!(delta(Attr::from(Flags::BOLD), Attr::NONE), vec![22]);
    }

    #[test]
    fn delta_bold_to_dim_clears_group_then_sets() {
        assert_eq!(delta(Attr::from(Flags::BOLD), Attr::from(Flags::DIM)), vec![22, 2]);
    }

    #[test]
    fn delta_keeps_surviving_group_member() {
        let from = Attr::from(Flags::BOLD | Flags::DIM);
        assert_eq!(delta(from, Attr::from(Flags::DIM)), vec![22, 2]);
    }

    #[test]
    fn delta_clears_each_group_independently() {
        let from = Attr::from(Flags::UNDERLINE | Flags::BLINK | Flags::INVERSE);
        assert_eq!(delta(from, Attr::from(Flags::BLINK)), vec![24, 27]);
    }

    #[test]
    fn delta_colors() {
        let red = Attr::NONE.with_fg(Color::Ansi256(1));
        assert_eq!(delta(Attr::NONE, red), vec![31]);
        assert_eq!(delta(red, Attr::NONE), vec![39]);
        let on_blue = Attr::NONE.with_bg(Color::Ansi256(4));
        assert_eq!(delta(red, on_blue), vec![39, 44]);
    }

    #[test]
    fn delta_unset_equals_default() {
        let dflt = Attr::NONE.with_fg(Color::Default).with_bg(Color::Default);
        assert!(delta(Attr::NONE, dflt).is_empty());
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Attr::NONE), "Attr(NONE)");
        let a = Attr::NONE.with_fg(Color::Ansi256(1));
        assert_eq!(format!("{a:?}"), "Attr { fg: Ansi256(1) }");
    }
}
