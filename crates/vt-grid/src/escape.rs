// SPDX-License-Identifier: MIT
//
// Escape identifiers: one value naming every control the protocol can carry.
//
// A terminal byte stream interleaves text with three kinds of control:
// single control bytes (C0 and C1), two-byte ESCape sequences, and CSI
// control sequences with parameters. Higher layers want to `match` on
// "which control was this" without caring how it was spelled on the wire,
// so we fold all of them into one `u32` drawn from the Unicode private use
// area:
//
//   U+0000–U+001F, U+007F   C0 controls (the byte itself)
//   U+0080–U+009F           C1 controls (the byte itself)
//   U+EF00 | b              ESC sequence with final byte `b`
//   U+EF7F                  malformed ESC sequence
//   U+EF80 | b              CSI sequence with final byte `b`
//   U+EFFF                  malformed CSI sequence
//
// Every class is a contiguous range, so classification is a pair of
// comparisons. Malformed input never errors: it decodes to one of the two
// sentinels and callers log or drop it like any other identifier.

use std::fmt;
use std::io::{self, Write};

// ─── Encoding Space ─────────────────────────────────────────────────────────

const ESC_BASE: u32 = 0xEF00;
const CSI_BASE: u32 = 0xEF80;

/// The ESC byte that introduces every 7-bit sequence.
const ESC_BYTE: u8 = 0x1B;

/// Mnemonics for the C1 block, indexed by `byte - 0x80`.
const C1_NAMES: [&str; 32] = [
    "<RES@>", "<RESA>", "<RESB>", "<RESC>", "<IND>", "<NEL>", "<SSA>", "<ESA>",
    "<HTS>", "<HTJ>", "<VTS>", "<PLD>", "<PLU>", "<RI>", "<SS2>", "<SS3>",
    "<DCS>", "<PU1>", "<PU2>", "<STS>", "<CCH>", "<MW>", "<SPA>", "<EPA>",
    "<RESX>", "<RESY>", "<RESZ>", "<CSI>", "<ST>", "<OSC>", "<PM>", "<APC>",
];

// ─── Escape ─────────────────────────────────────────────────────────────────

/// Identifies a C0/C1 control, an ESC sequence, or a CSI sequence.
///
/// ```
/// use vt_grid::escape::Escape;
///
/// let cup = Escape::csi(b'H');
/// assert_eq!(cup.as_csi(), Some(b'H'));
/// assert_eq!(cup.to_string(), "CSI+H");
/// assert_eq!(Escape::control(0x03).to_string(), "^C");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Escape(u32);

impl Escape {
    /// Sentinel for an ESC sequence that broke off before a valid final byte.
    pub const ESC_INVALID: Self = Self(ESC_BASE | 0x7F);

    /// Sentinel for a CSI sequence that contained an illegal byte.
    pub const CSI_INVALID: Self = Self(CSI_BASE | 0x7F);

    /// Identifier for a single control byte (C0, DEL, or C1).
    ///
    /// Bytes outside those ranges produce a value for which
    /// [`is_valid`](Self::is_valid) is false.
    #[inline]
    #[must_use]
    pub const fn control(b: u8) -> Self {
        Self(b as u32)
    }

    /// Identifier for the ESC sequence with final byte `b`.
    #[inline]
    #[must_use]
    pub const fn esc(b: u8) -> Self {
        Self(ESC_BASE | (b & 0x7F) as u32)
    }

    /// Identifier for the CSI sequence with final byte `b`.
    #[inline]
    #[must_use]
    pub const fn csi(b: u8) -> Self {
        Self(CSI_BASE | (b & 0x7F) as u32)
    }

    /// The raw code point.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// The final byte, if this identifies an ESC sequence.
    #[inline]
    #[must_use]
    pub const fn as_esc(self) -> Option<u8> {
        if ESC_BASE < self.0 && self.0 < Self::ESC_INVALID.0 {
            Some((self.0 & 0x7F) as u8)
        } else {
            None
        }
    }

    /// The final byte, if this identifies a CSI sequence.
    #[inline]
    #[must_use]
    pub const fn as_csi(self) -> Option<u8> {
        if CSI_BASE < self.0 && self.0 < Self::CSI_INVALID.0 {
            Some((self.0 & 0x7F) as u8)
        } else {
            None
        }
    }

    /// C0 control or DEL.
    #[inline]
    #[must_use]
    pub const fn is_c0(self) -> bool {
        self.0 <= 0x1F || self.0 == 0x7F
    }

    /// C1 control.
    #[inline]
    #[must_use]
    pub const fn is_c1(self) -> bool {
        0x80 <= self.0 && self.0 <= 0x9F
    }

    /// Either malformed-sequence sentinel.
    #[inline]
    #[must_use]
    pub const fn is_malformed(self) -> bool {
        self.0 == Self::ESC_INVALID.0 || self.0 == Self::CSI_INVALID.0
    }

    /// Whether this value lies in one of the identifier ranges.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.is_c0() || self.is_c1() || (ESC_BASE < self.0 && self.0 <= Self::CSI_INVALID.0)
    }

    /// Legacy character-set switching: shift-out/in, single shifts, G0–G3
    /// designations, and locking shifts.
    ///
    /// Once everything is decoded as UTF-8 these do nothing useful, so an
    /// input decoder can drop them.
    #[must_use]
    pub const fn is_charset_control(self) -> bool {
        matches!(
            self.0,
            0x0E // SO
                | 0x0F // SI
                | 0x8E // SS2
                | 0x8F // SS3
                | 0xEF28..=0xEF2F // ESC ( ) * + , - . /   designate G0–G3
                | 0xEF6E // ESC n  LS2
                | 0xEF6F // ESC o  LS3
                | 0xEF7C // ESC |  LS3R
                | 0xEF7D // ESC }  LS2R
                | 0xEF7E // ESC ~  LS1R
        )
    }

    /// Human-readable name: `^C`, `<CSI>`, `ESC+7`, `CSI+m`, `U+1234`.
    #[must_use]
    pub fn name(self) -> String {
        self.to_string()
    }

    /// Serialize this control onto the wire.
    ///
    /// CSI sequences join `params` with `;` between the introducer and the
    /// final byte; every other kind ignores them. Sentinels and invalid
    /// values write nothing.
    ///
    /// # Errors
    ///
    /// Propagates errors from `w`.
    pub fn write_with(self, w: &mut impl Write, params: &[u32]) -> io::Result<()> {
        if self.is_c0() {
            #[allow(clippy::cast_possible_truncation)] // is_c0 bounds the value to a byte.
            return w.write_all(&[self.0 as u8]);
        }
        if self.is_c1() {
            let mut enc = [0u8; 4];
            let ch = char::from_u32(self.0).unwrap_or('\u{80}');
            return w.write_all(ch.encode_utf8(&mut enc).as_bytes());
        }
        if let Some(b) = self.as_esc() {
            return w.write_all(&[ESC_BYTE, b]);
        }
        if let Some(b) = self.as_csi() {
            w.write_all(&[ESC_BYTE, b'['])?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    w.write_all(b";")?;
                }
                write!(w, "{p}")?;
            }
            return w.write_all(&[b]);
        }
        Ok(())
    }
}

impl fmt::Display for Escape {
    #[allow(clippy::cast_possible_truncation)] // Each arm is bounded to a byte.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.0;
        match id {
            0x00..=0x1F => write!(f, "^{}", char::from(0x40 ^ id as u8)),
            0x7F => f.write_str("^?"),
            0x80..=0x9F => f.write_str(C1_NAMES[(id & 0x1F) as usize]),
            0xEF20..=0xEF7E => write!(f, "ESC+{}", char::from((id & 0x7F) as u8)),
            0xEFA0..=0xEFFE => write!(f, "CSI+{}", char::from((id & 0x7F) as u8)),
            0xEF7F => f.write_str("ESC+INVALID"),
            0xEFFF => f.write_str("CSI+INVALID"),
            _ => write!(f, "U+{id:04X}"),
        }
    }
}

impl fmt::Debug for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Escape({self})")
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────
//
// Pure functions over `&[u8]`: they look at the head of the slice and report
// what they found plus how many bytes it spans. The caller owns buffering.

/// Result of looking for an escape at the head of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// A complete control spanning `len` bytes. `args` holds the raw
    /// parameter and intermediate bytes (empty for single controls).
    Escape {
        /// What was found.
        id: Escape,
        /// Parameter/intermediate bytes between introducer and final byte.
        args: &'a [u8],
        /// Bytes consumed, including introducer and final byte.
        len: usize,
    },
    /// The slice ends mid-sequence; retry once more bytes arrive.
    Incomplete,
    /// The slice starts with ordinary text.
    Text,
}

/// Decode the control at the start of `buf`.
///
/// C1 controls are recognized in their UTF-8 form (`C2 80`–`C2 9F`); raw
/// bytes in `0x80..=0x9F` are continuation bytes and count as text.
///
/// ```
/// use vt_grid::escape::{decode, Decoded, Escape};
///
/// assert_eq!(
///     decode(b"\x1b[1;2Hrest"),
///     Decoded::Escape { id: Escape::csi(b'H'), args: b"1;2", len: 6 },
/// );
/// assert_eq!(decode(b"\x1b["), Decoded::Incomplete);
/// assert_eq!(decode(b"abc"), Decoded::Text);
/// ```
#[must_use]
pub fn decode(buf: &[u8]) -> Decoded<'_> {
    let Some(&lead) = buf.first() else {
        return Decoded::Incomplete;
    };

    match lead {
        ESC_BYTE => decode_esc(buf),
        0x00..=0x1F | 0x7F => Decoded::Escape {
            id: Escape::control(lead),
            args: &[],
            len: 1,
        },
        0xC2 => match buf.get(1) {
            None => Decoded::Incomplete,
            Some(0x9B) => decode_csi(buf, 2),
            Some(&b @ 0x80..=0x9F) => Decoded::Escape {
                id: Escape::control(b),
                args: &[],
                len: 2,
            },
            Some(_) => Decoded::Text,
        },
        _ => Decoded::Text,
    }
}

fn decode_esc(buf: &[u8]) -> Decoded<'_> {
    debug_assert_eq!(buf[0], ESC_BYTE);

    let Some(&next) = buf.get(1) else {
        return Decoded::Incomplete;
    };

    match next {
        b'[' => decode_csi(buf, 2),
        // Intermediate form (`ESC ( B`, `ESC # 8`): the first intermediate
        // names the function, the rest up to the final byte are its argument.
        0x20..=0x2F => {
            let mut end = 2;
            while end < buf.len() && (0x20..=0x2F).contains(&buf[end]) {
                end += 1;
            }
            let Some(&fin) = buf.get(end) else {
                return Decoded::Incomplete;
            };
            if (0x30..=0x7E).contains(&fin) {
                Decoded::Escape {
                    id: Escape::esc(next),
                    args: &buf[2..=end],
                    len: end + 1,
                }
            } else {
                malformed(Escape::ESC_INVALID, buf, 1, end)
            }
        }
        0x30..=0x7E => Decoded::Escape {
            id: Escape::esc(next),
            args: &[],
            len: 2,
        },
        _ => malformed(Escape::ESC_INVALID, buf, 1, 1),
    }
}

fn decode_csi(buf: &[u8], start: usize) -> Decoded<'_> {
    // Parameter bytes are 0x30..=0x3F, intermediates 0x20..=0x2F, and the
    // final byte 0x40..=0x7E.
    let mut end = start;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            return Decoded::Escape {
                id: Escape::csi(b),
                args: &buf[start..end],
                len: end + 1,
            };
        }
        if !(0x20..=0x3F).contains(&b) {
            return malformed(Escape::CSI_INVALID, buf, start, end);
        }
        end += 1;
    }
    Decoded::Incomplete
}

/// A sequence broke at `buf[end]`. The offending byte is swallowed unless it
/// is itself a control, which then starts the next decode.
fn malformed(id: Escape, buf: &[u8], start: usize, end: usize) -> Decoded<'_> {
    let starts_control = buf
        .get(end)
        .is_some_and(|&b| b <= 0x1F || b == 0x7F);
    let len = if starts_control || end >= buf.len() { end } else { end + 1 };
    Decoded::Escape {
        id,
        args: &buf[start.min(end)..end],
        len: len.max(1),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
