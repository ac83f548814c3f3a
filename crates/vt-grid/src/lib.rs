// SPDX-License-Identifier: MIT
//
// vt-grid: terminal control codec, styled cell grid, differential renderer.
//
// The layers, bottom up:
//
//   escape  identifiers for C0/C1 controls and ESC/CSI sequences, with
//           naming, encoding and decoding.
//   attr    packed graphic rendition (flags + fg + bg) and SGR deltas.
//   grid    a rectangle of (rune, attr) cells with borrowed sub-views.
//   style   per-cell transforms applied while drawing and rendering.
//   draw    transparent grid-onto-grid and bitmap-onto-grid copies.
//   cursor  the terminal's cursor and attribute state, for minimal moves.
//   render  differential grid rendering and Braille bitmap rendering.
//   screen  a double-buffered frame built on the renderer.
//   flush   writing to a possibly non-blocking descriptor (unix).
//
// Raw-mode setup, input loops and signal handling are left to the
// application; this crate only produces bytes and writes them.

pub mod ansi;
pub mod attr;
pub mod bitmap;
pub mod cursor;
pub mod draw;
pub mod error;
pub mod escape;
#[cfg(unix)]
pub mod flush;
pub mod grid;
pub mod output;
pub mod render;
pub mod screen;
pub mod style;
