// SPDX-License-Identifier: MIT
//
// Error types.
//
// I/O failures stay `std::io::Error`. The types here cover misuse of the
// API: handing the renderer a grid shape it cannot map onto the screen,
// and attaching a second handle to an `Output`.

use thiserror::Error;

use crate::grid::Point;

/// A grid the renderer cannot draw as a whole screen.
///
/// These are caller bugs, not runtime conditions: retrying with the same
/// grid fails the same way.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The grid is a sub-grid view whose rows are not contiguous.
    #[error("cannot render a sub-grid (stride {stride} != width {width})")]
    SubGrid { stride: usize, width: u16 },

    /// The grid does not start at the screen origin.
    #[error("cannot render a sub-screen grid (origin {origin} != (1, 1))")]
    SubScreen { origin: Point },
}

/// `Output::enter` was called while a handle is already attached.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("output already attached to descriptor {fd}")]
pub struct AlreadyAttached {
    /// Descriptor of the handle that stays attached.
    pub fd: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = RenderError::SubGrid { stride: 80, width: 40 };
        assert_eq!(e.to_string(), "cannot render a sub-grid (stride 80 != width 40)");

        let e = RenderError::SubScreen { origin: Point::new(3, 2) };
        assert_eq!(e.to_string(), "cannot render a sub-screen grid (origin (3, 2) != (1, 1))");

        assert_eq!(AlreadyAttached { fd: 7 }.to_string(), "output already attached to descriptor 7");
    }
}
