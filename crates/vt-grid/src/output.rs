// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// Everything a frame emits (cursor moves, SGR changes, characters) goes
// into an `OutputBuffer` first, so the whole frame can reach the terminal
// in as few write() calls as possible.
//
// `Streamer` is how buffered output gets to a writer. A streamer drops
// whatever the writer accepted even when the write fails part-way, so
// calling it again resumes where it stopped instead of repeating bytes.

use std::io::{self, Write};

// ─── Streamer ────────────────────────────────────────────────────────────────

/// Something that can serialise itself to a writer.
pub trait Streamer {
    /// Write pending bytes to `w`.
    ///
    /// On error, bytes that did reach `w` are not written again by the next
    /// call.
    ///
    /// # Errors
    ///
    /// Returns the first error from `w` other than `Interrupted`.
    fn write_to(&mut self, w: &mut dyn Write) -> io::Result<()>;
}

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A reusable byte buffer that accumulates terminal output.
///
/// Default capacity: 16 KB, enough for most frames without reallocation.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

/// Initial capacity of [`OutputBuffer::new`].
pub const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a character as UTF-8.
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Drop everything after the first `len` bytes.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing to do; bytes leave through `Streamer::write_to`.
        Ok(())
    }
}

impl Streamer for OutputBuffer {
    fn write_to(&mut self, w: &mut dyn Write) -> io::Result<()> {
        let mut written = 0;
        let result = loop {
            if written == self.buf.len() {
                break Ok(());
            }
            match w.write(&self.buf[written..]) {
                Ok(0) => break Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => break Err(e),
            }
        };
        self.buf.drain(..written);
        result
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
