// SPDX-License-Identifier: MIT
//
// Output: writing rendered bytes to a terminal descriptor.
//
// Safety: this module uses `unsafe` for fcntl(2), which has no safe
// wrapper in std. Each call is a single FFI call on a descriptor the
// caller's handle owns.
//
// Terminal programs often run their descriptor in non-blocking mode (so
// input polling never hangs). Output can then fail with EWOULDBLOCK when
// the terminal falls behind. On that error `Output::flush`
// switches the descriptor to blocking mode, finishes the write, and puts
// the previous flags back. Each such stall can be timed into a bounded
// log for latency reporting.
//
// Streamers resume after a partial write, so the blocking retry continues
// exactly where the non-blocking attempt stopped.

#![allow(unsafe_code)]

use std::io::{self, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::time::{Duration, Instant};

use crate::error::AlreadyAttached;
use crate::output::{OutputBuffer, Streamer};

// ─── Handle ──────────────────────────────────────────────────────────────────

/// A writable descriptor: files, stdout, sockets, pipes.
pub trait Handle: Write + AsRawFd {}

impl<T: Write + AsRawFd + ?Sized> Handle for T {}

// ─── fcntl ───────────────────────────────────────────────────────────────────

fn get_flags(fd: RawFd) -> io::Result<libc::c_int> {
    // SAFETY: F_GETFL takes no argument and only reads descriptor state.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(flags)
}

fn set_flags(fd: RawFd, flags: libc::c_int) -> io::Result<()> {
    // SAFETY: F_SETFL takes an int argument; no memory is passed.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

// ─── Counting ────────────────────────────────────────────────────────────────

/// Adds every byte the handle accepts to a running total.
struct Counting<'a> {
    inner: &'a mut dyn Handle,
    count: &'a mut usize,
}

impl Write for Counting<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        *self.count += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn stream(s: &mut (impl Streamer + ?Sized), w: &mut Counting<'_>) -> io::Result<()> {
    s.write_to(w)?;
    w.flush()
}

// ─── Stall log ───────────────────────────────────────────────────────────────

#[derive(Debug)]
struct StallLog {
    samples: Vec<Duration>,
    limit: usize,
}

impl StallLog {
    fn record(&mut self, stall: Duration) {
        if self.samples.len() < self.limit {
            self.samples.push(stall);
        }
    }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// Writes streamers to an attached handle, riding out non-blocking stalls.
///
/// Created detached; [`enter`](Self::enter) attaches a handle and
/// [`exit`](Self::exit) gives it back. While detached, flushing is a no-op.
///
/// ```no_run
/// use std::io::Write;
/// use vt_grid::flush::Output;
///
/// let mut stdout = std::io::stdout();
/// let mut out = Output::new();
/// out.enter(&mut stdout).unwrap();
/// out.buffer_mut().write_all(b"hello\r\n").unwrap();
/// out.flush_buffer().unwrap();
/// ```
pub struct Output<'h> {
    file: Option<&'h mut dyn Handle>,
    buf: OutputBuffer,
    flushed: usize,
    stalls: Option<StallLog>,
}

impl<'h> Output<'h> {
    /// A detached output with an empty buffer and no stall tracking.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: None,
            buf: OutputBuffer::new(),
            flushed: 0,
            stalls: None,
        }
    }

    /// Attach `handle`.
    ///
    /// # Errors
    ///
    /// Fails if a handle is already attached; that handle stays attached.
    pub fn enter(&mut self, handle: &'h mut dyn Handle) -> Result<(), AlreadyAttached> {
        if let Some(file) = &self.file {
            return Err(AlreadyAttached { fd: file.as_raw_fd() });
        }
        self.file = Some(handle);
        Ok(())
    }

    /// Detach and return the handle if its descriptor is `fd`. Anything
    /// else leaves the output as it is and returns `None`.
    pub fn exit(&mut self, fd: RawFd) -> Option<&'h mut dyn Handle> {
        if self.file.as_ref().is_some_and(|f| f.as_raw_fd() == fd) {
            self.file.take()
        } else {
            None
        }
    }

    /// Whether a handle is attached.
    #[inline]
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.file.is_some()
    }

    /// Total bytes the handle has accepted across all flushes.
    #[inline]
    #[must_use]
    pub const fn flushed(&self) -> usize {
        self.flushed
    }

    /// The output's own buffer, flushed by [`flush_buffer`](Self::flush_buffer).
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut OutputBuffer {
        &mut self.buf
    }

    /// Start timing blocking fallbacks (failed ones included) into a log of
    /// at most `n` samples; `0` stops tracking. Any previous samples are
    /// discarded.
    pub fn track_stalls(&mut self, n: usize) {
        self.stalls = (n > 0).then(|| StallLog {
            samples: Vec::with_capacity(n),
            limit: n,
        });
    }

    /// Recorded stall durations, or `None` when not tracking. With
    /// `consume` the log is emptied (making room for new samples);
    /// otherwise it is left as is.
    pub fn stalls(&mut self, consume: bool) -> Option<Vec<Duration>> {
        let log = self.stalls.as_mut()?;
        if consume {
            Some(log.samples.drain(..).collect())
        } else {
            Some(log.samples.clone())
        }
    }

    /// Write `s` to the attached handle. Without a handle this does
    /// nothing.
    ///
    /// If the descriptor is non-blocking and the write would block, the
    /// descriptor is switched to blocking mode for the rest of the write
    /// and its flags restored afterwards.
    ///
    /// # Errors
    ///
    /// Returns write errors other than the first would-block, and fcntl
    /// errors from the fallback. A failure to restore the flags is only
    /// reported when the write itself succeeded.
    pub fn flush(&mut self, s: &mut (impl Streamer + ?Sized)) -> io::Result<()> {
        let Some(file) = self.file.as_deref_mut() else {
            return Ok(());
        };
        flush_to(file, s, &mut self.flushed, self.stalls.as_mut())
    }

    /// Flush the output's own buffer. See [`flush`](Self::flush).
    ///
    /// # Errors
    ///
    /// As for [`flush`](Self::flush). Bytes not written stay buffered.
    pub fn flush_buffer(&mut self) -> io::Result<()> {
        let Some(file) = self.file.as_deref_mut() else {
            return Ok(());
        };
        flush_to(file, &mut self.buf, &mut self.flushed, self.stalls.as_mut())
    }
}

impl Default for Output<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("fd", &self.file.as_ref().map(|h| h.as_raw_fd()))
            .field("flushed", &self.flushed)
            .field("stalls", &self.stalls)
            .finish_non_exhaustive()
    }
}

fn flush_to(
    file: &mut dyn Handle,
    s: &mut (impl Streamer + ?Sized),
    flushed: &mut usize,
    stalls: Option<&mut StallLog>,
) -> io::Result<()> {
    let mut w = Counting { inner: file, count: flushed };
    match stream(s, &mut w) {
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => blocking_flush(&mut w, s, stalls),
        res => res,
    }
}

fn blocking_flush(
    w: &mut Counting<'_>,
    s: &mut (impl Streamer + ?Sized),
    stalls: Option<&mut StallLog>,
) -> io::Result<()> {
    let start = Instant::now();
    let fd = w.inner.as_raw_fd();
    let res = stream_blocking(fd, w, s);

    let stall = start.elapsed();
    log::debug!("output stalled on fd {fd} for {stall:?}");
    if let Some(log) = stalls {
        log.record(stall);
    }
    res
}

fn stream_blocking(
    fd: RawFd,
    w: &mut Counting<'_>,
    s: &mut (impl Streamer + ?Sized),
) -> io::Result<()> {
    let flags = get_flags(fd)?;
    set_flags(fd, flags & !libc::O_NONBLOCK)?;
    let res = stream(s, w);
    let restore = set_flags(fd, flags);
    res.and(restore)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
