// SPDX-License-Identifier: MIT

//! Descriptor-level operations on the process-global standard streams.
//!
//! Everything platform-specific about "duplicate a standard descriptor" and
//! "point it somewhere else" lives here; the capture logic depends only on
//! these functions.

use std::fmt;
use std::os::fd::{AsFd, AsRawFd, FromRawFd, OwnedFd, RawFd};

use nix::libc;
use nix::unistd;

/// Which process-global output descriptor an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl StdStream {
    fn raw(self) -> RawFd {
        match self {
            StdStream::Stdout => libc::STDOUT_FILENO,
            StdStream::Stderr => libc::STDERR_FILENO,
        }
    }
}

impl fmt::Display for StdStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StdStream::Stdout => f.write_str("stdout"),
            StdStream::Stderr => f.write_str("stderr"),
        }
    }
}

/// Create an OS pipe; bytes written to the second descriptor come out of the
/// first, and closing every write end signals end-of-stream to the reader.
pub fn pipe() -> nix::Result<(OwnedFd, OwnedFd)> {
    unistd::pipe()
}

/// Duplicate the current descriptor for `stream` without disturbing it.
pub fn duplicate(stream: StdStream) -> nix::Result<OwnedFd> {
    let raw = unistd::dup(stream.raw())?;
    // SAFETY: dup returned a freshly allocated descriptor that nothing else
    // references; OwnedFd takes sole ownership of it.
    Ok(unsafe { OwnedFd::from_raw_fd(raw) })
}

/// Point the descriptor for `stream` at `target`. The previous binding is
/// atomically replaced (dup2 semantics); `target` itself is left open.
pub fn rebind<F: AsFd>(stream: StdStream, target: &F) -> nix::Result<()> {
    unistd::dup2(target.as_fd().as_raw_fd(), stream.raw())?;
    Ok(())
}

/// Close the descriptor for `stream` itself, not a duplicate of it.
pub fn close(stream: StdStream) -> nix::Result<()> {
    unistd::close(stream.raw())
}
