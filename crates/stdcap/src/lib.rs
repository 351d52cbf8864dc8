// SPDX-License-Identifier: MIT

//! Process-wide stdout/stderr interception and capture.
//!
//! Rebinds the OS-level stdout and stderr descriptors to in-memory pipes so
//! that everything written to them while a session is active, including
//! writes from native libraries and child processes that never go through
//! Rust's `std::io`, is collected and handed back as bytes when the session
//! ends. See [`StreamCapture`] for the lifecycle and its single-use,
//! single-session rules.

#[cfg(unix)]
mod capture;
#[cfg(unix)]
mod fd;

#[cfg(unix)]
pub use capture::{CaptureError, Captured, StreamCapture};
#[cfg(unix)]
pub use fd::StdStream;

// Platforms without real descriptor duplication primitives get a best-effort
// stand-in: same API, no redirection.
#[cfg(not(unix))]
mod fallback;

#[cfg(not(unix))]
pub use fallback::{CaptureError, Captured, StdStream, StreamCapture};
