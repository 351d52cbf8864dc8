// SPDX-License-Identifier: MIT

//! Pipe-backed capture of the process-level stdout and stderr.

use std::fs::File;
use std::io::Read;
use std::os::fd::OwnedFd;
use std::sync::mpsc;
use std::thread;

use crate::fd::{self, StdStream};

/// One captured stream, delivered by [`StreamCapture::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    /// Everything written to the descriptor while the session was active,
    /// in write order. Empty if nothing was written.
    pub bytes: Vec<u8>,
    /// False if the drain hit a read error before end-of-stream; `bytes`
    /// then holds whatever had accumulated up to the error.
    pub complete: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to create capture pipe for {0}: {1}")]
    Pipe(StdStream, nix::errno::Errno),
    #[error("failed to duplicate original {0} descriptor: {1}")]
    Duplicate(StdStream, nix::errno::Errno),
    #[error("failed to rebind {0} to the capture pipe: {1}")]
    Rebind(StdStream, nix::errno::Errno),
    #[error("capture session already finished")]
    AlreadyFinished,
}

/// One in-flight redirection of the process's stdout and stderr.
///
/// Between [`StreamCapture::begin`] and [`StreamCapture::finish`] the
/// OS-level descriptors 1 and 2 point at pipes, and one background thread
/// per stream drains its pipe into memory. `finish` restores the original
/// descriptors and returns the drained bytes.
///
/// A session is usable exactly once, and only one session may exist per
/// process at a time; nested or concurrent sessions are not supported.
/// Dropping a session without calling `finish` leaves the process's output
/// permanently redirected into an unread pipe, and writers will block once
/// the pipe buffer fills. `finish` waits without a timeout, so any other process
/// that inherited the redirected descriptors must have exited (or closed
/// them) before it is called.
pub struct StreamCapture {
    saved_stdout: Option<OwnedFd>,
    saved_stderr: Option<OwnedFd>,
    drains: Option<(mpsc::Receiver<Captured>, mpsc::Receiver<Captured>)>,
}

impl StreamCapture {
    /// Install the redirection and start the drain threads.
    ///
    /// On error nothing stays redirected: descriptors acquired before the
    /// failing step are released, and a stdout rebind that already happened
    /// is undone before the error is returned.
    pub fn begin() -> Result<Self, CaptureError> {
        let (stdout_read, stdout_write) =
            fd::pipe().map_err(|e| CaptureError::Pipe(StdStream::Stdout, e))?;
        let (stderr_read, stderr_write) =
            fd::pipe().map_err(|e| CaptureError::Pipe(StdStream::Stderr, e))?;

        let saved_stdout = fd::duplicate(StdStream::Stdout)
            .map_err(|e| CaptureError::Duplicate(StdStream::Stdout, e))?;
        let saved_stderr = fd::duplicate(StdStream::Stderr)
            .map_err(|e| CaptureError::Duplicate(StdStream::Stderr, e))?;

        // From here on, every write to fd 1 lands in the stdout pipe.
        fd::rebind(StdStream::Stdout, &stdout_write)
            .map_err(|e| CaptureError::Rebind(StdStream::Stdout, e))?;
        if let Err(e) = fd::rebind(StdStream::Stderr, &stderr_write) {
            // Undo the stdout rebind so a failed begin leaves no redirection.
            let _ = fd::rebind(StdStream::Stdout, &saved_stdout);
            return Err(CaptureError::Rebind(StdStream::Stderr, e));
        }

        // Drop our copies of the write ends. Descriptors 1 and 2 now hold
        // the only write references, so closing them in finish() is what
        // signals end-of-stream to the drains.
        drop(stdout_write);
        drop(stderr_write);

        let stdout_rx = spawn_drain(StdStream::Stdout, stdout_read);
        let stderr_rx = spawn_drain(StdStream::Stderr, stderr_read);

        Ok(Self {
            saved_stdout: Some(saved_stdout),
            saved_stderr: Some(saved_stderr),
            drains: Some((stdout_rx, stderr_rx)),
        })
    }

    /// Tear down the redirection and return the captured stdout and stderr.
    ///
    /// Blocks until both drain threads have delivered. Drain read errors do
    /// not abort restoration; they are logged and reported through
    /// [`Captured::complete`]. Calling `finish` a second time fails with
    /// [`CaptureError::AlreadyFinished`] and has no side effects.
    pub fn finish(&mut self) -> Result<(Captured, Captured), CaptureError> {
        // Consume the session first so a repeated call is rejected before
        // any descriptor is touched.
        let (stdout_rx, stderr_rx) = self
            .drains
            .take()
            .ok_or(CaptureError::AlreadyFinished)?;

        // Descriptors 1 and 2 are the pipes' last write ends; closing them
        // lets the drain threads reach end-of-stream.
        if let Err(e) = fd::close(StdStream::Stdout) {
            log::warn!("closing redirected stdout failed: {e}");
        }
        if let Err(e) = fd::close(StdStream::Stderr) {
            log::warn!("closing redirected stderr failed: {e}");
        }

        let stdout = recv_drain(StdStream::Stdout, stdout_rx);
        let stderr = recv_drain(StdStream::Stderr, stderr_rx);

        // Restore the originals and release the saved duplicates. Getting
        // the real descriptors back takes priority over everything else, so
        // failures here are logged rather than returned.
        if let Some(saved) = self.saved_stdout.take() {
            if let Err(e) = fd::rebind(StdStream::Stdout, &saved) {
                log::warn!("restoring original stdout failed: {e}");
            }
        }
        if let Some(saved) = self.saved_stderr.take() {
            if let Err(e) = fd::rebind(StdStream::Stderr, &saved) {
                log::warn!("restoring original stderr failed: {e}");
            }
        }

        Ok((stdout, stderr))
    }
}

/// Start a thread that reads `read_end` to end-of-stream and delivers the
/// accumulated bytes once.
fn spawn_drain(stream: StdStream, read_end: OwnedFd) -> mpsc::Receiver<Captured> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut pipe = File::from(read_end);
        let mut bytes = Vec::new();
        let complete = match pipe.read_to_end(&mut bytes) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("error draining captured {stream}: {e}");
                false
            }
        };
        // Close the read end before delivering so the descriptor is gone by
        // the time finish() observes the result.
        drop(pipe);
        let _ = tx.send(Captured { bytes, complete });
    });
    rx
}

fn recv_drain(stream: StdStream, rx: mpsc::Receiver<Captured>) -> Captured {
    match rx.recv() {
        Ok(captured) => captured,
        Err(mpsc::RecvError) => {
            log::warn!("{stream} drain exited without delivering a buffer");
            Captured {
                bytes: Vec::new(),
                complete: false,
            }
        }
    }
}
