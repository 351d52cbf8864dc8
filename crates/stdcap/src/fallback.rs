// SPDX-License-Identifier: MIT

//! Best-effort stand-in for platforms without descriptor duplication
//! primitives: the same API, but nothing is redirected and `finish` always
//! returns empty buffers.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl fmt::Display for StdStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StdStream::Stdout => f.write_str("stdout"),
            StdStream::Stderr => f.write_str("stderr"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub bytes: Vec<u8>,
    pub complete: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("capture session already finished")]
    AlreadyFinished,
}

pub struct StreamCapture {
    finished: bool,
}

impl StreamCapture {
    pub fn begin() -> Result<Self, CaptureError> {
        log::warn!("stream capture is not supported on this platform; output will not be suppressed");
        Ok(Self { finished: false })
    }

    pub fn finish(&mut self) -> Result<(Captured, Captured), CaptureError> {
        if self.finished {
            return Err(CaptureError::AlreadyFinished);
        }
        self.finished = true;
        let empty = Captured {
            bytes: Vec::new(),
            complete: true,
        };
        Ok((empty.clone(), empty))
    }
}
