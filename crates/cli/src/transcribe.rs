// SPDX-License-Identifier: MIT

//! Transcription backends.
//!
//! Both backends shell out to an external whisper implementation, and both
//! run it inside a [`stdcap::StreamCapture`] session: whisper.cpp and its
//! GGML backends print device and model diagnostics straight to the OS-level
//! stderr descriptor, where no language-level redirection can reach them.
//! The captured diagnostics are kept out of the user's terminal and logged
//! at debug level instead.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use stdcap::StreamCapture;

/// One timed piece of transcript text. Offsets are microseconds from the
/// start of the audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start_us: i64,
    pub end_us: i64,
    pub text: String,
}

pub trait Transcriber {
    fn transcribe(&mut self, audio: &Path) -> Result<()>;

    /// All segments, in audio order. Empty before `transcribe` has run.
    fn segments(&self) -> &[Segment];

    /// Text of every segment whose start lies in `[start_us, end_us)`.
    fn segments_in(&self, start_us: i64, end_us: i64) -> Vec<String> {
        self.segments()
            .iter()
            .filter(|seg| seg.start_us >= start_us && seg.start_us < end_us)
            .map(|seg| seg.text.clone())
            .collect()
    }
}

/// Run a transcriber command with stdout/stderr captured at the descriptor
/// level, so nothing it prints reaches the terminal.
fn run_captured(cmd: &mut Command) -> Result<(stdcap::Captured, stdcap::Captured)> {
    let mut session = StreamCapture::begin().context("installing output capture")?;
    // The child inherits the redirected descriptors; restore them before
    // looking at the spawn result so a failure can't leave them rebound.
    let status = cmd.status();
    let (out, err) = session
        .finish()
        .context("restoring output descriptors")?;

    let status = status.context("failed to run transcriber")?;
    if !out.complete || !err.complete {
        log::warn!("capture of transcriber output was truncated");
    }
    log::debug!(
        "transcriber diagnostics:\n{}",
        String::from_utf8_lossy(&err.bytes)
    );
    if !status.success() {
        bail!(
            "transcriber exited with {}:\n{}",
            status,
            String::from_utf8_lossy(&err.bytes)
        );
    }
    Ok((out, err))
}

/// whisper.cpp's `whisper-cli`, which prints the transcript to stdout as
/// `[hh:mm:ss.mmm --> hh:mm:ss.mmm]  text` lines.
pub struct WhisperCli {
    program: PathBuf,
    model: PathBuf,
    segments: Vec<Segment>,
}

impl WhisperCli {
    pub fn new(program: PathBuf, model: PathBuf) -> Self {
        Self {
            program,
            model,
            segments: Vec::new(),
        }
    }
}

impl Transcriber for WhisperCli {
    fn transcribe(&mut self, audio: &Path) -> Result<()> {
        log::info!("transcribing");
        let (out, _) = run_captured(
            Command::new(&self.program)
                .arg("-m")
                .arg(&self.model)
                .arg("-f")
                .arg(audio),
        )?;
        self.segments = parse_timestamped(&String::from_utf8_lossy(&out.bytes))?;
        log::info!("transcription complete");
        Ok(())
    }

    fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Parse whisper.cpp's timestamped transcript lines; anything that doesn't
/// look like a segment (progress output, blank lines) is skipped.
pub fn parse_timestamped(transcript: &str) -> Result<Vec<Segment>> {
    let pattern = Regex::new(
        r"^\[(\d{2}):(\d{2}):(\d{2})[.,](\d{3}) --> (\d{2}):(\d{2}):(\d{2})[.,](\d{3})\]\s*(.*)$",
    )
    .context("compiling segment pattern")?;

    let mut segments = Vec::new();
    for line in transcript.lines() {
        if let Some(caps) = pattern.captures(line) {
            let text = caps[9].trim().to_string();
            if text.is_empty() {
                continue;
            }
            segments.push(Segment {
                start_us: timestamp_us(&caps, 1),
                end_us: timestamp_us(&caps, 5),
                text,
            });
        }
    }
    Ok(segments)
}

/// Microseconds from four capture groups starting at `first` (hours,
/// minutes, seconds, milliseconds). The groups are digit-only by
/// construction, so parse failures can't happen.
fn timestamp_us(caps: &regex::Captures<'_>, first: usize) -> i64 {
    let field = |i: usize| caps[i].parse::<i64>().unwrap_or(0);
    let (h, m, s, ms) = (field(first), field(first + 1), field(first + 2), field(first + 3));
    (((h * 3600 + m * 60 + s) * 1000) + ms) * 1000
}

/// `mlx_whisper`, which writes a JSON transcript next to the cache files.
pub struct MlxWhisper {
    program: PathBuf,
    cache_dir: PathBuf,
    key: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct MlxTranscript {
    segments: Vec<MlxSegment>,
}

#[derive(Debug, Deserialize)]
struct MlxSegment {
    start: f64,
    end: f64,
    text: String,
}

impl MlxWhisper {
    pub fn new(program: PathBuf, cache_dir: &Path, key: &str) -> Self {
        Self {
            program,
            cache_dir: cache_dir.to_path_buf(),
            key: key.to_string(),
            segments: Vec::new(),
        }
    }

    /// mlx_whisper names its output after the input file's stem.
    fn transcript_path(&self) -> PathBuf {
        self.cache_dir.join(format!("rawaudio_{}.json", self.key))
    }
}

impl Transcriber for MlxWhisper {
    fn transcribe(&mut self, audio: &Path) -> Result<()> {
        let transcript = self.transcript_path();
        if !transcript.exists() {
            log::info!("transcribing");
            run_captured(
                Command::new(&self.program)
                    .arg("--model")
                    .arg("mlx-community/distil-whisper-large-v3")
                    .arg("-f")
                    .arg("json")
                    .arg("-o")
                    .arg(&self.cache_dir)
                    .arg("--verbose")
                    .arg("False")
                    .arg(audio),
            )?;
            log::info!("transcription complete");
        }

        let raw = std::fs::read_to_string(&transcript)
            .with_context(|| format!("reading transcript {}", transcript.display()))?;
        self.segments = parse_mlx(&raw)?;
        Ok(())
    }

    fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

pub fn parse_mlx(raw: &str) -> Result<Vec<Segment>> {
    let transcript: MlxTranscript =
        serde_json::from_str(raw).context("parsing mlx_whisper transcript")?;
    Ok(transcript
        .segments
        .into_iter()
        .filter_map(|seg| {
            let text = seg.text.trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(Segment {
                start_us: (seg.start * 1_000_000.0) as i64,
                end_us: (seg.end * 1_000_000.0) as i64,
                text,
            })
        })
        .collect())
}

#[cfg(test)]
#[path = "transcribe_tests.rs"]
mod tests;
