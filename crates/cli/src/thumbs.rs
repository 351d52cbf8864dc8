// SPDX-License-Identifier: MIT

//! Thumbnail extraction with ffmpeg.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::shell;

/// A single extracted frame. `offset_us` is where in the video it was
/// taken, microseconds from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumb {
    pub offset_us: i64,
    pub path: PathBuf,
}

/// Media duration in seconds, via ffprobe.
fn duration_secs(video: &Path) -> Result<f64> {
    let video_arg = video.display().to_string();
    let out = shell::sh(
        "ffprobe",
        &[
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            &video_arg,
        ],
    )?;
    out.trim().parse().context("parsing media duration")
}

/// Extract one frame every `interval` seconds into `out_dir`, named
/// `thumb_<key>_<n>.jpg`. Frames already on disk are reused.
pub fn extract(video: &Path, out_dir: &Path, key: &str, interval: u32) -> Result<Vec<Thumb>> {
    if shell::find_program("ffmpeg").is_none() {
        bail!("ffmpeg is required for thumbnail generation, please install it.");
    }
    if interval == 0 {
        bail!("thumbnail interval must be at least 1 second");
    }

    let total = duration_secs(video)?;
    let video_arg = video.display().to_string();
    let mut thumbs = Vec::new();
    let mut n = 0u32;
    let mut offset = 0f64;
    while offset < total {
        let path = out_dir.join(format!("thumb_{key}_{n:04}.jpg"));
        if !path.exists() {
            log::debug!("extracting thumbnail at {offset}s");
            let offset_arg = offset.to_string();
            let path_arg = path.display().to_string();
            shell::sh(
                "ffmpeg",
                &[
                    "-y",
                    "-ss",
                    &offset_arg,
                    "-i",
                    &video_arg,
                    "-frames:v",
                    "1",
                    "-q:v",
                    "4",
                    &path_arg,
                ],
            )?;
        }
        thumbs.push(Thumb {
            offset_us: (offset * 1_000_000.0) as i64,
            path,
        });
        n += 1;
        offset += f64::from(interval);
    }
    Ok(thumbs)
}
