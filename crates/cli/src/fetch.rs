// SPDX-License-Identifier: MIT

//! Downloading video metadata and media via yt-dlp, with an on-disk cache.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::shell;

/// Strip every non-alphanumeric character from a URL; the result keys the
/// cache files and names the default output file.
pub fn sanitize_url(url: &str) -> String {
    url.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

pub struct Fetcher {
    cache_dir: PathBuf,
    url: String,
    key: String,
}

impl Fetcher {
    pub fn new(cache_dir: &Path, url: &str) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            url: url.to_string(),
            key: sanitize_url(url),
        }
    }

    /// The video's title, cached in `title_<key>.txt`.
    pub fn title(&self) -> Result<String> {
        let cached = self.cache_dir.join(format!("title_{}.txt", self.key));
        if cached.exists() {
            return fs::read_to_string(&cached).context("reading cached title");
        }

        log::info!("getting title");
        let title = shell::sh("yt-dlp", &["--skip-download", "--print", "title", &self.url])?;
        fs::write(&cached, &title).context("caching title")?;
        Ok(title)
    }

    /// The audio track as 16 kHz mono WAV (the format whisper requires),
    /// cached in `rawaudio_<key>.wav`. Returns the file path.
    pub fn audio(&self) -> Result<PathBuf> {
        let out = self.cache_dir.join(format!("rawaudio_{}.wav", self.key));
        if out.exists() {
            return Ok(out);
        }

        log::info!("downloading audio");
        let out_arg = out.display().to_string();
        shell::sh(
            "yt-dlp",
            &[
                "--extract-audio",
                "--audio-format",
                "wav",
                "-o",
                &out_arg,
                // have yt-dlp run ffmpeg with a 16khz sample rate and a
                // single channel, the input format whisper expects
                "--postprocessor-args",
                "-ar 16000 -ac 1",
                &self.url,
            ],
        )?;
        Ok(out)
    }

    /// The video stream, cached in `rawvideo_<key>.mp4`. Only needed for
    /// thumbnail extraction.
    pub fn video(&self) -> Result<PathBuf> {
        let out = self.cache_dir.join(format!("rawvideo_{}.mp4", self.key));
        if out.exists() {
            return Ok(out);
        }

        log::info!("downloading video");
        let out_arg = out.display().to_string();
        shell::sh(
            "yt-dlp",
            &["-f", "bv", "--remux-video", "mp4", "-o", &out_arg, &self.url],
        )?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
