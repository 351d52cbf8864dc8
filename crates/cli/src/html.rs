// SPDX-License-Identifier: MIT

//! HTML transcript rendering.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::thumbs::Thumb;
use crate::transcribe::Transcriber;

const STYLE: &str = r#"html {
    /* fixes font size on iOS */
    text-size-adjust: none;
    -webkit-text-size-adjust: none;
}
body {
  font-family: Georgia, "Book Antiqua", serif;
  margin: auto;
  justify-content: center;
  color: #333;
  max-width: 800px;
  padding-top: 100px;
  padding-left: 20px;
  padding-right: 20px;
}
p {
  font-size: 18px;
  line-height: 30px;
  word-wrap: break-word;
  overflow-wrap: break-word;
  hyphens: auto;
}
img {
  max-width: 100%;
}"#;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Write the transcript page to `out_path`. With thumbnails, each frame is
/// followed by the segments of its time window; without, the segments are
/// rendered as a run of paragraphs.
pub fn write_transcript(
    out_path: &Path,
    title: &str,
    url: &str,
    transcriber: &dyn Transcriber,
    thumbs: &[Thumb],
) -> Result<()> {
    let file = File::create(out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    let mut w = BufWriter::new(file);

    write!(
        w,
        r#"<html><head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<style>
{STYLE}
</style>
<title>{title} - transcription by yt-transcribe</title>
</head><body><p><em>transcription of <a href="{url}">{title}</a></em><p>
"#,
        title = escape(title),
        url = url,
    )?;

    if thumbs.is_empty() {
        for seg in transcriber.segments() {
            writeln!(w, "<p>{}</p>", escape(&seg.text))?;
        }
    } else {
        for (i, thumb) in thumbs.iter().enumerate() {
            let window_end = thumbs.get(i + 1).map_or(i64::MAX, |next| next.offset_us);
            let name = thumb
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            writeln!(w, r#"<p><img src="{name}" loading="lazy"></p>"#)?;
            for text in transcriber.segments_in(thumb.offset_us, window_end) {
                writeln!(w, "<p>{}</p>", escape(&text))?;
            }
        }
    }

    write!(
        w,
        "<p><em>generated by yt-transcribe</em></body>"
    )?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "html_tests.rs"]
mod tests;
