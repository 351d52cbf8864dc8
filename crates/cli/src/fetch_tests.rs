#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use tempfile::TempDir;

#[test]
fn sanitize_url_strips_punctuation() {
    assert_eq!(
        sanitize_url("https://www.youtube.com/watch?v=vP4iY1TtS3s"),
        "httpswwwyoutubecomwatchvvP4iY1TtS3s"
    );
}

#[test]
fn sanitize_url_keeps_alphanumerics_only() {
    assert_eq!(sanitize_url("a-b_c 1!2@3"), "abc123");
    assert_eq!(sanitize_url(""), "");
}

#[test]
fn cached_title_is_returned_without_running_yt_dlp() {
    let dir = TempDir::new().unwrap();
    let url = "https://youtube.com/watch?v=abc";
    let key = sanitize_url(url);
    std::fs::write(dir.path().join(format!("title_{key}.txt")), "Look Around You").unwrap();

    let fetcher = Fetcher::new(dir.path(), url);
    assert_eq!(fetcher.title().unwrap(), "Look Around You");
}

#[test]
fn cached_audio_is_returned_without_running_yt_dlp() {
    let dir = TempDir::new().unwrap();
    let url = "https://youtube.com/watch?v=abc";
    let key = sanitize_url(url);
    let wav = dir.path().join(format!("rawaudio_{key}.wav"));
    std::fs::write(&wav, b"RIFF").unwrap();

    let fetcher = Fetcher::new(dir.path(), url);
    assert_eq!(fetcher.audio().unwrap(), wav);
}

#[test]
fn cached_video_is_returned_without_running_yt_dlp() {
    let dir = TempDir::new().unwrap();
    let url = "https://youtube.com/watch?v=abc";
    let key = sanitize_url(url);
    let mp4 = dir.path().join(format!("rawvideo_{key}.mp4"));
    std::fs::write(&mp4, b"\x00").unwrap();

    let fetcher = Fetcher::new(dir.path(), url);
    assert_eq!(fetcher.video().unwrap(), mp4);
}
