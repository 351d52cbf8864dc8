// SPDX-License-Identifier: MIT

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Binary-level argument handling tests. Nothing here touches the network:
//! the downloader is cut off by emptying PATH.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_flags() {
    Command::cargo_bin("yt-transcribe")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Transcribe a youtube video")
                .and(predicate::str::contains("--outdir"))
                .and(predicate::str::contains("--thumbs"))
                .and(predicate::str::contains("--thumb-interval")),
        );
}

#[test]
fn a_url_is_required() {
    Command::cargo_bin("yt-transcribe")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn missing_yt_dlp_is_a_clear_error() {
    Command::cargo_bin("yt-transcribe")
        .unwrap()
        .env("PATH", "")
        .arg("https://www.youtube.com/watch?v=vP4iY1TtS3s")
        .assert()
        .failure()
        .stderr(predicate::str::contains("yt-dlp is not available"));
}

#[test]
fn unknown_flags_are_rejected() {
    Command::cargo_bin("yt-transcribe")
        .unwrap()
        .arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
