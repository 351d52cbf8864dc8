#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;

#[test]
fn parse_timestamped_extracts_segments() {
    let transcript = "\
[00:00:00.000 --> 00:00:04.500]  Welcome to the show.
[00:00:04.500 --> 00:01:02.120]  Today we talk about water.
";
    let segments = parse_timestamped(transcript).unwrap();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].start_us, 0);
    assert_eq!(segments[0].end_us, 4_500_000);
    assert_eq!(segments[0].text, "Welcome to the show.");
    assert_eq!(segments[1].start_us, 4_500_000);
    assert_eq!(segments[1].end_us, 62_120_000);
    assert_eq!(segments[1].text, "Today we talk about water.");
}

#[test]
fn parse_timestamped_converts_hours_and_minutes() {
    let transcript = "[01:02:03.004 --> 01:02:03.500]  deep into the video\n";
    let segments = parse_timestamped(transcript).unwrap();

    let expected = ((3600 + 2 * 60 + 3) * 1000 + 4) * 1000;
    assert_eq!(segments[0].start_us, expected);
}

#[test]
fn parse_timestamped_skips_diagnostic_lines() {
    let transcript = "\
whisper_init_from_file_with_params_no_state: loading model
system_info: n_threads = 8

[00:00:00.000 --> 00:00:01.000]  hello
main: processing done
";
    let segments = parse_timestamped(transcript).unwrap();

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "hello");
}

#[test]
fn parse_timestamped_accepts_comma_millis() {
    let transcript = "[00:00:00,000 --> 00:00:01,250]  hello\n";
    let segments = parse_timestamped(transcript).unwrap();

    assert_eq!(segments[0].end_us, 1_250_000);
}

#[test]
fn parse_timestamped_of_empty_input_is_empty() {
    assert!(parse_timestamped("").unwrap().is_empty());
}

#[test]
fn parse_mlx_converts_seconds_to_microseconds() {
    let raw = r#"{
        "text": " hello there",
        "segments": [
            {"start": 0.0, "end": 2.5, "text": " hello"},
            {"start": 2.5, "end": 4.0, "text": " there"},
            {"start": 4.0, "end": 4.1, "text": "   "}
        ]
    }"#;
    let segments = parse_mlx(raw).unwrap();

    assert_eq!(segments.len(), 2, "blank segments are dropped");
    assert_eq!(segments[0].start_us, 0);
    assert_eq!(segments[0].end_us, 2_500_000);
    assert_eq!(segments[0].text, "hello");
    assert_eq!(segments[1].start_us, 2_500_000);
}

#[test]
fn parse_mlx_rejects_garbage() {
    assert!(parse_mlx("not json").is_err());
}

struct Fixed(Vec<Segment>);

impl Transcriber for Fixed {
    fn transcribe(&mut self, _audio: &std::path::Path) -> Result<()> {
        Ok(())
    }

    fn segments(&self) -> &[Segment] {
        &self.0
    }
}

fn seg(start_us: i64, text: &str) -> Segment {
    Segment {
        start_us,
        end_us: start_us + 1_000_000,
        text: text.to_string(),
    }
}

#[test]
fn segments_in_selects_by_start_offset() {
    let t = Fixed(vec![
        seg(0, "a"),
        seg(10_000_000, "b"),
        seg(29_999_999, "c"),
        seg(30_000_000, "d"),
    ]);

    // Half-open window: a segment starting exactly at the end is excluded.
    assert_eq!(t.segments_in(0, 30_000_000), vec!["a", "b", "c"]);
    assert_eq!(t.segments_in(30_000_000, i64::MAX), vec!["d"]);
    assert!(t.segments_in(40_000_000, 50_000_000).is_empty());
}
