use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::LevelFilter;

mod fetch;
mod html;
mod shell;
mod thumbs;
mod transcribe;

use fetch::Fetcher;
use transcribe::{MlxWhisper, Transcriber, WhisperCli};

const CACHE_DIR: &str = "/tmp/yttranscribe_cache";

#[derive(Parser, Debug)]
#[command(
    name = "yt-transcribe",
    about = "Transcribe a youtube video into an easily readable HTML file"
)]
struct Args {
    /// The directory to put the output files in
    #[arg(long, default_value = CACHE_DIR)]
    outdir: PathBuf,

    /// The name of the output HTML file [default: <sanitized-url>.html]
    #[arg(long)]
    outfile: Option<String>,

    /// Enable thumbnail generation
    #[arg(long)]
    thumbs: bool,

    /// The interval between thumbnails, in seconds
    #[arg(long, default_value = "30")]
    thumb_interval: u32,

    /// Path to the whisper.cpp model file [default: ~/.local/share/yt-transcribe/ggml-large.bin]
    #[arg(long)]
    model: Option<PathBuf>,

    /// Print more verbose output
    #[arg(short, long)]
    verbose: bool,

    /// The youtube video to transcribe
    url: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format_timestamp(None)
        .init();

    log::debug!("flags: {args:?}");
    run(args)
}

fn run(args: Args) -> Result<()> {
    if shell::find_program("yt-dlp").is_none() {
        bail!(
            "yt-dlp is not available, please install it.\n\
             https://github.com/yt-dlp/yt-dlp?tab=readme-ov-file#installation"
        );
    }

    let cache_dir = PathBuf::from(CACHE_DIR);
    fs::create_dir_all(&cache_dir).context("creating cache directory")?;
    fs::create_dir_all(&args.outdir).context("creating output directory")?;

    let key = fetch::sanitize_url(&args.url);
    let outfile = args
        .outfile
        .clone()
        .unwrap_or_else(|| format!("{key}.html"));

    let fetcher = Fetcher::new(&cache_dir, &args.url);
    let title = fetcher.title()?;
    log::debug!("title: {title}");

    let audio = fetcher.audio()?;
    log::debug!("audio file: {}", audio.display());

    let mut transcriber = select_transcriber(&args, &cache_dir, &key)?;
    transcriber.transcribe(&audio)?;

    let thumbs = if args.thumbs {
        let video = fetcher.video()?;
        log::debug!("video file: {}", video.display());
        thumbs::extract(&video, &args.outdir, &key, args.thumb_interval)?
    } else {
        Vec::new()
    };

    let out_path = args.outdir.join(&outfile);
    log::info!("outputting {}", out_path.display());
    html::write_transcript(&out_path, &title, &args.url, transcriber.as_ref(), &thumbs)?;

    open_in_browser(&out_path);
    Ok(())
}

/// Prefer mlx_whisper when it's on PATH, otherwise whisper.cpp.
fn select_transcriber(
    args: &Args,
    cache_dir: &std::path::Path,
    key: &str,
) -> Result<Box<dyn Transcriber>> {
    if let Some(mlx) = shell::find_program("mlx_whisper") {
        return Ok(Box::new(MlxWhisper::new(mlx, cache_dir, key)));
    }
    if let Some(cli) = shell::find_program("whisper-cli") {
        let model = match &args.model {
            Some(model) => model.clone(),
            None => default_model_path()?,
        };
        if !model.exists() {
            bail!(
                "whisper model not found at {}; pass --model or download one",
                model.display()
            );
        }
        return Ok(Box::new(WhisperCli::new(cli, model)));
    }
    bail!("no transcriber found; install mlx_whisper or whisper.cpp's whisper-cli")
}

fn default_model_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".local/share/yt-transcribe/ggml-large.bin"))
}

/// Open the finished transcript in the default browser. Failure here only
/// costs the convenience, so it is logged rather than returned.
fn open_in_browser(path: &std::path::Path) {
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    };
    #[cfg(all(unix, not(target_os = "macos")))]
    let mut cmd = {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    };
    #[cfg(not(unix))]
    let mut cmd = {
        let mut cmd = Command::new("rundll32.exe");
        cmd.arg("url.dll,FileProtocolHandler").arg(path);
        cmd
    };

    match cmd.status() {
        Ok(status) if status.success() => {}
        Ok(status) => log::warn!("browser opener exited with {status}"),
        Err(e) => log::warn!("could not open {}: {e}", path.display()),
    }
}
