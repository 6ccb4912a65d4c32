//! sheetscan - extract sheet-music pages from a tutorial video into a PDF.
//!
//! CLI entry point. Wires the ffmpeg frame source, the tesseract recognizer,
//! and the tracing event sink into the extraction pipeline.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sheetscan::core::{PipelineConfig, RunContext};
use sheetscan::estimator::TesseractRecognizer;
use sheetscan::pipeline::{Pipeline, TracingSink};
use sheetscan::video::{download_video, FfmpegSource};

#[derive(Parser, Debug)]
#[command(
    name = "sheetscan",
    about = "Extracts static sheet-music pages from a tutorial video and assembles them into a PDF"
)]
struct Cli {
    /// Video URL (downloaded with yt-dlp) or path to a local video file.
    input: String,

    /// Where to write the output PDF. Defaults to sheet_music.pdf in the
    /// current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory to keep run-scoped working files under.
    #[arg(long, default_value = "work")]
    workdir: PathBuf,

    /// Seconds of intro to skip before the first page is assumed visible.
    #[arg(long, default_value_t = 5.0)]
    intro: f64,

    /// Number of probe frames sampled for page-count detection.
    #[arg(long, default_value_t = 5)]
    probe_pages: u32,

    /// Keep the run's working directory instead of removing it on success.
    #[arg(long)]
    keep_workdir: bool,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PipelineConfig {
        intro_length_secs: cli.intro,
        probe_page_count: cli.probe_pages,
        ..Default::default()
    };

    let ctx = RunContext::new(&cli.workdir).context("creating run working directory")?;

    let video_path = if is_url(&cli.input) {
        download_video(&cli.input, &ctx.video_path(), &config.ytdlp_bin)
            .context("downloading video")?
    } else {
        PathBuf::from(&cli.input)
    };

    let source = FfmpegSource::open(&video_path, &config).context("opening video")?;
    let recognizer = TesseractRecognizer::from_config(&config);
    let pipeline = Pipeline::new(source, recognizer, config, ctx, TracingSink)?;

    let report = pipeline.run()?;

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from("sheet_music.pdf"));
    std::fs::copy(&report.document, &output)
        .with_context(|| format!("copying document to {}", output.display()))?;

    if !cli.keep_workdir {
        pipeline.context().cleanup().context("cleaning up workdir")?;
    }

    print!("{}", report.stats);
    println!("Wrote {}", output.display());
    Ok(())
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "sheetscan=info",
        1 => "sheetscan=debug",
        _ => "sheetscan=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
