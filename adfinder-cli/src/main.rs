//! AdFinder CLI Tool
//!
//! Finds the videos in a directory that share an advertisement with an
//! example video, by comparing one frame sampled at the same moment of every
//! file.

mod logging;
mod progress;
mod viewer;

use adfinder_core::{AppConfig, ScanHandle, VideoReference};
use adfinder_media::FfmpegSampler;
use adfinder_scanner::{clean_logs, MatchLog, ScanOutcome, ScanPipeline, ScanRequest};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use progress::CliReporter;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "adfinder")]
#[command(about = "Find videos that contain the same advertisement as an example video")]
#[command(version)]
struct Cli {
    /// Configuration file holding the last-used parameters
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Directory where match logs are written
    #[arg(long, global = true, default_value = "log")]
    log_dir: PathBuf,

    /// Print diagnostic messages
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every video under a directory against an example video
    Scan(ScanArgs),

    /// Delete all match logs
    CleanLogs,

    /// Show the saved configuration
    Config,
}

/// Values left out fall back to the ones saved by the previous scan
#[derive(Args, Debug)]
struct ScanArgs {
    /// Example video containing the advertisement
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Moment to sample, in seconds from the start of each video
    #[arg(short, long)]
    offset: Option<u32>,

    /// Directory searched recursively for videos
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Similarity a video must exceed to match, in percent (0-100)
    #[arg(short, long)]
    similarity: Option<u32>,

    /// Comma-separated video extensions to scan
    #[arg(short, long)]
    formats: Option<String>,

    /// Open the match log when the scan finishes
    #[arg(long)]
    open: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match cli.command {
        Commands::Scan(args) => scan(&cli.config, &cli.log_dir, args)?,
        Commands::CleanLogs => {
            let removed = clean_logs(&cli.log_dir).context("Failed to clean logs")?;
            println!("Removed {} log file(s)", removed);
        }
        Commands::Config => {
            let config =
                AppConfig::load_or_init(&cli.config).context("Failed to load configuration")?;
            print_config(&cli.config, &config);
        }
    }

    Ok(())
}

fn scan(config_path: &Path, log_dir: &Path, args: ScanArgs) -> Result<()> {
    let mut config =
        AppConfig::load_or_init(config_path).context("Failed to load configuration")?;
    apply_overrides(&mut config, &args);

    let request = build_request(&config)?;
    request.validate()?;

    // Only parameters that passed validation are remembered
    config
        .save(config_path)
        .context("Failed to save configuration")?;

    println!(
        "Scanning {} for frames like {} at {}s (similarity > {}%)",
        request.root_dir.display(),
        request.reference.path().display(),
        request.reference.offset_seconds(),
        request.threshold.percent()
    );

    let pipeline = ScanPipeline::new(FfmpegSampler::new());
    let handle = ScanHandle::new();
    let interrupt = handle.clone();
    ctrlc::set_handler(move || {
        if !request_stop(&interrupt) {
            std::process::exit(130);
        }
    })
    .context("Failed to install the Ctrl-C handler")?;

    let reporter = CliReporter::new();
    let mut log = MatchLog::new(log_dir);

    let outcome = pipeline
        .run(&request, &handle, &reporter, &mut log)
        .context("Scan failed")?;

    if let Some(log_path) = &outcome.log_path {
        println!("Matches written to {}", log_path.display());
    }
    if let Some(log_path) = log_to_open(args.open, &outcome) {
        if let Err(err) = viewer::open_in_viewer(log_path) {
            warn!("Could not open {}: {}", log_path.display(), err);
        }
    }

    Ok(())
}

/// First Ctrl-C: let the current video finish, then stop. Returns false when
/// no scan is running anymore, so a second Ctrl-C exits right away.
fn request_stop(handle: &ScanHandle) -> bool {
    if handle.cancel() {
        eprintln!("Stopping after the current video (press Ctrl-C again to quit now)");
        true
    } else {
        false
    }
}

/// The log is only opened for a run that finished on its own
fn log_to_open(open: bool, outcome: &ScanOutcome) -> Option<&Path> {
    outcome
        .log_path
        .as_deref()
        .filter(|_| open && !outcome.cancelled)
}

/// Replaces the saved values with the ones given on the command line
fn apply_overrides(config: &mut AppConfig, args: &ScanArgs) {
    if let Some(reference) = &args.reference {
        config.reference = Some(reference.clone());
    }
    if let Some(offset) = args.offset {
        config.offset_seconds = offset;
    }
    if let Some(dir) = &args.dir {
        config.working_dir = Some(dir.clone());
    }
    if let Some(similarity) = args.similarity {
        config.similarity_percent = similarity;
    }
    if let Some(formats) = &args.formats {
        config.formats = formats.to_lowercase();
    }
}

fn build_request(config: &AppConfig) -> Result<ScanRequest> {
    let reference = config
        .reference
        .clone()
        .context("No example video given (use --reference)")?;
    let root_dir = config
        .working_dir
        .clone()
        .context("No working directory given (use --dir)")?;

    Ok(ScanRequest {
        reference: VideoReference::new(reference, config.offset_seconds)?,
        root_dir,
        extensions: config.extensions()?,
        threshold: config.threshold()?,
    })
}

fn print_config(path: &Path, config: &AppConfig) {
    let unset = || "(not set)".to_string();

    println!("\n=== AdFinder Configuration ({}) ===", path.display());
    println!(
        "Example video: {}",
        config
            .reference
            .as_ref()
            .map_or_else(unset, |p| p.display().to_string())
    );
    println!("Sample offset: {}s", config.offset_seconds);
    println!(
        "Working directory: {}",
        config
            .working_dir
            .as_ref()
            .map_or_else(unset, |p| p.display().to_string())
    );
    println!("Similarity: > {}%", config.similarity_percent);
    println!("Formats: {}", config.formats);
}
