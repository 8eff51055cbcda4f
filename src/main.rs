//! scantray - drive a barcode capture session from the command line.
//!
//! Usage:
//!   scantray replay <SCRIPT>   Replay a scripted detection feed
//!   scantray manual            Collect barcodes typed on stdin
//!   scantray formats           List supported symbologies
//!   scantray --help            Show help

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use compact_str::CompactString;
use strum::IntoEnumIterator;

use scantray_capture::{ScanSession, ScriptedDetector};
use scantray_core::{
    AcquisitionError, CodeEntry, DetectorConfig, Facing, SessionConfig, Symbology,
};

#[derive(Parser)]
#[command(
    name = "scantray",
    version,
    about = "Barcode capture sessions with de-duplicated, ordered accumulation",
    long_about = "scantray collects barcodes from a detection feed and manual entry\n\
                  into one de-duplicated, insertion-ordered set, then commits it.\n\n\
                  Use `replay` to play a scripted feed, or `manual` to type codes."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a scripted detection feed and commit the collected set
    Replay {
        /// Script file: one barcode per line, '#' comments allowed
        script: PathBuf,

        /// Delay between scripted detections, in milliseconds
        #[arg(short, long, default_value = "200")]
        interval_ms: u64,

        /// Cooldown after each accepted detection, in milliseconds
        #[arg(long, default_value = "0")]
        cooldown_ms: u64,

        /// Preferred camera facing to request
        #[arg(long, default_value = "environment")]
        facing: Facing,

        /// Seed the session with pre-existing codes (edit mode)
        #[arg(short, long)]
        seed: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Collect barcodes typed on stdin (manual-only degraded mode)
    Manual {
        /// Seed the session with pre-existing codes (edit mode)
        #[arg(short, long)]
        seed: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the symbologies a detector can be asked to recognize
    Formats,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Committed session rendered for output.
#[derive(serde::Serialize)]
struct CommitOutput {
    codes: Vec<CompactString>,
    entries: Vec<CodeEntry>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            script,
            interval_ms,
            cooldown_ms,
            facing,
            seed,
            format,
        } => run_replay(&script, interval_ms, cooldown_ms, facing, seed, format).await,
        Command::Manual { seed, format } => run_manual(seed, format).await,
        Command::Formats => {
            for symbology in Symbology::iter() {
                println!("{symbology}");
            }
            Ok(())
        }
    }
}

/// Replay a scripted feed through a full session and commit.
async fn run_replay(
    script: &PathBuf,
    interval_ms: u64,
    cooldown_ms: u64,
    facing: Facing,
    seed: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("Cannot read script {}", script.display()))?;

    let interval = Duration::from_millis(interval_ms);
    let feed: Vec<(Duration, CompactString)> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| (interval, CompactString::from(line)))
        .collect();

    if feed.is_empty() {
        return Err(eyre!("Script {} contains no codes", script.display()));
    }

    let detector_config = DetectorConfig::builder()
        .facing(facing)
        .build()
        .map_err(|e| eyre!(e))?;
    let config = SessionConfig::builder()
        .cooldown(Duration::from_millis(cooldown_ms))
        .detector(detector_config)
        .build()
        .map_err(|e| eyre!(e))?;

    let mut session = ScanSession::open_seeded(ScriptedDetector::new(feed), config, seed);
    session.begin_acquisition().await.context("Acquisition failed")?;

    while let Some(code) = session.next_detection().await {
        session.on_candidate_detected(&code)?;
        eprintln!("  scanned {code} ({} collected)", session.len());
    }

    finish(session, format)
}

/// Collect manual entries from stdin; a blank line or EOF commits.
async fn run_manual(seed: Vec<String>, format: OutputFormat) -> Result<()> {
    let detector = ScriptedDetector::failing(AcquisitionError::DeviceUnavailable);
    let mut session = ScanSession::open_seeded(detector, SessionConfig::default(), seed);

    if let Err(err) = session.begin_acquisition().await {
        eprintln!("{err}. Enter barcodes manually; blank line finishes.");
    }

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            break;
        }
        match session.submit_manual(&line) {
            Ok(()) => eprintln!("  added {} ({} collected)", line.trim(), session.len()),
            Err(err) => eprintln!("  rejected: {err}"),
        }
    }

    if session.is_empty() {
        session.cancel();
        eprintln!("Nothing collected; session cancelled.");
        return Ok(());
    }

    finish(session, format)
}

/// Commit the session and print the result.
fn finish(mut session: ScanSession<ScriptedDetector>, format: OutputFormat) -> Result<()> {
    let entries: Vec<CodeEntry> = session.entries().cloned().collect();
    let codes = session.commit()?;

    match format {
        OutputFormat::Text => {
            for code in &codes {
                println!("{code}");
            }
            eprintln!("{} code(s) committed", codes.len());
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&CommitOutput { codes, entries })?
            );
        }
    }

    Ok(())
}
