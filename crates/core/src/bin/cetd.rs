// ABOUTME: CLI binary for the density-based content extractor.
// ABOUTME: Reads a local HTML file and prints one `tag:text` line per extracted segment.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cetd_core::Extractor;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cetd")]
#[command(about = "Extract the main text of an HTML file by tag/text density")]
struct Args {
    /// HTML file to extract from
    path: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let bytes = match fs::read(&args.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error reading file {:?}: {}", args.path, e);
            return ExitCode::from(1);
        }
    };

    // Local files are not always UTF-8; decode lossily rather than refuse them.
    let html = String::from_utf8_lossy(&bytes);
    let extraction = match Extractor::default().extract(&html) {
        Ok(extraction) => extraction,
        Err(e) => {
            eprintln!("error extracting {:?}: {}", args.path, e);
            return ExitCode::from(1);
        }
    };

    if let Some(candidate) = &extraction.candidate {
        tracing::info!(
            candidate = %candidate.fingerprint,
            score = candidate.cumulative_score,
            segments = extraction.segments.len(),
            "extraction finished"
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for segment in &extraction.segments {
        if writeln!(out, "{}:{}", segment.tag, segment.text).is_err() {
            return ExitCode::from(1);
        }
    }
    ExitCode::SUCCESS
}
