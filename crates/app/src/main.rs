//! utfview: print the characters of a file decoded in a Unicode encoding.
//!
//! ```text
//! utfview --encoding utf-16-bom notes.txt
//! U+0048 unicode
//! U+0069 unicode
//! ```
//!
//! Exit status is 0 on success, 1 when the file cannot be read or decoded,
//! and 2 on usage errors.

mod config;
mod dump;
mod tag;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Cli, Config};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utfview_core::metrics::Metrics;

fn main() -> ExitCode {
    // clap exits with status 2 on usage errors
    let config = Config::from_cli(Cli::parse());
    init_logging(&config.log_filter);

    match try_main(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("utfview: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the `-v` level.
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn try_main(config: &Config) -> Result<()> {
    if config.print_config {
        config.print();
    }

    let bytes = fs::read(&config.input)
        .with_context(|| format!("failed to read {}", config.input.display()))?;
    info!("read {} bytes from {}", bytes.len(), config.input.display());

    let mut metrics = Metrics::new();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = dump::run(config.encoding, &bytes, config.permissive, &mut out, &mut metrics);
    out.flush().context("failed to write output")?;
    metrics.complete();

    if config.stats {
        metrics.print_summary();
    }
    info!(
        "decoded {} characters in {} ms",
        metrics.characters,
        metrics.duration().as_millis()
    );

    result.with_context(|| format!("decoding {} as {}", config.input.display(), config.encoding))
}
