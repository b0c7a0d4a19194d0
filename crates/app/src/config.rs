//! Configuration for the utfview application.
//!
//! Command-line arguments are parsed with clap into [`Cli`], then resolved
//! into a [`Config`] that the rest of the tool reads. Resolution is where
//! defaults are decided, so `--print-config` shows exactly what a run used.

use crate::tag::EncodingTag;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "utfview", version)]
#[command(about = "Print the characters of a file decoded in a Unicode encoding.", long_about = None)]
pub struct Cli {
    /// Encoding of the input file
    #[arg(short, long, value_enum)]
    pub encoding: EncodingTag,

    /// File to decode
    pub file: PathBuf,

    /// Substitute U+FFFD for ill-formed input instead of failing
    #[arg(long, default_value_t = false)]
    pub permissive: bool,

    /// Print a decode summary to stderr when done
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Print the resolved configuration before decoding
    #[arg(long, default_value_t = false)]
    pub print_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Complete configuration for a dump run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Input ===
    /// Encoding used to decode the input
    pub encoding: EncodingTag,

    /// Input file path
    pub input: PathBuf,

    // === Behavior ===
    /// Substitute instead of failing on ill-formed input
    pub permissive: bool,

    /// Whether to print the metrics summary
    pub stats: bool,

    /// Whether to print the configuration
    pub print_config: bool,

    // === Logging ===
    /// Filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Config {
    /// Resolve the configuration from parsed arguments.
    pub fn from_cli(cli: Cli) -> Self {
        let log_filter = match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        Config {
            encoding: cli.encoding,
            input: cli.file,
            permissive: cli.permissive,
            stats: cli.stats,
            print_config: cli.print_config,
            log_filter: log_filter.to_string(),
        }
    }

    /// Print the configuration in human-readable form.
    ///
    /// Goes to stderr: stdout carries the dump.
    pub fn print(&self) {
        eprintln!("=== Configuration ===");
        eprintln!("Input file: {}", self.input.display());
        eprintln!(
            "Encoding:   {} ({} byte code units)",
            self.encoding,
            self.encoding.unit_bytes()
        );
        eprintln!(
            "Errors:     {}",
            if self.permissive { "substitute U+FFFD" } else { "fail" }
        );
        eprintln!("Log filter: {}", self.log_filter);
        eprintln!();
    }
}
