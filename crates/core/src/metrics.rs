//! Metrics collection and reporting for decode runs.
//!
//! This module gives observable insight into a decode:
//! - Volume (code units in, characters out)
//! - Damage (replacement characters, errors by kind)
//! - Timing information
//!
//! # Design
//!
//! Metrics are collected in a plain struct with explicit updates from the
//! driving loop. The struct is not thread-safe; decoding is single-threaded.

use crate::error::CodecError;
use std::time::{Duration, Instant};

/// Counters and timing for one decode run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Volume ===
    /// Code units read from the input
    pub units_in: u64,

    /// Characters produced, replacements included
    pub characters: u64,

    // === Damage ===
    /// Replacement characters substituted by the permissive policy
    pub replacement_characters: u64,

    /// Truncated sequences
    pub underflow_errors: u64,

    /// Ill-formed sequences
    pub invalid_sequence_errors: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            units_in: 0,
            characters: 0,
            replacement_characters: 0,
            underflow_errors: 0,
            invalid_sequence_errors: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    pub fn record_character(&mut self) {
        self.characters += 1;
    }

    /// Record a decode error. When `substituted` the policy replaced it with
    /// a character, which also counts as output.
    pub fn record_error(&mut self, kind: CodecError, substituted: bool) {
        match kind {
            CodecError::DecodeUnderflow => self.underflow_errors += 1,
            CodecError::DecodeInvalidSequence => self.invalid_sequence_errors += 1,
            CodecError::EncodeInvalidCharacter => {}
        }
        if substituted {
            self.replacement_characters += 1;
            self.characters += 1;
        }
    }

    /// Total decode errors of all kinds.
    pub fn errors(&self) -> u64 {
        self.underflow_errors + self.invalid_sequence_errors
    }

    /// Compute the share of output characters that are replacements.
    ///
    /// Returns 0.0 if nothing was decoded.
    pub fn replacement_rate(&self) -> f64 {
        if self.characters == 0 {
            0.0
        } else {
            self.replacement_characters as f64 / self.characters as f64
        }
    }

    /// Print a human-readable summary to stderr, keeping stdout for the dump.
    pub fn print_summary(&self) {
        eprintln!("\n=== Decode Summary ===");
        eprintln!("Duration: {} ms", self.duration().as_millis());
        eprintln!();
        eprintln!("Code units in: {}", self.units_in);
        eprintln!("Characters out: {}", self.characters);
        eprintln!(
            "Replacements: {} ({:.2}%)",
            self.replacement_characters,
            self.replacement_rate() * 100.0
        );
        eprintln!();
        eprintln!("=== Errors ===");
        eprintln!("Truncated sequences: {}", self.underflow_errors);
        eprintln!("Invalid sequences: {}", self.invalid_sequence_errors);
        eprintln!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             units_in={}\n\
             characters={}\n\
             replacement_characters={}\n\
             replacement_rate={:.4}\n\
             underflow_errors={}\n\
             invalid_sequence_errors={}\n",
            self.duration().as_millis(),
            self.units_in,
            self.characters,
            self.replacement_characters,
            self.replacement_rate(),
            self.underflow_errors,
            self.invalid_sequence_errors,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
