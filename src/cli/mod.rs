//! CLI Module
//!
//! Command-line interface for Wavtrim.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wavtrim - cut audio ranges and export canonical 16-bit PCM WAV
#[derive(Parser, Debug)]
#[command(name = "wavtrim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a time range and write it as 16-bit PCM WAV
    #[command(name = "trim")]
    Trim {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Range start in seconds (clamped to 0)
        #[arg(short, long, allow_negative_numbers = true)]
        start: f64,

        /// Range end in seconds (clamped to the duration)
        #[arg(short, long, allow_negative_numbers = true)]
        end: f64,

        /// Print the export report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-encode a whole file as 16-bit PCM WAV
    #[command(name = "convert")]
    Convert {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Print the export report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show sample rate, channels and duration of a file
    #[command(name = "info")]
    Info {
        /// Input WAV file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trim() {
        let cli = Cli::parse_from([
            "wavtrim", "trim", "in.wav", "out.wav", "--start", "1.5", "--end", "3",
        ]);
        match cli.command {
            Some(Commands::Trim {
                input,
                output,
                start,
                end,
                json,
            }) => {
                assert_eq!(input, PathBuf::from("in.wav"));
                assert_eq!(output, PathBuf::from("out.wav"));
                assert_eq!(start, 1.5);
                assert_eq!(end, 3.0);
                assert!(!json);
            }
            other => panic!("Expected trim command, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_start() {
        let cli = Cli::parse_from(["wavtrim", "-v", "trim", "a.wav", "b.wav", "-s", "-2", "-e", "1"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Trim { start, .. }) if start == -2.0));
    }

    #[test]
    fn test_trim_requires_bounds() {
        assert!(Cli::try_parse_from(["wavtrim", "trim", "a.wav", "b.wav"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
