//! Command line argument parsing using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILENAME;
use crate::record::UNRANKED_POSITION;

/// correction-features - Turn recorded spelling corrections into ranking features
#[derive(Parser, Debug, Clone)]
#[command(name = "correction-features")]
#[command(about = "Extract supervised-learning feature rows from recorded spelling corrections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CorrectionFeaturesArgs {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (TOML)
    #[arg(
        short,
        long,
        value_name = "CONFIG_FILE",
        default_value = DEFAULT_CONFIG_FILENAME,
        env = "CORRECTION_FEATURES_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CorrectionFeaturesArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract feature rows from a record source into CSV
    Extract(ExtractArgs),

    /// Show the feature rows of a single correction
    Inspect(InspectArgs),

    /// Run a configured checker on a sentence
    Check(CheckArgs),
}

/// Arguments for batch extraction. Each flag overrides the config file.
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// TSV record source
    #[arg(short, long, value_name = "TSV_FILE")]
    pub input: Option<PathBuf>,

    /// SQLite record source
    #[arg(short, long, value_name = "DB_FILE", conflicts_with = "input")]
    pub database: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long, value_name = "CSV_FILE")]
    pub output: Option<PathBuf>,

    /// Only read records in this language
    #[arg(long)]
    pub language: Option<String>,

    /// Maximum number of records to process
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of leading records to skip
    #[arg(long)]
    pub offset: Option<usize>,

    /// Maximum context width in words
    #[arg(long)]
    pub context_length: Option<usize>,

    /// Process records on a thread pool
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads for parallel processing
    #[arg(long, requires = "parallel")]
    pub workers: Option<usize>,

    /// Do not write a header row
    #[arg(long)]
    pub no_header: bool,
}

/// Arguments for inspecting one correction
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Original sentence
    #[arg(value_name = "SENTENCE")]
    pub sentence: String,

    /// Corrected sentence
    #[arg(value_name = "CORRECTION")]
    pub correction: String,

    /// Flagged text in the original sentence
    #[arg(long)]
    pub covered: String,

    /// Replacement chosen by the user
    #[arg(long)]
    pub replacement: String,

    /// Rank of the chosen replacement among the suggestions
    #[arg(long, default_value_t = UNRANKED_POSITION, allow_hyphen_values = true)]
    pub suggestion_pos: i32,

    /// Rule that flagged the text
    #[arg(long, default_value = "")]
    pub rule_id: String,

    /// Language of the sentence
    #[arg(long, default_value = "")]
    pub language: String,

    /// Maximum context width in words
    #[arg(long)]
    pub context_length: Option<usize>,
}

/// Arguments for running a checker
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Sentence to check
    #[arg(value_name = "SENTENCE")]
    pub sentence: String,

    /// Rule whose checker to use (default checker when unbound)
    #[arg(long, default_value = "")]
    pub rule_id: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_args() {
        let args = CorrectionFeaturesArgs::try_parse_from([
            "correction-features",
            "-vv",
            "extract",
            "--input",
            "records.tsv",
            "--output",
            "out.csv",
            "--limit",
            "10",
            "--parallel",
            "--workers",
            "3",
        ])
        .unwrap();

        assert_eq!(args.verbosity(), 3);
        assert_eq!(args.output_format, OutputFormat::Human);
        match args.command {
            Command::Extract(extract) => {
                assert_eq!(extract.input, Some(PathBuf::from("records.tsv")));
                assert_eq!(extract.limit, Some(10));
                assert_eq!(extract.workers, Some(3));
                assert!(extract.parallel);
                assert!(!extract.no_header);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args = CorrectionFeaturesArgs::try_parse_from([
            "correction-features",
            "-vvv",
            "-q",
            "check",
            "Teh cat",
        ])
        .unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_inspect_defaults_to_unranked() {
        let args = CorrectionFeaturesArgs::try_parse_from([
            "correction-features",
            "--format",
            "json",
            "inspect",
            "I havv a cat.",
            "I have a cat.",
            "--covered",
            "havv",
            "--replacement",
            "have",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Inspect(inspect) => {
                assert_eq!(inspect.suggestion_pos, UNRANKED_POSITION);
                assert_eq!(inspect.covered, "havv");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_input_conflicts_with_database() {
        let result = CorrectionFeaturesArgs::try_parse_from([
            "correction-features",
            "extract",
            "--input",
            "a.tsv",
            "--database",
            "b.sqlite",
        ]);
        assert!(result.is_err());
    }
}
