//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "idef",
    version,
    about = "Import Definition Engine - map, normalize and validate tabular records",
    long_about = "Map spreadsheet rows onto an import definition, normalize and validate\n\
                  every field, and flag probable duplicates before importing."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in trace logs (redacted otherwise).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load and check an import definition.
    Check(CheckArgs),

    /// Suggest a field mapping from the source's column names.
    Suggest(SuggestArgs),

    /// Process source rows and report errors and duplicate candidates.
    Preview(PreviewArgs),

    /// Build an import request from the clean rows of a preview.
    Request(RequestArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Import definition JSON file.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Import definition JSON file.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Source rows (.csv, or .json with `columns` and `rows`).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Import definition JSON file.
    #[arg(value_name = "DEFINITION")]
    pub definition: PathBuf,

    /// Source rows (.csv, or .json with `columns` and `rows`).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Field mapping JSON (`{"field_key": "Column"}`); suggested when omitted.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// JSON array of existing normalized records to match against.
    #[arg(long = "existing", value_name = "PATH")]
    pub existing: Option<PathBuf>,

    /// Candidate score threshold (overrides the definition).
    #[arg(long = "threshold", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// Only process the first N rows.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Exit non-zero when any row has validation errors.
    #[arg(long = "fail-on-errors")]
    pub fail_on_errors: bool,
}

#[derive(Args)]
pub struct RequestArgs {
    #[command(flatten)]
    pub preview: PreviewArgs,

    /// JSON array of `{row_index, candidate_index, pool?, action}` decisions.
    #[arg(long = "resolutions", value_name = "PATH")]
    pub resolutions: Option<PathBuf>,

    /// Write the request here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_preview_flags() {
        let cli = Cli::try_parse_from([
            "idef",
            "preview",
            "def.json",
            "rows.csv",
            "--threshold",
            "85",
            "--limit",
            "20",
            "--format",
            "json",
            "--fail-on-errors",
        ])
        .unwrap();
        let Command::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.threshold, Some(85));
        assert_eq!(args.limit, Some(20));
        assert!(args.format == OutputFormatArg::Json);
        assert!(args.fail_on_errors);
    }

    #[test]
    fn rejects_threshold_above_100() {
        assert!(Cli::try_parse_from(["idef", "preview", "d.json", "s.csv", "--threshold", "101"]).is_err());
    }
}
