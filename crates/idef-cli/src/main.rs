//! Import Definition Engine CLI.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use idef_cli::logging::{LogConfig, LogFormat, init_logging};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, OutputFormatArg};
use crate::commands::{run_check, run_preview, run_request, run_suggest};
use crate::summary::{print_definition, print_preview, print_suggestion};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match run(&cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command) -> Result<ExitCode> {
    match command {
        Command::Check(args) => {
            let definition = run_check(args)?;
            print_definition(&definition);
            Ok(ExitCode::SUCCESS)
        }
        Command::Suggest(args) => {
            let suggestion = run_suggest(args)?;
            match args.format {
                OutputFormatArg::Table => print_suggestion(&suggestion),
                OutputFormatArg::Json => print_json(&suggestion.mapping)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Preview(args) => {
            let outcome = run_preview(args)?;
            match args.format {
                OutputFormatArg::Table => print_preview(&outcome),
                OutputFormatArg::Json => print_json(&outcome.preview)?,
            }
            if args.fail_on_errors && outcome.preview.summary.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Request(args) => {
            let (request, summary) = run_request(args)?;
            tracing::debug!(rows = request.rows.len(), "import request ready");
            if args.preview.fail_on_errors && summary.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
