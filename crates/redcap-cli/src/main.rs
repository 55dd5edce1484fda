//! `redcap-repeat`: expand repeat groups in REDCap data dictionaries.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use redcap_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use redcap_cli::commands::{run_check, run_expand};
use redcap_cli::logging::{LogConfig, LogFormat, init_logging};
use redcap_cli::summary::{print_expand_summary, print_group_tree};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Expand(args) => run_expand(args).map(|result| print_expand_summary(&result)),
        Command::Check(args) => run_check(args).map(|result| print_group_tree(&result)),
    };
    if let Err(error) = outcome {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = if cli.debug {
        Some(LogLevelArg::Debug)
    } else {
        cli.log_level
    };
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !(cli.verbosity.is_present() || explicit.is_some()),
        ..LogConfig::default()
    };
    if let Some(level) = explicit {
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
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
