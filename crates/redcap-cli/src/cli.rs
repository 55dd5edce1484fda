//! CLI argument definitions for the repeat-group expander.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use redcap_model::{DEFAULT_MAX_ITERATIONS, ExpandOptions, UxScheme};

#[derive(Parser)]
#[command(
    name = "redcap-repeat",
    version,
    about = "Expand repeat groups in REDCap data dictionaries",
    long_about = "Expand repeat groups in REDCap data dictionaries.\n\n\
                  Rows between `startrepeat` and `endrepeat` markers in the field name\n\
                  column are unrolled into numbered copies with branching logic that\n\
                  reveals only the iterations a respondent needs."
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

    /// Shorthand for `--log-level debug`.
    #[arg(short = 'd', long = "debug", global = true, conflicts_with = "log_level")]
    pub debug: bool,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Expand a data dictionary and write the result.
    Expand(ExpandArgs),

    /// Validate group markers and print the group tree.
    Check(CheckArgs),
}

#[derive(Parser)]
pub struct ExpandArgs {
    /// Data dictionary to expand.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the expanded dictionary.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Follow every iteration with an "add another?" checkbox.
    #[arg(short = 'p', long = "prompt-to-add", conflicts_with = "auto_add")]
    pub prompt_to_add: bool,

    /// Reveal the next iteration once the first field of the previous one is filled.
    #[arg(short = 'a', long = "auto-add")]
    pub auto_add: bool,

    /// Word used instead of the plural group name in generated prompts.
    #[arg(short = 'g', long = "group-name", value_name = "NAME")]
    pub group_name: Option<String>,

    /// Iterations used when a referenced count field has no upper bound.
    #[arg(short = 'm', long = "max-repeat", default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_repeat: u32,

    /// Leave validation types and bounds off the generated fields.
    #[arg(long = "validation-off")]
    pub validation_off: bool,

    /// JSON object of singular group names to plurals.
    ///
    /// Defaults to `plurals.json` in the working directory when present.
    #[arg(long = "plurals", value_name = "PATH")]
    pub plurals: Option<PathBuf>,
}

impl ExpandArgs {
    pub fn ux_scheme(&self) -> UxScheme {
        if self.prompt_to_add {
            UxScheme::PromptToAddAnother
        } else if self.auto_add {
            UxScheme::AutoReveal
        } else {
            UxScheme::Upfront
        }
    }

    /// Expansion options for these flags and a loaded plural table.
    pub fn options(&self, plurals: BTreeMap<String, String>) -> ExpandOptions {
        ExpandOptions::default()
            .with_ux_scheme(self.ux_scheme())
            .with_validation(!self.validation_off)
            .with_default_max_iterations(self.max_repeat)
            .with_group_display_name(self.group_name.clone())
            .with_irregular_plurals(plurals)
    }
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Data dictionary to check.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
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
