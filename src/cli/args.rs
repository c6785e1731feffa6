//! Defines the command-line arguments for `phpt2php`.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::convert::ConvertOptions;
use crate::naming::DEFAULT_PREFIX;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "phpt2php",
    version,
    about = "Split .phpt test definitions into standalone .php test files and expectation files."
)]
pub struct ConvertArgs {
    // Not `required`: an empty list gets the converter's usage error and exit 1.
    /// The .phpt files to convert, processed in the order given.
    pub files: Vec<PathBuf>,

    /// Expand directory arguments to every .phpt file beneath them.
    #[arg(short, long)]
    pub recursive: bool,

    /// File-name prefix stripped from each output name.
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_PREFIX)]
    pub strip_prefix: String,

    /// Raise log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// When to style diagnostics on stderr.
    #[arg(long, value_enum, value_name = "WHEN", default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

impl ConvertArgs {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            prefix: self.strip_prefix.clone(),
            recursive: self.recursive,
        }
    }

    /// The `tracing` filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Color choice for stderr output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for termcolor::ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => termcolor::ColorChoice::Auto,
            ColorMode::Always => termcolor::ColorChoice::Always,
            ColorMode::Never => termcolor::ColorChoice::Never,
        }
    }
}
