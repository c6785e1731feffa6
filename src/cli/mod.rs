//! The phpt2php Command-Line Interface.
//!
//! This module is the main entry point for the binary and orchestrates the
//! core library functions.

use crate::cli::args::ConvertArgs;
use crate::cli::output::{print_error, StdoutSink};
use crate::convert;
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ConvertArgs::parse();
    init_logging(args.log_level());

    let result = convert::run(&args.files, &args.options(), &mut StdoutSink);

    if let Err(e) = result {
        print_error(&e, args.color.into());
        process::exit(1);
    }
}

/// Installs a stderr `tracing` subscriber at `level`. The filter comes from the
/// command line only.
fn init_logging(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
