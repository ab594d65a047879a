//! `silver-diag` CLI entry point.

use std::{io, process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use silver_diag::Args;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting silver-diag");
    debug!(args:?; "Parsed arguments");

    let stdout = io::stdout();
    if let Err(err) = silver_diag::run(&args, &mut stdout.lock()) {
        error!("{err}");
        process::exit(1);
    }

    info!("Completed successfully");
}
