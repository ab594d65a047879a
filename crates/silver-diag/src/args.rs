//! Command-line argument definitions for `silver-diag`.
//!
//! Arguments select the document and error log, the positions to inspect, presentation
//! settings, and logging verbosity.

use clap::Parser;
use silver_diagnostics::DiagnosticsConfig;
use silver_diagnostics::config::{
    DEFAULT_ICON, DEFAULT_POPUP_MAX_WIDTH, DEFAULT_REGION_KEY, DEFAULT_SCOPE,
};
use std::path::PathBuf;

/// A 1-based `LINE:COLUMN` position given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePosition {
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

fn parse_line_position(value: &str) -> Result<LinePosition, String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got '{value}'"))?;
    let line = line
        .parse()
        .map_err(|_| format!("invalid line number '{line}'"))?;
    let column = column
        .parse()
        .map_err(|_| format!("invalid column number '{column}'"))?;
    if line == 0 || column == 0 {
        return Err("lines and columns start at 1".to_string());
    }
    Ok(LinePosition { line, column })
}

/// Command-line arguments for `silver-diag`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Document the diagnostics refer to
    #[arg(help = "Path to the document")]
    pub document: PathBuf,

    /// Error log written by the toolchain; `$packages` expands to `--packages`
    #[arg(short, long)]
    pub error_file: String,

    /// Directory substituted for `$packages` in the error file template
    #[arg(long, default_value = ".")]
    pub packages: PathBuf,

    /// Character offsets to look up (0-based)
    #[arg(short = 'o', long = "offset")]
    pub offsets: Vec<usize>,

    /// Positions to look up, as 1-based LINE:COLUMN
    #[arg(short = 'a', long = "at", value_parser = parse_line_position)]
    pub positions: Vec<LinePosition>,

    /// Report lookups as popups instead of status-line updates
    #[arg(long)]
    pub popup: bool,

    /// Key for drawn regions and the status-line slot
    #[arg(long, default_value = DEFAULT_REGION_KEY)]
    pub region_key: String,

    /// Theme scope for drawn regions
    #[arg(long, default_value = DEFAULT_SCOPE)]
    pub scope: String,

    /// Gutter icon resource
    #[arg(long, default_value = DEFAULT_ICON)]
    pub icon: String,

    /// Maximum popup width in pixels
    #[arg(long, default_value_t = DEFAULT_POPUP_MAX_WIDTH)]
    pub popup_max_width: u32,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Diagnostics configuration described by these arguments.
    pub fn config(&self) -> DiagnosticsConfig {
        DiagnosticsConfig {
            error_file: Some(self.error_file.clone()),
            region_key: self.region_key.clone(),
            scope: self.scope.clone(),
            icon: (!self.icon.is_empty()).then(|| self.icon.clone()),
            popup_max_width: self.popup_max_width,
        }
    }
}
