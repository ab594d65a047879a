//! Error log parser.
//!
//! The toolchain writes one diagnostic per line:
//!
//! ```text
//! <source file>,<start line>:<start col>,<end line>:<end col>,<message>
//! ```
//!
//! Parsing is fail-fast: the first line that does not fit the format aborts the whole load. A
//! malformed log means the toolchain and this crate disagree on the format, and showing a
//! partial set of underlines would be more confusing than showing none.

use crate::diagnostics::DiagnosticRecord;
use crate::error::DiagnosticError;
use log::debug;
use regex::{Captures, Regex};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

/// Log target shared by everything in this crate.
pub(crate) const LOG_TARGET: &str = "silicon";

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?),([0-9]+):([0-9]+),([0-9]+):([0-9]+),(.*)$")
        .expect("valid diagnostic line regex")
});

/// Parser for toolchain error logs.
///
/// The parser is stateless; it exists as a type so hosts can hand it to a worker thread or
/// swap it out in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogParser;

impl LogParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse the log at `path`.
    ///
    /// A missing file yields an empty list: that is the state before any build has run.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<DiagnosticRecord>, DiagnosticError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(target: LOG_TARGET, path:? = path; "error log not found, no diagnostics");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let records = self.parse_str(&content)?;
        debug!(target: LOG_TARGET, path:? = path, count = records.len(); "parsed error log");
        Ok(records)
    }

    /// Parse in-memory log content. Blank lines are skipped.
    pub fn parse_str(&self, content: &str) -> Result<Vec<DiagnosticRecord>, DiagnosticError> {
        content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(line_no, line)| self.parse_line(line_no, line))
            .collect()
    }

    /// Parse a single, already trimmed, non-blank line. `line_no` is only used for errors.
    pub fn parse_line(
        &self,
        line_no: usize,
        line: &str,
    ) -> Result<DiagnosticRecord, DiagnosticError> {
        let caps = LINE_PATTERN
            .captures(line)
            .ok_or_else(|| DiagnosticError::MalformedLine {
                line: line_no,
                content: line.to_string(),
            })?;

        Ok(DiagnosticRecord {
            source_file: caps[1].to_string(),
            start_line: coordinate(&caps, 2, line_no)?,
            start_column: coordinate(&caps, 3, line_no)?,
            end_line: coordinate(&caps, 4, line_no)?,
            end_column: coordinate(&caps, 5, line_no)?,
            message: caps[6].to_string(),
        })
    }
}

fn coordinate(
    caps: &Captures<'_>,
    group: usize,
    line_no: usize,
) -> Result<usize, DiagnosticError> {
    let digits = &caps[group];
    digits.parse().map_err(|_| DiagnosticError::InvalidNumber {
        line: line_no,
        value: digits.to_string(),
    })
}
