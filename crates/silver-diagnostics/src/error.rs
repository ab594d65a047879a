//! Error types for log loading and span resolution.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading a diagnostic log and resolving it against a document.
///
/// A missing log file is not represented here: it is the normal state before the first build
/// and loads as zero diagnostics.
pub enum DiagnosticError {
    #[error("I/O error: {0}")]
    /// Reading the log file failed for a reason other than it being absent.
    Io(#[from] std::io::Error),

    #[error("malformed diagnostic on line {line}: {content:?}")]
    /// A log line did not match `<file>,<line>:<col>,<line>:<col>,<message>`.
    MalformedLine {
        /// 1-based line number in the log file.
        line: usize,
        /// The offending (trimmed) line.
        content: String,
    },

    #[error("invalid coordinate '{value}' on line {line}")]
    /// A coordinate field did not fit in a `usize`.
    InvalidNumber {
        /// 1-based line number in the log file.
        line: usize,
        /// The digits that failed to parse.
        value: String,
    },

    #[error("line {line} is outside the document (1..={line_count})")]
    /// A diagnostic referenced a line the document does not have.
    OutOfRange {
        /// The 1-based line requested.
        line: usize,
        /// Number of lines in the document.
        line_count: usize,
    },

    #[error("diagnostic ends on line {end_line} before it starts on line {start_line}")]
    /// A diagnostic's end line precedes its start line.
    InvertedSpan {
        /// 1-based start line.
        start_line: usize,
        /// 1-based end line.
        end_line: usize,
    },

    #[error("unknown placeholder '${0}' in error file template")]
    /// The error-file template referenced a variable other than `packages`.
    UnknownPlaceholder(String),
}

impl DiagnosticError {
    /// Whether the error comes from the log contents (as opposed to I/O or configuration).
    pub fn is_format_mismatch(&self) -> bool {
        matches!(
            self,
            Self::MalformedLine { .. }
                | Self::InvalidNumber { .. }
                | Self::OutOfRange { .. }
                | Self::InvertedSpan { .. }
        )
    }
}
