//! Line index and coordinate mapping.
//!
//! [`LineIndex`] wraps a [`Rope`] for O(log N) line access. [`CoordinateMapper`] turns the
//! toolchain's 1-based `(line, column)` coordinates into character offsets on top of it.

use crate::diagnostics::{DiagnosticRecord, ResolvedSpan};
use crate::error::DiagnosticError;
use ropey::{Rope, RopeSlice};

/// Logical line index over a document's text.
///
/// Only `\n` ends a line (`\r\n` counts as one break). Form feeds, lone `\r` and the Unicode
/// line separators stay inside their line, the way the toolchain numbers lines. All offsets are
/// in Unicode scalar values (`char`).
#[derive(Debug, Clone)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an index for an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build the index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count. An empty document has one (empty) line, and a trailing newline
    /// starts a final empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Character offset of the start of a 0-based line, or `None` past the last line.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| self.rope.line_to_char(line))
    }

    /// Length of a 0-based line in characters, excluding its line break.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| content_len(self.rope.line(line)))
    }

    /// Text of a 0-based line, excluding its line break.
    pub fn line_text(&self, line: usize) -> Option<String> {
        let len = self.line_len(line)?;
        Some(self.rope.line(line).slice(..len).to_string())
    }

    /// 0-based `(line, column)` of a character offset. Offsets past the end clamp to the end.
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_offset);
        (line, char_offset - self.rope.line_to_char(line))
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn content_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    match len.checked_sub(1).map(|last| line.char(last)) {
        Some('\n') if len >= 2 && line.char(len - 2) == '\r' => len - 2,
        Some('\n') => len - 1,
        _ => len,
    }
}

/// Maps toolchain coordinates onto a document.
///
/// Start columns reported by the toolchain are often imprecise, so a span always starts at the
/// beginning of its start line and runs to the reported end column. The resulting underline
/// covers whole leading lines and stays stable when the column is off by a few characters.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    index: LineIndex,
}

impl CoordinateMapper {
    /// Create a mapper for the given document text.
    pub fn new(text: &str) -> Self {
        Self {
            index: LineIndex::from_text(text),
        }
    }

    /// Create a mapper from an existing line index.
    pub fn from_index(index: LineIndex) -> Self {
        Self { index }
    }

    /// The underlying line index.
    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Offset of the beginning of a 1-based line.
    pub fn start_offset(&self, line: usize) -> Result<usize, DiagnosticError> {
        let line = self.zero_based(line)?;
        self.index
            .line_start(line)
            .ok_or_else(|| self.out_of_range(line + 1))
    }

    /// Offset of a 1-based `(line, column)`, clamped to the line's length.
    ///
    /// Column `0` is treated as column `1`.
    pub fn end_offset(&self, line: usize, column: usize) -> Result<usize, DiagnosticError> {
        let start = self.start_offset(line)?;
        let len = self.index.line_len(line - 1).unwrap_or(0);
        Ok(start + column.saturating_sub(1).min(len))
    }

    /// Resolve a record into a span on this document.
    pub fn resolve(&self, record: &DiagnosticRecord) -> Result<ResolvedSpan, DiagnosticError> {
        if record.end_line < record.start_line {
            return Err(DiagnosticError::InvertedSpan {
                start_line: record.start_line,
                end_line: record.end_line,
            });
        }
        let start = self.start_offset(record.start_line)?;
        let end = self.end_offset(record.end_line, record.end_column)?;
        Ok(ResolvedSpan::new(start, end))
    }

    /// 1-based `(line, column)` of a character offset.
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let (line, column) = self.index.char_offset_to_position(offset);
        (line + 1, column + 1)
    }

    fn zero_based(&self, line: usize) -> Result<usize, DiagnosticError> {
        match line {
            0 => Err(self.out_of_range(0)),
            n if n > self.index.line_count() => Err(self.out_of_range(n)),
            n => Ok(n - 1),
        }
    }

    fn out_of_range(&self, line: usize) -> DiagnosticError {
        DiagnosticError::OutOfRange {
            line,
            line_count: self.index.line_count(),
        }
    }
}
