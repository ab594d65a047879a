//! Diagnostic data model.
//!
//! A [`DiagnosticRecord`] is what the toolchain reported: a file, two 1-based coordinates and a
//! message. A [`ResolvedSpan`] is that record mapped onto one particular document text, in
//! character offsets. Spans are derived state: they are recomputed on every load and dropped
//! whenever the document or the build changes.

/// One diagnostic as reported in the error log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    /// File the toolchain attributed the diagnostic to (not necessarily the open document).
    pub source_file: String,
    /// 1-based start line.
    pub start_line: usize,
    /// 1-based start column. Kept for completeness; span resolution ignores it.
    pub start_column: usize,
    /// 1-based end line.
    pub end_line: usize,
    /// 1-based end column.
    pub end_column: usize,
    /// Free-form message. May contain commas.
    pub message: String,
}

impl DiagnosticRecord {
    /// Create a new record.
    pub fn new(
        source_file: impl Into<String>,
        (start_line, start_column): (usize, usize),
        (end_line, end_column): (usize, usize),
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            start_line,
            start_column,
            end_line,
            end_column,
            message: message.into(),
        }
    }
}

/// A closed character-offset range (`start..=end`) in a document.
///
/// The end is inclusive for lookups: a cursor sitting exactly on `end` is covered, and a
/// zero-width span (`start == end`) still covers its single offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedSpan {
    /// Start offset, in Unicode scalar values (`char`) from the start of the document.
    pub start: usize,
    /// End offset, in Unicode scalar values (`char`) from the start of the document.
    pub end: usize,
}

impl ResolvedSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `offset` lies inside the span (inclusive on both ends).
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Whether the whole `start..=end` selection lies inside the span.
    pub fn contains_range(&self, start: usize, end: usize) -> bool {
        self.start <= start && end <= self.end
    }

    /// Number of characters covered, excluding the inclusive end.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether this is a zero-width span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
