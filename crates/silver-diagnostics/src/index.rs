//! Per-document diagnostic index.
//!
//! Holds the spans of the last successful load together with their messages, in log file
//! order. Lookups are a linear scan: a build produces tens of diagnostics, not millions, and
//! file order has to win when spans overlap anyway.

use crate::diagnostics::{DiagnosticRecord, ResolvedSpan};
use crate::error::DiagnosticError;
use crate::line_index::CoordinateMapper;

/// Ordered `(span, message)` pairs for one document.
///
/// `spans` and `messages` always have the same length; they are only ever replaced or cleared
/// together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticIndex {
    spans: Vec<ResolvedSpan>,
    messages: Vec<String>,
}

impl DiagnosticIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole index with `records` resolved against `text`.
    ///
    /// If any record fails to resolve, the index is left exactly as it was.
    pub fn replace_all(
        &mut self,
        records: &[DiagnosticRecord],
        text: &str,
    ) -> Result<(), DiagnosticError> {
        self.replace_all_with(records, &CoordinateMapper::new(text))
    }

    /// Same as [`replace_all`](Self::replace_all), with a prebuilt mapper.
    pub fn replace_all_with(
        &mut self,
        records: &[DiagnosticRecord],
        mapper: &CoordinateMapper,
    ) -> Result<(), DiagnosticError> {
        let spans = records
            .iter()
            .map(|record| mapper.resolve(record))
            .collect::<Result<Vec<_>, _>>()?;
        let messages = records.iter().map(|r| r.message.clone()).collect();

        self.spans = spans;
        self.messages = messages;
        Ok(())
    }

    /// Remove every span and message.
    pub fn clear(&mut self) {
        self.spans.clear();
        self.messages.clear();
    }

    /// Message of the first span (in log order) covering `offset`, end inclusive.
    pub fn lookup(&self, offset: usize) -> Option<&str> {
        self.lookup_selection(offset, offset)
    }

    /// Message of the first span (in log order) containing the whole `start..=end` selection.
    ///
    /// A reversed selection (`end < start`) is normalized first.
    pub fn lookup_selection(&self, start: usize, end: usize) -> Option<&str> {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        self.spans
            .iter()
            .position(|span| span.contains_range(start, end))
            .map(|idx| self.messages[idx].as_str())
    }

    /// Spans in log order, for drawing.
    pub fn spans(&self) -> &[ResolvedSpan] {
        &self.spans
    }

    /// Messages in log order, aligned with [`spans`](Self::spans).
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Iterate over `(span, message)` pairs in log order.
    pub fn iter(&self) -> impl Iterator<Item = (ResolvedSpan, &str)> + '_ {
        self.spans
            .iter()
            .copied()
            .zip(self.messages.iter().map(String::as_str))
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether the index holds no diagnostics.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "line one\nline two\nline three\n";

    fn record(start: (usize, usize), end: (usize, usize), message: &str) -> DiagnosticRecord {
        DiagnosticRecord::new("a.vpr", start, end, message)
    }

    #[test]
    fn test_empty_index_lookup() {
        let index = DiagnosticIndex::new();
        assert!(index.is_empty());
        for offset in [0, 1, 17, usize::MAX] {
            assert_eq!(index.lookup(offset), None);
        }
    }

    #[test]
    fn test_first_span_wins_on_overlap() {
        let mut index = DiagnosticIndex::new();
        index
            .replace_all(
                &[record((1, 1), (2, 5), "outer"), record((2, 1), (2, 3), "inner")],
                DOC,
            )
            .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup(10), Some("outer"));
        assert_eq!(index.lookup(13), Some("outer"));
        assert_eq!(index.lookup(14), None);
    }

    #[test]
    fn test_end_is_inclusive() {
        let mut index = DiagnosticIndex::new();
        index.replace_all(&[record((1, 1), (1, 5), "m")], DOC).unwrap();
        assert_eq!(index.spans(), &[ResolvedSpan::new(0, 4)]);
        assert_eq!(index.lookup(4), Some("m"));
        assert_eq!(index.lookup(5), None);
    }

    #[test]
    fn test_zero_width_span_matches() {
        let mut index = DiagnosticIndex::new();
        index
            .replace_all(&[record((1, 1), (1, 1), "empty span msg")], DOC)
            .unwrap();
        let span = index.spans()[0];
        assert_eq!(span.start, span.end);
        assert_eq!(index.lookup(span.start), Some("empty span msg"));
    }

    #[test]
    fn test_failed_replace_keeps_previous_contents() {
        let mut index = DiagnosticIndex::new();
        index.replace_all(&[record((1, 1), (1, 4), "kept")], DOC).unwrap();
        let before = index.clone();

        let err = index
            .replace_all(
                &[record((1, 1), (1, 2), "fine"), record((40, 1), (40, 2), "bad")],
                DOC,
            )
            .unwrap_err();

        assert!(matches!(err, DiagnosticError::OutOfRange { line: 40, .. }));
        assert_eq!(index, before);
    }

    #[test]
    fn test_lookup_selection_requires_containment() {
        let mut index = DiagnosticIndex::new();
        index.replace_all(&[record((2, 1), (2, 8), "two")], DOC).unwrap();
        assert_eq!(index.lookup_selection(9, 12), Some("two"));
        assert_eq!(index.lookup_selection(12, 9), Some("two"));
        assert_eq!(index.lookup_selection(5, 12), None);
    }

    #[test]
    fn test_clear_and_iter() {
        let mut index = DiagnosticIndex::new();
        index
            .replace_all(&[record((1, 1), (1, 2), "a"), record((3, 1), (3, 2), "b")], DOC)
            .unwrap();
        let messages: Vec<&str> = index.iter().map(|(_, m)| m).collect();
        assert_eq!(messages, vec!["a", "b"]);

        index.clear();
        assert!(index.is_empty());
        assert!(index.messages().is_empty());
        assert_eq!(index.lookup(0), None);
    }
}
