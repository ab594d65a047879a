use silver_diagnostics::{
    CoordinateMapper, DecorationStyle, PopupRequest, PresentationAdapter, ResolvedSpan,
    StatusUpdate,
};
use std::io::{self, Write};

/// A [`PresentationAdapter`] that renders to plain text lines.
///
/// Spans are printed with 1-based `line:column` positions next to their character offsets.
#[derive(Debug)]
pub struct ConsolePresenter {
    mapper: CoordinateMapper,
    lines: Vec<String>,
}

impl ConsolePresenter {
    /// Create a presenter for the document behind `mapper`.
    pub fn new(mapper: CoordinateMapper) -> Self {
        Self {
            mapper,
            lines: Vec::new(),
        }
    }

    /// Record that the caret moved to `offset`.
    pub fn caret(&mut self, offset: usize) {
        let (line, column) = self.mapper.position_of(offset);
        self.lines
            .push(format!("caret {line}:{column} (offset {offset})"));
    }

    /// Rendered lines so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Write every rendered line to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn describe(&self, span: &ResolvedSpan) -> String {
        let (start_line, start_column) = self.mapper.position_of(span.start);
        let (end_line, end_column) = self.mapper.position_of(span.end);
        format!(
            "{start_line}:{start_column}-{end_line}:{end_column} [{}..={}]",
            span.start, span.end
        )
    }
}

impl PresentationAdapter for ConsolePresenter {
    fn draw_regions(&mut self, key: &str, spans: &[ResolvedSpan], style: &DecorationStyle) {
        self.lines.push(format!(
            "regions {key}: {} ({})",
            spans.len(),
            style.scope
        ));
        for span in spans {
            let described = self.describe(span);
            self.lines.push(format!("  {described}"));
        }
    }

    fn erase_regions(&mut self, key: &str) {
        self.lines.push(format!("regions {key}: none"));
    }

    fn set_status(&mut self, update: StatusUpdate) {
        let line = match update {
            StatusUpdate::Set { key, message } => format!("  status {key}: {message}"),
            StatusUpdate::Erase { key } => format!("  status {key}: -"),
        };
        self.lines.push(line);
    }

    fn show_popup(&mut self, request: PopupRequest) {
        let line = match request {
            PopupRequest::Show { message, max_width } => {
                format!("  popup (max {max_width}px): {message}")
            }
            PopupRequest::Hide => "  popup: hidden".to_string(),
        };
        self.lines.push(line);
    }
}
