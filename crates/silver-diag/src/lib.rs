//! CLI logic for `silver-diag`.
//!
//! Plays the part of a host editor: it opens a document, runs one build cycle against the
//! toolchain's error log, draws the resulting regions, then moves the caret to each requested
//! position and reports the message under it.

mod args;
mod console;

pub use args::{Args, LinePosition};
pub use console::ConsolePresenter;

use log::{info, warn};
use silver_diagnostics::{
    CoordinateMapper, DiagnosticError, DiagnosticSession, MemoryBuffer, SelectionRange,
    SharedSession,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The document could not be read.
    #[error("cannot read document {path}: {source}")]
    Document {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Loading or resolving the error log failed.
    #[error(transparent)]
    Diagnostics(#[from] DiagnosticError),

    /// Writing the report failed.
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

/// Run one build cycle and report lookups to `out`.
///
/// # Errors
///
/// Returns `CliError` for:
/// - an unreadable document
/// - a malformed error log or a diagnostic outside the document
/// - an unknown placeholder in the error file template
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), CliError> {
    let config = args.config();
    let log_path = config
        .resolve_error_file(&args.packages)?
        .unwrap_or_else(|| PathBuf::from(&args.error_file));

    let text = fs::read_to_string(&args.document).map_err(|source| CliError::Document {
        path: args.document.clone(),
        source,
    })?;
    info!(document:? = args.document, error_file:? = log_path; "Loading diagnostics");

    let mapper = CoordinateMapper::new(&text);
    let mut presenter = ConsolePresenter::new(mapper.clone());
    let mut buffer = MemoryBuffer::new(text);
    let session = DiagnosticSession::shared(config);
    DiagnosticSession::attach(&session, &mut buffer);

    with_session(&session, |session| {
        session.on_build_started();
        session.on_build_finished_in(&log_path, &buffer)?;
        session.present_decorations(&mut presenter);
        Ok(())
    })?;

    let at_positions = args.positions.iter().map(|pos| {
        mapper
            .end_offset(pos.line, pos.column)
            .unwrap_or_else(|_| {
                warn!(line = pos.line; "Position past the end of the document");
                mapper.line_index().char_count()
            })
    });
    let offsets = args.offsets.iter().copied().chain(at_positions);

    for offset in offsets {
        buffer.move_caret(offset);
        with_session(&session, |session| {
            presenter.caret(offset);
            if args.popup {
                session.present_popup(&mut presenter, SelectionRange::caret(offset));
            } else {
                session.present_status(&mut presenter);
            }
            Ok(())
        })?;
    }

    presenter.write_to(out)?;
    Ok(())
}

fn with_session<F>(session: &SharedSession, f: F) -> Result<(), CliError>
where
    F: FnOnce(&mut DiagnosticSession) -> Result<(), DiagnosticError>,
{
    let mut guard = session
        .lock()
        .map_err(|_| io::Error::other("diagnostic session lock poisoned"))?;
    f(&mut guard)?;
    Ok(())
}
