#![warn(missing_docs)]
//! Silver Diagnostics - headless core for verifier error logs
//!
//! # Overview
//!
//! `silver-diagnostics` reads the error log a verifier or compiler toolchain writes after a
//! build, maps every reported diagnostic onto a region of the open document, and answers
//! "which message is under the cursor?" fast enough to be called on every cursor move.
//!
//! Running the toolchain, drawing underlines and showing messages are left to the host; the
//! crate talks to it through the [`TextBuffer`] and [`PresentationAdapter`] traits.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  DiagnosticSession (build/selection events) │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  DiagnosticIndex (spans + messages)         │  ← Lookup
//! ├─────────────────────────────────────────────┤
//! │  CoordinateMapper (Rope-based LineIndex)    │  ← Line/column → offset
//! ├─────────────────────────────────────────────┤
//! │  LogParser                                  │  ← Error log → records
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use silver_diagnostics::{DiagnosticIndex, LogParser};
//!
//! let document = "field f: Int\nmethod m() {\n  x.f := 1\n}\n";
//! let log = "m.vpr,3:3,3:10,Assignment might fail. There might be insufficient permission.\n";
//!
//! let records = LogParser::new().parse_str(log).unwrap();
//! let mut index = DiagnosticIndex::new();
//! index.replace_all(&records, document).unwrap();
//!
//! // The span starts at the beginning of line 3, whatever the reported start column.
//! assert_eq!(
//!     index.lookup(26),
//!     Some("Assignment might fail. There might be insufficient permission.")
//! );
//! assert_eq!(index.lookup(0), None);
//! ```
//!
//! # Module Description
//!
//! - [`log_parser`] - Error log parsing (fail-fast on malformed lines)
//! - [`line_index`] - Rope based line index and coordinate mapping
//! - [`index`] - Ordered span/message index with first-match lookup
//! - [`session`] - Per-document session: build events, load ordering, subscriptions
//! - [`buffer`] / [`presentation`] - Host collaborator traits
//! - [`config`] - Region key, styling defaults and error log location

pub mod buffer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod line_index;
pub mod log_parser;
pub mod presentation;
pub mod session;

pub use buffer::{
    MemoryBuffer, SelectionChangeCallback, SelectionRange, TextBuffer, TextChangeCallback,
};
pub use config::{DiagnosticsConfig, expand_template};
pub use diagnostics::{DiagnosticRecord, ResolvedSpan};
pub use error::DiagnosticError;
pub use index::DiagnosticIndex;
pub use line_index::{CoordinateMapper, LineIndex};
pub use log_parser::LogParser;
pub use presentation::{
    DecorationStyle, PopupRequest, PresentationAdapter, StatusUpdate, UnderlineStyle,
};
pub use session::{
    DiagnosticSession, DiagnosticsCallback, DiagnosticsChange, DiagnosticsEvent, LoadOutcome,
    LoadTicket, SharedSession,
};
