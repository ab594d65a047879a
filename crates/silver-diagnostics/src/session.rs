//! Per-document diagnostic session.
//!
//! A [`DiagnosticSession`] is what the host integration holds for each document it watches. It
//! owns the [`DiagnosticIndex`] and turns build and selection events into index updates and
//! presentation calls.
//!
//! # Load ordering
//!
//! Every load is tagged with a sequence number taken from [`DiagnosticSession::begin_load`].
//! Starting a build or beginning another load bumps the sequence, so a load that finishes
//! after a newer one was started is discarded. This lets hosts parse the log on a worker
//! thread and hand the result back with [`DiagnosticSession::complete_load`].
//!
//! # Edits
//!
//! Resolved spans are only valid for the text they were resolved against. Any edit clears the
//! index through [`DiagnosticSession::on_text_changed`]; the next build brings them back.
//!
//! # Example
//!
//! ```rust
//! use silver_diagnostics::{DiagnosticSession, DiagnosticsConfig, LoadOutcome, LogParser};
//!
//! let text = "method m() {\n  assert false\n}\n";
//! let mut session = DiagnosticSession::new(DiagnosticsConfig::default());
//!
//! session.on_build_started();
//! let ticket = session.begin_load();
//! let records = LogParser::new().parse_str("m.vpr,2:3,2:15,Assertion false might not hold.");
//! let outcome = session.complete_load(ticket, records, text).unwrap();
//!
//! assert_eq!(outcome, LoadOutcome::Applied { count: 1 });
//! assert_eq!(session.index().lookup(14), Some("Assertion false might not hold."));
//! ```

use crate::buffer::{SelectionRange, TextBuffer};
use crate::config::DiagnosticsConfig;
use crate::diagnostics::DiagnosticRecord;
use crate::error::DiagnosticError;
use crate::index::DiagnosticIndex;
use crate::log_parser::{LOG_TARGET, LogParser};
use crate::presentation::{DecorationStyle, PopupRequest, PresentationAdapter, StatusUpdate};
use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Identifies one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// The load's sequence number.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Result of handing a finished load back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The index was replaced with `count` diagnostics.
    Applied {
        /// Number of diagnostics now in the index.
        count: usize,
    },
    /// A newer build or load started meanwhile; the result was dropped.
    Superseded,
}

/// Diagnostics change type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticsChange {
    /// The index was emptied because a build started.
    Cleared,
    /// The index was emptied because the document text changed.
    Invalidated,
    /// The index was replaced by a successful load.
    Replaced {
        /// Number of diagnostics loaded.
        count: usize,
    },
    /// A load failed; the index kept its previous contents.
    LoadFailed {
        /// Human-readable cause.
        reason: String,
    },
    /// The message under the cursor changed.
    MessageChanged {
        /// New message, or `None` if the cursor left every span.
        message: Option<String>,
    },
}

/// Diagnostics change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsEvent {
    /// What changed.
    pub change: DiagnosticsChange,
    /// Load sequence number current when the change happened.
    pub sequence: u64,
}

/// Diagnostics change callback function type
pub type DiagnosticsCallback = Box<dyn FnMut(&DiagnosticsEvent) + Send>;

/// A session shared between the host and a buffer's selection listener.
pub type SharedSession = Arc<Mutex<DiagnosticSession>>;

/// Diagnostic state for one watched document.
pub struct DiagnosticSession {
    config: DiagnosticsConfig,
    style: DecorationStyle,
    parser: LogParser,
    index: DiagnosticIndex,
    /// Sequence number of the most recent build start or load.
    sequence: u64,
    /// Message under the last reported selection.
    current_message: Option<String>,
    callbacks: Arc<Mutex<Vec<DiagnosticsCallback>>>,
    /// Events queued while a buffer listener holds the shared session lock.
    held_events: Option<Vec<DiagnosticsEvent>>,
}

impl DiagnosticSession {
    /// Create an empty session.
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self {
            style: DecorationStyle::from_config(&config),
            config,
            parser: LogParser::new(),
            index: DiagnosticIndex::new(),
            sequence: 0,
            current_message: None,
            callbacks: Arc::new(Mutex::new(Vec::new())),
            held_events: None,
        }
    }

    /// Create a session wrapped for sharing with [`attach`](Self::attach).
    pub fn shared(config: DiagnosticsConfig) -> SharedSession {
        Arc::new(Mutex::new(Self::new(config)))
    }

    /// Session configuration.
    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    /// Region style derived from the configuration.
    pub fn style(&self) -> &DecorationStyle {
        &self.style
    }

    /// Current diagnostics.
    pub fn index(&self) -> &DiagnosticIndex {
        &self.index
    }

    /// Sequence number of the most recent build start or load.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Message under the last selection passed to
    /// [`on_selection_changed`](Self::on_selection_changed).
    pub fn current_message(&self) -> Option<&str> {
        self.current_message.as_deref()
    }

    /// Subscribe to diagnostics changes.
    ///
    /// Callbacks run on the thread that caused the change. When the change comes from a buffer
    /// listener installed by [`attach`](Self::attach), they run after the session lock has been
    /// released, so a callback may lock the [`SharedSession`] to read it. Subscribing or
    /// changing the session from inside a callback deadlocks.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&DiagnosticsEvent) + Send + 'static,
    {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }

    /// A build started: drop every diagnostic and supersede loads still in flight.
    pub fn on_build_started(&mut self) {
        self.sequence += 1;
        self.index.clear();
        self.current_message = None;
        debug!(target: LOG_TARGET, sequence = self.sequence; "build started, diagnostics cleared");
        self.notify(DiagnosticsChange::Cleared);
    }

    /// A build finished: load the log at `log_path` against the document `text`.
    ///
    /// On error the previous diagnostics are kept and the error is returned after being
    /// logged and broadcast as [`DiagnosticsChange::LoadFailed`].
    pub fn on_build_finished(
        &mut self,
        log_path: &Path,
        text: &str,
    ) -> Result<LoadOutcome, DiagnosticError> {
        let ticket = self.begin_load();
        let records = self.parser.parse_file(log_path);
        self.complete_load(ticket, records, text)
    }

    /// Like [`on_build_finished`](Self::on_build_finished), reading the text from `buffer`.
    pub fn on_build_finished_in<B: TextBuffer + ?Sized>(
        &mut self,
        log_path: &Path,
        buffer: &B,
    ) -> Result<LoadOutcome, DiagnosticError> {
        let outcome = self.on_build_finished(log_path, &buffer.text())?;
        self.on_selection_changed(buffer.selection());
        Ok(outcome)
    }

    /// Start a load. Any load started earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.sequence += 1;
        LoadTicket(self.sequence)
    }

    /// Apply the parse result of the load identified by `ticket`.
    ///
    /// Stale tickets are ignored, even when `records` is an error.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        records: Result<Vec<DiagnosticRecord>, DiagnosticError>,
        text: &str,
    ) -> Result<LoadOutcome, DiagnosticError> {
        if ticket.0 != self.sequence {
            debug!(
                target: LOG_TARGET,
                ticket = ticket.0,
                latest = self.sequence;
                "dropping superseded diagnostics load"
            );
            return Ok(LoadOutcome::Superseded);
        }

        let result = records.and_then(|records| {
            self.index.replace_all(&records, text)?;
            Ok(records.len())
        });

        match result {
            Ok(count) => {
                info!(target: LOG_TARGET, count = count; "loaded diagnostics");
                self.current_message = None;
                self.notify(DiagnosticsChange::Replaced { count });
                Ok(LoadOutcome::Applied { count })
            }
            Err(err) => {
                error!(
                    target: LOG_TARGET,
                    error:% = err,
                    kept = self.index.len();
                    "failed to load diagnostics, keeping previous set"
                );
                self.notify(DiagnosticsChange::LoadFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// The selection moved: look up the message under it.
    ///
    /// Subscribers are notified only when the message actually changes.
    pub fn on_selection_changed(&mut self, selection: SelectionRange) -> Option<&str> {
        let message = self
            .index
            .lookup_selection(selection.start, selection.end)
            .map(str::to_string);

        if message != self.current_message {
            self.current_message = message.clone();
            self.notify(DiagnosticsChange::MessageChanged { message });
        }
        self.current_message.as_deref()
    }

    /// The document text changed: every resolved span is stale, so drop them all.
    ///
    /// Loads still in flight are not superseded.
    pub fn on_text_changed(&mut self) {
        if self.index.is_empty() && self.current_message.is_none() {
            return;
        }
        self.index.clear();
        self.current_message = None;
        debug!(target: LOG_TARGET, sequence = self.sequence; "text changed, diagnostics cleared");
        self.notify(DiagnosticsChange::Invalidated);
    }

    /// Register selection and text listeners on `buffer` that keep `session` up to date.
    ///
    /// The listeners lock `session` for the update and notify subscribers once the lock is
    /// released.
    pub fn attach<B: TextBuffer + ?Sized>(session: &SharedSession, buffer: &mut B) {
        let shared = Arc::clone(session);
        buffer.subscribe_selection(Box::new(move |selection| {
            forward(&shared, |session| {
                session.on_selection_changed(selection);
            });
        }));

        let shared = Arc::clone(session);
        buffer.subscribe_text(Box::new(move || {
            forward(&shared, DiagnosticSession::on_text_changed);
        }));
    }

    /// Redraw every region, or erase them all when there are none.
    pub fn present_decorations<P: PresentationAdapter + ?Sized>(&self, adapter: &mut P) {
        if self.index.is_empty() {
            adapter.erase_regions(&self.config.region_key);
        } else {
            adapter.draw_regions(&self.config.region_key, self.index.spans(), &self.style);
        }
    }

    /// Push the current message to the status line.
    pub fn present_status<P: PresentationAdapter + ?Sized>(&self, adapter: &mut P) {
        adapter.set_status(StatusUpdate::for_message(
            &self.config.region_key,
            self.current_message(),
        ));
    }

    /// Show the message under `selection` in a popup, or hide the popup if there is none.
    pub fn present_popup<P: PresentationAdapter + ?Sized>(
        &self,
        adapter: &mut P,
        selection: SelectionRange,
    ) {
        let message = self.index.lookup_selection(selection.start, selection.end);
        adapter.show_popup(PopupRequest::for_message(
            message,
            self.config.popup_max_width,
        ));
    }

    fn notify(&mut self, change: DiagnosticsChange) {
        let event = DiagnosticsEvent {
            change,
            sequence: self.sequence,
        };
        match &mut self.held_events {
            Some(held) => held.push(event),
            None => dispatch(&self.callbacks, std::slice::from_ref(&event)),
        }
    }

    /// Run `f`, returning the events it raised instead of dispatching them.
    fn with_events_held<F>(&mut self, f: F) -> Vec<DiagnosticsEvent>
    where
        F: FnOnce(&mut Self),
    {
        let outer = self.held_events.replace(Vec::new());
        f(self);
        std::mem::replace(&mut self.held_events, outer).unwrap_or_default()
    }
}

/// Apply `f` to the shared session, then notify subscribers with the lock released.
fn forward<F>(session: &SharedSession, f: F)
where
    F: FnOnce(&mut DiagnosticSession),
{
    let (callbacks, events) = {
        let Ok(mut session) = session.lock() else {
            warn!(target: LOG_TARGET, "diagnostic session lock poisoned, buffer event ignored");
            return;
        };
        let events = session.with_events_held(f);
        (Arc::clone(&session.callbacks), events)
    };
    dispatch(&callbacks, &events);
}

fn dispatch(callbacks: &Mutex<Vec<DiagnosticsCallback>>, events: &[DiagnosticsEvent]) {
    if events.is_empty() {
        return;
    }
    let mut callbacks = callbacks.lock().unwrap_or_else(PoisonError::into_inner);
    for event in events {
        for callback in callbacks.iter_mut() {
            callback(event);
        }
    }
}

impl std::fmt::Debug for DiagnosticSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticSession")
            .field("config", &self.config)
            .field("index", &self.index)
            .field("sequence", &self.sequence)
            .field("current_message", &self.current_message)
            .field(
                "callbacks",
                &self
                    .callbacks
                    .lock()
                    .map_or(0, |callbacks| callbacks.len()),
            )
            .finish()
    }
}
