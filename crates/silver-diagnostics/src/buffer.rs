//! Text buffer collaborator.
//!
//! The host editor owns the document; the session only needs its text, the primary selection,
//! and a way to hear about selection and text changes.

/// Primary selection in character offsets. A caret is a selection with `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionRange {
    /// Anchor/start offset.
    pub start: usize,
    /// Active/end offset.
    pub end: usize,
}

impl SelectionRange {
    /// Create a new selection.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A caret at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Whether this selection is a bare caret.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }
}

/// Selection change callback function type.
pub type SelectionChangeCallback = Box<dyn FnMut(SelectionRange) + Send>;

/// Text change callback function type.
pub type TextChangeCallback = Box<dyn FnMut() + Send>;

/// A document as seen by the diagnostics core.
pub trait TextBuffer {
    /// Full current text.
    fn text(&self) -> String;

    /// Current primary selection.
    fn selection(&self) -> SelectionRange;

    /// Register a listener called every time the primary selection changes.
    fn subscribe_selection(&mut self, callback: SelectionChangeCallback);

    /// Register a listener called after every edit of the text.
    fn subscribe_text(&mut self, callback: TextChangeCallback);
}

/// Minimal in-memory [`TextBuffer`] for hosts without their own document model and for tests.
#[derive(Default)]
pub struct MemoryBuffer {
    text: String,
    selection: SelectionRange,
    listeners: Vec<SelectionChangeCallback>,
    text_listeners: Vec<TextChangeCallback>,
}

impl MemoryBuffer {
    /// Create a buffer with the caret at offset 0.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Replace the text and notify text listeners. The selection is left as is.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        for listener in &mut self.text_listeners {
            listener();
        }
    }

    /// Move the selection and notify listeners.
    pub fn select(&mut self, selection: SelectionRange) {
        self.selection = selection;
        for listener in &mut self.listeners {
            listener(selection);
        }
    }

    /// Move the caret and notify listeners.
    pub fn move_caret(&mut self, offset: usize) {
        self.select(SelectionRange::caret(offset));
    }
}

impl std::fmt::Debug for MemoryBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBuffer")
            .field("text", &self.text)
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .field("text_listeners", &self.text_listeners.len())
            .finish()
    }
}

impl TextBuffer for MemoryBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn subscribe_selection(&mut self, callback: SelectionChangeCallback) {
        self.listeners.push(callback);
    }

    fn subscribe_text(&mut self, callback: TextChangeCallback) {
        self.text_listeners.push(callback);
    }
}
