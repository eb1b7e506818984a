//! Session history.
//!
//! The engine talks to the host's history (a browser's `history` object, a
//! desktop shell's back stack, ...) through the [`History`] trait.
//! [`MemoryHistory`] is the in-process implementation used by tests and by
//! hosts without a history of their own.
//!
//! Every entry carries an opaque [`HistoryState`]. The engine writes the
//! outgoing scroll position into it before leaving a page so that back and
//! forward can restore it.

use crate::params::RouteParams;
use crate::scroll::ScrollPosition;

/// Opaque state stored alongside a history entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryState {
    /// Scroll position of the page when it was left.
    pub scroll: Option<ScrollPosition>,

    /// Free-form values owned by features.
    pub extra: RouteParams,
}

/// One entry of the history stack.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
    pub state: HistoryState,
}

impl HistoryEntry {
    /// Entry for `url` with empty state.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: HistoryState::default(),
        }
    }

    /// Entry for `url` carrying `state`.
    pub fn with_state(url: impl Into<String>, state: HistoryState) -> Self {
        Self {
            url: url.into(),
            state,
        }
    }
}

/// Back stack used by the navigator.
///
/// Offsets passed to [`peek`](Self::peek) and [`go`](Self::go) are relative
/// to the current entry: `-1` is back, `1` is forward.
pub trait History: 'static {
    /// The current entry, `None` before the first navigation.
    fn current(&self) -> Option<&HistoryEntry>;

    /// Add an entry after the current one, dropping any forward entries.
    fn push(&mut self, entry: HistoryEntry);

    /// Overwrite the current entry. Acts as [`push`](Self::push) on an empty
    /// history.
    fn replace(&mut self, entry: HistoryEntry);

    /// Entry at `offset` from the current one, without moving.
    fn peek(&self, offset: isize) -> Option<&HistoryEntry>;

    /// Move by `offset` and return the new current entry. Out-of-range
    /// offsets leave the position unchanged and return `None`.
    fn go(&mut self, offset: isize) -> Option<&HistoryEntry>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether no entry has been recorded yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn can_go_back(&self) -> bool {
        self.peek(-1).is_some()
    }

    fn can_go_forward(&self) -> bool {
        self.peek(1).is_some()
    }
}

/// In-memory history stack.
///
/// ```
/// use page_navigator::{History, HistoryEntry, MemoryHistory};
///
/// let mut history = MemoryHistory::new();
/// history.push(HistoryEntry::new("/"));
/// history.push(HistoryEntry::new("/items/"));
///
/// assert_eq!(history.peek(-1).map(|e| e.url.as_str()), Some("/"));
/// history.go(-1);
/// assert_eq!(history.current().map(|e| e.url.as_str()), Some("/"));
/// assert!(history.can_go_forward());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    current: usize,
}

impl MemoryHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Index of the current entry.
    pub fn position(&self) -> usize {
        self.current
    }

    fn index_at(&self, offset: isize) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let index = self.current.checked_add_signed(offset)?;
        (index < self.entries.len()).then_some(index)
    }
}

impl History for MemoryHistory {
    fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.current)
    }

    fn push(&mut self, entry: HistoryEntry) {
        if self.entries.is_empty() {
            self.entries.push(entry);
            self.current = 0;
            return;
        }

        // Remove forward history when pushing
        self.entries.truncate(self.current + 1);
        self.entries.push(entry);
        self.current += 1;
    }

    fn replace(&mut self, entry: HistoryEntry) {
        match self.entries.get_mut(self.current) {
            Some(slot) => *slot = entry,
            None => self.push(entry),
        }
    }

    fn peek(&self, offset: isize) -> Option<&HistoryEntry> {
        self.index_at(offset).map(|index| &self.entries[index])
    }

    fn go(&mut self, offset: isize) -> Option<&HistoryEntry> {
        let index = self.index_at(offset)?;
        self.current = index;
        self.entries.get(index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
