//! Scroll position capture and restoration.
//!
//! Before a page is left its scroll offset is recorded twice: in the history
//! entry's [`HistoryState`](crate::HistoryState) and in a bounded
//! [`ScrollStore`] keyed by URL. Going back or forward restores the recorded
//! offset; any other navigation starts at the top.

use crate::trace_log;
use lru::LruCache;
use std::cell::Cell;
use std::num::NonZeroUsize;

/// Scroll offset of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    /// Top-left corner.
    pub const TOP: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The scrollable surface pages render into.
pub trait Viewport: 'static {
    /// Current scroll offset.
    fn scroll_position(&self) -> ScrollPosition;

    /// Move to `position`.
    fn scroll_to(&self, position: ScrollPosition);
}

/// Viewport that only remembers its offset.
///
/// ```
/// use page_navigator::{MemoryViewport, ScrollPosition, Viewport};
///
/// let viewport = MemoryViewport::new();
/// viewport.scroll_to(ScrollPosition::new(0.0, 300.0));
/// assert_eq!(viewport.scroll_position().y, 300.0);
/// assert_eq!(viewport.scroll_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryViewport {
    position: Cell<ScrollPosition>,
    scrolls: Cell<usize>,
}

impl MemoryViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times [`scroll_to`](Viewport::scroll_to) was called.
    pub fn scroll_count(&self) -> usize {
        self.scrolls.get()
    }
}

impl Viewport for MemoryViewport {
    fn scroll_position(&self) -> ScrollPosition {
        self.position.get()
    }

    fn scroll_to(&self, position: ScrollPosition) {
        self.position.set(position);
        self.scrolls.set(self.scrolls.get() + 1);
    }
}

/// Bounded URL → scroll offset map.
///
/// Entries are consumed when read, so a stale offset is never applied twice.
/// The least recently recorded URL is evicted first.
#[derive(Debug)]
pub struct ScrollStore {
    positions: LruCache<String, ScrollPosition>,
}

impl ScrollStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            positions: LruCache::new(capacity),
        }
    }

    /// Record the offset of `url` as it is being left.
    pub fn record(&mut self, url: &str, position: ScrollPosition) {
        trace_log!("Recording scroll {:?} for '{}'", position, url);
        self.positions.put(url.to_string(), position);
    }

    /// Take the recorded offset of `url`, removing it from the store.
    pub fn take(&mut self, url: &str) -> Option<ScrollPosition> {
        self.positions.pop(url)
    }

    /// Look at the recorded offset without consuming it.
    pub fn peek(&self, url: &str) -> Option<ScrollPosition> {
        self.positions.peek(url).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }
}
