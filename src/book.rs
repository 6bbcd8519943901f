//! Page index bookkeeping and the three-slot page cache plan.
//!
//! The widget never renders page content itself. The host draws pages into
//! three slots (previous, current, next) on request, and the engine tracks
//! which requests are still outstanding. Gestures wait until every request
//! has been acknowledged.

#[cfg(test)]
#[path = "book_test.rs"]
mod book_test;

use std::collections::VecDeque;

use serde::Serialize;
use tracing::info;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    #[error("book must have at least one page")]
    Empty,
    #[error("page {page} out of range for {page_count} pages")]
    PageOutOfRange { page: usize, page_count: usize },
}

/// One of the three cached page surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    Previous,
    Current,
    Next,
}

impl Slot {
    /// Buffer index: previous 0, current 1, next 2.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Previous => 0,
            Self::Current => 1,
            Self::Next => 2,
        }
    }
}

/// Outcome of a turn attempt, reported to the host exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnRequest {
    /// Resulting page: current ± 1 on success, otherwise unchanged.
    pub page: usize,
    pub forward: bool,
    pub success: bool,
}

/// A page the host should render into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: usize,
    pub slot: Slot,
}

// =============================================================================
// BOOK STATE
// =============================================================================

/// Current page and page count.
///
/// When `pinned`, the host owns the index: turns are reported but only
/// take effect once the host calls [`BookState::set_current`]. Otherwise
/// the book advances itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookState {
    page_count: usize,
    current: usize,
    pinned: bool,
}

impl BookState {
    /// # Errors
    ///
    /// [`BookError::Empty`] for zero pages, [`BookError::PageOutOfRange`] if
    /// a pinned page is past the end.
    pub fn new(page_count: usize, pinned_page: Option<usize>) -> Result<Self, BookError> {
        if page_count == 0 {
            return Err(BookError::Empty);
        }
        let current = pinned_page.unwrap_or(0);
        if current >= page_count {
            return Err(BookError::PageOutOfRange { page: current, page_count });
        }
        Ok(Self { page_count, current, pinned: pinned_page.is_some() })
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Whether a turn in this direction has a page to land on.
    #[must_use]
    pub fn can_turn(&self, forward: bool) -> bool {
        if forward { self.current + 1 < self.page_count } else { self.current > 0 }
    }

    /// Host-driven page change. Pins the book to `page`.
    ///
    /// # Errors
    ///
    /// [`BookError::PageOutOfRange`] if `page` is past the end.
    pub fn set_current(&mut self, page: usize) -> Result<(), BookError> {
        if page >= self.page_count {
            return Err(BookError::PageOutOfRange { page, page_count: self.page_count });
        }
        self.current = page;
        self.pinned = true;
        Ok(())
    }

    /// Resolve a turn attempt. Unpinned books move to the new page.
    pub fn turn(&mut self, forward: bool) -> TurnRequest {
        if !self.can_turn(forward) {
            return TurnRequest { page: self.current, forward, success: false };
        }
        let page = if forward { self.current + 1 } else { self.current - 1 };
        if !self.pinned {
            self.current = page;
        }
        info!(page, forward, pinned = self.pinned, "page turned");
        TurnRequest { page, forward, success: true }
    }
}

// =============================================================================
// PAGE WINDOW
// =============================================================================

/// Outstanding render requests for the slots around the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageWindow {
    pending: VecDeque<PageRequest>,
}

impl PageWindow {
    /// Requests needed to show `page`: the first page has no previous slot,
    /// the last no next slot.
    #[must_use]
    pub fn plan(page: usize, page_count: usize) -> Vec<PageRequest> {
        let mut needs = Vec::with_capacity(3);
        if page >= page_count {
            return needs;
        }
        if page > 0 {
            needs.push(PageRequest { page: page - 1, slot: Slot::Previous });
        }
        needs.push(PageRequest { page, slot: Slot::Current });
        if page + 1 < page_count {
            needs.push(PageRequest { page: page + 1, slot: Slot::Next });
        }
        needs
    }

    /// Replace the outstanding requests with the plan for `page` and return it.
    pub fn request(&mut self, page: usize, page_count: usize) -> Vec<PageRequest> {
        let needs = Self::plan(page, page_count);
        self.pending = needs.iter().copied().collect();
        needs
    }

    /// Acknowledge a rendered page. Returns false for a request that was not
    /// outstanding (stale or duplicate).
    pub fn page_rendered(&mut self, page: usize, slot: Slot) -> bool {
        let Some(pos) = self.pending.iter().position(|r| r.page == page && r.slot == slot) else {
            return false;
        };
        self.pending.remove(pos);
        true
    }

    /// Every requested slot has been rendered.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &PageRequest> {
        self.pending.iter()
    }
}
