//! Keyboard selection over the current result list.
//!
//! `active == 0` is the input slot; `1..=N` address hits `0..N`.

use tracing::trace;

use crate::model::result_store::ResultSet;

/// What an arrow key did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No hits to move over; the key keeps its default behavior.
    Ineligible,
    /// Already at the boundary; nothing moved.
    AtBound,
    Moved(usize),
}

impl Transition {
    /// Eligible transitions suppress the default scroll, even at a bound.
    #[must_use]
    pub const fn is_eligible(self) -> bool {
        !matches!(self, Self::Ineligible)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    active: usize,
}

impl Selection {
    #[must_use]
    pub const fn active(&self) -> usize {
        self.active
    }

    /// Zero-based hit index of the active row, `None` when the input is active.
    #[must_use]
    pub const fn active_hit(&self) -> Option<usize> {
        self.active.checked_sub(1)
    }

    pub fn reset(&mut self) {
        self.active = 0;
    }

    pub fn move_down(&mut self, results: &ResultSet) -> Transition {
        let n = results.hit_count();
        if n == 0 {
            return Transition::Ineligible;
        }
        if self.active >= n {
            self.active = n;
            return Transition::AtBound;
        }
        self.active += 1;
        trace!("selection down -> {}", self.active);
        Transition::Moved(self.active)
    }

    pub fn move_up(&mut self, results: &ResultSet) -> Transition {
        if results.hit_count() == 0 {
            return Transition::Ineligible;
        }
        if self.active == 0 {
            return Transition::AtBound;
        }
        self.active -= 1;
        trace!("selection up -> {}", self.active);
        Transition::Moved(self.active)
    }

    /// Pointer hover over hit `index`; out-of-range hovers are ignored.
    pub fn hover(&mut self, index: usize, results: &ResultSet) -> bool {
        if index >= results.hit_count() {
            return false;
        }
        self.active = index + 1;
        true
    }
}
