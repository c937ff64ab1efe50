//! Pure wishlist state.

use vintage_core::ToggleOutcome;

/// Locally cached size of the signed-in user's wishlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WishlistState {
    count: usize,
}

impl WishlistState {
    /// Number of wishlisted products.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Replace the count with an authoritative value.
    pub fn resync(&mut self, count: usize) {
        self.count = count;
    }

    /// Adjust the count after a toggle. Never drops below zero.
    pub fn record(&mut self, outcome: ToggleOutcome) {
        self.count = match outcome {
            ToggleOutcome::Added => self.count.saturating_add(1),
            ToggleOutcome::Removed => self.count.saturating_sub(1),
        };
    }
}
