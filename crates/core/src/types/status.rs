//! Status enums for storefront actions and records.

use serde::{Deserialize, Serialize};

/// Result of toggling a product on the wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The product was not on the wishlist and has been added.
    Added,
    /// The product was on the wishlist and has been removed.
    Removed,
}

impl ToggleOutcome {
    /// Change applied to the product's like counter.
    #[must_use]
    pub const fn like_delta(self) -> i64 {
        match self {
            Self::Added => 1,
            Self::Removed => -1,
        }
    }
}

/// Role stored on a user profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular shopper. Every self-registered account gets this role.
    #[default]
    User,
    /// Store administrator.
    Admin,
}
