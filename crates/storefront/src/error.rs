//! Unified error handling with Sentry integration.
//!
//! Provides a unified `StoreError` type for every component action. Write
//! actions return `Result<T, StoreError>`; read actions that fail soft report
//! through [`report_soft_failure`] instead.

use thiserror::Error;

use vintage_core::RatingError;

use crate::identity::IdentityError;
use crate::remote::RemoteError;
use crate::slot::SlotError;

/// Error type shared by all storefront components.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The action requires a signed-in user.
    #[error("Not signed in")]
    Unauthenticated,

    /// The addressed entity doesn't exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document store operation failed.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Identity provider operation failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Local slot operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] SlotError),

    /// Rating outside the accepted range.
    #[error("Invalid rating: {0}")]
    InvalidRating(#[from] RatingError),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,
}

/// Coarse classification of a [`StoreError`], for callers that only need to
/// decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    NotFound,
    RemoteFailure,
    Storage,
    Invalid,
}

impl StoreError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated | Self::Identity(IdentityError::NotSignedIn) => {
                ErrorKind::Unauthenticated
            }
            Self::NotFound(_) | Self::Remote(RemoteError::NotFound(_)) => ErrorKind::NotFound,
            Self::Remote(_) => ErrorKind::RemoteFailure,
            Self::Identity(
                IdentityError::EmailInUse
                | IdentityError::InvalidCredentials
                | IdentityError::WeakPassword(_),
            )
            | Self::InvalidRating(_)
            | Self::EmptyCart => ErrorKind::Invalid,
            Self::Identity(IdentityError::Unavailable(_)) => ErrorKind::RemoteFailure,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Log and report a failure that the caller recovers from by keeping its
/// previous state.
pub fn report_soft_failure(operation: &str, error: &(dyn std::error::Error + 'static)) {
    let event_id = sentry::capture_error(error);
    tracing::warn!(
        operation,
        error = %error,
        sentry_event_id = %event_id,
        "Keeping previous state after failed read"
    );
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
