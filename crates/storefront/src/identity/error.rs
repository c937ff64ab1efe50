//! Identity provider error types.

use thiserror::Error;

/// Errors that can occur during identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// An account with this email already exists.
    #[error("email already in use")]
    EmailInUse,

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password rejected by the provider.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Operation requires a signed-in identity.
    #[error("no identity is signed in")]
    NotSignedIn,

    /// The provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}
