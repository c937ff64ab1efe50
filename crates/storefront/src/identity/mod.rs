//! Identity provider collaborator.
//!
//! The state layer never manages credentials itself. It reads the current
//! identity (nullable) and delegates account lifecycle calls to an
//! [`IdentityProvider`].

mod error;
mod memory;

pub use error::IdentityError;
pub use memory::MemoryIdentityProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::watch;

use vintage_core::UserId;

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable user id.
    pub uid: UserId,
    /// Sign-in email.
    pub email: String,
    /// Profile display name, if set.
    pub display_name: Option<String>,
}

impl Identity {
    /// Name shown next to reviews: display name, then email, then "Anonymous".
    #[must_use]
    pub fn public_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| Some(self.email.as_str()).filter(|email| !email.is_empty()))
            .unwrap_or("Anonymous")
    }
}

/// Authentication service consumed by the state layer.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in identity, if any.
    fn current(&self) -> Option<Identity>;

    /// Receiver notified on every identity change.
    fn changes(&self) -> watch::Receiver<Option<Identity>>;

    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &SecretString)
    -> Result<Identity, IdentityError>;

    /// Sign in to an existing account.
    async fn sign_in(&self, email: &str, password: &SecretString)
    -> Result<Identity, IdentityError>;

    /// Sign the current identity out.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Set the display name of the signed-in identity.
    async fn update_display_name(&self, name: &str) -> Result<Identity, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(display_name: Option<&str>, email: &str) -> Identity {
        Identity {
            uid: UserId::new("u1"),
            email: email.to_owned(),
            display_name: display_name.map(str::to_owned),
        }
    }

    #[test]
    fn test_public_name_prefers_display_name() {
        assert_eq!(
            identity(Some("Rina"), "rina@example.com").public_name(),
            "Rina"
        );
    }

    #[test]
    fn test_public_name_falls_back() {
        assert_eq!(
            identity(None, "rina@example.com").public_name(),
            "rina@example.com"
        );
        assert_eq!(identity(Some(""), "").public_name(), "Anonymous");
    }
}
