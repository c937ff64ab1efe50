//! Signed-in user session.
//!
//! Mirrors the identity provider's current user into local state and writes
//! the profile document on registration.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::identity::{Identity, IdentityProvider};
use crate::models::{RegisterDetails, UserProfile, collections};
use crate::remote::{CollectionPath, DocumentStore, encode};

/// Who is signed in, and whether that has been established yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    user: Option<Identity>,
    auth_is_ready: bool,
}

impl SessionState {
    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    /// Whether the identity provider has reported at least once.
    #[must_use]
    pub const fn auth_is_ready(&self) -> bool {
        self.auth_is_ready
    }

    /// Replace the signed-in user.
    pub fn commit(&mut self, user: Option<Identity>) {
        self.user = user;
    }

    /// Replace the signed-in user with one reported by the provider.
    pub fn settle(&mut self, user: Option<Identity>) {
        self.user = user;
        self.auth_is_ready = true;
    }
}

/// Registration, login and logout against the identity provider.
pub struct Session {
    state: SessionState,
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session that hasn't heard from the provider yet.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            state: SessionState::default(),
            store,
            identity,
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&Identity> {
        self.state.user()
    }

    /// Create an account, name it, and write its profile document.
    ///
    /// An account created before a later step fails is left in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Identity` if sign-up or naming fails and
    /// `StoreError::Remote` if the profile can't be written.
    #[instrument(skip(self, details), fields(email = %details.email))]
    pub async fn register(&mut self, details: RegisterDetails) -> Result<Identity> {
        self.identity
            .sign_up(&details.email, &details.password)
            .await?;
        let user = self.identity.update_display_name(&details.fullname).await?;

        let path = CollectionPath::new(collections::USERS).doc(user.uid.as_str());
        let profile = UserProfile::from_registration(&details);
        self.store
            .set(&path, encode(&path.to_string(), &profile)?)
            .await?;

        set_sentry_user(&user.uid, Some(&user.email));
        tracing::info!(uid = %user.uid, "Registered user");
        self.state.commit(Some(user.clone()));
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Identity` if the credentials are rejected.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<Identity> {
        let user = self
            .identity
            .sign_in(email, password)
            .await
            .inspect_err(|e| tracing::warn!("Login failed: {}", e))?;

        set_sentry_user(&user.uid, Some(&user.email));
        tracing::info!(uid = %user.uid, "Logged in");
        self.state.commit(Some(user.clone()));
        Ok(user)
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Identity` if the provider rejects the call.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<()> {
        self.identity.sign_out().await?;
        clear_sentry_user();
        tracing::info!("Logged out");
        self.state.commit(None);
        Ok(())
    }

    /// Adopt the provider's current user and mark auth as ready.
    pub fn fetch_user(&mut self) {
        self.state.settle(self.identity.current());
    }

    /// Subscribe to identity changes, for use with [`Session::follow`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.changes()
    }

    /// Wait for the next identity change and adopt it.
    ///
    /// Returns `false` once the provider has gone away.
    pub async fn follow(&mut self, changes: &mut watch::Receiver<Option<Identity>>) -> bool {
        if changes.changed().await.is_err() {
            return false;
        }
        let user = changes.borrow_and_update().clone();
        tracing::debug!(uid = ?user.as_ref().map(|u| u.uid.as_str()), "Identity changed");
        self.state.settle(user);
        true
    }
}
