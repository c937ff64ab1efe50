//! In-process identity provider.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use uuid::Uuid;

use vintage_core::UserId;

use super::{Identity, IdentityError, IdentityProvider};

/// Minimum password length accepted on sign-up.
const MIN_PASSWORD_LENGTH: usize = 6;

struct Account {
    password: SecretString,
    identity: Identity,
}

/// Identity provider keeping accounts in memory.
///
/// Every identity change is broadcast on a `watch` channel.
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    sender: watch::Sender<Option<Identity>>,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentityProvider {
    /// Create a provider with no accounts and nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            sender,
        }
    }

    /// Create a provider with `identity` already signed in.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        let provider = Self::new();
        provider.sender.send_replace(Some(identity));
        provider
    }

    fn publish(&self, identity: Option<Identity>) {
        self.sender.send_replace(identity);
    }

    fn lock_accounts(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, Account>>, IdentityError> {
        self.accounts
            .lock()
            .map_err(|_| IdentityError::Unavailable("account table poisoned".to_owned()))
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    fn current(&self) -> Option<Identity> {
        self.sender.borrow().clone()
    }

    fn changes(&self) -> watch::Receiver<Option<Identity>> {
        self.sender.subscribe()
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError> {
        if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword(format!(
                "must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let key = email.to_lowercase();
        let identity = {
            let mut accounts = self.lock_accounts()?;
            if accounts.contains_key(&key) {
                return Err(IdentityError::EmailInUse);
            }

            let identity = Identity {
                uid: UserId::new(Uuid::new_v4().simple().to_string()),
                email: email.to_owned(),
                display_name: None,
            };
            accounts.insert(
                key,
                Account {
                    password: password.clone(),
                    identity: identity.clone(),
                },
            );
            identity
        };

        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError> {
        let identity = {
            let accounts = self.lock_accounts()?;
            let account = accounts
                .get(&email.to_lowercase())
                .ok_or(IdentityError::InvalidCredentials)?;
            if account.password.expose_secret() != password.expose_secret() {
                return Err(IdentityError::InvalidCredentials);
            }
            account.identity.clone()
        };

        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.publish(None);
        Ok(())
    }

    async fn update_display_name(&self, name: &str) -> Result<Identity, IdentityError> {
        let mut identity = self.current().ok_or(IdentityError::NotSignedIn)?;
        identity.display_name = Some(name.to_owned());

        {
            let mut accounts = self.lock_accounts()?;
            if let Some(account) = accounts.get_mut(&identity.email.to_lowercase()) {
                account.identity = identity.clone();
            }
        }

        self.publish(Some(identity.clone()));
        Ok(identity)
    }
}
