//! User profile types.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use vintage_core::{Timestamp, UserRole};

/// Details collected by the registration form.
#[derive(Debug, Clone)]
pub struct RegisterDetails {
    pub email: String,
    pub password: SecretString,
    pub fullname: String,
    pub username: String,
}

/// Profile document stored at `users/{uid}` on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub fullname: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: Timestamp,
}

impl UserProfile {
    /// Profile for a newly registered user.
    #[must_use]
    pub fn from_registration(details: &RegisterDetails) -> Self {
        Self {
            fullname: details.fullname.clone(),
            username: details.username.clone(),
            email: details.email.clone(),
            role: UserRole::User,
            created_at: Timestamp::now(),
        }
    }
}
