//! Identity and profile store types.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// A verified caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Principal {
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Token the principal was verified with. Forwarded to the data store so
    /// row-level policies apply to the caller.
    #[serde(skip)]
    pub access_token: String,
}

/// Fields to write on a profile row.
///
/// `display_name`: `None` leaves the column untouched, `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileChanges {
    pub display_name: Option<Option<String>>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider does not accept the token.
    #[error("token rejected by identity provider (status {0})")]
    Rejected(u16),

    /// The provider could not be reached or answered unexpectedly.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        IdentityError::Unavailable(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("profile store returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Exchanges bearer tokens for verified principals.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Principal, IdentityError>;
}

/// Persists user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or update the principal's profile row.
    async fn upsert(&self, principal: &Principal, changes: &ProfileChanges) -> Result<(), StoreError>;
}
