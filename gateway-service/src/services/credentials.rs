//! Store access credentials.
//!
//! Sessions are not persisted yet, so production wiring hands out a fixed
//! placeholder token for every store. Anything that can map a store id to a
//! token implements [`CredentialResolver`].

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

/// Token handed out by [`PlaceholderCredentialResolver`].
pub const MOCK_ACCESS_TOKEN: &str = "shpua_mock_token_12345";

/// Delegated authority to act on a store's behalf.
#[derive(Clone)]
pub struct AccessCredential(Secret<String>);

impl AccessCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    pub fn token(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessCredential([REDACTED])")
    }
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No session found for store {0}")]
    SessionNotFound(String),
}

#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self, store_id: &str) -> Result<AccessCredential, CredentialError>;
}

/// Resolves every store to the same placeholder token.
#[derive(Debug, Default)]
pub struct PlaceholderCredentialResolver;

#[async_trait]
impl CredentialResolver for PlaceholderCredentialResolver {
    async fn resolve(&self, store_id: &str) -> Result<AccessCredential, CredentialError> {
        tracing::debug!(store_id = %store_id, "Using placeholder access token");
        Ok(AccessCredential::new(MOCK_ACCESS_TOKEN))
    }
}
