//! Core traits for the domain layer
//!
//! These traits define the interfaces that domain components depend on,
//! allowing infrastructure to be injected and tests to use mocks.

use crate::api::User;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Snapshot of the authenticated identity, persisted alongside the token
///
/// Restored verbatim at startup; only the token itself is re-validated
/// (via a profile fetch), never the snapshot contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// Durable credential storage abstraction
///
/// One process-wide slot for the bearer token and one for the identity
/// snapshot. Writes are last-write-wins; the credential controller
/// serializes its own operations so writes are never concurrent in practice.
pub trait CredentialStore: Send + Sync {
    /// Read the stored token, if any
    fn token(&self) -> Option<String>;

    /// Persist the token, replacing any previous value
    fn set_token(&self, token: &str) -> Result<()>;

    /// Remove the stored token
    fn clear_token(&self) -> Result<()>;

    /// Read the stored identity snapshot, if any
    fn snapshot(&self) -> Option<AuthSnapshot>;

    /// Persist the identity snapshot, replacing any previous value
    fn set_snapshot(&self, snapshot: &AuthSnapshot) -> Result<()>;

    /// Remove the stored identity snapshot
    fn clear_snapshot(&self) -> Result<()>;
}
