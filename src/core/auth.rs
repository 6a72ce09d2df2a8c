//! Credential controller - authenticated-identity lifecycle
//!
//! Handles:
//! - Login and registration against the backend
//! - Token persistence across process restarts
//! - Session restoration at startup (token re-validation via profile fetch)
//! - Logout
//!
//! The persisted token is the single source of truth across restarts; the
//! in-memory identity is always derivable from it via [`restore_session`].
//!
//! [`restore_session`]: CredentialController::restore_session

use super::traits::{AuthSnapshot, CredentialStore};
use crate::api::{ErrorKind, ShopApi, User};
use std::sync::{Arc, Mutex};

/// Authentication lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Startup state; persisted identity not yet re-validated
    Unknown,
    /// A login, registration, or restoration call is in flight
    Authenticating,
    /// Token validated; identity present
    Authenticated,
    /// No valid credential
    Anonymous,
}

struct AuthState {
    status: AuthStatus,
    user: Option<User>,
    last_error: Option<ErrorKind>,
}

/// Owns the credential slice: identity, token persistence, auth status
pub struct CredentialController {
    api: Arc<dyn ShopApi>,
    store: Arc<dyn CredentialStore>,
    state: Mutex<AuthState>,
}

impl CredentialController {
    /// Create the controller, restoring the persisted identity snapshot
    /// verbatim. The snapshot is provisional until [`restore_session`]
    /// re-validates the token.
    ///
    /// [`restore_session`]: CredentialController::restore_session
    pub fn new(api: Arc<dyn ShopApi>, store: Arc<dyn CredentialStore>) -> Self {
        let user = store.snapshot().and_then(|snap| snap.user);
        Self {
            api,
            store,
            state: Mutex::new(AuthState {
                status: AuthStatus::Unknown,
                user,
                last_error: None,
            }),
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.state.lock().unwrap().status
    }

    /// True iff the last login/restoration succeeded and an identity is held
    pub fn is_authenticated(&self) -> bool {
        let st = self.state.lock().unwrap();
        st.status == AuthStatus::Authenticated && st.user.is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.state.lock().unwrap().user.clone()
    }

    /// Name to greet the user by, when one is known
    pub fn display_name(&self) -> Option<String> {
        self.state.lock().unwrap().user.as_ref().map(|u| u.username.clone())
    }

    /// Typed kind of the most recent failed operation, if any
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.state.lock().unwrap().last_error
    }

    /// Exchange credentials for a token; true on success
    ///
    /// Failures never propagate as errors: the controller lands in
    /// `Anonymous`, records the typed kind in [`last_error`], and returns
    /// false. A call while another authentication operation is in flight is
    /// rejected (returns false) without touching state.
    ///
    /// [`last_error`]: CredentialController::last_error
    pub async fn login(&self, username: &str, password: &str) -> bool {
        if !self.begin_authenticating() {
            return false;
        }
        let result = self.api.login(username, password).await;
        self.finish_authenticating(result)
    }

    /// Create an account and log in; same contract as [`login`]
    ///
    /// [`login`]: CredentialController::login
    pub async fn register(&self, username: &str, email: &str, password: &str) -> bool {
        if !self.begin_authenticating() {
            return false;
        }
        let result = self.api.register(username, email, password).await;
        self.finish_authenticating(result)
    }

    /// Re-validate the persisted token at startup
    ///
    /// A stored token is checked against the profile endpoint; an invalid or
    /// unreachable one clears persisted storage. Without a stored token this
    /// transitions straight to `Anonymous`.
    pub async fn restore_session(&self) {
        if !self.begin_authenticating() {
            return;
        }

        if self.store.token().is_none() {
            let mut st = self.state.lock().unwrap();
            st.status = AuthStatus::Anonymous;
            st.user = None;
            return;
        }

        match self.api.fetch_profile().await {
            Ok(user) => {
                let snapshot = AuthSnapshot {
                    user: Some(user.clone()),
                    is_authenticated: true,
                };
                if let Err(err) = self.store.set_snapshot(&snapshot) {
                    tracing::warn!("Failed to persist identity snapshot: {}", err);
                }
                let mut st = self.state.lock().unwrap();
                st.status = AuthStatus::Authenticated;
                st.user = Some(user);
                st.last_error = None;
            }
            Err(err) => {
                tracing::warn!("Session restoration failed, clearing credential: {}", err);
                self.clear_persisted();
                let mut st = self.state.lock().unwrap();
                st.status = AuthStatus::Anonymous;
                st.user = None;
                st.last_error = Some(err.kind());
            }
        }
    }

    /// Drop the credential and identity; safe from any state
    pub fn logout(&self) {
        self.clear_persisted();
        let mut st = self.state.lock().unwrap();
        st.status = AuthStatus::Anonymous;
        st.user = None;
        st.last_error = None;
    }

    /// Claim the in-flight slot; false if another operation holds it
    fn begin_authenticating(&self) -> bool {
        let mut st = self.state.lock().unwrap();
        if st.status == AuthStatus::Authenticating {
            tracing::debug!("Rejecting auth call: another one is in flight");
            return false;
        }
        st.status = AuthStatus::Authenticating;
        true
    }

    fn finish_authenticating(
        &self,
        result: Result<crate::api::AuthPayload, crate::api::ApiError>,
    ) -> bool {
        match result {
            Ok(payload) => {
                if let Err(err) = self.store.set_token(&payload.access_token) {
                    tracing::warn!("Failed to persist token: {}", err);
                }
                let snapshot = AuthSnapshot {
                    user: Some(payload.user.clone()),
                    is_authenticated: true,
                };
                if let Err(err) = self.store.set_snapshot(&snapshot) {
                    tracing::warn!("Failed to persist identity snapshot: {}", err);
                }

                let mut st = self.state.lock().unwrap();
                st.status = AuthStatus::Authenticated;
                st.user = Some(payload.user);
                st.last_error = None;
                true
            }
            Err(err) => {
                tracing::warn!("Authentication failed: {}", err);
                let mut st = self.state.lock().unwrap();
                st.status = AuthStatus::Anonymous;
                st.user = None;
                st.last_error = Some(err.kind());
                false
            }
        }
    }

    fn clear_persisted(&self) {
        if let Err(err) = self.store.clear_token() {
            tracing::warn!("Failed to clear persisted token: {}", err);
        }
        if let Err(err) = self.store.clear_snapshot() {
            tracing::warn!("Failed to clear identity snapshot: {}", err);
        }
    }
}
