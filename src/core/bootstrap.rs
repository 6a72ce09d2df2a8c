//! Session bootstrap - composes credential restoration with conversation setup
//!
//! The coordinator only reads credential state to parameterize the welcome
//! turn; it owns no conversation data of its own.

use super::auth::CredentialController;
use super::conversation::ConversationController;
use std::sync::Arc;

/// Application-start and reset sequencing over the two stateful controllers
pub struct SessionBootstrap {
    auth: Arc<CredentialController>,
    conversation: Arc<ConversationController>,
}

impl SessionBootstrap {
    pub fn new(auth: Arc<CredentialController>, conversation: Arc<ConversationController>) -> Self {
        Self { auth, conversation }
    }

    /// Run at application start: restore the persisted credential, then seed
    /// a fresh conversation greeting whoever is now known.
    pub async fn start(&self) {
        self.auth.restore_session().await;
        let name = self.auth.display_name();
        self.conversation.reset(name.as_deref());
    }

    /// User-triggered reset: re-seed the conversation with the currently
    /// known display name, leaving credentials untouched.
    pub fn reset_conversation(&self) {
        let name = self.auth.display_name();
        self.conversation.reset(name.as_deref());
    }
}
