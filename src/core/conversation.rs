//! Conversation controller - transcript, session identity, and exchange state
//!
//! Handles:
//! - Optimistic append of user turns before the network round trip
//! - Strict serialization of exchanges (one in flight at a time)
//! - Session continuity (the backend's session id is adopted on the first
//!   successful exchange and echoed on every later one)
//! - Graceful degradation: any failure becomes a fixed fallback turn
//!
//! The lock is only held for synchronous mutations, never across an await,
//! so a reset can land while an exchange is waiting on the network. Each
//! reset bumps an epoch; an exchange that resolves under a stale epoch is
//! discarded so it cannot write into a freshly reset transcript.

use super::ids::TurnIdGen;
use super::types::{welcome_text, Author, ConversationTurn, FALLBACK_TURN_TEXT};
use crate::api::{ApiError, ShopApi};
use std::sync::{Arc, Mutex};

/// State of the current exchange with the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// No exchange in progress
    Idle,
    /// A message has been sent; awaiting the assistant's reply
    Sending,
}

struct ConversationState {
    turns: Vec<ConversationTurn>,
    session_id: Option<String>,
    exchange: ExchangeState,
    /// Bumped on every reset; in-flight exchanges capture it at send time
    /// and discard their result if it has moved.
    epoch: u64,
}

/// Owns the message transcript and backend session identity
pub struct ConversationController {
    api: Arc<dyn ShopApi>,
    ids: Arc<dyn TurnIdGen>,
    state: Mutex<ConversationState>,
}

impl ConversationController {
    pub fn new(api: Arc<dyn ShopApi>, ids: Arc<dyn TurnIdGen>) -> Self {
        let controller = Self {
            api,
            ids,
            state: Mutex::new(ConversationState {
                turns: Vec::new(),
                session_id: None,
                exchange: ExchangeState::Idle,
                epoch: 0,
            }),
        };
        controller.reset(None);
        controller
    }

    /// Snapshot of the transcript, oldest turn first
    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.state.lock().unwrap().turns.clone()
    }

    /// The backend session id, once one has been acknowledged
    pub fn session_id(&self) -> Option<String> {
        self.state.lock().unwrap().session_id.clone()
    }

    /// Whether an exchange is currently awaiting the backend
    pub fn is_sending(&self) -> bool {
        self.state.lock().unwrap().exchange == ExchangeState::Sending
    }

    /// Clear the transcript to a single welcome turn and forget the session
    ///
    /// Callable at any time, including while an exchange is in flight: the
    /// epoch bump makes any late result a no-op.
    pub fn reset(&self, display_name: Option<&str>) {
        let welcome = ConversationTurn::assistant(
            self.ids.next_id(),
            welcome_text(display_name),
            Vec::new(),
        );

        let mut st = self.state.lock().unwrap();
        st.turns = vec![welcome];
        st.session_id = None;
        st.exchange = ExchangeState::Idle;
        st.epoch += 1;
    }

    /// Send one user message and append the assistant's reply
    ///
    /// Returns false without side effects when `text` is blank or another
    /// exchange is already in flight; submissions are rejected rather than
    /// queued so the transcript cannot interleave. The user turn is appended
    /// optimistically before the network call; on failure a fixed fallback
    /// assistant turn is appended and the session id is left unchanged.
    pub async fn submit(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        let (epoch, session_id) = {
            let mut st = self.state.lock().unwrap();
            if st.exchange == ExchangeState::Sending {
                tracing::debug!("Rejecting submit: an exchange is already in flight");
                return false;
            }

            let turn = ConversationTurn::user(self.ids.next_id(), text.to_string());
            st.turns.push(turn);
            st.exchange = ExchangeState::Sending;
            (st.epoch, st.session_id.clone())
        };

        let result = self
            .api
            .send_chat_message(text, session_id.as_deref())
            .await;

        let mut st = self.state.lock().unwrap();
        if st.epoch != epoch {
            // The conversation was reset while we were waiting; the reset
            // already returned the controller to Idle. Drop the result.
            tracing::debug!("Discarding reply that resolved after a reset");
            return true;
        }

        match result {
            Ok(reply) => {
                let products = reply.products.unwrap_or_default();
                st.turns.push(ConversationTurn::assistant(
                    self.ids.next_id(),
                    reply.response,
                    products,
                ));
                st.session_id = Some(reply.session_id);
            }
            Err(err) => {
                tracing::warn!("Chat exchange failed: {}", err);
                st.turns.push(ConversationTurn::assistant(
                    self.ids.next_id(),
                    FALLBACK_TURN_TEXT.to_string(),
                    Vec::new(),
                ));
            }
        }
        st.exchange = ExchangeState::Idle;
        true
    }

    /// Replace the transcript with a stored conversation record
    ///
    /// On failure the current transcript and session are left untouched.
    pub async fn load_session(&self, session_id: &str) -> Result<(), ApiError> {
        let record = self.api.get_chat_session(session_id).await?;

        let turns = record
            .messages
            .into_iter()
            .map(|msg| {
                let author = if msg.sender == "user" {
                    Author::User
                } else {
                    Author::Assistant
                };
                ConversationTurn {
                    id: msg.id,
                    author,
                    text: msg.content,
                    created_at: msg.timestamp,
                    products: msg.products.unwrap_or_default(),
                }
            })
            .collect();

        let mut st = self.state.lock().unwrap();
        st.turns = turns;
        st.session_id = Some(record.id);
        st.exchange = ExchangeState::Idle;
        st.epoch += 1;
        Ok(())
    }
}
