//! Client state controllers
//!
//! Each controller exclusively owns one slice of client state (credentials,
//! catalog, conversation) and exposes the operations that mutate it; the
//! bootstrap coordinator composes them at startup. The presentation layer
//! only reads controller state and dispatches intents.

pub mod auth;
pub mod bootstrap;
pub mod catalog;
pub mod conversation;
pub mod ids;
pub mod traits;
pub mod types;

pub use auth::{AuthStatus, CredentialController};
pub use bootstrap::SessionBootstrap;
pub use catalog::CatalogController;
pub use conversation::{ConversationController, ExchangeState};
pub use ids::{MonotonicTurnIds, TurnIdGen};
pub use traits::{AuthSnapshot, CredentialStore};
pub use types::{welcome_text, Author, ConversationTurn, FALLBACK_TURN_TEXT};
