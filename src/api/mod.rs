//! Backend API access
//!
//! The [`ShopApi`] trait is the single seam between the state controllers and
//! the network; [`HttpApi`] is the reqwest implementation. Controllers never
//! build requests themselves, and the adapter never mutates controller state.

mod client;
mod error;
mod types;

pub use client::HttpApi;
pub use error::{ApiError, ErrorKind};
pub use types::{
    AuthPayload, CategoryStat, ChatReply, Product, SearchFilters, SessionMessage, SessionRecord,
    SessionSummary, User,
};

use async_trait::async_trait;

/// One operation per backend capability
///
/// Every method returns a typed payload or a typed [`ApiError`]; nothing here
/// panics. Implementations must attach the current bearer token to every call
/// except `login`/`register` when one is stored, and must not block on its
/// absence (the backend decides authorization).
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Exchange username/password for a token and identity
    async fn login(&self, username: &str, password: &str) -> Result<AuthPayload, ApiError>;

    /// Create an account and log in, in one exchange
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError>;

    /// Fetch the profile behind the current token
    async fn fetch_profile(&self) -> Result<User, ApiError>;

    /// Full-text product search with optional filters
    async fn search(&self, query: &str, filters: &SearchFilters)
        -> Result<Vec<Product>, ApiError>;

    /// Per-category aggregates over the catalog
    async fn get_categories(&self) -> Result<Vec<CategoryStat>, ApiError>;

    /// Distinct brand names in the catalog
    async fn get_brands(&self) -> Result<Vec<String>, ApiError>;

    /// Editorially featured products
    async fn get_featured(&self) -> Result<Vec<Product>, ApiError>;

    /// Currently trending products
    async fn get_trending(&self) -> Result<Vec<Product>, ApiError>;

    /// Send one chat message, echoing the session id once one is known
    async fn send_chat_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ApiError>;

    /// Fetch a stored conversation record by id
    async fn get_chat_session(&self, session_id: &str) -> Result<SessionRecord, ApiError>;

    /// List the caller's stored conversations
    async fn list_chat_sessions(&self) -> Result<Vec<SessionSummary>, ApiError>;
}
