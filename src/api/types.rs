//! Wire types for the backend API
//!
//! Field names match the backend's JSON exactly; these types cross the wire
//! unchanged and double as the read-only domain projections (products are
//! never mutated client-side).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user identity as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Payload returned by login and register
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

/// Catalog product, read-only projection of backend data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    pub image_url: String,
    pub rating: f64,
    pub stock: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Per-category aggregate returned by the categories endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub count: u64,
    pub avg_rating: f64,
    pub avg_price: f64,
}

/// Optional filters for product search, serialized into query parameters
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

/// Assistant reply to a chat message
///
/// `session_id` is issued by the backend on the first exchange and must be
/// echoed on every subsequent message to keep server-side context.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    #[serde(default)]
    pub products: Option<Vec<Product>>,
}

/// One stored message inside a server-side conversation record
#[derive(Debug, Clone, Deserialize)]
pub struct SessionMessage {
    pub id: String,
    pub content: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub products: Option<Vec<Product>>,
}

/// Full server-side conversation record
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<SessionMessage>,
}

/// Listing entry for a stored conversation
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
