//! Core domain types shared by the state controllers

use crate::api::Product;
use chrono::{DateTime, Utc};

/// Fallback assistant text shown when an exchange fails for any reason
pub const FALLBACK_TURN_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Who authored a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

/// One message in the conversation transcript
///
/// Immutable once appended; the transcript only grows until a full reset.
/// Assistant turns may carry products attached by the backend (an empty vec
/// means none).
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub products: Vec<Product>,
}

impl ConversationTurn {
    pub fn user(id: String, text: String) -> Self {
        Self {
            id,
            author: Author::User,
            text,
            created_at: Utc::now(),
            products: Vec::new(),
        }
    }

    pub fn assistant(id: String, text: String, products: Vec<Product>) -> Self {
        Self {
            id,
            author: Author::Assistant,
            text,
            created_at: Utc::now(),
            products,
        }
    }
}

/// Welcome text for a fresh transcript, personalized when a name is known
pub fn welcome_text(display_name: Option<&str>) -> String {
    match display_name {
        Some(name) => format!(
            "Hi {}! 👋 I'm your personal shopping assistant. I can help you find products, \
             compare items, get recommendations, and answer any questions about our inventory. \
             What are you looking for today?",
            name
        ),
        None => "Hi! 👋 How can I help you with your shopping today?".to_string(),
    }
}
