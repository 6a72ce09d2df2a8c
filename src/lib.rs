//! shopchat: terminal client for a shopping-assistant backend
//!
//! This library provides:
//! - A typed API adapter over the backend's HTTP/JSON endpoints
//! - State controllers for credentials, catalog data, and the conversation
//!   transcript (optimistic updates reconciled against server replies)
//! - Durable credential storage so a login survives process restarts
//! - A bootstrap coordinator that sequences startup restoration

pub mod api;
pub mod config;
pub mod core;
pub mod storage;

pub use api::{ApiError, ErrorKind, HttpApi, ShopApi};
pub use config::Config;
pub use crate::core::{
    CatalogController, ConversationController, CredentialController, SessionBootstrap,
};
pub use storage::{FileCredentialStore, MemoryCredentialStore};
