//! HTTP implementation of the backend API
//!
//! A thin, stateless wrapper: each method is one request/response exchange
//! against the configured base URL. The current bearer token (if any) is read
//! from the credential store on every call, so a login that lands mid-session
//! takes effect on the next request without rebuilding the client.

use super::{
    ApiError, AuthPayload, CategoryStat, ChatReply, Product, SearchFilters, SessionRecord,
    SessionSummary, ShopApi, User,
};
use crate::core::traits::CredentialStore;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
}

impl HttpApi {
    /// Create a client against `base_url`, reading tokens from `store`
    pub fn new(base_url: &str, timeout_secs: u64, store: Arc<dyn CredentialStore>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored bearer token, if one exists
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = req.send().await.map_err(ApiError::from_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_http_status(status, error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Unknown(format!("Malformed response body: {}", e)))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.authorize(self.client.get(self.url(path))))
            .await
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.authorize(self.client.post(self.url(path)).json(body)))
            .await
    }
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ChatMessageBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

#[async_trait]
impl ShopApi for HttpApi {
    async fn login(&self, username: &str, password: &str) -> Result<AuthPayload, ApiError> {
        // The backend's login endpoint takes form-encoded credentials
        // (OAuth2 password flow); register takes JSON.
        let form = [("username", username), ("password", password)];
        self.execute(self.client.post(self.url("/auth/login")).form(&form))
            .await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError> {
        let body = RegisterBody {
            username,
            email,
            password,
        };
        self.execute(self.client.post(self.url("/auth/register")).json(&body))
            .await
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.get("/auth/profile").await
    }

    async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Product>, ApiError> {
        let req = self
            .client
            .get(self.url("/products/search"))
            .query(&[("q", query)])
            .query(filters);
        self.execute(self.authorize(req)).await
    }

    async fn get_categories(&self) -> Result<Vec<CategoryStat>, ApiError> {
        self.get("/products/categories").await
    }

    async fn get_brands(&self) -> Result<Vec<String>, ApiError> {
        self.get("/products/brands").await
    }

    async fn get_featured(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/products/featured").await
    }

    async fn get_trending(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/products/trending").await
    }

    async fn send_chat_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        let body = ChatMessageBody {
            message,
            session_id,
        };
        self.post_json("/chat/message", &body).await
    }

    async fn get_chat_session(&self, session_id: &str) -> Result<SessionRecord, ApiError> {
        self.get(&format!("/chat/session/{}", session_id)).await
    }

    async fn list_chat_sessions(&self) -> Result<Vec<SessionSummary>, ApiError> {
        self.get("/chat/sessions").await
    }
}
