//! End-to-end flows over the composed controllers: startup restoration,
//! conversation bootstrap, and the reset-during-flight race.

use async_trait::async_trait;
use shopchat::api::{
    ApiError, AuthPayload, CategoryStat, ChatReply, Product, SearchFilters, SessionRecord,
    SessionSummary, ShopApi, User,
};
use shopchat::core::{
    Author, AuthSnapshot, AuthStatus, ConversationController, CredentialController,
    CredentialStore, MonotonicTurnIds, SessionBootstrap,
};
use shopchat::MemoryCredentialStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Backend double: profile succeeds only for the expected token, chat echoes
/// the message back under a fixed session id.
struct FakeBackend {
    store: Arc<MemoryCredentialStore>,
    valid_token: &'static str,
    chat_calls: AtomicUsize,
}

impl FakeBackend {
    fn new(store: Arc<MemoryCredentialStore>, valid_token: &'static str) -> Self {
        Self {
            store,
            valid_token,
            chat_calls: AtomicUsize::new(0),
        }
    }

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }
}

#[async_trait]
impl ShopApi for FakeBackend {
    async fn login(&self, username: &str, password: &str) -> Result<AuthPayload, ApiError> {
        if username == "alice" && password == "secret" {
            Ok(AuthPayload {
                access_token: self.valid_token.to_string(),
                token_type: Some("bearer".to_string()),
                user: Self::alice(),
            })
        } else {
            Err(ApiError::Unauthorized("bad credentials".to_string()))
        }
    }

    async fn register(&self, _: &str, _: &str, _: &str) -> Result<AuthPayload, ApiError> {
        Err(ApiError::Validation("registration closed".to_string()))
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        // The adapter reads the bearer token from the store on each call;
        // the fake validates it the same way the backend would.
        match self.store.token() {
            Some(token) if token == self.valid_token => Ok(Self::alice()),
            Some(_) => Err(ApiError::Unauthorized("token expired".to_string())),
            None => Err(ApiError::Unauthorized("missing token".to_string())),
        }
    }

    async fn search(&self, _: &str, _: &SearchFilters) -> Result<Vec<Product>, ApiError> {
        Ok(Vec::new())
    }

    async fn get_categories(&self) -> Result<Vec<CategoryStat>, ApiError> {
        Ok(Vec::new())
    }

    async fn get_brands(&self) -> Result<Vec<String>, ApiError> {
        Ok(Vec::new())
    }

    async fn get_featured(&self) -> Result<Vec<Product>, ApiError> {
        Ok(Vec::new())
    }

    async fn get_trending(&self) -> Result<Vec<Product>, ApiError> {
        Ok(Vec::new())
    }

    async fn send_chat_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ChatReply {
            response: format!("echo: {}", message),
            session_id: session_id.unwrap_or("sess-new").to_string(),
            products: None,
        })
    }

    async fn get_chat_session(&self, _: &str) -> Result<SessionRecord, ApiError> {
        Err(ApiError::NotFound("no such session".to_string()))
    }

    async fn list_chat_sessions(&self) -> Result<Vec<SessionSummary>, ApiError> {
        Ok(Vec::new())
    }
}

struct App {
    auth: Arc<CredentialController>,
    conversation: Arc<ConversationController>,
    bootstrap: SessionBootstrap,
    store: Arc<MemoryCredentialStore>,
    backend: Arc<FakeBackend>,
}

fn build_app() -> App {
    let store = Arc::new(MemoryCredentialStore::new());
    let backend = Arc::new(FakeBackend::new(store.clone(), "tok-valid"));
    let api: Arc<dyn ShopApi> = backend.clone();
    let auth = Arc::new(CredentialController::new(api.clone(), store.clone()));
    let conversation = Arc::new(ConversationController::new(
        api,
        Arc::new(MonotonicTurnIds::new()),
    ));
    let bootstrap = SessionBootstrap::new(auth.clone(), conversation.clone());
    App {
        auth,
        conversation,
        bootstrap,
        store,
        backend,
    }
}

#[tokio::test]
async fn anonymous_startup_greets_generically() {
    let app = build_app();
    app.bootstrap.start().await;

    assert_eq!(app.auth.status(), AuthStatus::Anonymous);
    let turns = app.conversation.turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].author, Author::Assistant);
    assert!(turns[0].text.starts_with("Hi! 👋"));
    assert!(app.conversation.session_id().is_none());
}

#[tokio::test]
async fn startup_with_valid_token_greets_by_name() {
    let app = build_app();
    app.store.set_token("tok-valid").unwrap();
    app.store
        .set_snapshot(&AuthSnapshot {
            user: Some(FakeBackend::alice()),
            is_authenticated: true,
        })
        .unwrap();

    app.bootstrap.start().await;

    assert!(app.auth.is_authenticated());
    let turns = app.conversation.turns();
    assert_eq!(turns.len(), 1);
    assert!(turns[0].text.contains("Hi alice!"));
}

#[tokio::test]
async fn startup_with_expired_token_falls_back_to_anonymous() {
    let app = build_app();
    app.store.set_token("tok-expired").unwrap();

    app.bootstrap.start().await;

    assert_eq!(app.auth.status(), AuthStatus::Anonymous);
    assert!(app.store.token().is_none());
    assert!(app.conversation.turns()[0].text.starts_with("Hi! 👋"));
}

#[tokio::test]
async fn login_then_reset_personalizes_welcome_without_touching_credentials() {
    let app = build_app();
    app.bootstrap.start().await;

    assert!(app.auth.login("alice", "secret").await);
    app.conversation.submit("find shoes").await;
    assert!(app.conversation.session_id().is_some());

    app.bootstrap.reset_conversation();

    let turns = app.conversation.turns();
    assert_eq!(turns.len(), 1);
    assert!(turns[0].text.contains("Hi alice!"));
    assert!(app.conversation.session_id().is_none());
    // Reset is conversation-local; the credential survives
    assert!(app.auth.is_authenticated());
    assert_eq!(app.store.token().as_deref(), Some("tok-valid"));
}

#[tokio::test]
async fn conversation_maintains_session_across_turns() {
    let app = build_app();
    app.bootstrap.start().await;

    app.conversation.submit("hello").await;
    assert_eq!(app.conversation.session_id().as_deref(), Some("sess-new"));

    app.conversation.submit("more").await;
    // The echo backend returns whatever id was sent, proving the client
    // echoed the established session back.
    assert_eq!(app.conversation.session_id().as_deref(), Some("sess-new"));

    let turns = app.conversation.turns();
    assert_eq!(turns.len(), 5);
    assert_eq!(turns[4].text, "echo: more");
    assert_eq!(app.backend.chat_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn logout_then_restart_is_anonymous() {
    let app = build_app();
    app.store.set_token("tok-valid").unwrap();
    app.bootstrap.start().await;
    assert!(app.auth.is_authenticated());

    app.auth.logout();
    app.bootstrap.start().await;

    assert_eq!(app.auth.status(), AuthStatus::Anonymous);
    assert!(app.store.token().is_none());
}
