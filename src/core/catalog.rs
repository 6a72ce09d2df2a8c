//! Catalog controller - product search results and reference data
//!
//! Plain re-fetch semantics, no caching: every call replaces its result
//! slice wholesale. On failure the slice is cleared to empty and the typed
//! error kind recorded, so stale data never coexists with a failure flag.
//! The five slices are disjoint, so fetches may run concurrently.

use crate::api::{ApiError, CategoryStat, ErrorKind, Product, SearchFilters, ShopApi};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CatalogState {
    products: Vec<Product>,
    categories: Vec<CategoryStat>,
    brands: Vec<String>,
    featured: Vec<Product>,
    trending: Vec<Product>,
    pending_search: bool,
    pending_categories: bool,
    pending_brands: bool,
    pending_featured: bool,
    pending_trending: bool,
    last_error: Option<ErrorKind>,
}

/// Owns the catalog slice: search results, categories, brands, showcases
pub struct CatalogController {
    api: Arc<dyn ShopApi>,
    state: Mutex<CatalogState>,
}

impl CatalogController {
    pub fn new(api: Arc<dyn ShopApi>) -> Self {
        Self {
            api,
            state: Mutex::new(CatalogState::default()),
        }
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.lock().unwrap().products.clone()
    }

    pub fn categories(&self) -> Vec<CategoryStat> {
        self.state.lock().unwrap().categories.clone()
    }

    pub fn brands(&self) -> Vec<String> {
        self.state.lock().unwrap().brands.clone()
    }

    pub fn featured(&self) -> Vec<Product> {
        self.state.lock().unwrap().featured.clone()
    }

    pub fn trending(&self) -> Vec<Product> {
        self.state.lock().unwrap().trending.clone()
    }

    pub fn is_searching(&self) -> bool {
        self.state.lock().unwrap().pending_search
    }

    /// Typed kind of the most recent failed fetch, if any
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.state.lock().unwrap().last_error
    }

    /// Run a product search, replacing the previous result set
    pub async fn search(&self, query: &str, filters: &SearchFilters) {
        self.state.lock().unwrap().pending_search = true;
        let result = self.api.search(query, filters).await;

        let mut st = self.state.lock().unwrap();
        st.pending_search = false;
        let items = Self::settle(result, &mut st.last_error, "search");
        st.products = items;
    }

    pub async fn get_categories(&self) {
        self.state.lock().unwrap().pending_categories = true;
        let result = self.api.get_categories().await;

        let mut st = self.state.lock().unwrap();
        st.pending_categories = false;
        let items = Self::settle(result, &mut st.last_error, "categories");
        st.categories = items;
    }

    pub async fn get_brands(&self) {
        self.state.lock().unwrap().pending_brands = true;
        let result = self.api.get_brands().await;

        let mut st = self.state.lock().unwrap();
        st.pending_brands = false;
        let items = Self::settle(result, &mut st.last_error, "brands");
        st.brands = items;
    }

    pub async fn get_featured(&self) {
        self.state.lock().unwrap().pending_featured = true;
        let result = self.api.get_featured().await;

        let mut st = self.state.lock().unwrap();
        st.pending_featured = false;
        let items = Self::settle(result, &mut st.last_error, "featured");
        st.featured = items;
    }

    pub async fn get_trending(&self) {
        self.state.lock().unwrap().pending_trending = true;
        let result = self.api.get_trending().await;

        let mut st = self.state.lock().unwrap();
        st.pending_trending = false;
        let items = Self::settle(result, &mut st.last_error, "trending");
        st.trending = items;
    }

    /// Forget the current search results (e.g., when leaving the search view)
    pub fn clear_products(&self) {
        let mut st = self.state.lock().unwrap();
        st.products.clear();
        st.last_error = None;
    }

    /// A successful fetch replaces the slice and clears the error flag; a
    /// failed one yields an empty slice and records the kind.
    fn settle<T>(
        result: Result<Vec<T>, ApiError>,
        last_error: &mut Option<ErrorKind>,
        what: &str,
    ) -> Vec<T> {
        match result {
            Ok(items) => {
                *last_error = None;
                items
            }
            Err(err) => {
                tracing::warn!("Catalog {} fetch failed: {}", what, err);
                *last_error = Some(err.kind());
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        AuthPayload, ChatReply, SessionRecord, SessionSummary, User,
    };
    use async_trait::async_trait;

    struct CatalogApi {
        fail: bool,
    }

    fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price: 99.99,
            category: "Audio".to_string(),
            brand: "Sony".to_string(),
            image_url: "https://example.com/p.jpg".to_string(),
            rating: 4.5,
            stock: 12,
            features: Vec::new(),
        }
    }

    #[async_trait]
    impl ShopApi for CatalogApi {
        async fn login(&self, _: &str, _: &str) -> Result<AuthPayload, ApiError> {
            unreachable!()
        }
        async fn register(&self, _: &str, _: &str, _: &str) -> Result<AuthPayload, ApiError> {
            unreachable!()
        }
        async fn fetch_profile(&self) -> Result<User, ApiError> {
            unreachable!()
        }
        async fn search(&self, query: &str, _: &SearchFilters) -> Result<Vec<Product>, ApiError> {
            if self.fail {
                Err(ApiError::Server("boom".to_string()))
            } else {
                Ok(vec![product(1, query)])
            }
        }
        async fn get_categories(&self) -> Result<Vec<CategoryStat>, ApiError> {
            if self.fail {
                Err(ApiError::Network("down".to_string()))
            } else {
                Ok(vec![CategoryStat {
                    category: "Audio".to_string(),
                    count: 12,
                    avg_rating: 4.2,
                    avg_price: 149.0,
                }])
            }
        }
        async fn get_brands(&self) -> Result<Vec<String>, ApiError> {
            if self.fail {
                Err(ApiError::Network("down".to_string()))
            } else {
                Ok(vec!["Sony".to_string(), "Bose".to_string()])
            }
        }
        async fn get_featured(&self) -> Result<Vec<Product>, ApiError> {
            Ok(vec![product(2, "featured")])
        }
        async fn get_trending(&self) -> Result<Vec<Product>, ApiError> {
            Ok(vec![product(3, "trending")])
        }
        async fn send_chat_message(
            &self,
            _: &str,
            _: Option<&str>,
        ) -> Result<ChatReply, ApiError> {
            unreachable!()
        }
        async fn get_chat_session(&self, _: &str) -> Result<SessionRecord, ApiError> {
            unreachable!()
        }
        async fn list_chat_sessions(&self) -> Result<Vec<SessionSummary>, ApiError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_search_replaces_results() {
        let catalog = CatalogController::new(Arc::new(CatalogApi { fail: false }));

        catalog.search("headphones", &SearchFilters::default()).await;
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.products()[0].name, "headphones");
        assert!(catalog.last_error().is_none());
        assert!(!catalog.is_searching());

        catalog.search("speakers", &SearchFilters::default()).await;
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.products()[0].name, "speakers");
    }

    #[tokio::test]
    async fn test_failed_search_clears_slice_and_sets_error() {
        let ok = CatalogController::new(Arc::new(CatalogApi { fail: false }));
        ok.search("headphones", &SearchFilters::default()).await;
        assert!(!ok.products().is_empty());

        let failing = CatalogController::new(Arc::new(CatalogApi { fail: true }));
        failing.search("headphones", &SearchFilters::default()).await;
        assert!(failing.products().is_empty());
        assert_eq!(failing.last_error(), Some(ErrorKind::Server));
    }

    #[tokio::test]
    async fn test_reference_data_fetches() {
        let catalog = CatalogController::new(Arc::new(CatalogApi { fail: false }));

        catalog.get_categories().await;
        catalog.get_brands().await;
        catalog.get_featured().await;
        catalog.get_trending().await;

        assert_eq!(catalog.categories().len(), 1);
        assert_eq!(catalog.brands(), vec!["Sony", "Bose"]);
        assert_eq!(catalog.featured()[0].name, "featured");
        assert_eq!(catalog.trending()[0].name, "trending");
    }

    #[tokio::test]
    async fn test_slices_are_disjoint_under_failure() {
        let catalog = CatalogController::new(Arc::new(CatalogApi { fail: true }));

        // Featured/trending still succeed while categories fail
        catalog.get_featured().await;
        catalog.get_categories().await;

        assert_eq!(catalog.featured().len(), 1);
        assert!(catalog.categories().is_empty());
        assert_eq!(catalog.last_error(), Some(ErrorKind::Network));
    }

    #[tokio::test]
    async fn test_clear_products() {
        let catalog = CatalogController::new(Arc::new(CatalogApi { fail: false }));
        catalog.search("headphones", &SearchFilters::default()).await;

        catalog.clear_products();
        assert!(catalog.products().is_empty());
        assert!(catalog.last_error().is_none());
    }
}
