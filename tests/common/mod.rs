//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{Harness, TestApi, CATEGORIES_BODY};
//!
//! #[tokio::test]
//! async fn test_fetch_categories() {
//!     let api = TestApi::spawn().await;
//!     api.serve_categories(CATEGORIES_BODY);
//!     let harness = Harness::new(&api.base_url);
//!
//!     let categories = harness.gateway.fetch_categories(None).await;
//!     assert_eq!(categories, vec!["pizza", "drinks"]);
//! }
//! ```

#![allow(dead_code)]

mod api;
mod constants;

pub use api::{dead_base_url, TestApi};
pub use constants::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use topizza_catalog::connectivity::{channel_observer, PathReporter};
use topizza_catalog::{
    CatalogGateway, CategoryReplacePolicy, ConnectivityMonitor, HttpCatalogApi, NoNetworkNotice,
    PathStatus, SqliteCatalogStore,
};

/// Gateway wired to a real SQLite cache in a temp dir and a hand-driven
/// connectivity monitor.
pub struct Harness {
    pub gateway: Arc<CatalogGateway>,
    pub store: Arc<SqliteCatalogStore>,
    pub monitor: Arc<ConnectivityMonitor>,
    reporter: PathReporter,
    _temp_dir: Arc<TempDir>,
}

impl Harness {
    pub fn new(base_url: &str) -> Self {
        Self::with_policy(base_url, CategoryReplacePolicy::DeleteThenInsert)
    }

    pub fn with_policy(base_url: &str, policy: CategoryReplacePolicy) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            SqliteCatalogStore::new(temp_dir.path().join("catalog.db"))
                .expect("Failed to open catalog cache")
                .with_replace_policy(policy),
        );
        Self::assemble(base_url, store, Arc::new(temp_dir))
    }

    /// A second gateway over the same cache, talking to another service.
    pub fn sharing_cache_with(&self, base_url: &str) -> Self {
        Self::assemble(base_url, self.store.clone(), self._temp_dir.clone())
    }

    fn assemble(base_url: &str, store: Arc<SqliteCatalogStore>, temp_dir: Arc<TempDir>) -> Self {
        let api = Arc::new(HttpCatalogApi::new(base_url, None).expect("Failed to build client"));
        let (reporter, observer) = channel_observer();
        let monitor = Arc::new(ConnectivityMonitor::spawn(observer));
        let gateway = Arc::new(CatalogGateway::new(api, store.clone(), monitor.clone()));
        Self {
            gateway,
            store,
            monitor,
            reporter,
            _temp_dir: temp_dir,
        }
    }

    pub async fn go_offline(&self) {
        self.reporter.report(PathStatus::Unsatisfied);
        assert!(self.monitor.wait_for_status(false).await);
    }

    pub async fn go_online(&self) {
        self.reporter.report(PathStatus::Satisfied);
        assert!(self.monitor.wait_for_status(true).await);
    }
}

/// Counts how many times the no-network notice fired.
#[derive(Clone, Default)]
pub struct NoticeCounter(Arc<AtomicUsize>);

impl NoticeCounter {
    pub fn notice(&self) -> Option<NoNetworkNotice> {
        let counter = self.0.clone();
        Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
