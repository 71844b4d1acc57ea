//! Single entry point reconciling the remote catalog with the local cache.
//!
//! Every request resolves to data, never to an error:
//!
//! * offline: the no-network notice fires, then the cache is served without
//!   touching the network;
//! * online and a body came back: it is decoded (a malformed body counts as
//!   empty), written through to the cache and returned;
//! * online but no body came back: the cache is served, no notice.
//!
//! Exactly one network attempt is made per request.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::CatalogApi;
use crate::catalog::{decode_categories, decode_products, Product};
use crate::connectivity::ConnectivityMonitor;
use crate::error::{CatalogError, CatalogResult};
use crate::store::LocalCatalogStore;

/// One-shot callback fired when a request takes the offline branch.
pub type NoNetworkNotice = Box<dyn FnOnce() + Send>;

pub struct CatalogGateway {
    api: Arc<dyn CatalogApi>,
    store: Arc<dyn LocalCatalogStore>,
    connectivity: Arc<ConnectivityMonitor>,
}

impl CatalogGateway {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        store: Arc<dyn LocalCatalogStore>,
        connectivity: Arc<ConnectivityMonitor>,
    ) -> Self {
        Self {
            api,
            store,
            connectivity,
        }
    }

    pub fn store(&self) -> &Arc<dyn LocalCatalogStore> {
        &self.store
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityMonitor> {
        &self.connectivity
    }

    /// All categories, in server order when fresh.
    pub async fn fetch_categories(&self, on_no_network: Option<NoNetworkNotice>) -> Vec<String> {
        if self.is_offline("categories", on_no_network) {
            return self.store.load_categories();
        }

        match self.api.fetch_categories().await {
            Ok(body) => {
                let categories = decode_or_empty("categories", decode_categories(&body));
                // The store already logged the failure; fresh data is returned regardless.
                if self.store.save_categories(&categories).is_err() {
                    warn!("Write-through of categories failed");
                }
                categories
            }
            Err(e) => {
                warn!("Fetching categories failed, serving cache: {}", e);
                self.store.load_categories()
            }
        }
    }

    /// Products of `category`. Fresh results are appended to the cache.
    pub async fn fetch_products(
        &self,
        category: &str,
        on_no_network: Option<NoNetworkNotice>,
    ) -> Vec<Product> {
        if self.is_offline(category, on_no_network) {
            return self.store.load_products(category);
        }

        match self.api.fetch_products(category).await {
            Ok(body) => {
                let products = decode_or_empty(category, decode_products(&body));
                if self.store.save_products(&products, category).is_err() {
                    warn!("Write-through of products for {:?} failed", category);
                }
                products
            }
            Err(e) => {
                warn!("Fetching products for {:?} failed, serving cache: {}", category, e);
                self.store.load_products(category)
            }
        }
    }

    /// Fires the notice when the offline branch is taken.
    fn is_offline(&self, what: &str, on_no_network: Option<NoNetworkNotice>) -> bool {
        if self.connectivity.current_status() {
            return false;
        }
        debug!("{}, serving cached {:?}", CatalogError::Offline, what);
        if let Some(notice) = on_no_network {
            notice();
        }
        true
    }
}

fn decode_or_empty<T>(what: &str, decoded: CatalogResult<Vec<T>>) -> Vec<T> {
    decoded.unwrap_or_else(|e| {
        warn!("Could not decode {:?}, treating as empty: {}", what, e);
        Vec::new()
    })
}
