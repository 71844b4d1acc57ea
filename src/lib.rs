//! Offline-first catalog access for the ToPizza storefront.
//!
//! [`CatalogGateway`] fetches categories and products from the remote catalog,
//! writes every successful response through to a [`LocalCatalogStore`], and
//! serves the cache whenever the [`ConnectivityMonitor`] says the network is
//! down or a request brings nothing back.

pub mod api;
pub mod catalog;
pub mod config;
pub mod connectivity;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod sqlite_persistence;
pub mod store;

// Re-export commonly used types for convenience
pub use api::{CatalogApi, HttpCatalogApi};
pub use catalog::{CacheSnapshot, Product};
pub use connectivity::{ConnectivityMonitor, PathStatus};
pub use dispatch::{main_context, CatalogDispatcher, MainContext, MainLoop, RequestHandle};
pub use error::CatalogError;
pub use gateway::{CatalogGateway, NoNetworkNotice};
pub use store::{CategoryReplacePolicy, InMemoryCatalogStore, LocalCatalogStore, SqliteCatalogStore};
