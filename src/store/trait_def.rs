//! LocalCatalogStore trait definition.

use crate::catalog::{CacheSnapshot, Product};
use crate::error::CatalogResult;
use clap::ValueEnum;
use serde::Deserialize;

/// What a failed category replace leaves behind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryReplacePolicy {
    /// The delete is committed even when the insert fails, leaving the
    /// category cache empty.
    #[default]
    DeleteThenInsert,
    /// An insert failure rolls the delete back too, keeping the previous
    /// category set.
    Transactional,
}

/// Persistent cache of the last successfully fetched catalog data.
///
/// Every operation is atomic on its own. Loads never fail: a read error is
/// logged and reported as an empty result. Saves log and return their error so
/// callers can decide whether they care.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait LocalCatalogStore: Send + Sync {
    /// Replaces the whole category set with `names`, exactly as given.
    fn save_categories(&self, names: &[String]) -> CatalogResult<()>;

    /// Cached category names in storage order.
    fn load_categories(&self) -> Vec<String>;

    /// Appends `products` to whatever is already cached for `category`.
    fn save_products(&self, products: &[Product], category: &str) -> CatalogResult<()>;

    /// Cached products for `category` in storage order.
    fn load_products(&self, category: &str) -> Vec<Product>;

    /// Drops every cached product of `category`, returning how many were removed.
    fn clear_products(&self, category: &str) -> CatalogResult<usize>;

    /// Everything currently cached.
    fn snapshot(&self) -> CacheSnapshot;
}
