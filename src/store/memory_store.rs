//! Volatile catalog cache.
//!
//! Same semantics as the SQLite store without touching disk. Useful for
//! tests and for consumers that only want the network fallback within one
//! process lifetime.

use super::trait_def::LocalCatalogStore;
use crate::catalog::{CacheSnapshot, Product};
use crate::error::CatalogResult;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Records {
    categories: Vec<String>,
    products: Vec<(String, Product)>,
}

#[derive(Default)]
pub struct InMemoryCatalogStore {
    records: Mutex<Records>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalCatalogStore for InMemoryCatalogStore {
    fn save_categories(&self, names: &[String]) -> CatalogResult<()> {
        self.lock().categories = names.to_vec();
        Ok(())
    }

    fn load_categories(&self) -> Vec<String> {
        self.lock().categories.clone()
    }

    fn save_products(&self, products: &[Product], category: &str) -> CatalogResult<()> {
        self.lock().products.extend(
            products
                .iter()
                .map(|product| (category.to_string(), product.clone())),
        );
        Ok(())
    }

    fn load_products(&self, category: &str) -> Vec<Product> {
        self.lock()
            .products
            .iter()
            .filter(|(tag, _)| tag == category)
            .map(|(_, product)| product.clone())
            .collect()
    }

    fn clear_products(&self, category: &str) -> CatalogResult<usize> {
        let mut records = self.lock();
        let before = records.products.len();
        records.products.retain(|(tag, _)| tag != category);
        Ok(before - records.products.len())
    }

    fn snapshot(&self) -> CacheSnapshot {
        let records = self.lock();
        let mut snapshot = CacheSnapshot {
            categories: records.categories.clone(),
            ..Default::default()
        };
        for (category, product) in &records.products {
            snapshot
                .products
                .entry(category.clone())
                .or_default()
                .push(product.clone());
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_sqlite_semantics() {
        let store = InMemoryCatalogStore::new();
        let a = Product::new("a", "", "", 1.0);
        let b = Product::new("b", "", "", 2.0);

        store
            .save_categories(&["pizza".to_string(), "pizza".to_string()])
            .unwrap();
        store.save_products(&[a.clone()], "pizza").unwrap();
        store.save_products(&[b.clone()], "pizza").unwrap();

        assert_eq!(store.load_categories(), vec!["pizza", "pizza"]);
        assert_eq!(store.load_products("pizza"), vec![a, b]);
        assert_eq!(store.snapshot().product_count(), 2);
        assert_eq!(store.clear_products("pizza").unwrap(), 2);
        assert!(store.load_products("pizza").is_empty());
    }
}
