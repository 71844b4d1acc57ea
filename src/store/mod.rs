//! Local persistent cache of the last fetched catalog.

mod memory_store;
mod schema;
mod sqlite_store;
mod trait_def;

pub use memory_store::InMemoryCatalogStore;
pub use sqlite_store::SqliteCatalogStore;
pub use trait_def::{CategoryReplacePolicy, LocalCatalogStore};

#[cfg(feature = "mock")]
pub use trait_def::MockLocalCatalogStore;
