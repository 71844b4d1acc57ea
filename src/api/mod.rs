mod client;

pub use client::{CatalogApi, HttpCatalogApi};

#[cfg(feature = "mock")]
pub use client::MockCatalogApi;
