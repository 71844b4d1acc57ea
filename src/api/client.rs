//! HTTP client for the remote catalog service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::CatalogResult;

/// Read-only access to the remote catalog.
///
/// Implementations return the raw response body: any body at all counts as
/// "data returned", decoding is up to the caller. An `Err` means no data came
/// back.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET categories`
    async fn fetch_categories(&self) -> CatalogResult<Vec<u8>>;

    /// `GET products?category=<name>`
    async fn fetch_products(&self, category: &str) -> CatalogResult<Vec<u8>>;
}

/// reqwest-backed [`CatalogApi`].
pub struct HttpCatalogApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogApi {
    /// Create a new catalog client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the catalog service (e.g., "http://localhost:8080")
    /// * `timeout` - Request timeout; `None` keeps the transport default
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn categories_url(&self) -> String {
        format!("{}/categories", self.base_url)
    }

    fn products_url(&self, category: &str) -> String {
        format!(
            "{}/products?category={}",
            self.base_url,
            urlencoding::encode(category)
        )
    }

    async fn get_body(&self, url: &str) -> CatalogResult<Vec<u8>> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("GET {} returned status {}", url, status);
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_categories(&self) -> CatalogResult<Vec<u8>> {
        self.get_body(&self.categories_url()).await
    }

    async fn fetch_products(&self, category: &str) -> CatalogResult<Vec<u8>> {
        self.get_body(&self.products_url(category)).await
    }
}
