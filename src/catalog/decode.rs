//! Payload decoding for the two catalog endpoints.

use super::models::Product;
use crate::error::CatalogResult;

/// Decodes a `GET categories` body: a JSON array of names.
pub fn decode_categories(body: &[u8]) -> CatalogResult<Vec<String>> {
    Ok(serde_json::from_slice(body)?)
}

/// Decodes a `GET products` body: a JSON array of product objects.
pub fn decode_products(body: &[u8]) -> CatalogResult<Vec<Product>> {
    Ok(serde_json::from_slice(body)?)
}
