use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A single menu item, always scoped to one category.
///
/// The remote API calls the image field `image`; any extra fields it sends
/// (ids, ratings, the category itself) are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: String,
    #[serde(rename = "image")]
    pub image_url: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
}

impl Product {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = f64::deserialize(deserializer)?;
    if !price.is_finite() || price < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(price)
}

/// Everything the local cache currently holds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CacheSnapshot {
    /// Category names in storage order.
    pub categories: Vec<String>,
    /// Cached products keyed by the category they were fetched for.
    pub products: BTreeMap<String, Vec<Product>>,
}

impl CacheSnapshot {
    pub fn product_count(&self) -> usize {
        self.products.values().map(Vec::len).sum()
    }

    /// Categories that have cached products but are missing from the category set.
    ///
    /// Product rows are never removed when the category list is replaced, so
    /// this is expected to be non-empty after a menu change.
    pub fn orphan_product_categories(&self) -> Vec<&str> {
        let known: HashSet<&str> = self.categories.iter().map(String::as_str).collect();
        self.products
            .keys()
            .map(String::as_str)
            .filter(|category| !known.contains(category))
            .collect()
    }
}
