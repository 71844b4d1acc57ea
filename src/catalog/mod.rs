//! Catalog data model: categories are plain names, products belong to one category.

mod decode;
mod models;

pub use decode::{decode_categories, decode_products};
pub use models::{CacheSnapshot, Product};
