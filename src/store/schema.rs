//! SQLite schema for the local catalog cache.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

/// Category names; `id` gives the storage order.
const CATEGORIES_TABLE_V1: Table = Table {
    name: "categories",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

/// Product rows tagged with the category they were fetched for.
const PRODUCTS_TABLE_V1: Table = Table {
    name: "products",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("category", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!("image_url", &SqlType::Text, non_null = true),
        sqlite_column!("price", &SqlType::Real, non_null = true),
    ],
    indices: &[("idx_products_category", "category")],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[CATEGORIES_TABLE_V1, PRODUCTS_TABLE_V1],
}];
