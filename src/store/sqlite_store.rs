use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::{CategoryReplacePolicy, LocalCatalogStore};
use crate::catalog::{CacheSnapshot, Product};
use crate::error::CatalogResult;
use crate::sqlite_persistence::read_schema_version;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

/// SQLite-backed catalog cache.
///
/// A single connection behind a mutex is the serialized storage context: each
/// operation holds the lock for its whole duration, so readers never see a
/// half-replaced category set.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
    replace_policy: CategoryReplacePolicy,
}

impl SqliteCatalogStore {
    /// Opens (or creates) the cache database at `db_path`.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open catalog cache at {:?}", path))?;
        Self::from_connection(conn).with_context(|| format!("Invalid catalog cache at {:?}", path))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory catalog cache")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let latest = CATALOG_VERSIONED_SCHEMAS
            .last()
            .context("No catalog schema defined")?;

        match read_schema_version(&conn)? {
            None => {
                info!("Creating catalog cache schema v{}", latest.version);
                latest.create(&conn)?;
            }
            Some(version) => {
                let schema = CATALOG_VERSIONED_SCHEMAS
                    .iter()
                    .find(|s| s.version == version)
                    .with_context(|| format!("Unknown catalog cache version {}", version))?;
                schema.validate(&conn).with_context(|| {
                    format!("Catalog cache schema validation failed for version {}", version)
                })?;
                debug!("Opened catalog cache schema v{}", version);
            }
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            replace_policy: CategoryReplacePolicy::default(),
        })
    }

    pub fn with_replace_policy(mut self, replace_policy: CategoryReplacePolicy) -> Self {
        self.replace_policy = replace_policy;
        self
    }

    pub fn replace_policy(&self) -> CategoryReplacePolicy {
        self.replace_policy
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_categories(tx: &Transaction, names: &[String]) -> rusqlite::Result<()> {
        let mut stmt = tx.prepare("INSERT INTO categories (name) VALUES (?1)")?;
        for name in names {
            stmt.execute(params![name])?;
        }
        Ok(())
    }

    fn try_save_categories(&self, names: &[String]) -> CatalogResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM categories", [])?;
        if let Err(e) = Self::insert_categories(&tx, names) {
            // Transactional drops the delete along with the failed insert.
            if self.replace_policy == CategoryReplacePolicy::DeleteThenInsert {
                tx.commit()?;
            }
            return Err(e.into());
        }
        tx.commit()?;
        Ok(())
    }

    fn try_load_categories(&self) -> CatalogResult<Vec<String>> {
        Ok(Self::query_categories(&self.lock())?)
    }

    fn query_categories(conn: &Connection) -> rusqlite::Result<Vec<String>> {
        let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn try_save_products(&self, products: &[Product], category: &str) -> CatalogResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (category, title, description, image_url, price)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for product in products {
                stmt.execute(params![
                    category,
                    product.title,
                    product.description,
                    product.image_url,
                    product.price
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
        Ok(Product {
            title: row.get("title")?,
            description: row.get("description")?,
            image_url: row.get("image_url")?,
            price: row.get("price")?,
        })
    }

    fn try_load_products(&self, category: &str) -> CatalogResult<Vec<Product>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT title, description, image_url, price FROM products
             WHERE category = ?1 ORDER BY id",
        )?;
        let products = stmt
            .query_map(params![category], Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    fn try_snapshot(&self) -> CatalogResult<CacheSnapshot> {
        let conn = self.lock();
        let mut snapshot = CacheSnapshot {
            categories: Self::query_categories(&conn)?,
            ..Default::default()
        };

        let mut stmt = conn.prepare(
            "SELECT category, title, description, image_url, price FROM products ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>("category")?, Self::row_to_product(row)?))
        })?;
        for row in rows {
            let (category, product) = row?;
            snapshot.products.entry(category).or_default().push(product);
        }
        Ok(snapshot)
    }
}

impl LocalCatalogStore for SqliteCatalogStore {
    fn save_categories(&self, names: &[String]) -> CatalogResult<()> {
        self.try_save_categories(names).inspect_err(|e| {
            error!("Failed to save categories: {}", e);
        })?;
        debug!("Cached {} categories", names.len());
        Ok(())
    }

    fn load_categories(&self) -> Vec<String> {
        self.try_load_categories().unwrap_or_else(|e| {
            error!("Failed to load categories: {}", e);
            Vec::new()
        })
    }

    fn save_products(&self, products: &[Product], category: &str) -> CatalogResult<()> {
        self.try_save_products(products, category)
            .inspect_err(|e| {
                error!("Failed to save products for {:?}: {}", category, e);
            })?;
        debug!("Cached {} products for {:?}", products.len(), category);
        Ok(())
    }

    fn load_products(&self, category: &str) -> Vec<Product> {
        self.try_load_products(category).unwrap_or_else(|e| {
            error!("Failed to load products for {:?}: {}", category, e);
            Vec::new()
        })
    }

    fn clear_products(&self, category: &str) -> CatalogResult<usize> {
        let conn = self.lock();
        let removed = conn
            .execute("DELETE FROM products WHERE category = ?1", params![category])
            .inspect_err(|e| {
                error!("Failed to clear products for {:?}: {}", category, e);
            })?;
        info!("Cleared {} cached products for {:?}", removed, category);
        Ok(removed)
    }

    fn snapshot(&self) -> CacheSnapshot {
        self.try_snapshot().unwrap_or_else(|e| {
            error!("Failed to read catalog cache snapshot: {}", e);
            CacheSnapshot::default()
        })
    }
}
