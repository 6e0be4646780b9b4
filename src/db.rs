mod schema;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;
use tracing::warn;

use crate::catalog::Catalog;
use crate::config::{ConfigProvider, keys};
use crate::models::{FallbackList, Product, ProductId, Tag, TagId};

use schema::INITIAL_SCHEMA;

/// SQLite-backed catalog and settings store.
///
/// The connection sits behind a mutex so one `Database` can serve pipeline
/// runs from several threads.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        conn.execute_batch(INITIAL_SCHEMA)
            .context("Failed to initialize schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks and returns the underlying connection.
    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }

    /// Inserts a tag into `vocabulary`, returning the existing id if the
    /// name is already present.
    pub fn insert_tag(&self, vocabulary: &str, name: &str) -> Result<TagId> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO tags (vocabulary, name) VALUES (?1, ?2)
             ON CONFLICT (vocabulary, name) DO NOTHING",
            (vocabulary, name),
        )?;

        let id: i64 = conn.query_row(
            "SELECT id FROM tags WHERE vocabulary = ?1 AND name = ?2",
            (vocabulary, name),
            |row| row.get(0),
        )?;

        Ok(TagId::new(id))
    }

    /// Inserts a product and its tag links in one transaction.
    pub fn insert_product(
        &self,
        product_type: &str,
        title: &str,
        tag_ids: &[TagId],
        published: bool,
    ) -> Result<ProductId> {
        let mut conn = self.connection()?;
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO products (product_type, title, published, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            (product_type, title, published, now),
        )?;
        let product_id = tx.last_insert_rowid();

        for tag_id in tag_ids {
            tx.execute(
                "INSERT OR IGNORE INTO product_tags (product_id, tag_id) VALUES (?1, ?2)",
                (product_id, tag_id.get()),
            )
            .with_context(|| format!("Failed to link tag {} to product", tag_id))?;
        }

        tx.commit()?;
        Ok(ProductId::new(product_id))
    }

    /// Changes a product's publication state.
    pub fn set_published(&self, id: ProductId, published: bool) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "UPDATE products SET published = ?1 WHERE id = ?2",
            (published, id.get()),
        )?;
        Ok(())
    }

    /// Deletes a product; its tag links go with it.
    pub fn delete_product(&self, id: ProductId) -> Result<()> {
        let conn = self.connection()?;
        conn.execute("DELETE FROM products WHERE id = ?1", [id.get()])?;
        Ok(())
    }

    /// Stores a configuration value, replacing any previous one.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = OffsetDateTime::now_utc().unix_timestamp();
        conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            (key, value, now),
        )?;
        Ok(())
    }

    /// Reads a configuration value.
    pub fn setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connection()?;
        let value = conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Returns every stored setting ordered by key.
    pub fn settings(&self) -> Result<Vec<(String, String)>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut settings = Vec::new();
        for row in rows {
            settings.push(row.context("Failed to read setting")?);
        }
        Ok(settings)
    }

    /// Stores the fallback product list, keeping only the first five ids.
    pub fn set_fallback_products(&self, ids: &[ProductId]) -> Result<FallbackList> {
        let list = FallbackList::new(ids.iter().copied());
        self.set_setting(keys::FALLBACK_PRODUCTS, &list.to_config_value())?;
        Ok(list)
    }

    fn query_products(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Product>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql).context("Failed to prepare product query")?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), product_from_row)
            .context("Failed to query products")?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row.context("Failed to read product")?);
        }
        Ok(products)
    }
}

/// Columns every product query selects, in `product_from_row` order.
const PRODUCT_COLUMNS: &str = "p.id, p.title, p.published,
    (SELECT GROUP_CONCAT(pt.tag_id) FROM product_tags pt WHERE pt.product_id = p.id)";

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let id: i64 = row.get(0)?;
    let title: String = row.get(1)?;
    let published: bool = row.get(2)?;
    let tag_list: Option<String> = row.get(3)?;

    let tag_ids = tag_list
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter_map(|raw| raw.trim().parse::<i64>().ok())
        .map(TagId::new);

    Ok(Product::new(ProductId::new(id), title, tag_ids, published))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

impl Catalog for Database {
    fn find_tags_by_names(&self, vocabulary: &str, names: &[&str]) -> Result<Vec<Tag>> {
        let conn = self.connection()?;
        let query = format!(
            "SELECT id, name FROM tags WHERE vocabulary = ? AND name IN ({}) ORDER BY id",
            placeholders(names.len())
        );

        let mut stmt = conn.prepare(&query).context("Failed to prepare tag query")?;
        let params = std::iter::once(vocabulary).chain(names.iter().copied());
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params), |row| {
                Ok(Tag::new(TagId::new(row.get(0)?), row.get::<_, String>(1)?))
            })
            .context("Failed to query tags")?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row.context("Failed to read tag")?);
        }
        Ok(tags)
    }

    fn find_products_by_tags(
        &self,
        product_type: &str,
        tag_ids: &BTreeSet<TagId>,
        limit: usize,
    ) -> Result<Vec<Product>> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             WHERE p.product_type = ?
               AND p.published = 1
               AND p.id IN (SELECT product_id FROM product_tags WHERE tag_id IN ({}))
             ORDER BY p.id
             LIMIT ?",
            placeholders(tag_ids.len())
        );

        let mut params = vec![Value::Text(product_type.to_string())];
        params.extend(tag_ids.iter().map(|id| Value::Integer(id.get())));
        params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));

        self.query_products(&query, params)
    }

    fn load_products(&self, product_type: &str, ids: &[ProductId]) -> Result<Vec<Product>> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             WHERE p.product_type = ? AND p.id IN ({})",
            placeholders(ids.len())
        );

        let mut params = vec![Value::Text(product_type.to_string())];
        params.extend(ids.iter().map(|id| Value::Integer(id.get())));

        self.query_products(&query, params)
    }
}

impl ConfigProvider for Database {
    fn get(&self, key: &str) -> Option<String> {
        match self.setting(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read setting");
                None
            }
        }
    }
}
