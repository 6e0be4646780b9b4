/// Complete database schema for the affiliate catalog.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
pub const INITIAL_SCHEMA: &str = r#"
-- Tags table: vocabulary terms, names compared case-sensitively
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY,
    vocabulary TEXT NOT NULL,
    name TEXT NOT NULL COLLATE BINARY,
    UNIQUE (vocabulary, name)
);

-- Products table: affiliate items with publication state
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY,
    product_type TEXT NOT NULL,
    title TEXT NOT NULL,
    published INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER
);

-- Junction table: links products to tags (many-to-many)
CREATE TABLE IF NOT EXISTS product_tags (
    product_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    PRIMARY KEY (product_id, tag_id),
    FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
);

-- Settings table: key-value pipeline configuration
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER
);

-- Index for tag lookups by vocabulary + name
CREATE INDEX IF NOT EXISTS idx_tags_vocabulary_name ON tags(vocabulary, name);

-- Index for filtering products by type and publication state
CREATE INDEX IF NOT EXISTS idx_products_type_published ON products(product_type, published);

-- Indexes for efficient junction table lookups
CREATE INDEX IF NOT EXISTS idx_product_tags_product ON product_tags(product_id);
CREATE INDEX IF NOT EXISTS idx_product_tags_tag ON product_tags(tag_id);
"#;
