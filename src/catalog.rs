//! Read-only query surface over the tag vocabulary and product records.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::models::{Product, ProductId, Tag, TagId};

/// Queries the pipeline needs from the content store.
///
/// Each method is expected to issue a single query. Callers short-circuit
/// empty inputs themselves, so implementations may assume non-empty slices.
pub trait Catalog: Send + Sync {
    /// Finds tags in `vocabulary` whose name exactly equals one of `names`.
    fn find_tags_by_names(&self, vocabulary: &str, names: &[&str]) -> Result<Vec<Tag>>;

    /// Finds published products of `product_type` carrying any of `tag_ids`,
    /// ordered by product id, at most `limit` of them.
    fn find_products_by_tags(
        &self,
        product_type: &str,
        tag_ids: &BTreeSet<TagId>,
        limit: usize,
    ) -> Result<Vec<Product>>;

    /// Loads products of `product_type` by id. Unknown ids are skipped; the
    /// result order is unspecified.
    fn load_products(&self, product_type: &str, ids: &[ProductId]) -> Result<Vec<Product>>;
}
