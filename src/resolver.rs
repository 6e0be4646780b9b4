//! Resolves matched tags to published affiliate products.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{AFFILIATE_PRODUCT_TYPE, Product, Tag, TagId};

/// Maximum number of products returned for a keyword match.
pub const MAX_MATCHED_PRODUCTS: usize = 20;

/// Finds the published products tagged with any of the matched tags.
pub struct ProductResolver {
    catalog: Arc<dyn Catalog>,
}

impl ProductResolver {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Returns up to [`MAX_MATCHED_PRODUCTS`] published products carrying at
    /// least one of `tags`, in ascending id order.
    ///
    /// Only the rows returned by the filtered query are used; an empty tag
    /// set returns an empty list without querying.
    pub fn resolve_products(&self, tags: &[Tag]) -> Result<Vec<Product>> {
        let tag_ids: BTreeSet<TagId> = tags.iter().map(Tag::id).collect();
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut products = self.catalog.find_products_by_tags(
            AFFILIATE_PRODUCT_TYPE,
            &tag_ids,
            MAX_MATCHED_PRODUCTS,
        )?;

        // Re-check the catalog's filtering so the returned list always
        // honors the published/tag/limit contract.
        products.retain(|p| p.is_published() && p.has_any_tag(&tag_ids));
        products.sort_by_key(Product::id);
        products.dedup_by_key(|p| p.id());
        products.truncate(MAX_MATCHED_PRODUCTS);

        debug!(tags = tag_ids.len(), products = products.len(), "resolved products");
        Ok(products)
    }
}
