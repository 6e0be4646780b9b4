//! Default products used when keyword matching finds nothing.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{AFFILIATE_PRODUCT_TYPE, FallbackList, Product, ProductId};

/// Loads the configured fallback products.
pub struct FallbackResolver {
    catalog: Arc<dyn Catalog>,
}

impl FallbackResolver {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Returns the fallback products in configured order.
    ///
    /// Ids that no longer resolve to a published product are skipped. An
    /// empty list returns an empty result without querying.
    pub fn fallback_products(&self, list: &FallbackList) -> Result<Vec<Product>> {
        if list.is_empty() {
            return Ok(Vec::new());
        }

        let loaded = self.catalog.load_products(AFFILIATE_PRODUCT_TYPE, list.ids())?;
        let mut by_id: HashMap<ProductId, Product> =
            loaded.into_iter().map(|p| (p.id(), p)).collect();

        let products: Vec<Product> = list
            .ids()
            .iter()
            .filter_map(|id| by_id.remove(id))
            .filter(Product::is_published)
            .take(FallbackList::CAPACITY)
            .collect();

        debug!(
            configured = list.len(),
            loaded = products.len(),
            "loaded fallback products"
        );
        Ok(products)
    }
}
