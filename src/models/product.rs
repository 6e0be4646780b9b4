use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{ProductId, TagId};

/// Content type of records eligible for matching and fallback.
pub const AFFILIATE_PRODUCT_TYPE: &str = "affiliate_item";

/// An affiliate product record as loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    title: String,
    tag_ids: BTreeSet<TagId>,
    published: bool,
}

impl Product {
    /// Creates a new product record.
    ///
    /// # Examples
    ///
    /// ```
    /// use affil::{Product, ProductId, TagId};
    ///
    /// let product = Product::new(ProductId::new(10), "Cork yoga mat", [TagId::new(1)], true);
    /// assert!(product.is_published());
    /// assert!(product.has_any_tag(&[TagId::new(1)].into_iter().collect()));
    /// ```
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        tag_ids: impl IntoIterator<Item = TagId>,
        published: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            tag_ids: tag_ids.into_iter().collect(),
            published,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tag_ids(&self) -> &BTreeSet<TagId> {
        &self.tag_ids
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    /// Returns true if this product carries at least one of the given tags.
    pub fn has_any_tag(&self, tags: &BTreeSet<TagId>) -> bool {
        !self.tag_ids.is_disjoint(tags)
    }
}
