//! Maps extracted keywords to affiliate vocabulary tags.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{AFFILIATE_VOCABULARY, Keyword, Tag};

/// Looks up vocabulary tags by exact name.
///
/// The matcher does no normalization of its own; keywords are compared
/// against the stored tag names as-is.
pub struct TagMatcher {
    catalog: Arc<dyn Catalog>,
}

impl TagMatcher {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Returns every tag whose name equals one of `keywords`.
    ///
    /// An empty keyword list returns an empty set without querying the
    /// catalog. Duplicate keywords are sent once.
    pub fn match_tags(&self, keywords: &[Keyword]) -> Result<Vec<Tag>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let names: BTreeSet<&str> = keywords.iter().map(Keyword::as_str).collect();
        let names: Vec<&str> = names.into_iter().collect();

        let mut tags = self
            .catalog
            .find_tags_by_names(AFFILIATE_VOCABULARY, &names)?;
        tags.sort_by_key(Tag::id);
        tags.dedup_by_key(|tag| tag.id());

        debug!(keywords = names.len(), matched = tags.len(), "matched tags");
        Ok(tags)
    }
}
