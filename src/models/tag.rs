use serde::{Deserialize, Serialize};

use super::TagId;

/// Name of the vocabulary whose tags are eligible for keyword matching.
pub const AFFILIATE_VOCABULARY: &str = "affiliate_tags";

/// A term in the affiliate vocabulary.
///
/// Tags are looked up by exact name; the pipeline never creates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    name: String,
}

impl Tag {
    /// Creates a new tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use affil::{Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new(1), "yoga mat");
    /// assert_eq!(tag.id(), TagId::new(1));
    /// assert_eq!(tag.name(), "yoga mat");
    /// ```
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the tag's unique identifier.
    pub fn id(&self) -> TagId {
        self.id
    }

    /// Returns the tag name as stored in the vocabulary.
    pub fn name(&self) -> &str {
        &self.name
    }
}
