use serde::{Deserialize, Serialize};

use super::ProductId;

/// Default product list shown when keyword matching yields nothing.
///
/// Holds at most [`FallbackList::CAPACITY`] identifiers in configured order;
/// longer inputs are truncated on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct FallbackList {
    ids: Vec<ProductId>,
}

impl FallbackList {
    /// Maximum number of fallback products.
    pub const CAPACITY: usize = 5;

    /// Builds a list from the first `CAPACITY` identifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use affil::{FallbackList, ProductId};
    ///
    /// let list = FallbackList::new((1..=8).map(ProductId::new));
    /// assert_eq!(list.len(), 5);
    /// assert_eq!(list.ids()[4], ProductId::new(5));
    /// ```
    pub fn new(ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            ids: ids.into_iter().take(Self::CAPACITY).collect(),
        }
    }

    /// Parses the stored configuration value, a JSON array of integer IDs.
    ///
    /// A blank value is an empty list.
    pub fn parse(value: &str) -> Result<Self, serde_json::Error> {
        if value.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(value)
    }

    /// Serializes the list into its stored configuration form.
    pub fn to_config_value(&self) -> String {
        let raw: Vec<i64> = self.ids.iter().map(|id| id.get()).collect();
        serde_json::Value::from(raw).to_string()
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<ProductId>> for FallbackList {
    fn from(ids: Vec<ProductId>) -> Self {
        Self::new(ids)
    }
}

impl From<FallbackList> for Vec<ProductId> {
    fn from(list: FallbackList) -> Self {
        list.ids
    }
}
