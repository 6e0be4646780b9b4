mod fallback_list;
mod ids;
mod keyword;
mod product;
mod tag;

pub use fallback_list::FallbackList;
pub use ids::{ProductId, TagId};
pub use keyword::{Keyword, KeywordNormalization};
pub use product::{AFFILIATE_PRODUCT_TYPE, Product};
pub use tag::{AFFILIATE_VOCABULARY, Tag};
