//! Affiliate product suggestions for article text.
//!
//! A chat-completion model extracts shopping keywords from the content, the
//! keywords are matched against the `affiliate_tags` vocabulary, and the
//! matching published products are returned. When nothing usable comes out
//! of that, a configured fallback list is returned instead.

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod db;
pub mod extractor;
pub mod fallback;
pub mod matcher;
pub mod models;
pub mod openai;
pub mod pipeline;
pub mod resolver;
pub mod utils;

pub use catalog::Catalog;
pub use config::{ConfigError, ConfigProvider, MemoryConfig, PipelineConfig};
pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials};
pub use db::Database;
pub use extractor::{ExtractionError, KeywordExtractor};
pub use fallback::FallbackResolver;
pub use matcher::TagMatcher;
pub use models::{
    FallbackList, Keyword, KeywordNormalization, Product, ProductId, Tag, TagId,
};
pub use openai::{ChatClientTrait, ChatError, OpenAiClient, OpenAiClientBuilder};
pub use pipeline::{Pipeline, PipelineOutcome, ProductSource};
pub use resolver::ProductResolver;
