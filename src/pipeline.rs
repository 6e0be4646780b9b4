//! Keyword extraction → tag matching → product resolution, with fallback.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use affil::config::keys;
//! use affil::credentials::EnvCredentials;
//! use affil::openai::OpenAiClientBuilder;
//! use affil::{Database, Pipeline};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(Database::open("catalog.db")?);
//! db.set_setting(keys::MODEL, "gpt-4o-mini")?;
//! db.set_setting(keys::PROMPT, "Return shopping keywords as a JSON array of strings.")?;
//!
//! let client = OpenAiClientBuilder::new().build()?;
//! let pipeline = Pipeline::new(
//!     db.clone(),
//!     Arc::new(EnvCredentials::new()),
//!     Arc::new(client),
//!     db,
//! );
//!
//! for product in pipeline.run("Our favourite gear for a home yoga practice") {
//!     println!("{}: {}", product.id(), product.title());
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::{ConfigError, ConfigProvider, PipelineConfig, load_fallback_list};
use crate::credentials::{CredentialProvider, OPENAI_KEY};
use crate::extractor::{ExtractionError, KeywordExtractor};
use crate::fallback::FallbackResolver;
use crate::matcher::TagMatcher;
use crate::models::Product;
use crate::openai::ChatClientTrait;
use crate::resolver::ProductResolver;

/// Which branch of the pipeline produced the products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSource {
    /// Products tagged with keywords extracted from the content.
    Matched,
    /// The configured fallback list.
    Fallback,
}

impl fmt::Display for ProductSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductSource::Matched => write!(f, "matched"),
            ProductSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Products returned by a pipeline run, with the branch that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub products: Vec<Product>,
    pub source: ProductSource,
}

/// Reasons the keyword-matching branch produced nothing usable.
#[derive(Debug, Error)]
enum MatchFailure {
    #[error("pipeline configuration unusable: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Catalog(#[from] anyhow::Error),
}

/// Suggests affiliate products for a piece of content.
///
/// A run never fails: configuration, credential, network, parse, and
/// storage problems are logged once and the configured fallback list is
/// returned instead.
pub struct Pipeline {
    config: Arc<dyn ConfigProvider>,
    credentials: Arc<dyn CredentialProvider>,
    extractor: KeywordExtractor,
    matcher: TagMatcher,
    resolver: ProductResolver,
    fallback: FallbackResolver,
}

impl Pipeline {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        credentials: Arc<dyn CredentialProvider>,
        client: Arc<dyn ChatClientTrait>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            config,
            credentials,
            extractor: KeywordExtractor::new(client),
            matcher: TagMatcher::new(catalog.clone()),
            resolver: ProductResolver::new(catalog.clone()),
            fallback: FallbackResolver::new(catalog),
        }
    }

    /// Returns the products to show alongside `content`.
    pub fn run(&self, content: &str) -> Vec<Product> {
        self.run_detailed(content).products
    }

    /// Like [`run`](Self::run), also reporting which branch was taken.
    pub fn run_detailed(&self, content: &str) -> PipelineOutcome {
        let fallback_list = load_fallback_list(self.config.as_ref());

        match self.match_products(content) {
            Ok(products) if !products.is_empty() => {
                info!(count = products.len(), "suggesting matched products");
                return PipelineOutcome {
                    products,
                    source: ProductSource::Matched,
                };
            }
            Ok(_) => info!("no products matched; using fallback"),
            Err(failure) => warn!(error = %failure, "product matching failed; using fallback"),
        }

        let products = self
            .fallback
            .fallback_products(&fallback_list)
            .unwrap_or_else(|e| {
                warn!(error = %format!("{e:#}"), "loading fallback products failed");
                Vec::new()
            });

        PipelineOutcome {
            products,
            source: ProductSource::Fallback,
        }
    }

    fn match_products(&self, content: &str) -> Result<Vec<Product>, MatchFailure> {
        let config = PipelineConfig::load(self.config.as_ref())?;
        let api_key = self.credentials.resolve(OPENAI_KEY);

        let keywords = self.extractor.extract(content, &config, api_key.as_deref())?;
        let tags = self.matcher.match_tags(&keywords)?;
        let products = self.resolver.resolve_products(&tags)?;

        Ok(products)
    }
}
