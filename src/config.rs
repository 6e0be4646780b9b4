//! Pipeline configuration.
//!
//! Configuration is read through the [`ConfigProvider`] capability and
//! captured once per run as an immutable [`PipelineConfig`] snapshot.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::models::{FallbackList, KeywordNormalization};

/// Configuration keys understood by the pipeline.
pub mod keys {
    pub const MODEL: &str = "model";
    pub const PROMPT: &str = "prompt";
    pub const MAX_TOKENS: &str = "max_tokens";
    pub const TEMPERATURE: &str = "temperature";
    pub const FREQUENCY_PENALTY: &str = "frequency_penalty";
    pub const PRESENCE_PENALTY: &str = "presence_penalty";
    pub const FALLBACK_PRODUCTS: &str = "fallback_products";
    pub const KEYWORD_NORMALIZATION: &str = "keyword_normalization";

    /// Every key, in display order.
    pub const ALL: [&str; 8] = [
        MODEL,
        PROMPT,
        MAX_TOKENS,
        TEMPERATURE,
        FREQUENCY_PENALTY,
        PRESENCE_PENALTY,
        FALLBACK_PRODUCTS,
        KEYWORD_NORMALIZATION,
    ];
}

/// Read-only key-value configuration source.
pub trait ConfigProvider: Send + Sync {
    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory configuration, mainly for tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    values: HashMap<String, String>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, builder style.
    ///
    /// # Examples
    ///
    /// ```
    /// use affil::config::{ConfigProvider, MemoryConfig};
    ///
    /// let config = MemoryConfig::new().with("model", "gpt-4o-mini");
    /// assert_eq!(config.get("model").as_deref(), Some("gpt-4o-mini"));
    /// ```
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    /// Stores the fallback list in its canonical form.
    #[must_use]
    pub fn with_fallback(self, list: &FallbackList) -> Self {
        self.with(keys::FALLBACK_PRODUCTS, list.to_config_value())
    }
}

impl ConfigProvider for MemoryConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Errors raised while building a [`PipelineConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("configuration value '{key}' is not set")]
    Missing { key: &'static str },

    #[error("configuration value '{key}' is invalid: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("configuration value '{key}' = {value} is outside {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: String,
        min: String,
        max: String,
    },
}

/// Immutable snapshot of the language-model parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub normalization: KeywordNormalization,
}

impl PipelineConfig {
    pub const DEFAULT_MAX_TOKENS: u32 = 256;
    pub const DEFAULT_TEMPERATURE: f32 = 1.0;

    /// Reads and validates every pipeline parameter from `provider`.
    ///
    /// `model` and `prompt` are required; numeric parameters fall back to
    /// defaults when unset but must parse and lie within range when present.
    pub fn load(provider: &dyn ConfigProvider) -> Result<Self, ConfigError> {
        let model = required(provider, keys::MODEL)?;
        let prompt = required(provider, keys::PROMPT)?;

        let max_tokens = ranged(
            provider,
            keys::MAX_TOKENS,
            Self::DEFAULT_MAX_TOKENS,
            1,
            4096,
        )?;
        let temperature = ranged(
            provider,
            keys::TEMPERATURE,
            Self::DEFAULT_TEMPERATURE,
            0.0,
            2.0,
        )?;
        let frequency_penalty = ranged(provider, keys::FREQUENCY_PENALTY, 0.0, 0.0, 2.0)?;
        let presence_penalty = ranged(provider, keys::PRESENCE_PENALTY, 0.0, 0.0, 2.0)?;

        let normalization = match provider.get(keys::KEYWORD_NORMALIZATION) {
            Some(raw) if !raw.trim().is_empty() => {
                raw.parse().map_err(|_| ConfigError::Invalid {
                    key: keys::KEYWORD_NORMALIZATION,
                    value: raw,
                })?
            }
            _ => KeywordNormalization::default(),
        };

        Ok(Self {
            model,
            prompt,
            max_tokens,
            temperature,
            frequency_penalty,
            presence_penalty,
            normalization,
        })
    }
}

/// Reads the configured fallback list.
///
/// A malformed stored value is logged and treated as an empty list.
pub fn load_fallback_list(provider: &dyn ConfigProvider) -> FallbackList {
    let Some(raw) = provider.get(keys::FALLBACK_PRODUCTS) else {
        return FallbackList::default();
    };

    match FallbackList::parse(&raw) {
        Ok(list) => list,
        Err(e) => {
            warn!(value = %raw, error = %e, "ignoring malformed fallback product list");
            FallbackList::default()
        }
    }
}

fn required(provider: &dyn ConfigProvider, key: &'static str) -> Result<String, ConfigError> {
    match provider.get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing { key }),
    }
}

fn ranged<T>(
    provider: &dyn ConfigProvider,
    key: &'static str,
    default: T,
    min: T,
    max: T,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + ToString,
{
    let Some(raw) = provider.get(key) else {
        return Ok(default);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }

    let value: T = trimmed.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.clone(),
    })?;

    // NaN fails both comparisons, so test for containment rather than exclusion.
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value: trimmed.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductId;

    fn minimal() -> MemoryConfig {
        MemoryConfig::new()
            .with(keys::MODEL, "gpt-4o-mini")
            .with(keys::PROMPT, "Return shopping keywords as a JSON array.")
    }

    #[test]
    fn load_applies_defaults_for_unset_numbers() {
        let config = PipelineConfig::load(&minimal()).unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.frequency_penalty, 0.0);
        assert_eq!(config.presence_penalty, 0.0);
        assert_eq!(config.normalization, KeywordNormalization::Verbatim);
    }

    #[test]
    fn load_reads_all_parameters() {
        let provider = minimal()
            .with(keys::MAX_TOKENS, 512)
            .with(keys::TEMPERATURE, "0.2")
            .with(keys::FREQUENCY_PENALTY, "0.5")
            .with(keys::PRESENCE_PENALTY, "1.5")
            .with(keys::KEYWORD_NORMALIZATION, "lowercase");

        let config = PipelineConfig::load(&provider).unwrap();

        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.frequency_penalty, 0.5);
        assert_eq!(config.presence_penalty, 1.5);
        assert_eq!(config.normalization, KeywordNormalization::Lowercase);
    }

    #[test]
    fn missing_model_or_prompt_is_an_error() {
        let no_model = MemoryConfig::new().with(keys::PROMPT, "p");
        assert_eq!(
            PipelineConfig::load(&no_model),
            Err(ConfigError::Missing { key: keys::MODEL })
        );

        let blank_prompt = MemoryConfig::new()
            .with(keys::MODEL, "m")
            .with(keys::PROMPT, "   ");
        assert_eq!(
            PipelineConfig::load(&blank_prompt),
            Err(ConfigError::Missing { key: keys::PROMPT })
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let provider = minimal().with(keys::MAX_TOKENS, 0);
        assert!(matches!(
            PipelineConfig::load(&provider),
            Err(ConfigError::OutOfRange { key: "max_tokens", .. })
        ));

        let provider = minimal().with(keys::MAX_TOKENS, 4097);
        assert!(matches!(
            PipelineConfig::load(&provider),
            Err(ConfigError::OutOfRange { key: "max_tokens", .. })
        ));

        let provider = minimal().with(keys::TEMPERATURE, "2.5");
        assert!(matches!(
            PipelineConfig::load(&provider),
            Err(ConfigError::OutOfRange { key: "temperature", .. })
        ));

        let provider = minimal().with(keys::PRESENCE_PENALTY, "-0.1");
        assert!(matches!(
            PipelineConfig::load(&provider),
            Err(ConfigError::OutOfRange { key: "presence_penalty", .. })
        ));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let provider = minimal()
            .with(keys::MAX_TOKENS, 4096)
            .with(keys::TEMPERATURE, "2.0")
            .with(keys::FREQUENCY_PENALTY, "0.0");

        let config = PipelineConfig::load(&provider).unwrap();
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn nan_is_out_of_range() {
        let provider = minimal().with(keys::TEMPERATURE, "NaN");
        assert!(matches!(
            PipelineConfig::load(&provider),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn unparseable_values_are_invalid() {
        let provider = minimal().with(keys::MAX_TOKENS, "lots");
        assert_eq!(
            PipelineConfig::load(&provider),
            Err(ConfigError::Invalid {
                key: keys::MAX_TOKENS,
                value: "lots".to_string()
            })
        );

        let provider = minimal().with(keys::KEYWORD_NORMALIZATION, "stemmed");
        assert!(matches!(
            PipelineConfig::load(&provider),
            Err(ConfigError::Invalid { key: "keyword_normalization", .. })
        ));
    }

    #[test]
    fn fallback_list_is_truncated_when_read() {
        let provider = MemoryConfig::new().with(keys::FALLBACK_PRODUCTS, "[1,2,3,4,5,6,7]");
        let list = load_fallback_list(&provider);

        assert_eq!(list.len(), 5);
        assert_eq!(list.ids()[0], ProductId::new(1));
    }

    #[test]
    fn malformed_fallback_list_reads_as_empty() {
        let provider = MemoryConfig::new().with(keys::FALLBACK_PRODUCTS, "not json");
        assert!(load_fallback_list(&provider).is_empty());
        assert!(load_fallback_list(&MemoryConfig::new()).is_empty());
    }
}
