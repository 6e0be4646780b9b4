//! Secret lookup.
//!
//! The pipeline only ever asks for a credential by name; where the secret
//! lives is up to the [`CredentialProvider`] implementation.

use std::collections::HashMap;
use std::sync::Once;

/// Name of the secret holding the language-model API key.
pub const OPENAI_KEY: &str = "openai_key";

/// Resolves a named secret to its value.
pub trait CredentialProvider: Send + Sync {
    /// Returns the secret stored under `name`, or `None` if it is not set.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Reads secrets from process environment variables.
///
/// A secret name maps to its uppercased environment variable, so
/// `openai_key` is read from `OPENAI_KEY`. A `.env` file in the working
/// directory (or a parent) is loaded on first use; a missing file is fine.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

static DOTENV: Once = Once::new();

impl EnvCredentials {
    pub fn new() -> Self {
        DOTENV.call_once(|| {
            let _ = dotenvy::dotenv();
        });
        Self
    }

    /// Returns the environment variable consulted for `name`.
    pub fn variable_for(name: &str) -> String {
        name.to_ascii_uppercase()
    }
}

impl CredentialProvider for EnvCredentials {
    fn resolve(&self, name: &str) -> Option<String> {
        std::env::var(Self::variable_for(name))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

/// Fixed set of secrets, for tests and embedding callers.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    secrets: HashMap<String, String>,
}

impl StaticCredentials {
    /// Creates a provider with no secrets; every lookup returns `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn resolve(&self, name: &str) -> Option<String> {
        self.secrets
            .get(name)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}
