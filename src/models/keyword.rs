use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A shopping-intent keyword extracted from model output.
///
/// Keywords are matched against tag names exactly, so whatever normalization
/// is wanted has to be applied before one is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyword(String);

impl Keyword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How extracted keywords are normalized before tag lookup.
///
/// Tag lookup is an exact, case-sensitive comparison against the stored
/// vocabulary, so this policy decides how forgiving matching is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeywordNormalization {
    /// Use keywords exactly as the model returned them.
    #[default]
    Verbatim,
    /// Trim and collapse internal whitespace runs to a single space.
    Trimmed,
    /// `Trimmed`, then lowercase.
    Lowercase,
}

impl KeywordNormalization {
    /// Returns the configuration value for this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordNormalization::Verbatim => "verbatim",
            KeywordNormalization::Trimmed => "trimmed",
            KeywordNormalization::Lowercase => "lowercase",
        }
    }
}

impl fmt::Display for KeywordNormalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordNormalization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbatim" => Ok(KeywordNormalization::Verbatim),
            "trimmed" => Ok(KeywordNormalization::Trimmed),
            "lowercase" => Ok(KeywordNormalization::Lowercase),
            other => Err(format!("unknown keyword normalization '{other}'")),
        }
    }
}
