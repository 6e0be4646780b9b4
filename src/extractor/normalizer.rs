use crate::models::{Keyword, KeywordNormalization};

/// Post-processing applied to raw model keywords before tag lookup.
pub struct KeywordNormalizer;

impl KeywordNormalizer {
    /// Normalizes a single keyword under `mode`.
    ///
    /// Returns `None` if nothing is left afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use affil::extractor::KeywordNormalizer;
    /// use affil::models::KeywordNormalization;
    ///
    /// let kw = KeywordNormalizer::normalize("  Yoga   Mat ", KeywordNormalization::Lowercase);
    /// assert_eq!(kw.unwrap().as_str(), "yoga mat");
    ///
    /// let kw = KeywordNormalizer::normalize("  Yoga Mat ", KeywordNormalization::Verbatim);
    /// assert_eq!(kw.unwrap().as_str(), "  Yoga Mat ");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str, mode: KeywordNormalization) -> Option<Keyword> {
        if raw.trim().is_empty() {
            return None;
        }

        let value = match mode {
            KeywordNormalization::Verbatim => raw.to_string(),
            KeywordNormalization::Trimmed => collapse_whitespace(raw),
            KeywordNormalization::Lowercase => collapse_whitespace(raw).to_lowercase(),
        };

        Some(Keyword::new(value))
    }

    /// Normalizes every keyword, dropping the ones that end up empty.
    ///
    /// Order and duplicates are preserved.
    #[must_use]
    pub fn normalize_all<I, S>(raw: I, mode: KeywordNormalization) -> Vec<Keyword>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|kw| Self::normalize(kw.as_ref(), mode))
            .collect()
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
