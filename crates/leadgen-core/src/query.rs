//! Niche + city search input, sanitized before it reaches any provider.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Longest accepted niche or city, in characters.
pub const MAX_QUERY_FIELD_LEN: usize = 100;

static SCRIPT_SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:javascript|data|vbscript):").expect("valid regex"));
static EVENT_HANDLER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub niche: String,
    pub city: String,
}

impl SearchQuery {
    /// Builds a sanitized query.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] when either field is empty after sanitizing or
    /// longer than [`MAX_QUERY_FIELD_LEN`].
    pub fn new(niche: &str, city: &str) -> Result<Self, CoreError> {
        Ok(Self {
            niche: checked_field("niche", niche)?,
            city: checked_field("city", city)?,
        })
    }

    /// Key under which results for this (niche, city) pair are cached.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{}_{}",
            self.niche.trim().to_lowercase(),
            self.city.trim().to_lowercase()
        )
    }

    /// Provider query strings, most specific first.
    #[must_use]
    pub fn variations(&self) -> Vec<String> {
        let (n, c) = (&self.niche, &self.city);
        vec![
            format!("{n} {c}"),
            format!("{n} em {c}"),
            format!("distribuidora {n} {c}"),
            format!("comercio {n} {c}"),
            format!("loja {n} {c}"),
            format!("empresa {n} {c}"),
        ]
    }
}

/// Strips markup brackets, script-bearing URL schemes and inline event
/// handlers from user input.
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    let without_brackets: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let without_schemes = SCRIPT_SCHEME_RE.replace_all(&without_brackets, "");
    EVENT_HANDLER_RE
        .replace_all(&without_schemes, "")
        .trim()
        .to_string()
}

fn checked_field(field: &'static str, raw: &str) -> Result<String, CoreError> {
    let len = raw.chars().count();
    if len > MAX_QUERY_FIELD_LEN {
        return Err(CoreError::QueryFieldTooLong {
            field,
            len,
            max: MAX_QUERY_FIELD_LEN,
        });
    }
    let cleaned = sanitize_input(raw);
    if cleaned.is_empty() {
        return Err(CoreError::EmptyQueryField { field });
    }
    Ok(cleaned)
}
