//! Locale hints, the fallback locale, and per-request locale resolution

use crate::loader::LoadKey;
use lexicon_common::{LexiconError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A `{language, country}` pair supplied by the hosting layer.
///
/// Empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleHint {
    /// Language code, e.g. `en`
    pub language: Option<String>,
    /// Country code, e.g. `US`
    pub country: Option<String>,
}

impl LocaleHint {
    /// Hint carrying both fields
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            country: Some(country.into()),
        }
    }

    /// Hint carrying only a language
    pub fn language_only(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            country: None,
        }
    }

    /// Hint carrying only a country
    pub fn country_only(country: impl Into<String>) -> Self {
        Self {
            language: None,
            country: Some(country.into()),
        }
    }

    /// Language, if present and non-empty
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref().filter(|s| !s.is_empty())
    }

    /// Country, if present and non-empty
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref().filter(|s| !s.is_empty())
    }

    /// Both fields are usable
    pub fn is_complete(&self) -> bool {
        self.language().is_some() && self.country().is_some()
    }
}

/// Request-scoped context that may carry a locality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Locality detected for the request, e.g. by an upstream middleware
    pub locality: Option<LocaleHint>,
}

/// Locale signals available for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleRequest {
    /// A locale already chosen upstream; highest priority
    pub content_locale: Option<LocaleHint>,
    /// Request context carrying a nested locality
    pub context: Option<RequestContext>,
}

impl LocaleRequest {
    /// Request with no locale signals at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Request carrying a direct locale hint
    pub fn with_content_locale(hint: LocaleHint) -> Self {
        Self {
            content_locale: Some(hint),
            context: None,
        }
    }

    /// Request carrying only a context locality
    pub fn with_locality(locality: LocaleHint) -> Self {
        Self {
            content_locale: None,
            context: Some(RequestContext {
                locality: Some(locality),
            }),
        }
    }

    /// The context locality, if any
    pub fn locality(&self) -> Option<&LocaleHint> {
        self.context.as_ref().and_then(|c| c.locality.as_ref())
    }

    /// Hint shapes in priority order: direct hint, then context locality.
    fn candidates(&self) -> [Option<&LocaleHint>; 2] {
        [self.content_locale.as_ref(), self.locality()]
    }

    /// The hint to read fields from.
    ///
    /// The first complete candidate wins. Without one, the first candidate
    /// that is present at all lends whatever fields it has.
    fn effective_hint(&self) -> Option<&LocaleHint> {
        let candidates = self.candidates();
        candidates
            .iter()
            .flatten()
            .find(|hint| hint.is_complete())
            .or_else(|| candidates.iter().flatten().next())
            .copied()
    }
}

/// Process-wide fallback locale, parsed once from `language-COUNTRY`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FallbackLocale {
    tag: String,
    language: String,
    country: String,
}

impl FallbackLocale {
    /// Parse a fallback tag of exactly two non-empty `-` segments.
    ///
    /// The tag is kept verbatim as the locale key of fallback loads, so it
    /// must equal `language-country` for sources to return content under it.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.split_once('-') {
            Some((language, country)) if !language.is_empty() && !country.is_empty() && !country.contains('-') => Ok(Self {
                tag: tag.to_string(),
                language: language.to_string(),
                country: country.to_string(),
            }),
            _ => Err(LexiconError::validation_field(
                format!("fallback locale '{tag}' must look like language-COUNTRY"),
                "content.fallback",
            )),
        }
    }

    /// The configured tag, e.g. `en-US`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Fallback language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Fallback country
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Key used to load the fallback bundle
    pub fn load_key(&self) -> LoadKey {
        LoadKey::new(&self.tag, &self.country, &self.language)
    }
}

impl Default for FallbackLocale {
    fn default() -> Self {
        Self {
            tag: "en-US".to_string(),
            language: "en".to_string(),
            country: "US".to_string(),
        }
    }
}

impl fmt::Display for FallbackLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// Locale identity computed for one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedLocale {
    /// `language + "-" + country`
    pub locale: String,
    /// Resolved language
    pub language: String,
    /// Resolved country
    pub country: String,
}

impl ResolvedLocale {
    /// Build from parts; the tag is a plain concatenation.
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        let language = language.into();
        let country = country.into();
        Self {
            locale: format!("{language}-{country}"),
            language,
            country,
        }
    }

    /// Key used to load this locale's bundle
    pub fn load_key(&self) -> LoadKey {
        LoadKey::new(&self.locale, &self.country, &self.language)
    }
}

impl fmt::Display for ResolvedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.locale)
    }
}

/// Computes a request's locale from its hints and the fallback locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleResolver {
    fallback: FallbackLocale,
}

impl LocaleResolver {
    /// Resolver filling gaps from `fallback`
    pub const fn new(fallback: FallbackLocale) -> Self {
        Self { fallback }
    }

    /// The fallback locale
    pub const fn fallback(&self) -> &FallbackLocale {
        &self.fallback
    }

    /// Resolve a request's locale. Language and country fall back
    /// independently, so a request may end up with a mixed locale.
    pub fn resolve(&self, request: &LocaleRequest) -> ResolvedLocale {
        match request.locality() {
            Some(locality) => debug!(?locality, "locality in request"),
            None => debug!("no locality in request context"),
        }

        let hint = request.effective_hint();
        let language = hint
            .and_then(LocaleHint::language)
            .unwrap_or_else(|| self.fallback.language());
        let country = hint
            .and_then(LocaleHint::country)
            .unwrap_or_else(|| self.fallback.country());

        let resolved = ResolvedLocale::new(language, country);
        debug!(locale = %resolved, "resolved locale");
        resolved
    }
}
