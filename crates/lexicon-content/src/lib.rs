//! # Lexicon Content
//!
//! Resolves the locale of a request and loads the matching localized content
//! bundle, loading each locale at most once per process.
//!
//! - [`LocaleResolver`] turns optional request hints into a
//!   `language-COUNTRY` locale, filling gaps from the configured fallback.
//! - [`DirectLoader`] asks a [`ContentSource`] for a locale's bundle and
//!   normalizes its item names (`index.properties` becomes `index`).
//! - [`MemoizedLoader`] shares one in-flight or completed load per
//!   `(locale, country, language)` key for the lifetime of the process.
//! - [`ContentResolver`] ties them together per request, picks the caching
//!   mode once at the first request, and falls back to the fallback locale
//!   when the requested one has no content.
//!
//! # Example
//!
//! ```no_run
//! use lexicon_config::Config;
//! use lexicon_content::{ContentResolver, LocaleHint, LocaleRequest, PropertiesSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ContentResolver::from_config(&Config::default(), PropertiesSource::new())?;
//!
//! let request = LocaleRequest::with_content_locale(LocaleHint::new("fr", "CA"));
//! let content = resolver.resolve(&request).await?;
//! println!("{} -> {:?}", content.locales, content.messages.names());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod error;
pub mod loader;
pub mod locale;
pub mod memo;
pub mod properties;
pub mod resolver;
pub mod source;

pub use bundle::{normalize_item_names, ContentBundle, ItemValue, LocaleBundles, RawItems, PROPERTIES_SUFFIX};
pub use error::{LoadResult, SourceError};
pub use loader::{DirectLoader, LoadContent, LoadKey};
pub use locale::{FallbackLocale, LocaleHint, LocaleRequest, LocaleResolver, RequestContext, ResolvedLocale};
pub use memo::{CacheMetrics, MemoizedLoader};
pub use properties::{parse_properties, PropertiesError, PropertiesSource};
pub use resolver::{ContentOrigin, ContentResolver, LoaderMode, LocalizedContent, ModeProbe, ResolverSettings};
pub use source::ContentSource;
