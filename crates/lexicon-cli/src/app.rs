//! Command line arguments and the single-request run.

use crate::error::CliResult;
use clap::Parser;
use lexicon_config::{Config, ConfigLoader, ConfigValidator, Environment};
use lexicon_content::{ContentResolver, LocaleHint, LocaleRequest, LocalizedContent, PropertiesSource, RequestContext};
use std::path::PathBuf;
use tracing::info;

/// Command line arguments
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "lexicon", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Requested language, e.g. `fr`
    #[arg(short, long)]
    pub language: Option<String>,

    /// Requested country, e.g. `CA`
    #[arg(short = 'C', long)]
    pub country: Option<String>,

    /// Language of the request context locality
    #[arg(long)]
    pub locality_language: Option<String>,

    /// Country of the request context locality
    #[arg(long)]
    pub locality_country: Option<String>,

    /// Content root, overriding the configuration
    #[arg(long)]
    pub content_path: Option<PathBuf>,

    /// Fallback locale as `language-COUNTRY`, overriding the configuration
    #[arg(long)]
    pub fallback: Option<String>,

    /// Read content on every load instead of caching it
    #[arg(long)]
    pub development: bool,
}

fn hint(language: Option<&String>, country: Option<&String>) -> Option<LocaleHint> {
    if language.is_none() && country.is_none() {
        return None;
    }
    Some(LocaleHint {
        language: language.cloned(),
        country: country.cloned(),
    })
}

impl Args {
    /// The locale request described by the arguments
    pub fn request(&self) -> LocaleRequest {
        let locality = hint(self.locality_language.as_ref(), self.locality_country.as_ref());

        LocaleRequest {
            content_locale: hint(self.language.as_ref(), self.country.as_ref()),
            context: locality.map(|locality| RequestContext {
                locality: Some(locality),
            }),
        }
    }

    /// Apply command line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.content_path {
            config.content.path.clone_from(path);
        }
        if let Some(fallback) = &self.fallback {
            config.content.fallback.clone_from(fallback);
        }
        if self.development {
            config.environment = Environment::Development;
        }
    }

    /// Load the configuration file (or defaults), then apply overrides
    pub fn load_config(&self) -> CliResult<Config> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_config(path)?,
            None => ConfigLoader::load()?,
        };

        self.apply_overrides(&mut config);
        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

/// Resolve the request described by `args` against `config`.
pub async fn run(args: &Args, config: &Config) -> CliResult<LocalizedContent> {
    let mut resolver = ContentResolver::from_config(config, PropertiesSource::new())?;
    if args.development {
        resolver = resolver.with_mode_probe(|| true);
    }

    let request = args.request();
    let content = resolver.resolve(&request).await?;

    info!(
        locale = %content.locales,
        origin = ?content.origin,
        items = content.messages.len(),
        "request resolved"
    );
    Ok(content)
}

/// Pretty JSON rendering of resolved content
pub fn render(content: &LocalizedContent) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("lexicon").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_is_empty_request() {
        let args = parse(&[]);
        assert_eq!(args.request(), LocaleRequest::empty());
        assert!(!args.development);
    }

    #[test]
    fn test_direct_hint_from_flags() {
        let args = parse(&["--language", "fr", "-C", "CA"]);
        assert_eq!(
            args.request(),
            LocaleRequest::with_content_locale(LocaleHint::new("fr", "CA"))
        );
    }

    #[test]
    fn test_locality_from_flags() {
        let args = parse(&["--locality-country", "ES"]);
        assert_eq!(
            args.request(),
            LocaleRequest::with_locality(LocaleHint::country_only("ES"))
        );
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = parse(&["--content-path", "/srv/content", "--fallback", "de-DE", "--development"]);
        let mut config = Config::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.content.path, PathBuf::from("/srv/content"));
        assert_eq!(config.content.fallback, "de-DE");
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = Config::default();
        parse(&[]).apply_overrides(&mut config);
        assert_eq!(config, Config::default());
    }
}
