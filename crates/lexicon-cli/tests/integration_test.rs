//! Integration tests for lexicon-cli crate.
//!
//! These drive the argument parsing, configuration loading and a full
//! resolve against on-disk content.

use clap::Parser;
use lexicon_cli::{render, run, Args, CliError};
use lexicon_common::test_utils::{content_fixtures, create_temp_dir, init_test_logging};
use lexicon_content::ContentOrigin;
use std::path::Path;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Content fixtures under `content/` plus a YAML config pointing at them.
    fn new() -> Self {
        init_test_logging();
        let dir = create_temp_dir();
        content_fixtures::populate(&dir.path().join("content"));

        let config = format!(
            "content:\n  path: {}\n  fallback: en-US\nenvironment: production\n",
            dir.path().join("content").display()
        );
        std::fs::write(dir.path().join("lexicon.yaml"), config).unwrap();

        Self { dir }
    }

    fn config_path(&self) -> String {
        self.dir.path().join("lexicon.yaml").display().to_string()
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn args(&self, extra: &[&str]) -> Args {
        let config = self.config_path();
        let mut argv = vec!["lexicon", "--config", config.as_str()];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }
}

#[tokio::test]
async fn test_resolves_requested_locale() {
    let workspace = Workspace::new();
    let args = workspace.args(&["--language", "es", "--country", "ES"]);
    let config = args.load_config().unwrap();

    let content = run(&args, &config).await.unwrap();

    assert_eq!(content.locales, "es-ES");
    assert_eq!(content.origin, ContentOrigin::Requested);
    assert_eq!(content.messages.message("index", "greeting"), Some("Hola"));
}

#[tokio::test]
async fn test_falls_back_and_renders_json() {
    let workspace = Workspace::new();
    let args = workspace.args(&["--language", "fr", "--country", "CA"]);
    let config = args.load_config().unwrap();

    let content = run(&args, &config).await.unwrap();
    let rendered = render(&content).unwrap();
    let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(json["locales"], "fr-CA");
    assert_eq!(json["origin"], "fallback");
    assert_eq!(json["messages"]["footer"]["copyright"], "All rights reserved");
}

#[tokio::test]
async fn test_locality_flags_resolve() {
    let workspace = Workspace::new();
    let args = workspace.args(&["--locality-language", "es", "--locality-country", "ES"]);
    let config = args.load_config().unwrap();

    let content = run(&args, &config).await.unwrap();

    assert_eq!(content.locales, "es-ES");
    assert_eq!(content.origin, ContentOrigin::Requested);
}

#[tokio::test]
async fn test_content_path_override_to_empty_root() {
    let workspace = Workspace::new();
    let empty = workspace.root().join("empty");
    std::fs::create_dir_all(&empty).unwrap();
    let empty = empty.display().to_string();
    let args = workspace.args(&["--content-path", empty.as_str(), "--development"]);
    let config = args.load_config().unwrap();

    let content = run(&args, &config).await.unwrap();

    assert_eq!(content.locales, "en-US");
    assert_eq!(content.origin, ContentOrigin::Empty);
    assert!(content.messages.is_empty());
}

#[test]
fn test_invalid_fallback_is_config_error() {
    let workspace = Workspace::new();
    let args = workspace.args(&["--fallback", "english"]);

    let err = args.load_config().unwrap_err();

    assert!(matches!(err, CliError::Config(_)), "unexpected error: {err}");
}

#[test]
fn test_fallback_with_extra_segments_is_config_error() {
    let workspace = Workspace::new();
    let args = workspace.args(&["--fallback", "zh-Hant-TW"]);

    assert!(matches!(args.load_config(), Err(CliError::Config(_))));
}

#[test]
fn test_missing_config_file_is_config_error() {
    let workspace = Workspace::new();
    let missing = workspace.root().join("missing.yaml").display().to_string();
    let args = Args::try_parse_from(["lexicon", "--config", missing.as_str()]).unwrap();

    assert!(matches!(args.load_config(), Err(CliError::Config(_))));
}

#[test]
fn test_run_on_blocking_runtime() {
    let workspace = Workspace::new();
    let args = workspace.args(&[]);
    let config = args.load_config().unwrap();

    let content = tokio_test::block_on(run(&args, &config)).unwrap();

    assert_eq!(content.locales, "en-US");
    assert_eq!(content.messages.names(), vec!["footer", "index"]);
}
