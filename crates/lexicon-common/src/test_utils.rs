//! Test utilities and shared test helpers for Lexicon.
//!
//! Provides logging setup for tests and on-disk content fixtures laid out
//! the way the properties content source expects
//! (`<root>/<COUNTRY>/<language>/<name>.properties`).

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Run `f` with a thread-local subscriber recording debug-level and above,
/// and return everything it logged as plain text.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = Arc::clone(&buffer);
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_ansi(false)
        .with_writer(move || CapturedWriter(Arc::clone(&writer)))
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.lock().map(|b| b.clone()).unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut captured) = self.0.lock() {
            captured.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write a properties file for `language`/`country` under `root`.
///
/// `name` may contain `/` to place the file in a nested directory.
pub fn write_properties(root: &Path, country: &str, language: &str, name: &str, body: &str) -> PathBuf {
    let path = root.join(country).join(language).join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create content directory");
    }
    std::fs::write(&path, body).expect("Failed to write properties file");
    path
}

/// Content fixtures shared by the content and CLI test suites.
pub mod content_fixtures {
    use super::write_properties;
    use std::path::Path;

    /// `index.properties` for en-US.
    pub const EN_US_INDEX: &str = "greeting=Hello\nfarewell=Goodbye\n";

    /// `footer.properties` for en-US.
    pub const EN_US_FOOTER: &str = "# footer strings\ncopyright=All rights reserved\n";

    /// `index.properties` for es-ES.
    pub const ES_ES_INDEX: &str = "greeting=Hola\nfarewell=Adios\n";

    /// Populate `root` with en-US (index + footer) and es-ES (index) bundles.
    ///
    /// Nothing is written for any other locale, so e.g. fr-CA resolves to
    /// no content.
    pub fn populate(root: &Path) {
        write_properties(root, "US", "en", "index.properties", EN_US_INDEX);
        write_properties(root, "US", "en", "footer.properties", EN_US_FOOTER);
        write_properties(root, "ES", "es", "index.properties", ES_ES_INDEX);
    }
}
