//! File-system content source reading `.properties` bundles
//!
//! Content is laid out as `<content_path>/<COUNTRY>/<language>/**/*.properties`.
//! Every file below a locale directory becomes one bundle item named by its
//! path relative to that directory (`index.properties`,
//! `emails/welcome.properties`), holding a flat table of string values.

use crate::bundle::{ItemValue, LocaleBundles, RawItems, PROPERTIES_SUFFIX};
use crate::source::ContentSource;
use async_trait::async_trait;
use lexicon_common::{LexiconError, Result};
use serde_json::Map;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Properties syntax errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertiesError {
    /// `\u` not followed by four hex digits, or not a valid code point
    #[error("invalid unicode escape '\\u{escape}' on line {line}")]
    InvalidUnicodeEscape {
        /// 1-based line where the logical line starts
        line: usize,
        /// The digits that followed `\u`
        escape: String,
    },
}

/// Parse properties text into `(key, value)` pairs in file order.
///
/// Supports `key=value`, `key: value` and `key value` forms, `#` and `!`
/// comments, backslash line continuations, and the usual escapes
/// (`\t`, `\n`, `\r`, `\f`, `\uXXXX`, escaped separators).
pub fn parse_properties(text: &str) -> std::result::Result<Vec<(String, String)>, PropertiesError> {
    let mut entries = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let trimmed = line.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let line_number = index + 1;
        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let (raw_key, raw_value) = split_key_value(&logical);
        entries.push((unescape(raw_key, line_number)?, unescape(raw_value, line_number)?));
    }

    Ok(entries)
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let rest = rest.strip_prefix(|c: char| c == '=' || c == ':').unwrap_or(rest);
    (&line[..key_end], rest.trim_start_matches(is_blank))
}

fn unescape(raw: &str, line: usize) -> std::result::Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let high = read_code_unit(&mut chars, line)?;
                let code_point = if (0xD800..0xDC00).contains(&high) {
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_code_unit(&mut chars, line)?,
                        _ => return Err(invalid_escape(format!("{high:04X}"), line)),
                    };
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(invalid_escape(format!("{low:04X}"), line));
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                let decoded =
                    char::from_u32(code_point).ok_or_else(|| invalid_escape(format!("{code_point:04X}"), line))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>, line: usize) -> std::result::Result<u32, PropertiesError> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return Err(invalid_escape(digits, line));
    }
    u32::from_str_radix(&digits, 16).map_err(|_| invalid_escape(digits, line))
}

fn invalid_escape(escape: String, line: usize) -> PropertiesError {
    PropertiesError::InvalidUnicodeEscape { line, escape }
}

/// Content source over a directory tree of `.properties` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesSource;

impl PropertiesSource {
    /// New source
    pub const fn new() -> Self {
        Self
    }

    /// Directory holding one locale's files
    pub fn locale_dir(content_path: &Path, country: &str, language: &str) -> PathBuf {
        content_path.join(country).join(language)
    }

    /// All `.properties` files below `root`, as paths relative to it.
    async fn discover(root: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        let mut pending = vec![PathBuf::new()];

        while let Some(relative) = pending.pop() {
            let mut entries = fs::read_dir(root.join(&relative)).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let child = relative.join(entry.file_name());
                if file_type.is_dir() {
                    pending.push(child);
                } else if child.to_string_lossy().ends_with(PROPERTIES_SUFFIX) {
                    found.push(child);
                }
            }
        }

        found.sort();
        Ok(found)
    }

    async fn read_item(path: &Path, locale: &str) -> Result<ItemValue> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| LexiconError::content_with_source(format!("failed to read {}", path.display()), locale, e))?;

        let entries = parse_properties(&text)
            .map_err(|e| LexiconError::content_with_source(format!("failed to parse {}", path.display()), locale, e))?;

        let table: Map<String, ItemValue> = entries
            .into_iter()
            .map(|(key, value)| (key, ItemValue::String(value)))
            .collect();
        Ok(ItemValue::Object(table))
    }
}

/// Item name for a relative path, always `/`-separated.
fn item_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl ContentSource for PropertiesSource {
    #[instrument(skip(self))]
    async fn load_bundles(&self, content_path: &Path, country: &str, language: &str) -> Result<LocaleBundles> {
        let locale = format!("{language}-{country}");
        let dir = Self::locale_dir(content_path, country, language);

        let files = match Self::discover(&dir).await {
            Ok(files) => files,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "no content directory for locale");
                return Ok(LocaleBundles::new());
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to scan content directory");
                return Err(LexiconError::content_with_source(
                    format!("failed to scan {}", dir.display()),
                    locale,
                    e,
                ));
            }
        };

        if files.is_empty() {
            debug!(dir = %dir.display(), "content directory holds no properties files");
            return Ok(LocaleBundles::new());
        }

        let mut items = RawItems::with_capacity(files.len());
        for relative in &files {
            let value = Self::read_item(&dir.join(relative), &locale).await?;
            items.insert(item_name(relative), value);
        }

        info!(%locale, items = items.len(), "loaded properties bundle");
        Ok(LocaleBundles::from([(locale, items)]))
    }
}
