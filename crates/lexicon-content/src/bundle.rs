//! Content bundles and item name normalization

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque content of one bundle item, typically a key/value translation table.
pub type ItemValue = serde_json::Value;

/// Items of one locale as produced by a content source, keyed by raw name.
pub type RawItems = HashMap<String, ItemValue>;

/// Everything a content source returned, keyed by locale tag.
pub type LocaleBundles = HashMap<String, RawItems>;

/// File extension stripped from raw item names.
pub const PROPERTIES_SUFFIX: &str = ".properties";

/// Rewrite item names in place: `index.properties` becomes `index`.
///
/// The raw-named entry is removed and its value re-inserted under the
/// normalized name. A normalized name that already exists is overwritten.
pub fn normalize_item_names(items: &mut RawItems) {
    let raw_names: Vec<String> = items
        .keys()
        .filter(|name| name.ends_with(PROPERTIES_SUFFIX))
        .cloned()
        .collect();

    for raw in raw_names {
        if let Some(value) = items.remove(&raw) {
            let normalized = raw.strip_suffix(PROPERTIES_SUFFIX).unwrap_or(&raw).to_string();
            items.insert(normalized, value);
        }
    }
}

/// Normalized content of one locale, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentBundle {
    items: HashMap<String, ItemValue>,
}

impl ContentBundle {
    /// Adopt raw source items, normalizing their names.
    pub fn from_raw(mut items: RawItems) -> Self {
        normalize_item_names(&mut items);
        Self { items }
    }

    /// Bundle with no items
    pub fn empty() -> Self {
        Self::default()
    }

    /// Item by normalized name
    pub fn get(&self, name: &str) -> Option<&ItemValue> {
        self.items.get(name)
    }

    /// Whether an item exists
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// A single string entry inside an item, e.g. `message("index", "greeting")`
    pub fn message(&self, item: &str, key: &str) -> Option<&str> {
        self.items.get(item)?.get(key)?.as_str()
    }

    /// Item names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.items.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemValue)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }
}
