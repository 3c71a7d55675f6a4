//! An in-memory [`TranslationStore`].

use serde::{Deserialize, Serialize};

use crate::FxHashMap;
use crate::locale::Locale;
use crate::source::TranslationStore;

/// Override strings grouped by locale tag.
///
/// Lookups walk the locale's fallback chain, so an entry stored for `de`
/// answers requests for `de-CH`, and an entry stored for the root locale
/// (empty tag) answers every request.
///
/// Serialized as `{"<tag>": {"<key>": "<value>"}}`.
///
/// # Examples
///
/// ```
/// use em_core::{Locale, MessageBundle, TranslationStore};
///
/// let bundle = MessageBundle::new()
///     .with("de", "Order.displayName", "Bestellung")
///     .with("", "Order.displayName", "Order");
///
/// assert_eq!(bundle.lookup(&Locale::new("de-CH"), "Order.displayName").as_deref(), Some("Bestellung"));
/// assert_eq!(bundle.lookup(&Locale::new("fr"), "Order.displayName").as_deref(), Some("Order"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBundle {
    entries: FxHashMap<Locale, FxHashMap<String, String>>,
}

impl MessageBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any previous one.
    pub fn insert(&mut self, locale: &str, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(Locale::new(locale))
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Builder form of [`MessageBundle::insert`].
    #[must_use]
    pub fn with(mut self, locale: &str, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(locale, key, value);
        self
    }

    /// Returns the total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(FxHashMap::len).sum()
    }

    /// Returns `true` if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TranslationStore for MessageBundle {
    fn lookup(&self, locale: &Locale, key: &str) -> Option<String> {
        locale.fallback_chain().into_iter().find_map(|tag| {
            self.entries
                .get(&Locale::new(tag))
                .and_then(|messages| messages.get(key))
                .cloned()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_locale_wins() {
        let bundle = MessageBundle::new()
            .with("de", "k", "de")
            .with("de_CH", "k", "de-CH");
        assert_eq!(bundle.lookup(&Locale::new("de-CH"), "k").as_deref(), Some("de-CH"));
        assert_eq!(bundle.lookup(&Locale::new("de-AT"), "k").as_deref(), Some("de"));
    }

    #[test]
    fn test_missing_key() {
        let bundle = MessageBundle::new().with("en", "a", "b");
        assert!(bundle.lookup(&Locale::new("en"), "missing").is_none());
        assert!(bundle.lookup(&Locale::new("fr"), "a").is_none());
    }

    #[test]
    fn test_len_counts_all_locales() {
        let mut bundle = MessageBundle::new();
        assert!(bundle.is_empty());
        bundle.insert("en", "a", "1");
        bundle.insert("de", "a", "2");
        bundle.insert("de", "a", "3");
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_deserialize_nested_maps() {
        let json = r#"{"en": {"Order.total.displayName": "Grand Total"}}"#;
        let bundle: MessageBundle = serde_json::from_str(json).unwrap();
        assert_eq!(
            bundle.lookup(&Locale::new("en-GB"), "Order.total.displayName").as_deref(),
            Some("Grand Total")
        );
    }
}
