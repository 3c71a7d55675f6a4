//! Per-locale memoization of derived strings.
//!
//! Locale-dependent texts (display names, descriptions, prompts, boolean
//! representations) are computed on first request for a locale and kept for
//! the lifetime of the model. Two threads racing on the same locale may both
//! compute the value; the first insert wins and both return it.

use std::fmt;
use std::sync::Arc;

use em_core::{FxHashMap, Locale, TranslationStore};
use parking_lot::RwLock;

/// An append-only map from locale to a computed string.
#[derive(Default)]
pub struct LocaleCache {
    values: RwLock<FxHashMap<Locale, Arc<str>>>,
}

impl LocaleCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `locale`, computing it first if needed.
    ///
    /// `compute` runs without any lock held, so it may itself read other
    /// caches.
    pub fn get_or_compute(&self, locale: &Locale, compute: impl FnOnce() -> String) -> Arc<str> {
        if let Some(value) = self.values.read().get(locale) {
            return Arc::clone(value);
        }

        let computed: Arc<str> = Arc::from(compute());
        let mut values = self.values.write();
        Arc::clone(values.entry(locale.clone()).or_insert(computed))
    }

    /// Returns the number of cached locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns `true` if nothing has been computed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl fmt::Debug for LocaleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleCache")
            .field("locales", &self.len())
            .finish()
    }
}

/// One translatable text: a store key, an optional declared value and its
/// per-locale cache.
///
/// Resolution order for a locale: translation store, declared value, then
/// the caller's fallback.
#[derive(Debug)]
pub(crate) struct LocalizedText {
    key: String,
    declared: Option<String>,
    cache: LocaleCache,
}

impl LocalizedText {
    pub(crate) fn new(key: String, declared: Option<String>) -> Self {
        Self {
            key,
            declared,
            cache: LocaleCache::new(),
        }
    }

    pub(crate) fn resolve(
        &self,
        store: &dyn TranslationStore,
        locale: &Locale,
        fallback: impl FnOnce() -> String,
    ) -> Arc<str> {
        self.cache.get_or_compute(locale, || {
            store
                .lookup(locale, &self.key)
                .or_else(|| self.declared.clone())
                .unwrap_or_else(fallback)
        })
    }
}
