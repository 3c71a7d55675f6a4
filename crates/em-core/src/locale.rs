//! Locale identifiers and their fallback chains.
//!
//! A [`Locale`] is a normalized language tag (`de-CH`, `en`). Translation
//! lookups walk [`Locale::fallback_chain`] from the most specific tag down to
//! the root locale.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A normalized language tag.
///
/// Underscores are accepted on input and normalized to `-`, so `de_CH` and
/// `de-CH` denote the same locale. The empty tag is the root locale.
///
/// # Examples
///
/// ```
/// use em_core::Locale;
///
/// let locale = Locale::new("de_CH");
/// assert_eq!(locale.tag(), "de-CH");
/// assert_eq!(locale.language(), "de");
/// assert_eq!(locale.fallback_chain().as_slice(), &["de-CH", "de", ""]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(Arc<str>);

impl Locale {
    /// Creates a locale from a language tag.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        let normalized = tag.trim().replace('_', "-");
        Self(Arc::from(normalized))
    }

    /// Returns the root locale (empty tag).
    #[must_use]
    pub fn root() -> Self {
        Self(Arc::from(""))
    }

    /// Returns the normalized tag.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root locale.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the language part of the tag (`de` for `de-CH`).
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// Returns the tags to try, most specific first, ending with the root.
    #[must_use]
    pub fn fallback_chain(&self) -> SmallVec<[&str; 4]> {
        let mut chain = SmallVec::new();
        let mut tag: &str = &self.0;
        while !tag.is_empty() {
            chain.push(tag);
            tag = tag.rfind('-').map_or("", |pos| &tag[..pos]);
        }
        chain.push("");
        chain
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("root")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::new(&tag)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0.as_ref().to_owned()
    }
}
