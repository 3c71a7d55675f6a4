//! Error types for the em-core crate.
//!
//! This module provides the [`ConfigError`] type for every configuration
//! problem detected while deriving entity models. All of them are fatal: a
//! model is either built completely or not at all.

use camino::Utf8PathBuf;

use crate::types::ClassRef;

/// Errors raised while reading configuration or deriving an entity model.
///
/// # Taxonomy
///
/// - [`ConfigError::InvalidCombination`]: a feature flag that does not fit the
///   attribute's relationship kind
/// - [`ConfigError::UnresolvableReference`]: an explicit list names an
///   attribute that does not exist
/// - [`ConfigError::IllegalStructure`]: a structurally impossible setup, such
///   as an embedded type embedding itself or an incomplete cascade
/// - [`ConfigError::InvalidValue`]: an override string that cannot be parsed
///
/// # Examples
///
/// ```
/// use em_core::ConfigError;
///
/// let error = ConfigError::illegal_structure("Order.address", "embedded type embeds itself");
/// assert!(error.to_string().contains("Order.address"));
/// assert_eq!(error.path(), Some("Order.address"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A feature flag is incompatible with the attribute's relationship kind.
    #[error("invalid combination for '{path}': {reason}")]
    InvalidCombination {
        /// Full path of the offending attribute (`Order.total`).
        path: String,
        /// Explanation of the conflict.
        reason: String,
    },

    /// An explicit list names an attribute that does not exist.
    #[error("{context} of '{reference}' names unknown attribute '{name}'")]
    UnresolvableReference {
        /// Reference of the entity model being built.
        reference: String,
        /// The unknown attribute name.
        name: String,
        /// Which list contained the name (`attribute order`, `sort order`, ...).
        context: &'static str,
    },

    /// The configuration describes a structure that cannot be modelled.
    #[error("illegal structure at '{path}': {reason}")]
    IllegalStructure {
        /// Full path of the offending attribute or entity.
        path: String,
        /// Explanation of why the structure is illegal.
        reason: String,
    },

    /// An override value could not be parsed.
    #[error("invalid value '{value}' for '{key}': expected {expected}")]
    InvalidValue {
        /// The translation or configuration key.
        key: String,
        /// The raw value.
        value: String,
        /// Description of the accepted values.
        expected: &'static str,
    },

    /// The introspector does not know the requested class.
    #[error("unknown class: {0}")]
    UnknownClass(ClassRef),

    /// A configuration file could not be found.
    #[error("missing configuration file: {0}")]
    MissingFile(Utf8PathBuf),

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration or catalog file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidCombination`] error.
    #[inline]
    pub fn invalid_combination(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCombination {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new [`ConfigError::UnresolvableReference`] error.
    #[inline]
    pub fn unresolvable(
        reference: impl Into<String>,
        name: impl Into<String>,
        context: &'static str,
    ) -> Self {
        Self::UnresolvableReference {
            reference: reference.into(),
            name: name.into(),
            context,
        }
    }

    /// Creates a new [`ConfigError::IllegalStructure`] error.
    #[inline]
    pub fn illegal_structure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IllegalStructure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new [`ConfigError::InvalidValue`] error.
    #[inline]
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            expected,
        }
    }

    /// Returns the attribute or entity path this error points at, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidCombination { path, .. } | Self::IllegalStructure { path, .. } => {
                Some(path)
            }
            Self::UnresolvableReference { reference, .. } => Some(reference),
            Self::InvalidValue { key, .. } => Some(key),
            Self::UnknownClass(_) | Self::MissingFile(_) | Self::Io(_) | Self::Parse(_) => None,
        }
    }

    /// Returns `true` if this error comes from the model configuration itself
    /// rather than from reading a file.
    #[inline]
    #[must_use]
    pub const fn is_model_error(&self) -> bool {
        !matches!(self, Self::MissingFile(_) | Self::Io(_) | Self::Parse(_))
    }
}
