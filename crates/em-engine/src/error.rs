//! Error types for the em-engine crate.
//!
//! This module provides the [`ModelError`] type returned by every model
//! query. Configuration problems are wrapped [`ConfigError`]s; the only
//! other failure is a lazy handle whose provider is gone.

use em_core::ConfigError;

/// Errors that can occur while building or resolving an entity model.
///
/// None of these are retryable: the same request against the same sources
/// fails the same way.
///
/// # Examples
///
/// ```
/// use em_core::ConfigError;
/// use em_engine::ModelError;
///
/// let error = ModelError::from(ConfigError::illegal_structure("Order.address", "self-embedding"));
/// assert!(error.is_configuration());
/// assert_eq!(error.path(), Some("Order.address"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The model configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A lazy model handle outlived the provider it was bound to.
    #[error("model provider for '{reference}' is no longer available")]
    ProviderUnavailable {
        /// Reference of the unresolved model.
        reference: String,
    },
}

impl ModelError {
    /// Creates a new [`ModelError::ProviderUnavailable`] error.
    #[inline]
    pub fn provider_unavailable(reference: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            reference: reference.into(),
        }
    }

    /// Returns `true` if this error is a configuration error.
    #[inline]
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the attribute or entity path this error points at, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Config(error) => error.path(),
            Self::ProviderUnavailable { reference } => Some(reference),
        }
    }
}
