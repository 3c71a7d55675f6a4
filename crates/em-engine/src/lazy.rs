//! Deferred model resolution between cooperating providers.
//!
//! Two factories may describe classes that reference each other. When the
//! builder of one factory reaches a nested reference that a cooperating
//! provider claims, it does not build the model itself: it stores a
//! [`LazyModelHandle`] that asks the provider on first access. Providers are
//! held weakly, so cooperating factories never keep each other alive.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use em_core::ClassRef;

use crate::entity::EntityModel;
use crate::error::ModelError;

/// A source of entity models.
///
/// Implemented by [`ModelFactory`](crate::ModelFactory).
pub trait ModelProvider: Send + Sync {
    /// Returns the model for `reference`, building it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the model cannot be built.
    fn get_model_for(&self, reference: &str, class: &ClassRef) -> Result<Arc<EntityModel>, ModelError>;

    /// Returns `true` if a model for `reference` is already cached.
    fn has_model(&self, reference: &str) -> bool;

    /// Returns `true` if this provider is responsible for the model.
    fn can_provide_model(&self, reference: &str, class: &ClassRef) -> bool;
}

/// A reference to a model owned by another provider, resolved on first
/// access and memoized.
pub struct LazyModelHandle {
    provider: Weak<dyn ModelProvider>,
    reference: String,
    class: ClassRef,
    model: OnceLock<Arc<EntityModel>>,
}

impl LazyModelHandle {
    /// Creates an unresolved handle.
    #[must_use]
    pub fn new(provider: Weak<dyn ModelProvider>, reference: impl Into<String>, class: ClassRef) -> Self {
        Self {
            provider,
            reference: reference.into(),
            class,
            model: OnceLock::new(),
        }
    }

    /// Returns the model reference.
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the entity class.
    #[inline]
    #[must_use]
    pub const fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Returns `true` once the model has been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.model.get().is_some()
    }

    /// Resolves the model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ProviderUnavailable`] if the provider has been
    /// dropped, or the provider's error if it cannot build the model.
    pub fn get(&self) -> Result<Arc<EntityModel>, ModelError> {
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }

        let provider = self
            .provider
            .upgrade()
            .ok_or_else(|| ModelError::provider_unavailable(&self.reference))?;
        let model = provider.get_model_for(&self.reference, &self.class)?;
        Ok(Arc::clone(self.model.get_or_init(|| model)))
    }
}

impl fmt::Debug for LazyModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyModelHandle")
            .field("reference", &self.reference)
            .field("class", &self.class)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
