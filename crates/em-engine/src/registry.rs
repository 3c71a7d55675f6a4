//! The reference-keyed model cache.
//!
//! [`ModelRegistry`] holds every entity model built by a factory, keyed by
//! reference, for the lifetime of the factory. It never evicts.
//!
//! # Build states
//!
//! A reference is `Unrequested`, `InProgress` (its `(reference, class)` pair
//! is in the processed set) or `Cached`. Builds are serialized by a
//! re-entrant lock, so the builder may recurse into nested references on
//! the same thread while other threads wait. A request for a pair that is
//! already in progress never re-enters the builder.
//!
//! # Safety Pattern
//!
//! Like every `DashMap` use in this workspace, the registry never hands out
//! `Ref` guards: lookups clone the `Arc` and drop the guard immediately.

use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use em_core::{ClassRef, ConfigError};
use parking_lot::ReentrantMutex;

use crate::entity::EntityModel;
use crate::error::ModelError;

/// A thread-safe, append-only cache of entity models.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    /// Finished models by reference.
    models: DashMap<Arc<str>, Arc<EntityModel>>,
    /// `(reference, class)` pairs currently being built.
    processed: DashSet<(Arc<str>, ClassRef)>,
    /// Serializes builds; re-entrant for nested builds.
    build_lock: ReentrantMutex<()>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached model for `reference`.
    #[must_use]
    pub fn get(&self, reference: &str) -> Option<Arc<EntityModel>> {
        self.models.get(reference).map(|r| Arc::clone(r.value()))
    }

    /// Returns `true` if a model for `reference` is cached.
    #[must_use]
    pub fn has(&self, reference: &str) -> bool {
        self.models.contains_key(reference)
    }

    /// Returns `true` if `(reference, class)` is being built.
    #[must_use]
    pub fn is_processed(&self, reference: &str, class: &ClassRef) -> bool {
        self.processed.contains(&(Arc::<str>::from(reference), class.clone()))
    }

    /// Returns the number of cached models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Returns the references of all cached models, sorted.
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        let mut references: Vec<String> = self.models.iter().map(|r| r.key().to_string()).collect();
        references.sort_unstable();
        references
    }

    /// Returns the cached model for `reference`, running `build` on a miss.
    ///
    /// `build` runs with the registry's build lock held and the pair marked
    /// in progress; the mark is cleared whether or not it succeeds. The
    /// result is cached only on success. The flag is `true` when this call
    /// ran `build`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IllegalStructure`] if the pair is already in
    /// progress, or the error returned by `build`.
    pub fn get_or_build<F>(
        &self,
        reference: &str,
        class: &ClassRef,
        build: F,
    ) -> Result<(Arc<EntityModel>, bool), ModelError>
    where
        F: FnOnce() -> Result<EntityModel, ModelError>,
    {
        if let Some(model) = self.get(reference) {
            return Ok((model, false));
        }

        let _guard = self.build_lock.lock();

        if let Some(model) = self.get(reference) {
            return Ok((model, false));
        }

        let key = (Arc::<str>::from(reference), class.clone());
        if !self.processed.insert(key.clone()) {
            return Err(ConfigError::illegal_structure(
                reference,
                format!("model of {class} is already being built"),
            )
            .into());
        }

        let result = build();
        self.processed.remove(&key);

        let model = Arc::new(result?);
        self.models.insert(key.0, Arc::clone(&model));
        Ok((model, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::empty_model;

    #[test]
    fn test_registry_new() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.has("Order"));
        assert!(registry.get("Order").is_none());
    }

    #[test]
    fn test_get_or_build_caches() {
        let registry = ModelRegistry::new();
        let class = ClassRef::new("Customer");

        let mut calls = 0;
        let (first, built) = registry
            .get_or_build("Customer", &class, || {
                calls += 1;
                Ok(empty_model("Customer", "Customer"))
            })
            .unwrap();
        assert!(built);
        let (second, built) = registry
            .get_or_build("Customer", &class, || Err(ModelError::provider_unavailable("Customer")))
            .unwrap();

        assert!(!built);
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.references(), vec!["Customer".to_owned()]);
    }

    #[test]
    fn test_failed_build_clears_mark() {
        let registry = ModelRegistry::new();
        let class = ClassRef::new("Order");

        let result = registry.get_or_build("Order", &class, || {
            assert!(registry.is_processed("Order", &class));
            Err(ConfigError::illegal_structure("Order", "broken").into())
        });

        assert!(result.is_err());
        assert!(!registry.is_processed("Order", &class));
        assert!(!registry.has("Order"));
    }

    #[test]
    fn test_reentrant_request_is_illegal() {
        let registry = ModelRegistry::new();
        let class = ClassRef::new("Order");

        let result = registry.get_or_build("Order", &class, || {
            registry.get_or_build("Order", &class, || Ok(empty_model("Order", "Order")))?;
            Err(ModelError::provider_unavailable("Order"))
        });

        assert!(matches!(
            result,
            Err(ModelError::Config(ConfigError::IllegalStructure { .. }))
        ));
    }
}
