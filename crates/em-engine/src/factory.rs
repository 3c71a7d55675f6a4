//! The model query surface.
//!
//! [`ModelFactory`] owns the three collaborators, the engine configuration,
//! a [`ModelRegistry`] and the build statistics. Every model it hands out is
//! cached for the lifetime of the factory.
//!
//! # Cooperating providers
//!
//! Factories describing different parts of a domain can be linked with
//! [`add_delegate`](ModelFactory::add_delegate). A factory answers
//! [`can_provide_model`](ModelProvider::can_provide_model) for classes it
//! claims (by default: classes its introspector reports as entities or
//! embeddables). When a nested reference points at a class another provider
//! claims, the nested model becomes a
//! [`LazyModelHandle`](crate::LazyModelHandle) bound to that provider.
//! Delegates are held weakly.
//!
//! # Parallel warm-up
//!
//! [`warm_up`](ModelFactory::warm_up) builds many root models on the rayon
//! pool. Builds are serialized by the registry, so warm-up mostly overlaps
//! cache hits and error reporting.

use std::fmt;
use std::sync::{Arc, Weak};

use em_core::{
    ClassRef, DeclarativeConfigReader, DomainCatalog, EngineConfig, MessageBundle,
    StructuralIntrospector, TranslationStore,
};
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::builder::EntityModelBuilder;
use crate::entity::EntityModel;
use crate::error::ModelError;
use crate::lazy::ModelProvider;
use crate::registry::ModelRegistry;
use crate::stats::{BuildStats, StatsSnapshot};

type ClaimFn = Box<dyn Fn(&str, &ClassRef) -> bool + Send + Sync>;

/// Builds, caches and serves entity models.
///
/// # Thread Safety
///
/// `ModelFactory` is `Send` and `Sync`. Share it behind an `Arc`; cached
/// lookups never block on a build running elsewhere.
///
/// # Examples
///
/// ```
/// use em_core::{ClassDefinition, ClassRef, DomainCatalog, EngineConfig, MessageBundle};
/// use em_core::{PropertyDescriptor, ValueType};
/// use em_engine::ModelFactory;
///
/// let catalog = DomainCatalog::new()
///     .with(ClassDefinition::entity("Tag").property(PropertyDescriptor::new("label", ValueType::Text)));
/// let factory = ModelFactory::from_catalog(catalog, MessageBundle::new(), EngineConfig::default());
///
/// let first = factory.get_model(&ClassRef::new("Tag"))?;
/// let second = factory.get_model_for("Tag", &ClassRef::new("Tag"))?;
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(factory.stats().cache_hits, 1);
/// # Ok::<(), em_engine::ModelError>(())
/// ```
pub struct ModelFactory {
    introspector: Arc<dyn StructuralIntrospector>,
    declarations: Arc<dyn DeclarativeConfigReader>,
    translations: Arc<dyn TranslationStore>,
    config: EngineConfig,
    registry: ModelRegistry,
    stats: BuildStats,
    delegates: RwLock<Vec<Weak<dyn ModelProvider>>>,
    claim: Option<ClaimFn>,
}

impl ModelFactory {
    /// Creates a factory over the given collaborators.
    #[must_use]
    pub fn new(
        introspector: Arc<dyn StructuralIntrospector>,
        declarations: Arc<dyn DeclarativeConfigReader>,
        translations: Arc<dyn TranslationStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            introspector,
            declarations,
            translations,
            config,
            registry: ModelRegistry::new(),
            stats: BuildStats::new(),
            delegates: RwLock::new(Vec::new()),
            claim: None,
        }
    }

    /// Creates a factory reading structure and declarations from `catalog`
    /// and translations from `messages`.
    #[must_use]
    pub fn from_catalog(catalog: DomainCatalog, messages: MessageBundle, config: EngineConfig) -> Self {
        let catalog = Arc::new(catalog);
        let introspector: Arc<dyn StructuralIntrospector> = Arc::<DomainCatalog>::clone(&catalog);
        Self::new(introspector, catalog, Arc::new(messages), config)
    }

    /// Replaces the rule deciding which `(reference, class)` pairs this
    /// factory is responsible for.
    #[must_use]
    pub fn with_claim<F>(mut self, claim: F) -> Self
    where
        F: Fn(&str, &ClassRef) -> bool + Send + Sync + 'static,
    {
        self.claim = Some(Box::new(claim));
        self
    }

    /// Registers a cooperating provider. Providers are asked in the order
    /// they were added.
    pub fn add_delegate<P>(&self, provider: &Arc<P>)
    where
        P: ModelProvider + 'static,
    {
        let provider: Arc<dyn ModelProvider> = Arc::<P>::clone(provider);
        self.delegates.write().push(Arc::downgrade(&provider));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the model of `class` under its simple name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the model configuration is invalid.
    pub fn get_model(&self, class: &ClassRef) -> Result<Arc<EntityModel>, ModelError> {
        self.get_model_for(class.simple_name(), class)
    }

    /// Returns the model of `class` under `reference`, building it on first
    /// request.
    ///
    /// A reference this factory does not claim is handed to the first
    /// cooperating provider that can provide it. Nested references follow
    /// the same rule.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the model configuration is invalid.
    pub fn get_model_for(&self, reference: &str, class: &ClassRef) -> Result<Arc<EntityModel>, ModelError> {
        self.stats.record_request();

        if let Some(model) = self.registry.get(reference) {
            self.stats.record_cache_hit();
            return Ok(model);
        }

        if let Some(provider) = self.delegate_for(reference, class).and_then(|p| p.upgrade()) {
            debug!(reference, class = %class, "Delegating model request");
            return provider.get_model_for(reference, class);
        }

        let (model, built) = self.build_model(reference, class)?;
        if !built {
            self.stats.record_cache_hit();
        }
        Ok(model)
    }

    /// Returns `true` if a model for `reference` is cached.
    #[must_use]
    pub fn has_model(&self, reference: &str) -> bool {
        self.registry.has(reference)
    }

    /// Returns `true` if this factory is responsible for the model.
    #[must_use]
    pub fn can_provide_model(&self, reference: &str, class: &ClassRef) -> bool {
        self.has_model(reference) || self.claims(reference, class)
    }

    /// Builds the root models of `classes` in parallel.
    ///
    /// # Arguments
    ///
    /// * `classes` - Entity classes to build, each under its simple name
    ///
    /// # Returns
    ///
    /// One `(class, result)` pair per input, in input order. A failure does
    /// not stop the other builds.
    #[must_use]
    pub fn warm_up(&self, classes: &[ClassRef]) -> Vec<(ClassRef, Result<Arc<EntityModel>, ModelError>)> {
        let results: Vec<_> = classes
            .par_iter()
            .map(|class| (class.clone(), self.get_model(class)))
            .collect();

        let failures = results.iter().filter(|(_, r)| r.is_err()).count();
        info!(
            classes = classes.len(),
            failures,
            models = self.registry.len(),
            "Warm-up complete"
        );
        results
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the engine configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the model cache.
    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Returns a snapshot of the build statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the references of all cached models, sorted.
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        self.registry.references()
    }

    pub(crate) const fn build_stats(&self) -> &BuildStats {
        &self.stats
    }

    pub(crate) fn introspector(&self) -> &dyn StructuralIntrospector {
        self.introspector.as_ref()
    }

    pub(crate) fn declarations(&self) -> &dyn DeclarativeConfigReader {
        self.declarations.as_ref()
    }

    pub(crate) const fn translations(&self) -> &Arc<dyn TranslationStore> {
        &self.translations
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Builds (or returns the cached) model without delegation. The flag is
    /// `false` when another thread finished the model first.
    pub(crate) fn build_model(
        &self,
        reference: &str,
        class: &ClassRef,
    ) -> Result<(Arc<EntityModel>, bool), ModelError> {
        self.registry.get_or_build(reference, class, || {
            let result = EntityModelBuilder::new(self).build(reference, class);
            match &result {
                Ok(model) => {
                    self.stats.record_model(model.attributes().len());
                    if model.is_nested() {
                        debug!(reference, attributes = model.attributes().len(), "Nested entity model built");
                    } else {
                        info!(reference, attributes = model.attributes().len(), "Entity model built");
                    }
                }
                Err(error) => {
                    self.stats.record_failure();
                    warn!(reference, error = %error, "Entity model build failed");
                }
            }
            result
        })
    }

    fn claims(&self, reference: &str, class: &ClassRef) -> bool {
        match &self.claim {
            Some(claim) => claim(reference, class),
            None => self.introspector.is_entity(class) || self.introspector.is_embeddable(class),
        }
    }

    /// Returns the provider a model request is handed to.
    ///
    /// A pair this factory claims stays local. Otherwise the first live
    /// delegate that can provide the model is chosen.
    pub(crate) fn delegate_for(&self, reference: &str, class: &ClassRef) -> Option<Weak<dyn ModelProvider>> {
        if self.claims(reference, class) {
            return None;
        }
        self.delegates
            .read()
            .iter()
            .find(|weak| {
                weak.upgrade()
                    .is_some_and(|provider| provider.can_provide_model(reference, class))
            })
            .cloned()
    }
}

impl ModelProvider for ModelFactory {
    fn get_model_for(&self, reference: &str, class: &ClassRef) -> Result<Arc<EntityModel>, ModelError> {
        Self::get_model_for(self, reference, class)
    }

    fn has_model(&self, reference: &str) -> bool {
        Self::has_model(self, reference)
    }

    fn can_provide_model(&self, reference: &str, class: &ClassRef) -> bool {
        Self::can_provide_model(self, reference, class)
    }
}

impl fmt::Debug for ModelFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelFactory")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("stats", &self.stats)
            .field("delegates", &self.delegates.read().len())
            .field("custom_claim", &self.claim.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use em_core::{ClassDefinition, PropertyDescriptor, ValueType};

    use super::*;
    use crate::test_support::{en, shop_catalog, shop_factory};

    #[test]
    fn test_same_reference_same_instance() {
        let factory = shop_factory();
        let class = ClassRef::new("Order");
        let first = factory.get_model_for("Order", &class).unwrap();
        let second = factory.get_model_for("Order", &class).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let stats = factory.stats();
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.cache_hits, 1);
    }

    #[test]
    fn test_unknown_class() {
        let factory = shop_factory();
        let err = factory.get_model(&ClassRef::new("Nope")).unwrap_err();
        assert!(matches!(err, ModelError::Config(em_core::ConfigError::UnknownClass(_))));
    }

    #[test]
    fn test_can_provide_model() {
        let factory = shop_factory();
        assert!(factory.can_provide_model("Order", &ClassRef::new("Order")));
        assert!(!factory.can_provide_model("Invoice", &ClassRef::new("Invoice")));

        let restricted = shop_factory().with_claim(|reference, _| !reference.contains('.'));
        assert!(!restricted.can_provide_model("Order.customer", &ClassRef::new("Customer")));
    }

    #[test]
    fn test_warm_up_builds_in_parallel() {
        let factory = shop_factory();
        let classes: Vec<ClassRef> = shop_catalog().entity_classes().cloned().collect();
        let results = factory.warm_up(&classes);

        assert_eq!(results.len(), classes.len());
        assert!(results.iter().all(|(_, r)| r.is_ok()));
        for class in &classes {
            assert!(factory.has_model(class.simple_name()));
        }
    }

    #[test]
    fn test_concurrent_first_requests_build_once() {
        let factory = shop_factory();
        let class = ClassRef::new("Order");

        let models: Vec<Arc<EntityModel>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| factory.get_model(&class))).collect();
            handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
        });

        assert!(models.iter().all(|m| Arc::ptr_eq(m, &models[0])));
        let stats = factory.stats();
        assert_eq!(stats.models_built, factory.references().len() as u64);
        assert_eq!(stats.requests, 8);
        assert_eq!(stats.cache_hits, 7);
    }

    fn billing_factory() -> ModelFactory {
        ModelFactory::from_catalog(
            DomainCatalog::new().with(
                ClassDefinition::entity("Invoice")
                    .property(PropertyDescriptor::new("number", ValueType::Text))
                    .marked(
                        PropertyDescriptor::new("order", ValueType::Class(ClassRef::new("Order"))),
                        &[em_core::StructuralMarker::ToOne],
                    ),
            ),
            MessageBundle::new(),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_root_request_is_delegated() {
        let billing = billing_factory();
        let shop = Arc::new(shop_factory());
        billing.add_delegate(&shop);

        let class = ClassRef::new("Order");
        let via_billing = billing.get_model(&class).unwrap();
        let direct = shop.get_model(&class).unwrap();
        assert!(Arc::ptr_eq(&via_billing, &direct));
        assert!(!billing.has_model("Order"));
    }

    #[test]
    fn test_nested_reference_becomes_lazy_handle() {
        let billing = billing_factory();
        let shop = Arc::new(shop_factory());
        billing.add_delegate(&shop);

        let invoice = billing.get_model(&ClassRef::new("Invoice")).unwrap();
        let order = invoice.attribute("order").and_then(|a| a.nested_model()).unwrap();
        assert!(order.is_lazy());
        assert_eq!(order.reference(), "Invoice.order");
        assert!(!shop.has_model("Invoice.order"));

        let model = order.get().unwrap();
        assert_eq!(&*model.display_name(&en()), "Order");
        assert!(shop.has_model("Invoice.order"));
        assert_eq!(billing.stats().lazy_handles, 1);
    }

    #[test]
    fn test_claimed_nested_reference_stays_local() {
        let shop = shop_factory();
        let other = Arc::new(shop_factory());
        shop.add_delegate(&other);

        let order = shop.get_model(&ClassRef::new("Order")).unwrap();
        let customer = order.attribute("customer").and_then(|a| a.nested_model()).unwrap();
        assert!(!customer.is_lazy());
        assert!(shop.has_model("Order.customer"));
        assert!(!other.has_model("Order.customer"));
        assert_eq!(shop.stats().lazy_handles, 0);
    }

    #[test]
    fn test_debug_is_compact() {
        let factory = shop_factory();
        let debug = format!("{factory:?}");
        assert!(debug.starts_with("ModelFactory"));
        assert!(debug.contains("delegates: 0"));
    }
}
