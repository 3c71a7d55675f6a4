//! Nested models of relationship attributes.
//!
//! A to-one or to-many attribute gets the model of its target class under
//! the candidate reference `<owning reference>.<attribute name>`. Resolution
//! stops when:
//!
//! - the candidate reference has more `.` separators than
//!   [`EngineConfig::max_nesting_depth`](em_core::EngineConfig::max_nesting_depth)
//! - the target class is the class under construction
//! - the `(candidate, target)` pair is already being built further up the
//!   stack
//!
//! In each case the attribute keeps its kind and type but has no nested
//! model. A candidate the factory does not claim but a cooperating provider
//! can provide becomes a [`LazyModelHandle`].

use std::sync::Arc;

use em_core::{ClassRef, RelationshipKind, ValueType};
use tracing::debug;

use crate::entity::EntityModel;
use crate::error::ModelError;
use crate::factory::ModelFactory;
use crate::lazy::LazyModelHandle;

/// The model of a relationship's target.
#[derive(Debug, Clone)]
pub enum NestedModel {
    /// Built by the owning factory.
    Resolved(Arc<EntityModel>),
    /// Owned by a cooperating provider; resolved on first access.
    Lazy(Arc<LazyModelHandle>),
}

impl NestedModel {
    /// Returns the reference of the nested model.
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::Resolved(model) => model.reference(),
            Self::Lazy(handle) => handle.reference(),
        }
    }

    /// Returns the entity class of the nested model.
    #[must_use]
    pub fn entity_class(&self) -> &ClassRef {
        match self {
            Self::Resolved(model) => model.entity_class(),
            Self::Lazy(handle) => handle.class(),
        }
    }

    /// Returns `true` for a lazy handle.
    #[inline]
    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    /// Returns the nested model, resolving a lazy handle if needed.
    ///
    /// # Errors
    ///
    /// Returns the error of the cooperating provider, or
    /// [`ModelError::ProviderUnavailable`] if it has been dropped.
    pub fn get(&self) -> Result<Arc<EntityModel>, ModelError> {
        match self {
            Self::Resolved(model) => Ok(Arc::clone(model)),
            Self::Lazy(handle) => handle.get(),
        }
    }
}

/// The relationship attribute a nested model is requested for.
pub(crate) struct NestedRequest<'a> {
    /// Reference of the owning entity model.
    pub(crate) owning_reference: &'a str,
    /// The class whose model is under construction.
    pub(crate) owning_class: &'a ClassRef,
    /// Attribute name (with embedding prefix).
    pub(crate) name: &'a str,
    pub(crate) kind: RelationshipKind,
    pub(crate) declared_type: &'a ValueType,
    pub(crate) element_type: Option<&'a ValueType>,
}

impl NestedRequest<'_> {
    fn target_class(&self) -> Option<&ClassRef> {
        let target = if self.kind == RelationshipKind::ToManyRelationship {
            self.element_type?
        } else {
            self.declared_type
        };
        target.class()
    }

    fn candidate_reference(&self) -> String {
        if self.owning_reference.is_empty() {
            format!("{}.{}", self.owning_class.simple_name(), self.name)
        } else {
            format!("{}.{}", self.owning_reference, self.name)
        }
    }
}

impl ModelFactory {
    /// Resolves the nested model of a relationship attribute.
    pub(crate) fn resolve_nested(
        &self,
        request: &NestedRequest<'_>,
    ) -> Result<Option<NestedModel>, ModelError> {
        if !request.kind.has_nested_model() {
            return Ok(None);
        }
        let Some(target) = request.target_class() else {
            return Ok(None);
        };
        let candidate = request.candidate_reference();

        let depth = candidate.matches('.').count();
        if depth > self.config().max_nesting_depth {
            debug!(candidate = %candidate, depth, "Nested model beyond depth bound");
            self.build_stats().record_depth_truncation();
            return Ok(None);
        }

        if target == request.owning_class {
            debug!(candidate = %candidate, class = %target, "Self-referencing nested model skipped");
            self.build_stats().record_cycle_guard_hit();
            return Ok(None);
        }

        if self.registry().is_processed(&candidate, target) {
            debug!(candidate = %candidate, class = %target, "Nested model already in progress");
            self.build_stats().record_cycle_guard_hit();
            return Ok(None);
        }

        if let Some(model) = self.registry().get(&candidate) {
            return Ok(Some(NestedModel::Resolved(model)));
        }

        if let Some(provider) = self.delegate_for(&candidate, target) {
            debug!(candidate = %candidate, class = %target, "Nested model bound to cooperating provider");
            self.build_stats().record_lazy_handle();
            let handle = LazyModelHandle::new(provider, candidate, target.clone());
            return Ok(Some(NestedModel::Lazy(Arc::new(handle))));
        }

        let (model, _) = self.build_model(&candidate, target)?;
        Ok(Some(NestedModel::Resolved(model)))
    }
}
