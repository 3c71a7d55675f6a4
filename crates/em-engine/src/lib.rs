//! Derivation engine for entity metadata models.
//!
//! This crate turns the structural description of a domain class into an
//! immutable, cached, locale-aware [`EntityModel`]: one [`AttributeModel`]
//! per exposable property with its relationship kind, formatting,
//! visibility, search behavior, order and group, plus nested models for
//! related entities.
//!
//! # Overview
//!
//! The main entry point is [`ModelFactory`], which combines:
//!
//! - the collaborators from `em-core` (structure, declarations, translations)
//! - [`ModelRegistry`]: the reference-keyed model cache
//! - [`BuildStats`]: atomic counters for build activity
//!
//! # Example
//!
//! ```
//! use em_core::{ClassDefinition, ClassRef, DomainCatalog, EngineConfig, Locale, MessageBundle};
//! use em_core::{PropertyDescriptor, StructuralMarker, ValueType};
//! use em_engine::{ModelFactory, RelationshipKind};
//!
//! let catalog = DomainCatalog::new()
//!     .with(
//!         ClassDefinition::entity("Customer")
//!             .property(PropertyDescriptor::new("name", ValueType::Text)),
//!     )
//!     .with(
//!         ClassDefinition::entity("Order")
//!             .property(PropertyDescriptor::new("orderDate", ValueType::Date))
//!             .marked(
//!                 PropertyDescriptor::new("customer", ValueType::Class(ClassRef::new("Customer"))),
//!                 &[StructuralMarker::ToOne],
//!             ),
//!     );
//! let messages = MessageBundle::new().with("de", "Order.orderDate.displayName", "Bestelldatum");
//! let factory = ModelFactory::from_catalog(catalog, messages, EngineConfig::default());
//!
//! let order = factory.get_model(&ClassRef::new("Order"))?;
//! let date = order.attribute("orderDate").expect("attribute");
//! assert_eq!(&*date.display_name(&Locale::new("en")), "Order Date");
//! assert_eq!(&*date.display_name(&Locale::new("de-AT")), "Bestelldatum");
//!
//! let customer = order.attribute("customer").expect("attribute");
//! assert_eq!(customer.kind(), RelationshipKind::ToOneRelationship);
//! assert_eq!(customer.nested_model().map(|n| n.reference()), Some("Order.customer"));
//! # Ok::<(), em_engine::ModelError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ModelFactory (query surface)
//!     │
//!     ├── ModelRegistry (DashMap cache + processed set + re-entrant lock)
//!     │
//!     └── EntityModelBuilder (one run per reference)
//!             │
//!             ├── AttributeBuilder (classify, override layers, flatten)
//!             │       │
//!             │       └── NestedModelResolver (depth/cycle guards, lazy handles)
//!             │
//!             ├── OrderResolver
//!             └── GroupResolver
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod attribute;
mod attribute_builder;
mod builder;
mod entity;
mod error;
mod factory;
mod group;
mod lazy;
mod locale_cache;
mod nested;
mod order;
mod overrides;
mod registry;
mod snapshot;
mod stats;

#[cfg(test)]
mod test_support;

pub use attribute::{AttributeModel, ElementStore};
pub use em_core::RelationshipKind;
pub use entity::{EntityModel, SortKey};
pub use error::ModelError;
pub use factory::ModelFactory;
pub use lazy::{LazyModelHandle, ModelProvider};
pub use locale_cache::LocaleCache;
pub use nested::NestedModel;
pub use overrides::{AttributeDraft, AttributeSettings, CascadeRule, DeclaredTexts, translation_overrides, validate};
pub use registry::ModelRegistry;
pub use snapshot::{AttributeSnapshot, GroupSnapshot, ModelSnapshot, NestedSnapshot};
pub use stats::{BuildStats, StatsSnapshot};
