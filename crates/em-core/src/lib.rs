//! Core types, errors, and collaborator contracts for entity metadata models.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Error types ([`ConfigError`]) for every configuration problem
//! - Configuration structures ([`Config`], [`EngineConfig`])
//! - Domain types (`ClassRef`, `PropertyDescriptor`, `RelationshipKind`,
//!   declarative `AttributeConfig` / `EntityConfig`)
//! - The collaborator traits the engine reads from
//!   ([`StructuralIntrospector`], [`DeclarativeConfigReader`],
//!   [`TranslationStore`]) and in-memory implementations of them
//!   ([`DomainCatalog`], [`MessageBundle`])
//! - The translation-store key schema ([`keys`])
//! - Locale tags and identifier humanizing helpers
//!
//! # Examples
//!
//! ```
//! use em_core::{ClassDefinition, ClassRef, DomainCatalog, PropertyDescriptor, StructuralIntrospector, ValueType};
//!
//! let catalog = DomainCatalog::new().with(
//!     ClassDefinition::entity("Order").property(PropertyDescriptor::new("code", ValueType::Text)),
//! );
//! let properties = catalog.properties(&ClassRef::new("Order"))?;
//! assert_eq!(properties[0].name, "code");
//! # Ok::<(), em_core::ConfigError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod hash;
pub mod keys;
pub mod locale;
pub mod messages;
pub mod naming;
pub mod source;
pub mod types;

pub use catalog::{CatalogFile, ClassDefinition, DomainCatalog, PropertyDefinition};
pub use config::{Config, EngineConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet};
pub use locale::Locale;
pub use messages::MessageBundle;
pub use source::{
    DeclarativeConfigReader, NoDeclarations, NoTranslations, StructuralIntrospector,
    TranslationStore,
};
pub use types::{
    AttributeConfig, CascadeDeclaration, CascadeMode, ClassRef, DateKind, EditablePolicy,
    EntityConfig, GroupDeclaration, KeywordError, Markers, PropertyDescriptor, RelationshipKind,
    SearchPolicy, SelectMode, StructuralMarker, ValueType,
};
