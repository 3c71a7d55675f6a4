//! Domain types for entity metadata models.
//!
//! # Module Organization
//!
//! - [`class`] - Class references, value types and property descriptors
//! - [`kind`] - Relationship, search, date and selection enums
//! - [`marker`] - Structural markers from declarative configuration
//! - [`settings`] - Declarative attribute and entity settings
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use em_core::{ClassRef, PropertyDescriptor, RelationshipKind, ValueType};
//! ```

pub mod class;
pub mod kind;
pub mod marker;
pub mod settings;

pub use class::{ClassRef, PropertyDescriptor, ValueType};
pub use kind::{
    CascadeMode, DateKind, EditablePolicy, KeywordError, RelationshipKind, SearchPolicy,
    SelectMode,
};
pub use marker::{Markers, StructuralMarker};
pub use settings::{AttributeConfig, CascadeDeclaration, EntityConfig, GroupDeclaration};
