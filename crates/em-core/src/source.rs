//! Contracts of the external collaborators the engine reads from.
//!
//! The engine never knows where class structure, declarative settings or
//! translations come from. It only talks to these three traits:
//!
//! - [`StructuralIntrospector`] - the properties of a class
//! - [`DeclarativeConfigReader`] - markers and settings attached to classes
//!   and properties
//! - [`TranslationStore`] - locale-keyed override strings
//!
//! [`DomainCatalog`](crate::DomainCatalog) and
//! [`MessageBundle`](crate::MessageBundle) are in-memory implementations.

use crate::error::ConfigError;
use crate::locale::Locale;
use crate::types::{AttributeConfig, ClassRef, EntityConfig, Markers, PropertyDescriptor};

/// Reports the structure of domain classes.
pub trait StructuralIntrospector: Send + Sync {
    /// Returns the properties of `class` in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownClass`] if the class is not known.
    fn properties(&self, class: &ClassRef) -> Result<Vec<PropertyDescriptor>, ConfigError>;

    /// Returns `true` if `class` is a domain entity.
    fn is_entity(&self, class: &ClassRef) -> bool;

    /// Returns `true` if `class` is an embeddable value type.
    fn is_embeddable(&self, _class: &ClassRef) -> bool {
        false
    }
}

/// Reads declarative configuration attached to classes and properties.
pub trait DeclarativeConfigReader: Send + Sync {
    /// Returns the structural markers of a property.
    fn markers(&self, class: &ClassRef, property: &str) -> Markers;

    /// Returns the explicit settings of a property, if any.
    fn attribute_config(&self, class: &ClassRef, property: &str) -> Option<AttributeConfig>;

    /// Returns the entity-level settings of a class, if any.
    fn entity_config(&self, class: &ClassRef) -> Option<EntityConfig>;
}

/// Resolves locale-keyed override strings.
pub trait TranslationStore: Send + Sync {
    /// Returns the value stored for `key` in `locale`, if any.
    fn lookup(&self, locale: &Locale, key: &str) -> Option<String>;
}

/// A translation store without entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslations;

impl TranslationStore for NoTranslations {
    fn lookup(&self, _locale: &Locale, _key: &str) -> Option<String> {
        None
    }
}

/// A declarative reader without markers or settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeclarations;

impl DeclarativeConfigReader for NoDeclarations {
    fn markers(&self, _class: &ClassRef, _property: &str) -> Markers {
        Markers::new()
    }

    fn attribute_config(&self, _class: &ClassRef, _property: &str) -> Option<AttributeConfig> {
        None
    }

    fn entity_config(&self, _class: &ClassRef) -> Option<EntityConfig> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sources() {
        let class = ClassRef::new("Order");
        assert!(NoTranslations.lookup(&Locale::new("en"), "Order.displayName").is_none());
        assert!(NoDeclarations.markers(&class, "id").is_empty());
        assert!(NoDeclarations.attribute_config(&class, "id").is_none());
        assert!(NoDeclarations.entity_config(&class).is_none());
    }
}
