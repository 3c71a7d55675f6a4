//! An in-memory domain catalog.
//!
//! [`DomainCatalog`] implements both [`StructuralIntrospector`] and
//! [`DeclarativeConfigReader`] from plain class definitions, built in code or
//! loaded from a JSON catalog file:
//!
//! ```json
//! {
//!   "classes": [
//!     {
//!       "name": "Order",
//!       "properties": [
//!         { "name": "id", "type": "long", "markers": ["id"] },
//!         { "name": "customer", "type": { "class": "Customer" } },
//!         { "name": "notes", "type": "bytes", "markers": ["large_object"] }
//!       ],
//!       "model": { "sort_order": "id DESC" }
//!     }
//!   ],
//!   "messages": { "en": { "Order.notes.displayName": "Remarks" } }
//! }
//! ```

use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::FxHashMap;
use crate::error::ConfigError;
use crate::messages::MessageBundle;
use crate::source::{DeclarativeConfigReader, StructuralIntrospector};
use crate::types::{
    AttributeConfig, ClassRef, EntityConfig, Markers, PropertyDescriptor, StructuralMarker,
};

/// A property together with its declarative configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Structural description.
    #[serde(flatten)]
    pub descriptor: PropertyDescriptor,

    /// Structural markers.
    #[serde(default)]
    pub markers: Markers,

    /// Explicit presentation settings.
    #[serde(default)]
    pub attribute: AttributeConfig,
}

impl From<PropertyDescriptor> for PropertyDefinition {
    fn from(descriptor: PropertyDescriptor) -> Self {
        Self {
            descriptor,
            markers: Markers::new(),
            attribute: AttributeConfig::default(),
        }
    }
}

/// A class of the catalog.
///
/// # Examples
///
/// ```
/// use em_core::{ClassDefinition, PropertyDescriptor, StructuralMarker, ValueType};
///
/// let order = ClassDefinition::entity("Order")
///     .marked(PropertyDescriptor::new("id", ValueType::Long), &[StructuralMarker::Id])
///     .property(PropertyDescriptor::new("code", ValueType::Text));
/// assert_eq!(order.properties.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Class name.
    pub name: ClassRef,

    /// Whether the class is a domain entity.
    #[serde(default = "default_entity")]
    pub entity: bool,

    /// Whether the class is an embeddable value type.
    #[serde(default)]
    pub embeddable: bool,

    /// Properties in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,

    /// Entity-level settings.
    #[serde(default)]
    pub model: EntityConfig,
}

const fn default_entity() -> bool {
    true
}

impl ClassDefinition {
    /// Creates an entity class without properties.
    #[must_use]
    pub fn entity(name: &str) -> Self {
        Self {
            name: ClassRef::new(name),
            entity: true,
            embeddable: false,
            properties: Vec::new(),
            model: EntityConfig::default(),
        }
    }

    /// Creates an embeddable value class without properties.
    #[must_use]
    pub fn embeddable(name: &str) -> Self {
        Self {
            entity: false,
            embeddable: true,
            ..Self::entity(name)
        }
    }

    /// Creates a class that is neither an entity nor embeddable.
    #[must_use]
    pub fn value(name: &str) -> Self {
        Self {
            entity: false,
            ..Self::entity(name)
        }
    }

    /// Adds an unconfigured property.
    #[must_use]
    pub fn property(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties.push(descriptor.into());
        self
    }

    /// Adds a property carrying structural markers.
    #[must_use]
    pub fn marked(mut self, descriptor: PropertyDescriptor, markers: &[StructuralMarker]) -> Self {
        let mut definition = PropertyDefinition::from(descriptor);
        definition.markers.extend(markers.iter().cloned());
        self.properties.push(definition);
        self
    }

    /// Adds a property with explicit settings.
    #[must_use]
    pub fn configured(mut self, descriptor: PropertyDescriptor, attribute: AttributeConfig) -> Self {
        let mut definition = PropertyDefinition::from(descriptor);
        definition.attribute = attribute;
        self.properties.push(definition);
        self
    }

    /// Sets the entity-level settings.
    #[must_use]
    pub fn model(mut self, model: EntityConfig) -> Self {
        self.model = model;
        self
    }

    fn find(&self, property: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.descriptor.name == property)
    }
}

/// Classes indexed by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DomainCatalog {
    classes: Vec<ClassDefinition>,
    index: FxHashMap<ClassRef, usize>,
}

impl DomainCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class, replacing any previous definition with the same name.
    pub fn insert(&mut self, class: ClassDefinition) {
        if let Some(&i) = self.index.get(&class.name) {
            self.classes[i] = class;
        } else {
            self.index.insert(class.name.clone(), self.classes.len());
            self.classes.push(class);
        }
    }

    /// Builder form of [`DomainCatalog::insert`].
    #[must_use]
    pub fn with(mut self, class: ClassDefinition) -> Self {
        self.insert(class);
        self
    }

    /// Returns the definition of a class.
    #[must_use]
    pub fn get(&self, class: &ClassRef) -> Option<&ClassDefinition> {
        self.index.get(class).map(|&i| &self.classes[i])
    }

    /// Returns all entity classes in insertion order.
    pub fn entity_classes(&self) -> impl Iterator<Item = &ClassRef> {
        self.classes.iter().filter(|c| c.entity).map(|c| &c.name)
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the catalog holds no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn property(&self, class: &ClassRef, property: &str) -> Option<&PropertyDefinition> {
        self.get(class).and_then(|c| c.find(property))
    }
}

impl FromIterator<ClassDefinition> for DomainCatalog {
    fn from_iter<I: IntoIterator<Item = ClassDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for class in iter {
            catalog.insert(class);
        }
        catalog
    }
}

impl StructuralIntrospector for DomainCatalog {
    fn properties(&self, class: &ClassRef) -> Result<Vec<PropertyDescriptor>, ConfigError> {
        let definition = self
            .get(class)
            .ok_or_else(|| ConfigError::UnknownClass(class.clone()))?;
        Ok(definition
            .properties
            .iter()
            .map(|p| p.descriptor.clone())
            .collect())
    }

    fn is_entity(&self, class: &ClassRef) -> bool {
        self.get(class).is_some_and(|c| c.entity)
    }

    fn is_embeddable(&self, class: &ClassRef) -> bool {
        self.get(class).is_some_and(|c| c.embeddable)
    }
}

impl DeclarativeConfigReader for DomainCatalog {
    fn markers(&self, class: &ClassRef, property: &str) -> Markers {
        self.property(class, property)
            .map(|p| p.markers.clone())
            .unwrap_or_default()
    }

    fn attribute_config(&self, class: &ClassRef, property: &str) -> Option<AttributeConfig> {
        self.property(class, property)
            .filter(|p| !p.attribute.is_empty())
            .map(|p| p.attribute.clone())
    }

    fn entity_config(&self, class: &ClassRef) -> Option<EntityConfig> {
        self.get(class).map(|c| c.model.clone())
    }
}

/// The on-disk catalog format: class definitions plus translations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    /// Class definitions.
    pub classes: Vec<ClassDefinition>,
    /// Translation entries by locale.
    pub messages: MessageBundle,
}

impl CatalogFile {
    /// Parses a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid catalog.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file does not exist, and
    /// [`ConfigError::Io`] / [`ConfigError::Parse`] if it cannot be read or
    /// parsed.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        let contents = fs::read_to_string(path.as_std_path())?;
        Self::from_json_str(&contents)
    }

    /// Splits the file into its introspection and translation parts.
    #[must_use]
    pub fn into_parts(self) -> (DomainCatalog, MessageBundle) {
        (self.classes.into_iter().collect(), self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SearchPolicy, ValueType};
    use crate::{Locale, TranslationStore};

    fn sample() -> DomainCatalog {
        DomainCatalog::new()
            .with(
                ClassDefinition::entity("Order")
                    .marked(
                        PropertyDescriptor::new("id", ValueType::Long),
                        &[StructuralMarker::Id],
                    )
                    .configured(
                        PropertyDescriptor::new("code", ValueType::Text),
                        AttributeConfig {
                            search: Some(SearchPolicy::Always),
                            ..AttributeConfig::default()
                        },
                    ),
            )
            .with(ClassDefinition::embeddable("Address"))
    }

    #[test]
    fn test_introspection() {
        let catalog = sample();
        let order = ClassRef::new("Order");
        let properties = catalog.properties(&order).unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[1].name, "code");
        assert!(catalog.is_entity(&order));
        assert!(catalog.is_embeddable(&ClassRef::new("Address")));
        assert!(!catalog.is_entity(&ClassRef::new("Address")));
    }

    #[test]
    fn test_unknown_class() {
        let result = sample().properties(&ClassRef::new("Invoice"));
        assert!(matches!(result, Err(ConfigError::UnknownClass(c)) if c.name() == "Invoice"));
    }

    #[test]
    fn test_declarations() {
        let catalog = sample();
        let order = ClassRef::new("Order");
        assert_eq!(catalog.markers(&order, "id").as_slice(), &[StructuralMarker::Id]);
        assert!(catalog.markers(&order, "code").is_empty());
        assert!(catalog.attribute_config(&order, "id").is_none());
        assert_eq!(
            catalog.attribute_config(&order, "code").and_then(|c| c.search),
            Some(SearchPolicy::Always)
        );
    }

    #[test]
    fn test_entity_classes_in_insertion_order() {
        let catalog = sample().with(ClassDefinition::entity("Customer"));
        let names: Vec<&str> = catalog.entity_classes().map(ClassRef::name).collect();
        assert_eq!(names, vec!["Order", "Customer"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = sample();
        catalog.insert(ClassDefinition::entity("Order"));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.properties(&ClassRef::new("Order")).unwrap().is_empty());
    }

    #[test]
    fn test_catalog_file_from_json() {
        let json = r#"{
            "classes": [
                {
                    "name": "Order",
                    "properties": [
                        {"name": "id", "type": "long", "markers": ["id"]},
                        {"name": "lines", "type": "collection", "element_type": {"class": "OrderLine"}},
                        {"name": "total", "type": "decimal", "attribute": {"precision": 3}}
                    ],
                    "model": {"sort_order": "id DESC"}
                },
                {"name": "Address", "entity": false, "embeddable": true}
            ],
            "messages": {"en": {"Order.total.displayName": "Grand Total"}}
        }"#;
        let (catalog, messages) = CatalogFile::from_json_str(json).unwrap().into_parts();
        let order = ClassRef::new("Order");

        let properties = catalog.properties(&order).unwrap();
        assert_eq!(
            properties[1].element_type,
            Some(ValueType::Class(ClassRef::new("OrderLine")))
        );
        assert_eq!(
            catalog.attribute_config(&order, "total").and_then(|c| c.precision),
            Some(3)
        );
        assert_eq!(
            catalog.entity_config(&order).and_then(|c| c.sort_order).as_deref(),
            Some("id DESC")
        );
        assert!(catalog.is_embeddable(&ClassRef::new("Address")));
        assert_eq!(
            messages.lookup(&Locale::new("en"), "Order.total.displayName").as_deref(),
            Some("Grand Total")
        );
    }
}
