//! The metadata of one entity.
//!
//! An [`EntityModel`] is created once per reference by the
//! [`ModelFactory`](crate::ModelFactory) and shared behind an `Arc`. Its
//! structure never changes after construction; only locale-derived strings
//! are filled in lazily.
//!
//! # Examples
//!
//! ```
//! use em_core::{ClassDefinition, ClassRef, DomainCatalog, EngineConfig, Locale, MessageBundle};
//! use em_core::{PropertyDescriptor, StructuralMarker, ValueType};
//! use em_engine::ModelFactory;
//!
//! let catalog = DomainCatalog::new().with(
//!     ClassDefinition::entity("Order")
//!         .marked(PropertyDescriptor::new("id", ValueType::Long), &[StructuralMarker::Id])
//!         .property(PropertyDescriptor::new("code", ValueType::Text))
//!         .property(PropertyDescriptor::new("qty", ValueType::Integer)),
//! );
//! let factory = ModelFactory::from_catalog(catalog, MessageBundle::new(), EngineConfig::default());
//!
//! let model = factory.get_model(&ClassRef::new("Order"))?;
//! assert_eq!(model.main_attribute().map(|a| a.name()), Some("code"));
//! assert_eq!(model.id_attribute().map(|a| a.name()), Some("id"));
//! assert_eq!(&*model.display_name_plural(&Locale::new("en")), "Orders");
//! # Ok::<(), em_engine::ModelError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use em_core::keys::{EntityField, entity_key};
use em_core::{ClassRef, FxHashMap, Locale, TranslationStore};
use em_core::naming::pluralize;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeModel;
use crate::locale_cache::{LocaleCache, LocalizedText};

/// One entry of an entity's default listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Attribute name.
    pub attribute: String,
    /// Ascending (`ASC`) or descending (`DESC`).
    pub ascending: bool,
}

/// Declared entity texts.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntityTexts {
    pub(crate) display_name: Option<String>,
    pub(crate) display_name_plural: Option<String>,
    pub(crate) description: Option<String>,
}

/// Everything the entity builder decides about an entity.
pub(crate) struct EntityParts {
    pub(crate) reference: Arc<str>,
    pub(crate) class: ClassRef,
    /// Attributes sorted by order.
    pub(crate) attributes: Vec<AttributeModel>,
    /// Group name to attribute indexes, in display order.
    pub(crate) groups: IndexMap<String, Vec<usize>>,
    pub(crate) sort_order: Vec<SortKey>,
    pub(crate) display_property: Option<String>,
    pub(crate) id_attribute: Option<usize>,
    pub(crate) main_attribute: Option<usize>,
    pub(crate) store: Arc<dyn TranslationStore>,
    pub(crate) texts: EntityTexts,
    pub(crate) derived_name: String,
}

struct Group {
    members: Vec<usize>,
    label: LocaleCache,
}

/// Metadata of an entity: its attributes, groups and listing order.
pub struct EntityModel {
    reference: Arc<str>,
    class: ClassRef,
    attributes: Vec<AttributeModel>,
    index: FxHashMap<String, usize>,
    groups: IndexMap<String, Group>,
    sort_order: Vec<SortKey>,
    display_property: Option<String>,
    id_attribute: Option<usize>,
    main_attribute: Option<usize>,
    store: Arc<dyn TranslationStore>,
    display_name: LocalizedText,
    display_name_plural: LocalizedText,
    description: LocalizedText,
    derived_name: String,
}

impl EntityModel {
    pub(crate) fn new(parts: EntityParts) -> Self {
        let EntityParts {
            reference,
            class,
            attributes,
            groups,
            sort_order,
            display_property,
            id_attribute,
            main_attribute,
            store,
            texts,
            derived_name,
        } = parts;

        let index = attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name().to_owned(), i))
            .collect();
        let groups = groups
            .into_iter()
            .map(|(name, members)| {
                let group = Group {
                    members,
                    label: LocaleCache::new(),
                };
                (name, group)
            })
            .collect();

        Self {
            display_name: LocalizedText::new(
                entity_key(&reference, EntityField::DisplayName),
                texts.display_name,
            ),
            display_name_plural: LocalizedText::new(
                entity_key(&reference, EntityField::DisplayNamePlural),
                texts.display_name_plural,
            ),
            description: LocalizedText::new(
                entity_key(&reference, EntityField::Description),
                texts.description,
            ),
            reference,
            class,
            attributes,
            index,
            groups,
            sort_order,
            display_property,
            id_attribute,
            main_attribute,
            store,
            derived_name,
        }
    }

    /// Returns the reference this model is registered under.
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the entity class.
    #[inline]
    #[must_use]
    pub const fn entity_class(&self) -> &ClassRef {
        &self.class
    }

    /// Returns `true` for models of nested (dotted) references.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.reference.contains('.')
    }

    /// Returns the attribute with the given name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeModel> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    /// Returns all attributes, ordered.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[AttributeModel] {
        &self.attributes
    }

    /// Returns the group names in display order. The default group is last
    /// unless it was declared explicitly.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Returns the attributes of a group, ordered. Unknown groups are empty.
    pub fn attributes_in_group<'a>(
        &'a self,
        group: &str,
    ) -> impl Iterator<Item = &'a AttributeModel> + use<'a> {
        self.groups
            .get(group)
            .map(|g| g.members.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.attributes[i])
    }

    /// Returns the group an attribute belongs to.
    #[must_use]
    pub fn group_of(&self, attribute: &str) -> Option<&str> {
        let index = *self.index.get(attribute)?;
        self.groups
            .iter()
            .find(|(_, g)| g.members.contains(&index))
            .map(|(name, _)| name.as_str())
    }

    /// Returns the label of a group for `locale`: the translation of the
    /// group's message key, or the key itself.
    #[must_use]
    pub fn group_display_name(&self, group: &str, locale: &Locale) -> Option<Arc<str>> {
        let (name, entry) = self.groups.get_key_value(group)?;
        Some(entry.label.get_or_compute(locale, || {
            self.store.lookup(locale, name).unwrap_or_else(|| name.clone())
        }))
    }

    /// Returns the main attribute.
    #[must_use]
    pub fn main_attribute(&self) -> Option<&AttributeModel> {
        self.main_attribute.map(|i| &self.attributes[i])
    }

    /// Returns the identifier attribute.
    #[must_use]
    pub fn id_attribute(&self) -> Option<&AttributeModel> {
        self.id_attribute.map(|i| &self.attributes[i])
    }

    /// Returns the name of the attribute rendered when this entity is
    /// referenced from elsewhere.
    #[must_use]
    pub fn display_property(&self) -> Option<&str> {
        self.display_property.as_deref()
    }

    /// Returns the default listing order.
    #[inline]
    #[must_use]
    pub fn sort_order(&self) -> &[SortKey] {
        &self.sort_order
    }

    /// Returns the attributes shown in search panels, ordered.
    pub fn search_attributes(&self) -> impl Iterator<Item = &AttributeModel> {
        self.attributes.iter().filter(|a| a.is_searchable())
    }

    /// Returns the attributes shown in summary views, ordered.
    pub fn summary_attributes(&self) -> impl Iterator<Item = &AttributeModel> {
        self.attributes
            .iter()
            .filter(|a| a.settings().visible_in_summary)
    }

    /// Returns the singular label for `locale`.
    pub fn display_name(&self, locale: &Locale) -> Arc<str> {
        self.display_name
            .resolve(self.store.as_ref(), locale, || self.derived_name.clone())
    }

    /// Returns the plural label for `locale`, falling back to the singular
    /// label with an English plural suffix.
    pub fn display_name_plural(&self, locale: &Locale) -> Arc<str> {
        self.display_name_plural
            .resolve(self.store.as_ref(), locale, || pluralize(&self.display_name(locale)))
    }

    /// Returns the description for `locale`, falling back to the singular
    /// label.
    pub fn description(&self, locale: &Locale) -> Arc<str> {
        self.description
            .resolve(self.store.as_ref(), locale, || self.display_name(locale).to_string())
    }
}

impl fmt::Debug for EntityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityModel")
            .field("reference", &self.reference)
            .field("class", &self.class)
            .field("attributes", &self.attributes)
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .field("sort_order", &self.sort_order)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{en, shop_factory};

    #[test]
    fn test_attribute_lookup() {
        let factory = shop_factory();
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        assert!(order.attribute("number").is_some());
        assert!(order.attribute("version").is_none());
        assert!(order.attribute("address.street").is_some());
        assert!(!order.is_nested());
    }

    #[test]
    fn test_orders_are_contiguous() {
        let factory = shop_factory();
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        let orders: Vec<usize> = order.attributes().iter().map(AttributeModel::order).collect();
        let expected: Vec<usize> = (0..order.attributes().len()).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn test_default_group_is_last() {
        let factory = shop_factory();
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        let groups: Vec<&str> = order.group_names().collect();
        assert_eq!(groups.last(), Some(&"default"));
        assert_eq!(order.group_of("number"), Some("header"));
        assert_eq!(order.group_of("total"), Some("default"));
        assert_eq!(order.attributes_in_group("missing").count(), 0);
    }

    #[test]
    fn test_group_display_name_falls_back_to_key() {
        let factory = shop_factory();
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        assert_eq!(order.group_display_name("header", &en()).as_deref(), Some("Order header"));
        assert_eq!(order.group_display_name("default", &en()).as_deref(), Some("default"));
        assert!(order.group_display_name("missing", &en()).is_none());
    }

    #[test]
    fn test_entity_texts() {
        let factory = shop_factory();
        let category = factory.get_model(&ClassRef::new("Category")).unwrap();
        assert_eq!(&*category.display_name(&en()), "Category");
        assert_eq!(&*category.display_name_plural(&en()), "Categories");
        assert_eq!(&*category.description(&en()), "Category");

        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        let de = Locale::new("de");
        assert_eq!(&*order.display_name(&de), "Bestellung");
        assert_eq!(&*order.display_name_plural(&de), "Bestellungen");
    }

    #[test]
    fn test_sort_order() {
        let factory = shop_factory();
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        assert_eq!(
            order.sort_order(),
            &[
                SortKey { attribute: "date".to_owned(), ascending: false },
                SortKey { attribute: "number".to_owned(), ascending: true },
            ]
        );
    }
}
