//! The entity model build pipeline.
//!
//! [`EntityModelBuilder::build`] runs once per reference, inside the
//! registry's single-flight section:
//!
//! 1. read entity configuration and its translation overrides
//! 2. build attributes (flattening embedded values, resolving nested models)
//! 3. pick the identifier and main attributes
//! 4. order attributes, resolve group-together relations, partition groups
//! 5. parse the listing order and check the display property

use std::sync::Arc;

use em_core::keys::{EntityField, entity_key};
use em_core::naming::{humanize, split_list};
use em_core::{ClassRef, ConfigError, EntityConfig, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

use crate::attribute::AttributeModel;
use crate::attribute_builder::AttributeBuilder;
use crate::entity::{EntityModel, EntityParts, EntityTexts};
use crate::error::ModelError;
use crate::factory::ModelFactory;
use crate::group::{declared_groups, partition, resolve_group_together};
use crate::order::{apply_order, parse_sort_order};

/// Builds entity models for a factory.
pub(crate) struct EntityModelBuilder<'a> {
    factory: &'a ModelFactory,
}

impl<'a> EntityModelBuilder<'a> {
    pub(crate) const fn new(factory: &'a ModelFactory) -> Self {
        Self { factory }
    }

    /// Builds the model of `class` under `reference`.
    pub(crate) fn build(&self, reference: &str, class: &ClassRef) -> Result<EntityModel, ModelError> {
        let factory = self.factory;
        let config = factory.config();
        let reference: Arc<str> = Arc::from(reference);
        let nested = reference.contains('.');
        debug!(reference = %reference, class = %class, "Building entity model");

        let mut entity = factory.declarations().entity_config(class).unwrap_or_default();
        self.apply_entity_overrides(&reference, &mut entity);

        let properties = factory.introspector().properties(class)?;
        let builder = AttributeBuilder::new(factory, &reference, class);
        let mut attributes = Vec::with_capacity(properties.len());
        for property in &properties {
            attributes.extend(builder.build(property)?);
        }

        mark_id(&mut attributes);
        select_main(&reference, nested, &mut attributes)?;

        apply_order(&reference, entity.attribute_order.as_deref(), &mut attributes)?;
        resolve_group_together(&reference, &mut attributes)?;

        let groups = declared_groups(
            factory.translations().as_ref(),
            &config.default_locale,
            &reference,
            &entity.attribute_groups,
        );
        let groups = partition(&reference, &groups, &attributes, &config.default_group)?;

        let names: FxHashSet<&str> = attributes.iter().map(AttributeModel::name).collect();
        let sort_order = match &entity.sort_order {
            Some(spec) => parse_sort_order(&reference, spec, &names)?,
            None => Vec::new(),
        };

        let main_attribute = attributes.iter().position(AttributeModel::is_main);
        let display_property = match entity.display_property.take() {
            Some(name) if !names.contains(name.as_str()) => {
                return Err(ConfigError::unresolvable(&*reference, name, "display property").into());
            }
            Some(name) => Some(name),
            None => main_attribute.map(|i| attributes[i].name().to_owned()),
        };

        Ok(EntityModel::new(EntityParts {
            derived_name: humanize(class.simple_name(), config.capitalize_words),
            id_attribute: attributes.iter().position(AttributeModel::is_id),
            main_attribute,
            class: class.clone(),
            attributes,
            groups,
            sort_order,
            display_property,
            store: Arc::clone(factory.translations()),
            texts: EntityTexts {
                display_name: entity.display_name,
                display_name_plural: entity.display_name_plural,
                description: entity.description,
            },
            reference,
        }))
    }

    /// Applies the structural entity overrides of the translation store at
    /// the default locale.
    fn apply_entity_overrides(&self, reference: &str, entity: &mut EntityConfig) {
        let store = self.factory.translations();
        let locale = &self.factory.config().default_locale;
        let lookup = |field| store.lookup(locale, &entity_key(reference, field));

        if let Some(name) = lookup(EntityField::DisplayProperty) {
            entity.display_property = Some(name.trim().to_owned());
        }
        if let Some(list) = lookup(EntityField::AttributeOrder) {
            entity.attribute_order = Some(split_list(&list));
        }
        if let Some(spec) = lookup(EntityField::SortOrder) {
            entity.sort_order = Some(spec);
        }
    }
}

/// Marks the identifier attribute: the first `Id`-marked attribute, else
/// one literally named `id`.
fn mark_id(attributes: &mut [AttributeModel]) {
    let marked = attributes.iter().position(AttributeModel::is_id);
    for (i, attribute) in attributes.iter_mut().enumerate() {
        let id = match marked {
            Some(m) => i == m,
            None => attribute.name() == "id",
        };
        attribute.set_id(id);
    }
}

/// Picks the main attribute.
///
/// An explicit main flag wins. Otherwise root models fall back to the
/// first text scalar, then to the first searchable attribute.
fn select_main(reference: &str, nested: bool, attributes: &mut [AttributeModel]) -> Result<(), ConfigError> {
    let explicit: SmallVec<[&str; 2]> = attributes
        .iter()
        .filter(|a| a.is_main())
        .map(AttributeModel::name)
        .collect();
    if explicit.len() > 1 {
        return Err(ConfigError::invalid_combination(
            reference,
            format!("more than one main attribute: {}", explicit.join(", ")),
        ));
    }
    let has_explicit = !explicit.is_empty();
    drop(explicit);
    if has_explicit || nested {
        return Ok(());
    }

    let fallback = attributes
        .iter()
        .position(AttributeModel::is_text_scalar)
        .or_else(|| attributes.iter().position(AttributeModel::is_searchable));
    if let Some(i) = fallback {
        debug!(reference, attribute = %attributes[i].name(), "Main attribute chosen by fallback");
        attributes[i].set_main(true);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use em_core::{
        AttributeConfig, ClassDefinition, DomainCatalog, EngineConfig, MessageBundle,
        PropertyDescriptor, SearchPolicy, StructuralMarker, ValueType,
    };

    use super::*;
    use crate::test_support::shop_factory;

    fn factory(catalog: DomainCatalog, messages: MessageBundle) -> ModelFactory {
        ModelFactory::from_catalog(catalog, messages, EngineConfig::default())
    }

    fn main_flag() -> AttributeConfig {
        AttributeConfig {
            main: Some(true),
            ..AttributeConfig::default()
        }
    }

    #[test]
    fn test_first_text_scalar_is_main() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Item")
                .property(PropertyDescriptor::new("id", ValueType::Long))
                .property(PropertyDescriptor::new("code", ValueType::Text))
                .property(PropertyDescriptor::new("qty", ValueType::Integer)),
        );
        let model = factory(catalog, MessageBundle::new())
            .get_model(&ClassRef::new("Item"))
            .unwrap();

        let mains: Vec<&str> = model.attributes().iter().filter(|a| a.is_main()).map(|a| a.name()).collect();
        assert_eq!(mains, vec!["code"]);
        assert_eq!(model.display_property(), Some("code"));
        assert_eq!(model.id_attribute().map(AttributeModel::name), Some("id"));
    }

    #[test]
    fn test_searchable_fallback_main() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Reading")
                .property(PropertyDescriptor::new("value", ValueType::Float))
                .configured(
                    PropertyDescriptor::new("takenAt", ValueType::Timestamp),
                    AttributeConfig {
                        search: Some(SearchPolicy::Always),
                        ..AttributeConfig::default()
                    },
                ),
        );
        let model = factory(catalog, MessageBundle::new())
            .get_model(&ClassRef::new("Reading"))
            .unwrap();
        assert_eq!(model.main_attribute().map(AttributeModel::name), Some("takenAt"));
    }

    #[test]
    fn test_no_candidate_no_main() {
        let catalog = DomainCatalog::new()
            .with(ClassDefinition::entity("Counter").property(PropertyDescriptor::new("value", ValueType::Integer)));
        let model = factory(catalog, MessageBundle::new())
            .get_model(&ClassRef::new("Counter"))
            .unwrap();
        assert!(model.main_attribute().is_none());
        assert!(model.display_property().is_none());
    }

    #[test]
    fn test_explicit_main_wins() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Item")
                .property(PropertyDescriptor::new("code", ValueType::Text))
                .configured(PropertyDescriptor::new("label", ValueType::Text), main_flag()),
        );
        let model = factory(catalog, MessageBundle::new())
            .get_model(&ClassRef::new("Item"))
            .unwrap();
        assert_eq!(model.main_attribute().map(AttributeModel::name), Some("label"));
        assert!(!model.attribute("code").unwrap().is_main());
    }

    #[test]
    fn test_two_main_attributes_are_invalid() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Item")
                .configured(PropertyDescriptor::new("code", ValueType::Text), main_flag())
                .property(PropertyDescriptor::new("label", ValueType::Text)),
        );
        let messages = MessageBundle::new().with("en", "Item.label.main", "true");
        let err = factory(catalog, messages)
            .get_model(&ClassRef::new("Item"))
            .unwrap_err();
        assert!(matches!(err, ModelError::Config(ConfigError::InvalidCombination { .. })));
        assert_eq!(err.path(), Some("Item"));
    }

    #[test]
    fn test_id_marker_beats_name() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Ticket")
                .property(PropertyDescriptor::new("id", ValueType::Text))
                .marked(PropertyDescriptor::new("ticketNo", ValueType::Long), &[StructuralMarker::Id]),
        );
        let model = factory(catalog, MessageBundle::new())
            .get_model(&ClassRef::new("Ticket"))
            .unwrap();
        assert_eq!(model.id_attribute().map(AttributeModel::name), Some("ticketNo"));
        assert!(!model.attribute("id").unwrap().is_id());
    }

    #[test]
    fn test_translation_attribute_order() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Item")
                .property(PropertyDescriptor::new("a", ValueType::Text))
                .property(PropertyDescriptor::new("b", ValueType::Text))
                .property(PropertyDescriptor::new("c", ValueType::Text))
                .model(EntityConfig {
                    attribute_order: Some(vec!["c".to_owned()]),
                    ..EntityConfig::default()
                }),
        );
        let messages = MessageBundle::new().with("en", "Item.attributeOrder", "b, a");
        let model = factory(catalog, messages).get_model(&ClassRef::new("Item")).unwrap();

        let names: Vec<&str> = model.attributes().iter().map(AttributeModel::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(model.attribute("c").unwrap().order(), 2);
    }

    #[test]
    fn test_unknown_display_property() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Item")
                .property(PropertyDescriptor::new("code", ValueType::Text))
                .model(EntityConfig {
                    display_property: Some("label".to_owned()),
                    ..EntityConfig::default()
                }),
        );
        let err = factory(catalog, MessageBundle::new())
            .get_model(&ClassRef::new("Item"))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::Config(ConfigError::UnresolvableReference { context: "display property", .. })
        ));
    }

    #[test]
    fn test_exactly_one_main_in_shop() {
        let factory = shop_factory();
        for class in ["Order", "Customer", "OrderLine", "Employee", "Category"] {
            let model = factory.get_model(&ClassRef::new(class)).unwrap();
            let mains = model.attributes().iter().filter(|a| a.is_main()).count();
            assert!(mains <= 1, "{class} has {mains} main attributes");
        }
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        assert_eq!(order.main_attribute().map(AttributeModel::name), Some("number"));
    }
}
