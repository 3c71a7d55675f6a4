//! Builds the attributes of one entity model from introspected properties.
//!
//! For every property the builder:
//!
//! 1. skips deny-listed names and `Version` / `Transient` markers
//! 2. classifies the relationship kind from the declared type and markers
//! 3. seeds structural defaults and applies the declarative and translation
//!    override layers (see [`crate::overrides`])
//! 4. validates the finished settings
//! 5. flattens embedded values or resolves the nested model of a
//!    relationship
//!
//! An embedded value contributes no attribute of its own; each property of
//! the embedded class becomes an attribute named `<embedding>.<property>`.

use std::sync::Arc;

use em_core::naming::humanize;
use em_core::{
    ClassRef, ConfigError, Markers, PropertyDescriptor, RelationshipKind, StructuralIntrospector,
    StructuralMarker, ValueType,
};
use tracing::debug;

use crate::attribute::{AttributeModel, AttributeParts, ElementStore};
use crate::error::ModelError;
use crate::factory::ModelFactory;
use crate::nested::NestedRequest;
use crate::overrides::{AttributeDraft, translation_overrides, validate};

/// Builds attributes for a `(reference, class)` pair.
pub(crate) struct AttributeBuilder<'a> {
    factory: &'a ModelFactory,
    /// Reference of the entity model under construction.
    reference: &'a Arc<str>,
    /// Class of the entity model under construction.
    entity_class: &'a ClassRef,
}

impl<'a> AttributeBuilder<'a> {
    pub(crate) const fn new(
        factory: &'a ModelFactory,
        reference: &'a Arc<str>,
        entity_class: &'a ClassRef,
    ) -> Self {
        Self {
            factory,
            reference,
            entity_class,
        }
    }

    /// Builds the attributes contributed by one property of the entity
    /// class: none for skipped properties, several for embedded values.
    pub(crate) fn build(&self, property: &PropertyDescriptor) -> Result<Vec<AttributeModel>, ModelError> {
        let mut chain = vec![self.entity_class.clone()];
        let mut attributes = Vec::new();
        self.build_into(property, self.entity_class, "", &mut chain, &mut attributes)?;
        Ok(attributes)
    }

    fn build_into(
        &self,
        property: &PropertyDescriptor,
        declaring: &ClassRef,
        prefix: &str,
        chain: &mut Vec<ClassRef>,
        out: &mut Vec<AttributeModel>,
    ) -> Result<(), ModelError> {
        let config = self.factory.config();
        let markers = self.factory.declarations().markers(declaring, &property.name);

        if config.is_skipped(&property.name) || markers.iter().any(StructuralMarker::hides_property) {
            debug!(class = %declaring, property = %property.name, "Property skipped");
            return Ok(());
        }

        let name = if prefix.is_empty() {
            property.name.clone()
        } else {
            format!("{prefix}.{}", property.name)
        };
        let path = format!("{}.{name}", self.reference);

        let (kind, element_store) = classify(property, &markers, self.factory.introspector());
        debug!(attribute = %path, kind = %kind, "Attribute classified");

        if kind == RelationshipKind::EmbeddedValue {
            return self.flatten(property, &name, &path, chain, out);
        }

        let mut draft = AttributeDraft::new(
            config,
            &property.value_type,
            property.settable,
            markers.contains(&StructuralMarker::NotNull),
        );
        if let Some(layer) = self.factory.declarations().attribute_config(declaring, &property.name) {
            draft.apply(&layer, &path)?;
        }
        let translated = translation_overrides(
            self.factory.translations().as_ref(),
            &config.default_locale,
            self.reference,
            &name,
        )?;
        draft.apply(&translated, &path)?;

        let (settings, texts) = draft.finish(config);
        validate(&settings, kind, &property.value_type, &path)?;

        let element_type = if kind.is_collection() {
            property.element_type.clone()
        } else {
            None
        };
        let nested = self.factory.resolve_nested(&NestedRequest {
            owning_reference: self.reference,
            owning_class: self.entity_class,
            name: &name,
            kind,
            declared_type: &property.value_type,
            element_type: element_type.as_ref(),
        })?;

        out.push(AttributeModel::new(AttributeParts {
            derived_name: humanize(&name, config.capitalize_words),
            name,
            reference: Arc::clone(self.reference),
            declaring_class: declaring.clone(),
            kind,
            declared_type: property.value_type.clone(),
            element_type,
            id: markers.contains(&StructuralMarker::Id),
            preferred: property.preferred,
            element_store,
            settings,
            texts,
            nested,
            store: Arc::clone(self.factory.translations()),
            true_default: config.true_representation.clone(),
            false_default: config.false_representation.clone(),
        }));
        Ok(())
    }

    fn flatten(
        &self,
        property: &PropertyDescriptor,
        name: &str,
        path: &str,
        chain: &mut Vec<ClassRef>,
        out: &mut Vec<AttributeModel>,
    ) -> Result<(), ModelError> {
        let Some(embedded) = property.value_type.class() else {
            return Err(ConfigError::illegal_structure(path, "embedded value without a class type").into());
        };
        if chain.contains(embedded) {
            return Err(ConfigError::illegal_structure(
                path,
                format!("{embedded} embeds itself"),
            )
            .into());
        }

        let properties = self.factory.introspector().properties(embedded)?;
        chain.push(embedded.clone());
        for nested in &properties {
            self.build_into(nested, embedded, name, chain, out)?;
        }
        chain.pop();
        Ok(())
    }
}

/// Decides the relationship kind of a property.
pub(crate) fn classify(
    property: &PropertyDescriptor,
    markers: &Markers,
    introspector: &dyn StructuralIntrospector,
) -> (RelationshipKind, Option<ElementStore>) {
    let has = |marker: &StructuralMarker| markers.contains(marker);

    match &property.value_type {
        ValueType::Bytes if has(&StructuralMarker::LargeObject) => (RelationshipKind::LargeObject, None),
        ValueType::Class(class) => {
            if has(&StructuralMarker::Embedded) || introspector.is_embeddable(class) {
                (RelationshipKind::EmbeddedValue, None)
            } else if has(&StructuralMarker::ToOne) || introspector.is_entity(class) {
                (RelationshipKind::ToOneRelationship, None)
            } else {
                (RelationshipKind::Scalar, None)
            }
        }
        ValueType::Collection => {
            if has(&StructuralMarker::ToMany) {
                return (RelationshipKind::ToManyRelationship, None);
            }
            if let Some(StructuralMarker::ElementCollection { table, column }) =
                markers.iter().find(|m| m.is_element_collection())
            {
                let store = ElementStore {
                    table: table.clone(),
                    column: column.clone(),
                };
                return (RelationshipKind::ElementCollection, Some(store));
            }
            let entity_element = property
                .element_type
                .as_ref()
                .and_then(ValueType::class)
                .is_some_and(|class| introspector.is_entity(class));
            if entity_element {
                (RelationshipKind::ToManyRelationship, None)
            } else {
                (RelationshipKind::ElementCollection, None)
            }
        }
        _ => (RelationshipKind::Scalar, None),
    }
}
