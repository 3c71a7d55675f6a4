//! Shared fixtures for unit tests.

use std::sync::Arc;

use em_core::{
    ClassDefinition, ClassRef, DomainCatalog, EngineConfig, EntityConfig, GroupDeclaration,
    Locale, MessageBundle, NoTranslations, PropertyDescriptor, StructuralMarker, ValueType,
};
use indexmap::IndexMap;

use crate::entity::{EntityModel, EntityParts, EntityTexts};
use crate::factory::ModelFactory;

pub(crate) fn en() -> Locale {
    Locale::new("en")
}

fn class(name: &str) -> ValueType {
    ValueType::Class(ClassRef::new(name))
}

fn prop(name: &str, value_type: ValueType) -> PropertyDescriptor {
    PropertyDescriptor::new(name, value_type)
}

/// A small order-management domain: a two-sided relationship
/// (`Customer.orders` / `Order.customer`), a to-many with back reference
/// (`Order.lines` / `OrderLine.order`), an embedded value, a self reference
/// and a trivial entity.
pub(crate) fn shop_catalog() -> DomainCatalog {
    DomainCatalog::new()
        .with(
            ClassDefinition::entity("Order")
                .marked(prop("id", ValueType::Long), &[StructuralMarker::Id, StructuralMarker::NotNull])
                .property(prop("number", ValueType::Text))
                .property(prop("date", ValueType::Date))
                .property(prop("total", ValueType::Decimal).read_only())
                .property(prop("customer", class("Customer")))
                .property(prop("lines", ValueType::Collection).with_element(class("OrderLine")))
                .property(prop("address", class("Address")))
                .marked(prop("notes", ValueType::Bytes), &[StructuralMarker::LargeObject])
                .marked(prop("version", ValueType::Long), &[StructuralMarker::Version])
                .marked(prop("cachedTotal", ValueType::Decimal), &[StructuralMarker::Transient])
                .model(EntityConfig {
                    attribute_groups: vec![GroupDeclaration::new("header", &["number", "date"])],
                    sort_order: Some("date DESC, number".to_owned()),
                    ..EntityConfig::default()
                }),
        )
        .with(
            ClassDefinition::entity("Customer")
                .marked(prop("id", ValueType::Long), &[StructuralMarker::Id])
                .property(prop("name", ValueType::Text))
                .marked(
                    prop("orders", ValueType::Collection).with_element(class("Order")),
                    &[StructuralMarker::ToMany],
                ),
        )
        .with(
            ClassDefinition::entity("OrderLine")
                .marked(prop("id", ValueType::Long), &[StructuralMarker::Id])
                .property(prop("product", ValueType::Text))
                .property(prop("quantity", ValueType::Integer))
                .marked(prop("order", class("Order")), &[StructuralMarker::ToOne]),
        )
        .with(
            ClassDefinition::embeddable("Address")
                .property(prop("street", ValueType::Text))
                .property(prop("city", ValueType::Text))
                .property(prop("zip", ValueType::Text)),
        )
        .with(
            ClassDefinition::entity("Employee")
                .property(prop("id", ValueType::Long))
                .property(prop("name", ValueType::Text))
                .property(prop("manager", class("Employee"))),
        )
        .with(ClassDefinition::entity("Category").property(prop("name", ValueType::Text)))
}

pub(crate) fn shop_messages() -> MessageBundle {
    MessageBundle::new()
        .with("en", "header", "Order header")
        .with("de", "Order.displayName", "Bestellung")
        .with("de", "Order.displayNamePlural", "Bestellungen")
}

pub(crate) fn shop_factory() -> ModelFactory {
    shop_factory_with(|_| {})
}

pub(crate) fn shop_factory_with(configure: impl FnOnce(&mut EngineConfig)) -> ModelFactory {
    let mut config = EngineConfig::default();
    configure(&mut config);
    ModelFactory::from_catalog(shop_catalog(), shop_messages(), config)
}

/// A model without attributes, for registry tests.
pub(crate) fn empty_model(reference: &str, class_name: &str) -> EntityModel {
    EntityModel::new(EntityParts {
        reference: Arc::from(reference),
        class: ClassRef::new(class_name),
        attributes: Vec::new(),
        groups: IndexMap::new(),
        sort_order: Vec::new(),
        display_property: None,
        id_attribute: None,
        main_attribute: None,
        store: Arc::new(NoTranslations),
        texts: EntityTexts::default(),
        derived_name: class_name.to_owned(),
    })
}
