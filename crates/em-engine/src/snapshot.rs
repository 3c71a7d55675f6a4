//! Serializable views of entity models.
//!
//! A [`ModelSnapshot`] captures the structure of an [`EntityModel`] together
//! with its texts resolved for one locale. Nested models are referenced, not
//! expanded.

use em_core::{Locale, RelationshipKind};
use serde::Serialize;

use crate::attribute::{AttributeModel, ElementStore};
use crate::entity::{EntityModel, SortKey};
use crate::nested::NestedModel;
use crate::overrides::AttributeSettings;

/// An entity model resolved for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSnapshot {
    /// Model reference.
    pub reference: String,
    /// Entity class name.
    pub class: String,
    /// Locale the texts were resolved for.
    pub locale: String,
    /// Singular label.
    pub display_name: String,
    /// Plural label.
    pub display_name_plural: String,
    /// Description.
    pub description: String,
    /// Display property, if any.
    pub display_property: Option<String>,
    /// Identifier attribute name, if any.
    pub id_attribute: Option<String>,
    /// Main attribute name, if any.
    pub main_attribute: Option<String>,
    /// Default listing order.
    pub sort_order: Vec<SortKey>,
    /// Groups in display order.
    pub groups: Vec<GroupSnapshot>,
    /// Attributes in order.
    pub attributes: Vec<AttributeSnapshot>,
}

/// A display group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSnapshot {
    /// Group name.
    pub name: String,
    /// Localized group label.
    pub display_name: String,
    /// Member attribute names in order.
    pub attributes: Vec<String>,
}

/// An attribute resolved for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSnapshot {
    /// Attribute name.
    pub name: String,
    /// Path relative to the root entity.
    pub path: String,
    /// Position within the entity.
    pub order: usize,
    /// Group the attribute belongs to.
    pub group: Option<String>,
    /// Relationship kind.
    pub kind: RelationshipKind,
    /// Declared type.
    pub declared_type: String,
    /// Element type of collections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    /// Localized label.
    pub display_name: String,
    /// Localized description.
    pub description: String,
    /// Localized prompt.
    pub prompt: String,
    /// Identifier flag.
    pub id: bool,
    /// Main attribute flag.
    pub main: bool,
    /// Introspection's preferred flag.
    pub preferred: bool,
    /// Rendered by another attribute's group-together relation.
    pub already_grouped: bool,
    /// Backing store of element collections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_store: Option<ElementStore>,
    /// Resolved settings.
    pub settings: AttributeSettings,
    /// Nested model reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<NestedSnapshot>,
}

/// A reference to a nested model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedSnapshot {
    /// Reference of the nested model.
    pub reference: String,
    /// Entity class of the nested model.
    pub class: String,
    /// Owned by a cooperating provider.
    pub lazy: bool,
}

impl ModelSnapshot {
    /// Returns a one-line summary such as
    /// `Order (Order): 10 attributes in 2 groups, main number, id id`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} ({}): {} attributes in {} groups, main {}, id {}",
            self.reference,
            self.class,
            self.attributes.len(),
            self.groups.len(),
            self.main_attribute.as_deref().unwrap_or("-"),
            self.id_attribute.as_deref().unwrap_or("-"),
        )
    }
}

impl AttributeSnapshot {
    /// Returns the short flag list shown in attribute tables, e.g.
    /// `id main ro search=always`.
    #[must_use]
    pub fn flags(&self) -> String {
        let mut flags = Vec::new();
        if self.id {
            flags.push("id".to_owned());
        }
        if self.main {
            flags.push("main".to_owned());
        }
        if !self.settings.visible {
            flags.push("hidden".to_owned());
        }
        if self.settings.required {
            flags.push("req".to_owned());
        }
        if self.settings.editable == em_core::EditablePolicy::ReadOnly {
            flags.push("ro".to_owned());
        }
        if self.settings.search.is_searchable() {
            flags.push(format!("search={:?}", self.settings.search).to_lowercase());
        }
        if self.already_grouped {
            flags.push("grouped".to_owned());
        }
        if let Some(nested) = &self.nested {
            let marker = if nested.lazy { "~>" } else { "->" };
            flags.push(format!("{marker}{}", nested.reference));
        }
        flags.join(" ")
    }
}

impl EntityModel {
    /// Captures the model with its texts resolved for `locale`.
    #[must_use]
    pub fn snapshot(&self, locale: &Locale) -> ModelSnapshot {
        let groups = self
            .group_names()
            .map(|name| GroupSnapshot {
                name: name.to_owned(),
                display_name: self
                    .group_display_name(name, locale)
                    .map_or_else(|| name.to_owned(), |label| label.to_string()),
                attributes: self
                    .attributes_in_group(name)
                    .map(|a| a.name().to_owned())
                    .collect(),
            })
            .collect();

        ModelSnapshot {
            reference: self.reference().to_owned(),
            class: self.entity_class().name().to_owned(),
            locale: locale.tag().to_owned(),
            display_name: self.display_name(locale).to_string(),
            display_name_plural: self.display_name_plural(locale).to_string(),
            description: self.description(locale).to_string(),
            display_property: self.display_property().map(ToOwned::to_owned),
            id_attribute: self.id_attribute().map(|a| a.name().to_owned()),
            main_attribute: self.main_attribute().map(|a| a.name().to_owned()),
            sort_order: self.sort_order().to_vec(),
            groups,
            attributes: self
                .attributes()
                .iter()
                .map(|a| attribute_snapshot(self, a, locale))
                .collect(),
        }
    }
}

fn attribute_snapshot(model: &EntityModel, attribute: &AttributeModel, locale: &Locale) -> AttributeSnapshot {
    AttributeSnapshot {
        name: attribute.name().to_owned(),
        path: attribute.path(),
        order: attribute.order(),
        group: model.group_of(attribute.name()).map(ToOwned::to_owned),
        kind: attribute.kind(),
        declared_type: attribute.declared_type().to_string(),
        element_type: attribute.element_type().map(ToString::to_string),
        display_name: attribute.display_name(locale).to_string(),
        description: attribute.description(locale).to_string(),
        prompt: attribute.prompt(locale).to_string(),
        id: attribute.is_id(),
        main: attribute.is_main(),
        preferred: attribute.is_preferred(),
        already_grouped: attribute.is_already_grouped(),
        element_store: attribute.element_store().cloned(),
        settings: attribute.settings().clone(),
        nested: attribute.nested_model().map(|nested| NestedSnapshot {
            reference: nested.reference().to_owned(),
            class: nested.entity_class().name().to_owned(),
            lazy: matches!(nested, NestedModel::Lazy(_)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use em_core::ClassRef;

    use crate::test_support::{en, shop_factory};

    #[test]
    fn test_summary_line() {
        let factory = shop_factory();
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        insta::assert_snapshot!(
            order.snapshot(&en()).summary_line(),
            @"Order (Order): 10 attributes in 2 groups, main number, id id"
        );
    }

    #[test]
    fn test_snapshot_contents() {
        let factory = shop_factory();
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();
        let snapshot = order.snapshot(&en());

        assert_eq!(snapshot.groups[0].name, "header");
        assert_eq!(snapshot.groups[0].display_name, "Order header");
        assert_eq!(snapshot.groups[0].attributes, vec!["number", "date"]);

        let customer = snapshot.attributes.iter().find(|a| a.name == "customer").unwrap();
        assert_eq!(customer.nested.as_ref().map(|n| n.reference.as_str()), Some("Order.customer"));
        assert!(customer.flags().contains("->Order.customer"));

        let id = snapshot.attributes.iter().find(|a| a.name == "id").unwrap();
        assert!(id.flags().starts_with("id"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let factory = shop_factory();
        let category = factory.get_model(&ClassRef::new("Category")).unwrap();
        let json = serde_json::to_value(category.snapshot(&en())).unwrap();

        assert_eq!(json["display_name_plural"], "Categories");
        assert_eq!(json["attributes"][0]["kind"], "scalar");
        assert_eq!(json["attributes"][0]["settings"]["search"], "never");
        assert!(json["attributes"][0].get("nested").is_none());
    }
}
