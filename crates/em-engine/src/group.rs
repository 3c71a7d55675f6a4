//! Display groups and group-together relations.
//!
//! Groups come from one of two sources, the later replacing the earlier
//! entirely:
//!
//! 1. the class's declarative [`GroupDeclaration`]s
//! 2. translation entries `<reference>.attributeGroup.<N>.messageKey` and
//!    `.attributeNames` for `N = 1, 2, ...` until the first missing message
//!    key
//!
//! Attributes no group mentions fall into the default group, which is
//! always present.

use em_core::keys::{group_attributes_key, group_message_key};
use em_core::naming::split_list;
use em_core::{ConfigError, FxHashMap, FxHashSet, GroupDeclaration, Locale, TranslationStore};
use indexmap::IndexMap;
use tracing::warn;

use crate::attribute::AttributeModel;

/// Returns the group declarations in effect for `reference`.
pub(crate) fn declared_groups(
    store: &dyn TranslationStore,
    locale: &Locale,
    reference: &str,
    declarative: &[GroupDeclaration],
) -> Vec<GroupDeclaration> {
    let mut translated = Vec::new();

    for n in 1.. {
        let Some(name) = store.lookup(locale, &group_message_key(reference, n)) else {
            break;
        };
        let attributes = store
            .lookup(locale, &group_attributes_key(reference, n))
            .map(|list| split_list(&list))
            .unwrap_or_default();
        translated.push(GroupDeclaration {
            name: name.trim().to_owned(),
            attributes,
        });
    }

    if translated.is_empty() {
        declarative.to_vec()
    } else {
        translated
    }
}

/// Partitions sorted `attributes` into groups.
///
/// Returns group name to attribute indexes, declared groups first and the
/// default group last unless it was declared. Members are listed in
/// attribute order.
pub(crate) fn partition(
    reference: &str,
    groups: &[GroupDeclaration],
    attributes: &[AttributeModel],
    default_group: &str,
) -> Result<IndexMap<String, Vec<usize>>, ConfigError> {
    let index: FxHashMap<&str, usize> = attributes
        .iter()
        .enumerate()
        .map(|(i, a)| (a.name(), i))
        .collect();
    let mut assigned: FxHashMap<usize, &str> = FxHashMap::default();
    let mut result: IndexMap<String, Vec<usize>> = IndexMap::new();

    for group in groups {
        let members = result.entry(group.name.clone()).or_default();
        for name in &group.attributes {
            let Some(&i) = index.get(name.as_str()) else {
                return Err(ConfigError::unresolvable(reference, name, "attribute group"));
            };
            if let Some(first) = assigned.get(&i) {
                warn!(
                    reference,
                    attribute = %name,
                    kept = %first,
                    ignored = %group.name,
                    "Attribute listed in more than one group"
                );
                continue;
            }
            assigned.insert(i, &group.name);
            members.push(i);
        }
    }

    let default = result.entry(default_group.to_owned()).or_default();
    for i in 0..attributes.len() {
        if !assigned.contains_key(&i) {
            default.push(i);
        }
    }

    for members in result.values_mut() {
        members.sort_unstable();
    }
    Ok(result)
}

/// Resolves group-together relations.
///
/// An attribute may be rendered alongside several others. When a later
/// attribute names one that an earlier relation already claimed, the later
/// reference is dropped with a warning. Every claimed attribute is marked
/// already grouped.
pub(crate) fn resolve_group_together(
    reference: &str,
    attributes: &mut [AttributeModel],
) -> Result<(), ConfigError> {
    let index: FxHashMap<String, usize> = attributes
        .iter()
        .enumerate()
        .map(|(i, a)| (a.name().to_owned(), i))
        .collect();
    let mut claimed: FxHashSet<usize> = FxHashSet::default();

    for owner in 0..attributes.len() {
        let names = &attributes[owner].settings().group_together_with;
        if names.is_empty() {
            continue;
        }

        let mut kept = Vec::with_capacity(names.len());
        for name in names {
            let Some(&target) = index.get(name) else {
                return Err(ConfigError::unresolvable(reference, name, "group-together list"));
            };
            if !claimed.insert(target) {
                warn!(
                    reference,
                    attribute = %attributes[owner].name(),
                    grouped = %name,
                    "Attribute already grouped by an earlier relation"
                );
                continue;
            }
            kept.push(name.clone());
        }
        attributes[owner].set_group_together_with(kept);
    }

    for target in claimed {
        attributes[target].mark_already_grouped();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use em_core::{
        AttributeConfig, ClassDefinition, ClassRef, DomainCatalog, EngineConfig, MessageBundle,
        PropertyDescriptor, ValueType,
    };

    use super::*;
    use crate::factory::ModelFactory;
    use crate::test_support::en;

    fn text(name: &str) -> PropertyDescriptor {
        PropertyDescriptor::new(name, ValueType::Text)
    }

    fn together(names: &[&str]) -> AttributeConfig {
        AttributeConfig {
            group_together_with: Some(names.iter().map(|&n| n.to_owned()).collect()),
            ..AttributeConfig::default()
        }
    }

    #[test]
    fn test_translation_groups_replace_declared() {
        let store = MessageBundle::new()
            .with("en", "Order.attributeGroup.1.messageKey", "Order.group.main")
            .with("en", "Order.attributeGroup.1.attributeNames", "number, date")
            .with("en", "Order.attributeGroup.2.messageKey", "Order.group.extra")
            .with("en", "Order.attributeGroup.4.messageKey", "Order.group.unreachable");
        let declared = vec![GroupDeclaration::new("header", &["number"])];

        let groups = declared_groups(&store, &en(), "Order", &declared);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Order.group.main", "Order.group.extra"]);
        assert_eq!(groups[0].attributes, vec!["number", "date"]);
        assert!(groups[1].attributes.is_empty());

        let fallback = declared_groups(&MessageBundle::new(), &en(), "Order", &declared);
        assert_eq!(fallback, declared);
    }

    #[test]
    fn test_duplicate_membership_keeps_first_group() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Order")
                .property(text("a"))
                .property(text("b"))
                .property(text("c"))
                .model(em_core::EntityConfig {
                    attribute_groups: vec![
                        GroupDeclaration::new("first", &["b"]),
                        GroupDeclaration::new("second", &["b", "a"]),
                    ],
                    ..em_core::EntityConfig::default()
                }),
        );
        let factory = ModelFactory::from_catalog(catalog, MessageBundle::new(), EngineConfig::default());
        let order = factory.get_model(&ClassRef::new("Order")).unwrap();

        assert_eq!(order.group_of("b"), Some("first"));
        assert_eq!(order.group_of("a"), Some("second"));
        assert_eq!(order.group_of("c"), Some("default"));
        let groups: Vec<&str> = order.group_names().collect();
        assert_eq!(groups, vec!["first", "second", "default"]);
    }

    #[test]
    fn test_unknown_group_member() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Order").property(text("a")).model(em_core::EntityConfig {
                attribute_groups: vec![GroupDeclaration::new("main", &["zzz"])],
                ..em_core::EntityConfig::default()
            }),
        );
        let factory = ModelFactory::from_catalog(catalog, MessageBundle::new(), EngineConfig::default());
        let err = factory.get_model(&ClassRef::new("Order")).unwrap_err();
        assert!(matches!(
            err,
            crate::ModelError::Config(ConfigError::UnresolvableReference { context: "attribute group", .. })
        ));
    }

    #[test]
    fn test_group_together_suppresses_later_relation() {
        let catalog = DomainCatalog::new().with(
            ClassDefinition::entity("Person")
                .configured(text("firstName"), together(&["lastName"]))
                .configured(text("title"), together(&["lastName", "suffix"]))
                .property(text("lastName"))
                .property(text("suffix")),
        );
        let factory = ModelFactory::from_catalog(catalog, MessageBundle::new(), EngineConfig::default());
        let person = factory.get_model(&ClassRef::new("Person")).unwrap();

        let title = person.attribute("title").unwrap();
        assert_eq!(title.settings().group_together_with, vec!["suffix"]);
        assert!(person.attribute("lastName").unwrap().is_already_grouped());
        assert!(person.attribute("suffix").unwrap().is_already_grouped());
        assert!(!person.attribute("firstName").unwrap().is_already_grouped());
    }
}
