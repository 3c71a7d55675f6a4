//! Declarative presentation settings for attributes and entities.
//!
//! Every field is optional: `None` means "not configured here", so the value
//! derived from structure (or an earlier layer) survives. The same shapes
//! carry values parsed from the translation store.

use serde::{Deserialize, Serialize};

use super::{CascadeMode, DateKind, SearchPolicy, SelectMode};

/// A cascade rule: the options of `attribute` are filtered by the value of
/// the declaring attribute through `filter_path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeDeclaration {
    /// The dependent attribute.
    pub attribute: Option<String>,
    /// Path on the dependent attribute's type used as a filter.
    pub filter_path: Option<String>,
    /// Screens the rule applies to.
    pub mode: Option<CascadeMode>,
}

impl CascadeDeclaration {
    /// Creates a complete declaration.
    #[must_use]
    pub fn new(attribute: &str, filter_path: &str, mode: CascadeMode) -> Self {
        Self {
            attribute: Some(attribute.to_owned()),
            filter_path: Some(filter_path.to_owned()),
            mode: Some(mode),
        }
    }

    /// Returns `true` if every part of the rule is present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.attribute.is_some() && self.filter_path.is_some() && self.mode.is_some()
    }
}

/// Per-attribute presentation settings.
///
/// # Examples
///
/// ```
/// use em_core::{AttributeConfig, SearchPolicy};
///
/// let config: AttributeConfig = serde_json::from_str(r#"{"search": "always", "precision": 4}"#)?;
/// assert_eq!(config.search, Some(SearchPolicy::Always));
/// assert_eq!(config.precision, Some(4));
/// assert!(config.display_name.is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    /// Label shown next to the value.
    pub display_name: Option<String>,
    /// Longer explanation (tooltips).
    pub description: Option<String>,
    /// Input prompt.
    pub prompt: Option<String>,
    /// Display format pattern.
    pub display_format: Option<String>,
    /// Number of fraction digits.
    pub precision: Option<u32>,
    /// Render as a percentage.
    pub percentage: Option<bool>,
    /// Render as a currency amount.
    pub currency: Option<bool>,
    /// Render a date as week of year.
    pub week: Option<bool>,
    /// Temporal kind.
    pub date_kind: Option<DateKind>,
    /// Shown in forms.
    pub visible: Option<bool>,
    /// Shown in summary (grid) views.
    pub visible_in_summary: Option<bool>,
    /// Never editable.
    pub read_only: Option<bool>,
    /// Grids may sort by this attribute.
    pub sortable: Option<bool>,
    /// A value is mandatory.
    pub required: Option<bool>,
    /// A value is mandatory in search panels.
    pub required_for_search: Option<bool>,
    /// Search panel participation.
    pub search: Option<SearchPolicy>,
    /// Selection widget in forms.
    pub select_mode: Option<SelectMode>,
    /// Selection widget in search panels.
    pub search_select_mode: Option<SelectMode>,
    /// The entity's main attribute.
    pub main: Option<bool>,
    /// Consumers may navigate to the referenced entity.
    pub navigable: Option<bool>,
    /// Search a timestamp by its date part only.
    pub search_date_only: Option<bool>,
    /// Search by several values at once.
    pub multiple_search: Option<bool>,
    /// Text search is case sensitive.
    pub search_case_sensitive: Option<bool>,
    /// Text search matches prefixes only.
    pub search_prefix_only: Option<bool>,
    /// Minimum text length.
    pub min_length: Option<u32>,
    /// Maximum text length.
    pub max_length: Option<u32>,
    /// The value is a URL.
    pub url: Option<bool>,
    /// The value is an e-mail address.
    pub email: Option<bool>,
    /// Rendering of `true`.
    pub true_representation: Option<String>,
    /// Rendering of `false`.
    pub false_representation: Option<String>,
    /// Attributes rendered together with this one.
    pub group_together_with: Option<Vec<String>>,
    /// Cascade rules, in declaration order.
    pub cascade: Vec<CascadeDeclaration>,
    /// Drop all cascade rules declared by earlier layers.
    pub cascade_off: Option<bool>,
}

impl AttributeConfig {
    /// Returns `true` if nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named attribute group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDeclaration {
    /// Group name (also its message key).
    pub name: String,
    /// Member attribute names, in display order.
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl GroupDeclaration {
    /// Creates a group.
    #[must_use]
    pub fn new(name: &str, attributes: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            attributes: attributes.iter().map(|&a| a.to_owned()).collect(),
        }
    }
}

/// Entity-level presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Singular label.
    pub display_name: Option<String>,
    /// Plural label.
    pub display_name_plural: Option<String>,
    /// Longer explanation.
    pub description: Option<String>,
    /// Attribute rendered when the entity is referenced elsewhere.
    pub display_property: Option<String>,
    /// Explicit attribute order (leading attributes).
    pub attribute_order: Option<Vec<String>>,
    /// Default listing order: `"name [ASC|DESC], ..."`.
    pub sort_order: Option<String>,
    /// Attribute groups, in display order.
    pub attribute_groups: Vec<GroupDeclaration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_attribute_config() {
        assert!(AttributeConfig::default().is_empty());
        let config = AttributeConfig {
            visible: Some(false),
            ..AttributeConfig::default()
        };
        assert!(!config.is_empty());
    }

    #[test]
    fn test_cascade_completeness() {
        assert!(CascadeDeclaration::new("city", "country", CascadeMode::Both).is_complete());
        let partial = CascadeDeclaration {
            attribute: Some("city".to_owned()),
            filter_path: Some("country".to_owned()),
            mode: None,
        };
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_entity_config_from_json() {
        let json = r#"{
            "display_name": "Purchase Order",
            "attribute_order": ["number", "date"],
            "attribute_groups": [{"name": "header", "attributes": ["number"]}]
        }"#;
        let config: EntityConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.display_name.as_deref(), Some("Purchase Order"));
        assert_eq!(config.attribute_order.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(config.attribute_groups[0], GroupDeclaration::new("header", &["number"]));
        assert!(config.sort_order.is_none());
    }
}
