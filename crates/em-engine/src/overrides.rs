//! The attribute override pipeline.
//!
//! An [`AttributeDraft`] starts from structural defaults and absorbs
//! override layers in a fixed order:
//!
//! 1. structural defaults ([`AttributeDraft::new`])
//! 2. declarative configuration ([`AttributeDraft::apply`])
//! 3. translation-store entries, parsed by [`translation_overrides`] into the
//!    same [`AttributeConfig`] shape and applied the same way
//!
//! Every explicit value overwrites what is there. Setting the selection mode
//! also sets the search selection mode until a layer writes the search
//! selection mode explicitly. The display format follows the date kind until
//! a layer writes it explicitly.

use std::str::FromStr;

use em_core::keys::{AttributeField, CascadeField, attribute_key, cascade_key, cascade_off_key};
use em_core::naming::split_list;
use em_core::{
    AttributeConfig, CascadeDeclaration, CascadeMode, ConfigError, DateKind, EditablePolicy,
    EngineConfig, KeywordError, Locale, RelationshipKind, SearchPolicy, SelectMode,
    TranslationStore, ValueType,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A resolved cascade rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeRule {
    /// Path on the dependent attribute's type used as a filter.
    pub filter_path: String,
    /// Screens the rule applies to.
    pub mode: CascadeMode,
}

/// Resolved, locale-independent settings of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSettings {
    /// Shown in forms.
    pub visible: bool,
    /// Shown in summary (grid) views.
    pub visible_in_summary: bool,
    /// Whether forms may edit the value.
    pub editable: EditablePolicy,
    /// Grids may sort by this attribute.
    pub sortable: bool,
    /// A value is mandatory.
    pub required: bool,
    /// A value is mandatory in search panels.
    pub required_for_search: bool,
    /// Search panel participation.
    pub search: SearchPolicy,
    /// Number of fraction digits.
    pub precision: u32,
    /// Render as a percentage.
    pub percentage: bool,
    /// Render as a currency amount.
    pub currency: bool,
    /// Render a date as week of year.
    pub week: bool,
    /// Temporal kind.
    pub date_kind: DateKind,
    /// Display format pattern.
    pub display_format: Option<String>,
    /// Selection widget in forms.
    pub select_mode: SelectMode,
    /// Selection widget in search panels.
    pub search_select_mode: SelectMode,
    /// Explicitly flagged as the entity's main attribute.
    pub main: bool,
    /// Consumers may navigate to the referenced entity.
    pub navigable: bool,
    /// Search a timestamp by its date part only.
    pub search_date_only: bool,
    /// Search by several values at once.
    pub multiple_search: bool,
    /// Text search is case sensitive.
    pub search_case_sensitive: bool,
    /// Text search matches prefixes only.
    pub search_prefix_only: bool,
    /// Minimum text length.
    pub min_length: Option<u32>,
    /// Maximum text length.
    pub max_length: Option<u32>,
    /// The value is a URL.
    pub url: bool,
    /// The value is an e-mail address.
    pub email: bool,
    /// Attributes rendered together with this one.
    pub group_together_with: Vec<String>,
    /// Cascade rules by dependent attribute name.
    pub cascades: IndexMap<String, CascadeRule>,
}

/// Declared (locale-independent) values of the textual fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredTexts {
    /// Declared display name.
    pub display_name: Option<String>,
    /// Declared description.
    pub description: Option<String>,
    /// Declared prompt.
    pub prompt: Option<String>,
    /// Declared rendering of `true`.
    pub true_representation: Option<String>,
    /// Declared rendering of `false`.
    pub false_representation: Option<String>,
}

/// Attribute settings under construction.
#[derive(Debug, Clone)]
pub struct AttributeDraft {
    /// Current settings.
    pub settings: AttributeSettings,
    /// Current declared texts.
    pub texts: DeclaredTexts,
    search_select_explicit: bool,
    display_format_explicit: bool,
}

impl AttributeDraft {
    /// Seeds the structural defaults for a property.
    #[must_use]
    pub fn new(config: &EngineConfig, declared_type: &ValueType, settable: bool, required: bool) -> Self {
        let date_kind = declared_type.date_kind();
        let precision = if declared_type.is_fractional() {
            config.decimal_precision
        } else {
            0
        };

        Self {
            settings: AttributeSettings {
                visible: true,
                visible_in_summary: true,
                editable: if settable {
                    EditablePolicy::Editable
                } else {
                    EditablePolicy::ReadOnly
                },
                sortable: true,
                required,
                required_for_search: false,
                search: SearchPolicy::Never,
                precision,
                percentage: false,
                currency: false,
                week: false,
                date_kind,
                display_format: default_format(config, date_kind),
                select_mode: config.default_select_mode,
                search_select_mode: config.default_select_mode,
                main: false,
                navigable: false,
                search_date_only: false,
                multiple_search: false,
                search_case_sensitive: false,
                search_prefix_only: false,
                min_length: None,
                max_length: None,
                url: false,
                email: false,
                group_together_with: Vec::new(),
                cascades: IndexMap::new(),
            },
            texts: DeclaredTexts::default(),
            search_select_explicit: false,
            display_format_explicit: false,
        }
    }

    /// Applies one override layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IllegalStructure`] if a cascade rule of the
    /// layer is incomplete.
    pub fn apply(&mut self, layer: &AttributeConfig, path: &str) -> Result<(), ConfigError> {
        let s = &mut self.settings;

        set(&mut s.visible, layer.visible);
        set(&mut s.visible_in_summary, layer.visible_in_summary);
        set(&mut s.sortable, layer.sortable);
        set(&mut s.required, layer.required);
        set(&mut s.required_for_search, layer.required_for_search);
        set(&mut s.search, layer.search);
        set(&mut s.precision, layer.precision);
        set(&mut s.percentage, layer.percentage);
        set(&mut s.currency, layer.currency);
        set(&mut s.week, layer.week);
        set(&mut s.date_kind, layer.date_kind);
        set(&mut s.main, layer.main);
        set(&mut s.navigable, layer.navigable);
        set(&mut s.search_date_only, layer.search_date_only);
        set(&mut s.multiple_search, layer.multiple_search);
        set(&mut s.search_case_sensitive, layer.search_case_sensitive);
        set(&mut s.search_prefix_only, layer.search_prefix_only);
        set(&mut s.url, layer.url);
        set(&mut s.email, layer.email);

        if let Some(read_only) = layer.read_only {
            s.editable = if read_only {
                EditablePolicy::ReadOnly
            } else {
                EditablePolicy::Editable
            };
        }
        if layer.min_length.is_some() {
            s.min_length = layer.min_length;
        }
        if layer.max_length.is_some() {
            s.max_length = layer.max_length;
        }
        if let Some(format) = &layer.display_format {
            s.display_format = Some(format.clone());
            self.display_format_explicit = true;
        }
        if let Some(mode) = layer.search_select_mode {
            s.search_select_mode = mode;
            self.search_select_explicit = true;
        }
        if let Some(mode) = layer.select_mode {
            s.select_mode = mode;
            if !self.search_select_explicit {
                s.search_select_mode = mode;
            }
        }
        if let Some(names) = &layer.group_together_with {
            s.group_together_with.clone_from(names);
        }

        if layer.cascade_off == Some(true) {
            s.cascades.clear();
        }
        for (i, declaration) in layer.cascade.iter().enumerate() {
            let (target, rule) = resolve_cascade(declaration, path, i + 1)?;
            s.cascades.insert(target, rule);
        }

        let texts = &mut self.texts;
        set_text(&mut texts.display_name, layer.display_name.as_ref());
        set_text(&mut texts.description, layer.description.as_ref());
        set_text(&mut texts.prompt, layer.prompt.as_ref());
        set_text(&mut texts.true_representation, layer.true_representation.as_ref());
        set_text(&mut texts.false_representation, layer.false_representation.as_ref());

        Ok(())
    }

    /// Finishes the draft: derived values that were not written explicitly
    /// follow the final settings.
    #[must_use]
    pub fn finish(mut self, config: &EngineConfig) -> (AttributeSettings, DeclaredTexts) {
        if !self.display_format_explicit {
            self.settings.display_format = default_format(config, self.settings.date_kind);
        }
        (self.settings, self.texts)
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn set_text(target: &mut Option<String>, value: Option<&String>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

fn default_format(config: &EngineConfig, date_kind: DateKind) -> Option<String> {
    match date_kind {
        DateKind::None => None,
        DateKind::DateOnly => Some(config.date_format.clone()),
        DateKind::Time => Some(config.time_format.clone()),
        DateKind::Timestamp => Some(config.timestamp_format.clone()),
    }
}

fn resolve_cascade(
    declaration: &CascadeDeclaration,
    path: &str,
    n: usize,
) -> Result<(String, CascadeRule), ConfigError> {
    match (&declaration.attribute, &declaration.filter_path, declaration.mode) {
        (Some(target), Some(filter_path), Some(mode)) => Ok((
            target.clone(),
            CascadeRule {
                filter_path: filter_path.clone(),
                mode,
            },
        )),
        (None, _, _) => Err(ConfigError::illegal_structure(
            path,
            format!("cascade rule {n} has no target attribute"),
        )),
        (Some(target), None, _) => Err(ConfigError::illegal_structure(
            path,
            format!("cascade rule {n} for '{target}' has no filter path"),
        )),
        (Some(target), Some(_), None) => Err(ConfigError::illegal_structure(
            path,
            format!("cascade rule {n} for '{target}' has no mode"),
        )),
    }
}

// =============================================================================
// Translation-store layer
// =============================================================================

/// Reads the build-time override entries of one attribute from the
/// translation store.
///
/// `reference` is the owning entity's reference and `name` the attribute
/// name, so keys look like `Order.total.precision`. Textual fields are not
/// read here; they are resolved lazily per locale.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the key of the first entry
/// that cannot be parsed.
pub fn translation_overrides(
    store: &dyn TranslationStore,
    locale: &Locale,
    reference: &str,
    name: &str,
) -> Result<AttributeConfig, ConfigError> {
    let mut config = AttributeConfig::default();

    for field in AttributeField::BUILD_TIME {
        let key = attribute_key(reference, name, field);
        let Some(raw) = store.lookup(locale, &key) else {
            continue;
        };
        let value = raw.trim();

        match field {
            AttributeField::DisplayFormat => config.display_format = Some(value.to_owned()),
            AttributeField::Precision => config.precision = Some(parse_u32(&key, value)?),
            AttributeField::Percentage => config.percentage = Some(parse_bool(&key, value)?),
            AttributeField::Currency => config.currency = Some(parse_bool(&key, value)?),
            AttributeField::Week => config.week = Some(parse_bool(&key, value)?),
            AttributeField::DateType => config.date_kind = Some(parse_keyword(&key, value)?),
            AttributeField::Visible => config.visible = Some(parse_bool(&key, value)?),
            AttributeField::VisibleInSummary => {
                config.visible_in_summary = Some(parse_bool(&key, value)?);
            }
            AttributeField::ReadOnly => config.read_only = Some(parse_bool(&key, value)?),
            AttributeField::Sortable => config.sortable = Some(parse_bool(&key, value)?),
            AttributeField::Required => config.required = Some(parse_bool(&key, value)?),
            AttributeField::RequiredForSearching => {
                config.required_for_search = Some(parse_bool(&key, value)?);
            }
            AttributeField::Searchable => {
                config.search = Some(parse_keyword::<SearchPolicy>(&key, value)?);
            }
            AttributeField::SelectMode => config.select_mode = Some(parse_keyword(&key, value)?),
            AttributeField::SearchSelectMode => {
                config.search_select_mode = Some(parse_keyword(&key, value)?);
            }
            AttributeField::Main => config.main = Some(parse_bool(&key, value)?),
            AttributeField::Navigable => config.navigable = Some(parse_bool(&key, value)?),
            AttributeField::SearchDateOnly => {
                config.search_date_only = Some(parse_bool(&key, value)?);
            }
            AttributeField::MultipleSearch => {
                config.multiple_search = Some(parse_bool(&key, value)?);
            }
            AttributeField::SearchCaseSensitive => {
                config.search_case_sensitive = Some(parse_bool(&key, value)?);
            }
            AttributeField::SearchPrefixOnly => {
                config.search_prefix_only = Some(parse_bool(&key, value)?);
            }
            AttributeField::MinLength => config.min_length = Some(parse_u32(&key, value)?),
            AttributeField::MaxLength => config.max_length = Some(parse_u32(&key, value)?),
            AttributeField::Url => config.url = Some(parse_bool(&key, value)?),
            AttributeField::Email => config.email = Some(parse_bool(&key, value)?),
            AttributeField::GroupTogetherWith => {
                config.group_together_with = Some(split_list(value));
            }
            AttributeField::DisplayName
            | AttributeField::Description
            | AttributeField::Prompt
            | AttributeField::TrueRepresentation
            | AttributeField::FalseRepresentation => {}
        }
    }

    let off_key = cascade_off_key(reference, name);
    if let Some(raw) = store.lookup(locale, &off_key) {
        config.cascade_off = Some(parse_bool(&off_key, raw.trim())?);
    }
    config.cascade = translation_cascades(store, locale, reference, name)?;

    Ok(config)
}

fn translation_cascades(
    store: &dyn TranslationStore,
    locale: &Locale,
    reference: &str,
    name: &str,
) -> Result<Vec<CascadeDeclaration>, ConfigError> {
    let mut cascades = Vec::new();

    for n in 1.. {
        let lookup = |field| store.lookup(locale, &cascade_key(reference, name, field, n));
        let target = lookup(CascadeField::Target);
        let filter_path = lookup(CascadeField::FilterPath);
        let mode = lookup(CascadeField::Mode);

        if target.is_none() && filter_path.is_none() && mode.is_none() {
            break;
        }

        let mode = match mode {
            Some(raw) => {
                let key = cascade_key(reference, name, CascadeField::Mode, n);
                Some(parse_keyword::<CascadeMode>(&key, raw.trim())?)
            }
            None => None,
        };

        cascades.push(CascadeDeclaration {
            attribute: target.map(|t| t.trim().to_owned()),
            filter_path: filter_path.map(|p| p.trim().to_owned()),
            mode,
        });
    }

    Ok(cascades)
}

/// Parses `true` / `false`, ignoring case.
pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::invalid_value(key, value, "true or false"))
    }
}

pub(crate) fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid_value(key, value, "an unsigned integer"))
}

pub(crate) fn parse_keyword<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = KeywordError>,
{
    value
        .parse()
        .map_err(|e: KeywordError| ConfigError::invalid_value(key, value, e.expected))
}

// =============================================================================
// Validation
// =============================================================================

/// Checks cross-field constraints of finished settings.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidCombination`] naming `path` for the first
/// violated constraint.
pub fn validate(
    settings: &AttributeSettings,
    kind: RelationshipKind,
    declared_type: &ValueType,
    path: &str,
) -> Result<(), ConfigError> {
    let fail = |reason: &str| -> Result<(), ConfigError> {
        Err(ConfigError::invalid_combination(path, reason))
    };

    if (settings.select_mode.is_multi_value() || settings.search_select_mode.is_multi_value())
        && !kind.is_relationship()
        && !kind.is_collection()
    {
        return fail("multi-value selection modes need a relationship or collection attribute");
    }
    if settings.search.is_searchable() && kind == RelationshipKind::LargeObject {
        return fail("large objects cannot be searched");
    }
    if settings.navigable && !kind.is_relationship() {
        return fail("only relationships can be navigable");
    }
    if settings.multiple_search && !kind.is_relationship() {
        return fail("multiple search needs a relationship");
    }
    if settings.search_date_only && settings.date_kind != DateKind::Timestamp {
        return fail("date-only search needs a timestamp attribute");
    }
    if (settings.percentage || settings.currency) && !declared_type.is_numeric() {
        return fail("percentage and currency formats need a numeric attribute");
    }
    if settings.week && !matches!(settings.date_kind, DateKind::DateOnly | DateKind::Timestamp) {
        return fail("week-of-year format needs a date attribute");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use em_core::MessageBundle;

    use super::*;

    fn draft(declared_type: &ValueType) -> AttributeDraft {
        AttributeDraft::new(&EngineConfig::default(), declared_type, true, false)
    }

    #[test]
    fn test_structural_defaults() {
        let config = EngineConfig::default();
        let (settings, texts) = draft(&ValueType::Decimal).finish(&config);
        assert_eq!(settings.precision, 2);
        assert_eq!(settings.search, SearchPolicy::Never);
        assert_eq!(settings.editable, EditablePolicy::Editable);
        assert!(settings.visible && settings.sortable);
        assert!(settings.display_format.is_none());
        assert_eq!(texts, DeclaredTexts::default());

        let (settings, _) = AttributeDraft::new(&config, &ValueType::Timestamp, false, true).finish(&config);
        assert_eq!(settings.date_kind, DateKind::Timestamp);
        assert_eq!(settings.display_format.as_deref(), Some("dd-MM-yyyy HH:mm:ss"));
        assert_eq!(settings.editable, EditablePolicy::ReadOnly);
        assert!(settings.required);
    }

    #[test]
    fn test_select_mode_cascades_to_search_mode() {
        let mut d = draft(&ValueType::Text);
        let layer = AttributeConfig {
            select_mode: Some(SelectMode::Lookup),
            ..AttributeConfig::default()
        };
        d.apply(&layer, "Order.customer").unwrap();
        assert_eq!(d.settings.search_select_mode, SelectMode::Lookup);
    }

    #[test]
    fn test_explicit_search_mode_survives_later_select_mode() {
        let mut d = draft(&ValueType::Text);
        let declarative = AttributeConfig {
            search_select_mode: Some(SelectMode::List),
            ..AttributeConfig::default()
        };
        let translated = AttributeConfig {
            select_mode: Some(SelectMode::Lookup),
            ..AttributeConfig::default()
        };
        d.apply(&declarative, "Order.customer").unwrap();
        d.apply(&translated, "Order.customer").unwrap();
        assert_eq!(d.settings.select_mode, SelectMode::Lookup);
        assert_eq!(d.settings.search_select_mode, SelectMode::List);
    }

    #[test]
    fn test_date_kind_override_moves_default_format() {
        let config = EngineConfig::default();
        let mut d = draft(&ValueType::Timestamp);
        let layer = AttributeConfig {
            date_kind: Some(DateKind::DateOnly),
            ..AttributeConfig::default()
        };
        d.apply(&layer, "Order.created").unwrap();
        let (settings, _) = d.finish(&config);
        assert_eq!(settings.display_format.as_deref(), Some("dd-MM-yyyy"));
    }

    #[test]
    fn test_explicit_format_is_kept() {
        let config = EngineConfig::default();
        let mut d = draft(&ValueType::Date);
        let layer = AttributeConfig {
            display_format: Some("yyyy/MM/dd".to_owned()),
            ..AttributeConfig::default()
        };
        d.apply(&layer, "Order.date").unwrap();
        let (settings, _) = d.finish(&config);
        assert_eq!(settings.display_format.as_deref(), Some("yyyy/MM/dd"));
    }

    #[test]
    fn test_incomplete_cascade_names_path() {
        let mut d = draft(&ValueType::Text);
        let layer = AttributeConfig {
            cascade: vec![CascadeDeclaration {
                attribute: Some("city".to_owned()),
                filter_path: None,
                mode: Some(CascadeMode::Both),
            }],
            ..AttributeConfig::default()
        };
        let err = d.apply(&layer, "Order.country").unwrap_err();
        assert!(matches!(err, ConfigError::IllegalStructure { ref path, .. } if path == "Order.country"));
        assert!(err.to_string().contains("filter path"));
    }

    #[test]
    fn test_cascade_off_clears_earlier_rules() {
        let mut d = draft(&ValueType::Text);
        let declarative = AttributeConfig {
            cascade: vec![CascadeDeclaration::new("city", "country", CascadeMode::Edit)],
            ..AttributeConfig::default()
        };
        d.apply(&declarative, "Order.country").unwrap();
        assert_eq!(d.settings.cascades.len(), 1);

        let off = AttributeConfig {
            cascade_off: Some(true),
            ..AttributeConfig::default()
        };
        d.apply(&off, "Order.country").unwrap();
        assert!(d.settings.cascades.is_empty());
    }

    #[test]
    fn test_translation_overrides_parse_values() {
        let store = MessageBundle::new()
            .with("en", "Order.total.precision", "4")
            .with("en", "Order.total.searchable", "OnDemand")
            .with("en", "Order.total.visible", "FALSE")
            .with("en", "Order.total.groupTogetherWith", " currency , vat ")
            .with("en", "Order.total.displayName", "Grand Total");

        let config = translation_overrides(&store, &Locale::new("en"), "Order", "total").unwrap();
        assert_eq!(config.precision, Some(4));
        assert_eq!(config.search, Some(SearchPolicy::OnDemand));
        assert_eq!(config.visible, Some(false));
        assert_eq!(config.group_together_with, Some(vec!["currency".to_owned(), "vat".to_owned()]));
        assert!(config.display_name.is_none());
    }

    #[test]
    fn test_searchable_accepts_booleans() {
        let store = MessageBundle::new().with("en", "Order.code.searchable", "true");
        let config = translation_overrides(&store, &Locale::new("en"), "Order", "code").unwrap();
        assert_eq!(config.search, Some(SearchPolicy::Always));
    }

    #[test]
    fn test_unparsable_value_names_key() {
        let store = MessageBundle::new().with("en", "Order.total.precision", "two");
        let err = translation_overrides(&store, &Locale::new("en"), "Order", "total").unwrap_err();
        assert_eq!(err.path(), Some("Order.total.precision"));
    }

    #[test]
    fn test_translation_cascades_until_gap() {
        let store = MessageBundle::new()
            .with("en", "Order.country.cascade.1", "city")
            .with("en", "Order.country.cascadeFilterPath.1", "country")
            .with("en", "Order.country.cascadeMode.1", "both")
            .with("en", "Order.country.cascade.3", "street");

        let config = translation_overrides(&store, &Locale::new("en"), "Order", "country").unwrap();
        assert_eq!(config.cascade.len(), 1);
        assert!(config.cascade[0].is_complete());
    }

    #[test]
    fn test_translation_cascade_without_filter_path() {
        let store = MessageBundle::new()
            .with("en", "Order.country.cascade.1", "city")
            .with("en", "Order.country.cascadeMode.1", "search");

        let layer = translation_overrides(&store, &Locale::new("en"), "Order", "country").unwrap();
        let err = draft(&ValueType::Text).apply(&layer, "Order.country").unwrap_err();
        assert_eq!(err.path(), Some("Order.country"));
    }

    #[test]
    fn test_validate_rejects_invalid_combinations() {
        let config = EngineConfig::default();
        let (mut settings, _) = draft(&ValueType::Bytes).finish(&config);

        settings.search = SearchPolicy::Always;
        assert!(validate(&settings, RelationshipKind::LargeObject, &ValueType::Bytes, "Order.notes").is_err());
        assert!(validate(&settings, RelationshipKind::Scalar, &ValueType::Bytes, "Order.notes").is_ok());

        let (mut settings, _) = draft(&ValueType::Text).finish(&config);
        settings.select_mode = SelectMode::Token;
        assert!(validate(&settings, RelationshipKind::Scalar, &ValueType::Text, "Order.code").is_err());
        assert!(validate(&settings, RelationshipKind::ElementCollection, &ValueType::Collection, "Order.tags").is_ok());
        assert!(validate(&settings, RelationshipKind::ToOneRelationship, &ValueType::Text, "Order.customer").is_ok());

        let (mut settings, _) = draft(&ValueType::Text).finish(&config);
        settings.navigable = true;
        assert!(validate(&settings, RelationshipKind::Scalar, &ValueType::Text, "Order.code").is_err());

        let (mut settings, _) = draft(&ValueType::Date).finish(&config);
        settings.search_date_only = true;
        assert!(validate(&settings, RelationshipKind::Scalar, &ValueType::Date, "Order.date").is_err());

        let (mut settings, _) = draft(&ValueType::Text).finish(&config);
        settings.currency = true;
        assert!(validate(&settings, RelationshipKind::Scalar, &ValueType::Text, "Order.code").is_err());

        let (mut settings, _) = draft(&ValueType::Integer).finish(&config);
        settings.week = true;
        assert!(validate(&settings, RelationshipKind::Scalar, &ValueType::Integer, "Order.qty").is_err());
    }
}
