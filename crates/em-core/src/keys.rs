//! The translation-store key schema.
//!
//! | scope     | key |
//! |-----------|-----|
//! | entity    | `<reference>.<field>` |
//! | attribute | `<reference>.<name>.<field>` |
//! | group     | `<reference>.attributeGroup.<N>.messageKey` / `.attributeNames` |
//! | cascade   | `<reference>.<name>.cascade.<N>` / `.cascadeFilterPath.<N>` / `.cascadeMode.<N>` / `.cascadeOff` |
//!
//! `<name>` is the attribute name including any embedding prefix, so for the
//! root reference `Order` the key `Order.address.street.displayName` belongs
//! to the flattened attribute `address.street`.

use std::fmt;

/// Entity-level override fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityField {
    /// Singular label.
    DisplayName,
    /// Plural label.
    DisplayNamePlural,
    /// Longer explanation.
    Description,
    /// Attribute rendered for references.
    DisplayProperty,
    /// Explicit attribute order.
    AttributeOrder,
    /// Default listing order.
    SortOrder,
}

impl EntityField {
    /// Returns the key segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DisplayName => "displayName",
            Self::DisplayNamePlural => "displayNamePlural",
            Self::Description => "description",
            Self::DisplayProperty => "displayProperty",
            Self::AttributeOrder => "attributeOrder",
            Self::SortOrder => "sortOrder",
        }
    }
}

impl fmt::Display for EntityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute-level override fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AttributeField {
    DisplayName,
    Description,
    Prompt,
    DisplayFormat,
    Precision,
    Percentage,
    Currency,
    Week,
    DateType,
    Visible,
    VisibleInSummary,
    ReadOnly,
    Sortable,
    Required,
    RequiredForSearching,
    Searchable,
    SelectMode,
    SearchSelectMode,
    Main,
    Navigable,
    SearchDateOnly,
    MultipleSearch,
    SearchCaseSensitive,
    SearchPrefixOnly,
    MinLength,
    MaxLength,
    Url,
    Email,
    TrueRepresentation,
    FalseRepresentation,
    GroupTogetherWith,
}

impl AttributeField {
    /// Fields resolved once, at build time, against the default locale.
    pub const BUILD_TIME: [Self; 26] = [
        Self::DisplayFormat,
        Self::Precision,
        Self::Percentage,
        Self::Currency,
        Self::Week,
        Self::DateType,
        Self::Visible,
        Self::VisibleInSummary,
        Self::ReadOnly,
        Self::Sortable,
        Self::Required,
        Self::RequiredForSearching,
        Self::Searchable,
        Self::SelectMode,
        Self::SearchSelectMode,
        Self::Main,
        Self::Navigable,
        Self::SearchDateOnly,
        Self::MultipleSearch,
        Self::SearchCaseSensitive,
        Self::SearchPrefixOnly,
        Self::MinLength,
        Self::MaxLength,
        Self::Url,
        Self::Email,
        Self::GroupTogetherWith,
    ];

    /// Returns the key segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DisplayName => "displayName",
            Self::Description => "description",
            Self::Prompt => "prompt",
            Self::DisplayFormat => "displayFormat",
            Self::Precision => "precision",
            Self::Percentage => "percentage",
            Self::Currency => "currency",
            Self::Week => "week",
            Self::DateType => "dateType",
            Self::Visible => "visible",
            Self::VisibleInSummary => "visibleInSummary",
            Self::ReadOnly => "readOnly",
            Self::Sortable => "sortable",
            Self::Required => "required",
            Self::RequiredForSearching => "requiredForSearching",
            Self::Searchable => "searchable",
            Self::SelectMode => "selectMode",
            Self::SearchSelectMode => "searchSelectMode",
            Self::Main => "main",
            Self::Navigable => "navigable",
            Self::SearchDateOnly => "searchDateOnly",
            Self::MultipleSearch => "multipleSearch",
            Self::SearchCaseSensitive => "searchCaseSensitive",
            Self::SearchPrefixOnly => "searchPrefixOnly",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Url => "url",
            Self::Email => "email",
            Self::TrueRepresentation => "trueRepresentation",
            Self::FalseRepresentation => "falseRepresentation",
            Self::GroupTogetherWith => "groupTogetherWith",
        }
    }

    /// Returns `true` for fields resolved lazily per requested locale.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(
            self,
            Self::DisplayName
                | Self::Description
                | Self::Prompt
                | Self::TrueRepresentation
                | Self::FalseRepresentation
        )
    }
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parts of a numbered cascade rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CascadeField {
    /// The dependent attribute.
    Target,
    /// The filter path.
    FilterPath,
    /// The cascade mode.
    Mode,
}

impl CascadeField {
    /// Returns the key segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Target => "cascade",
            Self::FilterPath => "cascadeFilterPath",
            Self::Mode => "cascadeMode",
        }
    }
}

/// Returns the key of an entity-level field.
///
/// # Examples
///
/// ```
/// use em_core::keys::{EntityField, entity_key};
///
/// assert_eq!(entity_key("Order", EntityField::SortOrder), "Order.sortOrder");
/// ```
#[must_use]
pub fn entity_key(reference: &str, field: EntityField) -> String {
    format!("{reference}.{}", field.as_str())
}

/// Returns the key of an attribute-level field.
///
/// # Examples
///
/// ```
/// use em_core::keys::{AttributeField, attribute_key};
///
/// assert_eq!(
///     attribute_key("Order", "total", AttributeField::DisplayName),
///     "Order.total.displayName"
/// );
/// ```
#[must_use]
pub fn attribute_key(reference: &str, name: &str, field: AttributeField) -> String {
    format!("{reference}.{name}.{}", field.as_str())
}

/// Returns the message key entry of the `n`-th group (1-based).
#[must_use]
pub fn group_message_key(reference: &str, n: usize) -> String {
    format!("{reference}.attributeGroup.{n}.messageKey")
}

/// Returns the attribute list entry of the `n`-th group (1-based).
#[must_use]
pub fn group_attributes_key(reference: &str, n: usize) -> String {
    format!("{reference}.attributeGroup.{n}.attributeNames")
}

/// Returns the key of part `field` of the `n`-th cascade rule (1-based).
///
/// # Examples
///
/// ```
/// use em_core::keys::{CascadeField, cascade_key};
///
/// assert_eq!(
///     cascade_key("Order", "city", CascadeField::FilterPath, 1),
///     "Order.city.cascadeFilterPath.1"
/// );
/// ```
#[must_use]
pub fn cascade_key(reference: &str, name: &str, field: CascadeField, n: usize) -> String {
    format!("{reference}.{name}.{}.{n}", field.as_str())
}

/// Returns the key switching off all cascade rules of an attribute.
#[must_use]
pub fn cascade_off_key(reference: &str, name: &str) -> String {
    format!("{reference}.{name}.cascadeOff")
}
