//! The metadata of one attribute.
//!
//! An [`AttributeModel`] is owned by its [`EntityModel`](crate::EntityModel).
//! Its structure (kind, type, order, settings, nested model) is fixed when
//! the entity is built; its textual fields are resolved per locale on first
//! use and memoized.

use std::fmt;
use std::sync::Arc;

use em_core::keys::{AttributeField, attribute_key};
use em_core::{
    ClassRef, EditablePolicy, Locale, RelationshipKind, SearchPolicy, TranslationStore, ValueType,
};
use serde::{Deserialize, Serialize};

use crate::locale_cache::LocalizedText;
use crate::nested::NestedModel;
use crate::overrides::{AttributeSettings, DeclaredTexts};

/// The backing store of an element collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementStore {
    /// Backing table.
    pub table: Option<String>,
    /// Value column in the backing table.
    pub column: Option<String>,
}

/// Everything the attribute builder decides about an attribute.
pub(crate) struct AttributeParts {
    pub(crate) name: String,
    pub(crate) reference: Arc<str>,
    pub(crate) declaring_class: ClassRef,
    pub(crate) kind: RelationshipKind,
    pub(crate) declared_type: ValueType,
    pub(crate) element_type: Option<ValueType>,
    pub(crate) id: bool,
    pub(crate) preferred: bool,
    pub(crate) element_store: Option<ElementStore>,
    pub(crate) settings: AttributeSettings,
    pub(crate) texts: DeclaredTexts,
    pub(crate) nested: Option<NestedModel>,
    pub(crate) store: Arc<dyn TranslationStore>,
    pub(crate) derived_name: String,
    pub(crate) true_default: String,
    pub(crate) false_default: String,
}

struct AttributeTexts {
    display_name: LocalizedText,
    description: LocalizedText,
    prompt: LocalizedText,
    true_representation: LocalizedText,
    false_representation: LocalizedText,
}

/// Metadata of a single attribute of an entity model.
pub struct AttributeModel {
    name: String,
    reference: Arc<str>,
    declaring_class: ClassRef,
    kind: RelationshipKind,
    declared_type: ValueType,
    element_type: Option<ValueType>,
    order: usize,
    id: bool,
    main: bool,
    preferred: bool,
    already_grouped: bool,
    element_store: Option<ElementStore>,
    settings: AttributeSettings,
    nested: Option<NestedModel>,
    store: Arc<dyn TranslationStore>,
    texts: AttributeTexts,
    derived_name: String,
    true_default: String,
    false_default: String,
}

impl AttributeModel {
    pub(crate) fn new(parts: AttributeParts) -> Self {
        let AttributeParts {
            name,
            reference,
            declaring_class,
            kind,
            declared_type,
            element_type,
            id,
            preferred,
            element_store,
            settings,
            texts,
            nested,
            store,
            derived_name,
            true_default,
            false_default,
        } = parts;

        let key = |field| attribute_key(&reference, &name, field);
        let texts = AttributeTexts {
            display_name: LocalizedText::new(key(AttributeField::DisplayName), texts.display_name),
            description: LocalizedText::new(key(AttributeField::Description), texts.description),
            prompt: LocalizedText::new(key(AttributeField::Prompt), texts.prompt),
            true_representation: LocalizedText::new(
                key(AttributeField::TrueRepresentation),
                texts.true_representation,
            ),
            false_representation: LocalizedText::new(
                key(AttributeField::FalseRepresentation),
                texts.false_representation,
            ),
        };
        let main = settings.main;

        Self {
            name,
            reference,
            declaring_class,
            kind,
            declared_type,
            element_type,
            order: 0,
            id,
            main,
            preferred,
            already_grouped: false,
            element_store,
            settings,
            nested,
            store,
            texts,
            derived_name,
            true_default,
            false_default,
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the attribute name (`address.street` for flattened
    /// attributes).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the reference of the owning entity model.
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the dotted path of the attribute relative to the root entity:
    /// the owning reference without its root segment, followed by the name.
    ///
    /// `name` in the model `Order.customer` has the path `customer.name`.
    #[must_use]
    pub fn path(&self) -> String {
        match self.reference.split_once('.') {
            Some((_, rest)) => format!("{rest}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Returns `<reference>.<name>`, the prefix of the attribute's
    /// translation keys.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.reference, self.name)
    }

    /// Returns the class declaring the underlying property.
    #[inline]
    #[must_use]
    pub const fn declaring_class(&self) -> &ClassRef {
        &self.declaring_class
    }

    // =========================================================================
    // Classification and typing
    // =========================================================================

    /// Returns the relationship kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> RelationshipKind {
        self.kind
    }

    /// Returns the declared type.
    #[inline]
    #[must_use]
    pub const fn declared_type(&self) -> &ValueType {
        &self.declared_type
    }

    /// Returns the element type of collection kinds.
    #[inline]
    #[must_use]
    pub const fn element_type(&self) -> Option<&ValueType> {
        self.element_type.as_ref()
    }

    /// Returns the backing store of an element collection.
    #[inline]
    #[must_use]
    pub const fn element_store(&self) -> Option<&ElementStore> {
        self.element_store.as_ref()
    }

    /// Returns the nested model of a relationship, if one was resolved.
    #[inline]
    #[must_use]
    pub const fn nested_model(&self) -> Option<&NestedModel> {
        self.nested.as_ref()
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Returns the position within the owning entity (0-based, contiguous).
    #[inline]
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns `true` for the identifier attribute.
    #[inline]
    #[must_use]
    pub const fn is_id(&self) -> bool {
        self.id
    }

    /// Returns `true` for the entity's main attribute.
    #[inline]
    #[must_use]
    pub const fn is_main(&self) -> bool {
        self.main
    }

    /// Returns introspection's "preferred" flag.
    #[inline]
    #[must_use]
    pub const fn is_preferred(&self) -> bool {
        self.preferred
    }

    /// Returns `true` if another attribute already renders this one through
    /// a group-together relation.
    #[inline]
    #[must_use]
    pub const fn is_already_grouped(&self) -> bool {
        self.already_grouped
    }

    /// Returns the resolved settings.
    #[inline]
    #[must_use]
    pub const fn settings(&self) -> &AttributeSettings {
        &self.settings
    }

    /// Returns `true` if the attribute is shown in forms.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.settings.visible
    }

    /// Returns `true` if forms may edit the value.
    #[inline]
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.settings.editable == EditablePolicy::Editable
    }

    /// Returns the search policy.
    #[inline]
    #[must_use]
    pub const fn search(&self) -> SearchPolicy {
        self.settings.search
    }

    /// Returns `true` if the attribute takes part in search panels.
    #[inline]
    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        self.settings.search.is_searchable()
    }

    /// Returns `true` for a text-typed scalar.
    #[must_use]
    pub const fn is_text_scalar(&self) -> bool {
        matches!(self.kind, RelationshipKind::Scalar) && self.declared_type.is_text()
    }

    // =========================================================================
    // Locale-derived texts
    // =========================================================================

    /// Returns the label for `locale`.
    ///
    /// Resolution order: translation entry `<reference>.<name>.displayName`,
    /// declared value, then the name split into words.
    pub fn display_name(&self, locale: &Locale) -> Arc<str> {
        self.texts
            .display_name
            .resolve(self.store.as_ref(), locale, || self.derived_name.clone())
    }

    /// Returns the description for `locale`, falling back to the display
    /// name.
    pub fn description(&self, locale: &Locale) -> Arc<str> {
        self.texts
            .description
            .resolve(self.store.as_ref(), locale, || self.display_name(locale).to_string())
    }

    /// Returns the input prompt for `locale`, falling back to the display
    /// name.
    pub fn prompt(&self, locale: &Locale) -> Arc<str> {
        self.texts
            .prompt
            .resolve(self.store.as_ref(), locale, || self.display_name(locale).to_string())
    }

    /// Returns the rendering of `true` for `locale`.
    pub fn true_representation(&self, locale: &Locale) -> Arc<str> {
        self.texts
            .true_representation
            .resolve(self.store.as_ref(), locale, || self.true_default.clone())
    }

    /// Returns the rendering of `false` for `locale`.
    pub fn false_representation(&self, locale: &Locale) -> Arc<str> {
        self.texts
            .false_representation
            .resolve(self.store.as_ref(), locale, || self.false_default.clone())
    }

    /// Renders a boolean value for `locale`.
    pub fn format_boolean(&self, value: bool, locale: &Locale) -> Arc<str> {
        if value {
            self.true_representation(locale)
        } else {
            self.false_representation(locale)
        }
    }

    // =========================================================================
    // Finalization (entity builder only)
    // =========================================================================

    pub(crate) fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    pub(crate) fn set_id(&mut self, id: bool) {
        self.id = id;
    }

    pub(crate) fn set_main(&mut self, main: bool) {
        self.main = main;
    }

    pub(crate) fn mark_already_grouped(&mut self) {
        self.already_grouped = true;
    }

    pub(crate) fn set_group_together_with(&mut self, names: Vec<String>) {
        self.settings.group_together_with = names;
    }
}

impl fmt::Debug for AttributeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeModel")
            .field("name", &self.name)
            .field("reference", &self.reference)
            .field("kind", &self.kind)
            .field("declared_type", &self.declared_type)
            .field("order", &self.order)
            .field("main", &self.main)
            .field("nested", &self.nested)
            .finish_non_exhaustive()
    }
}
