//! Class references and structural property descriptors.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::naming::simple_name;
use crate::types::DateKind;

/// A reference to a domain class by its (possibly qualified) name.
///
/// Cloning is cheap: the name is shared.
///
/// # Examples
///
/// ```
/// use em_core::ClassRef;
///
/// let class = ClassRef::new("shop::Order");
/// assert_eq!(class.name(), "shop::Order");
/// assert_eq!(class.simple_name(), "Order");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassRef(Arc<str>);

impl ClassRef {
    /// Creates a class reference.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Returns the full name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns the last segment of the name.
    #[inline]
    #[must_use]
    pub fn simple_name(&self) -> &str {
        simple_name(&self.0)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The declared type of a property as reported by introspection.
///
/// Serialized in snake case: `"text"`, `"timestamp"`, `{"class": "Customer"}`.
///
/// # Examples
///
/// ```
/// use em_core::{ClassRef, ValueType};
///
/// assert!(ValueType::Text.is_simple());
/// assert!(!ValueType::Class(ClassRef::new("Customer")).is_simple());
/// assert!(ValueType::Decimal.is_numeric());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ValueType {
    /// Character data.
    Text,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Fixed-point decimal.
    Decimal,
    /// Floating point number.
    Float,
    /// Boolean flag.
    Boolean,
    /// Calendar date without time.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Raw bytes.
    Bytes,
    /// An enumeration type.
    Enumeration(ClassRef),
    /// Any other class: an entity, an embeddable value or an opaque type.
    Class(ClassRef),
    /// A collection; the element type is reported separately.
    Collection,
}

impl ValueType {
    /// Returns `true` for value types that never form a relationship.
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        !matches!(self, Self::Class(_) | Self::Collection)
    }

    /// Returns `true` for character data.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Returns `true` for integer, decimal and floating point types.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Long | Self::Decimal | Self::Float
        )
    }

    /// Returns `true` for types with a fractional part.
    #[inline]
    #[must_use]
    pub const fn is_fractional(&self) -> bool {
        matches!(self, Self::Decimal | Self::Float)
    }

    /// Returns `true` for collections.
    #[inline]
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection)
    }

    /// Returns the date kind implied by this type.
    #[must_use]
    pub const fn date_kind(&self) -> DateKind {
        match self {
            Self::Date => DateKind::DateOnly,
            Self::Time => DateKind::Time,
            Self::Timestamp => DateKind::Timestamp,
            _ => DateKind::None,
        }
    }

    /// Returns the class of a class-typed value.
    #[must_use]
    pub const fn class(&self) -> Option<&ClassRef> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Integer => f.write_str("integer"),
            Self::Long => f.write_str("long"),
            Self::Decimal => f.write_str("decimal"),
            Self::Float => f.write_str("float"),
            Self::Boolean => f.write_str("boolean"),
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Bytes => f.write_str("bytes"),
            Self::Enumeration(class) | Self::Class(class) => f.write_str(class.simple_name()),
            Self::Collection => f.write_str("collection"),
        }
    }
}

/// One property of a class, as reported by a
/// [`StructuralIntrospector`](crate::StructuralIntrospector).
///
/// # Examples
///
/// ```
/// use em_core::{ClassRef, PropertyDescriptor, ValueType};
///
/// let lines = PropertyDescriptor::new("lines", ValueType::Collection)
///     .with_element(ValueType::Class(ClassRef::new("OrderLine")));
/// assert!(lines.value_type.is_collection());
/// assert!(lines.settable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,

    /// Declared type.
    #[serde(rename = "type")]
    pub value_type: ValueType,

    /// Element type of a collection-typed property.
    #[serde(default)]
    pub element_type: Option<ValueType>,

    /// Whether the property can be written.
    #[serde(default = "default_settable")]
    pub settable: bool,

    /// Introspection's "preferred" flag.
    #[serde(default)]
    pub preferred: bool,
}

const fn default_settable() -> bool {
    true
}

impl PropertyDescriptor {
    /// Creates a settable, non-preferred descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            element_type: None,
            settable: true,
            preferred: false,
        }
    }

    /// Sets the collection element type.
    #[must_use]
    pub fn with_element(mut self, element_type: ValueType) -> Self {
        self.element_type = Some(element_type);
        self
    }

    /// Marks the property as not settable.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.settable = false;
        self
    }

    /// Sets the "preferred" flag.
    #[must_use]
    pub const fn preferred(mut self) -> Self {
        self.preferred = true;
        self
    }
}
