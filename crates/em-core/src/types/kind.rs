//! Classification and presentation enums shared by attribute models and
//! their configuration.
//!
//! Every enum parses from override strings with [`FromStr`], matching
//! keywords case-insensitively and ignoring `_` and `-`
//! (`on_demand`, `OnDemand` and `ONDEMAND` are the same keyword).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An override string that does not name a variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not one of: {expected}")]
pub struct KeywordError {
    /// The rejected value.
    pub value: String,
    /// The accepted keywords.
    pub expected: &'static str,
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! keyword_enum {
    ($ty:ident, $expected:literal, { $($keyword:literal => $variant:ident),+ $(,)? }) => {
        impl $ty {
            /// Keywords accepted by [`FromStr`].
            pub const KEYWORDS: &'static str = $expected;
        }

        impl FromStr for $ty {
            type Err = KeywordError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match normalize(value).as_str() {
                    $($keyword => Ok(Self::$variant),)+
                    _ => Err(KeywordError {
                        value: value.to_owned(),
                        expected: $expected,
                    }),
                }
            }
        }
    };
}

/// How an attribute relates to other domain classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// A plain value.
    Scalar,
    /// A value object flattened into its owner.
    EmbeddedValue,
    /// A reference to a single entity.
    ToOneRelationship,
    /// A collection of entities.
    ToManyRelationship,
    /// A collection of values.
    ElementCollection,
    /// A large binary or character object.
    LargeObject,
}

impl RelationshipKind {
    /// Returns `true` for references to other entities.
    #[inline]
    #[must_use]
    pub const fn is_relationship(self) -> bool {
        matches!(self, Self::ToOneRelationship | Self::ToManyRelationship)
    }

    /// Returns `true` for kinds holding several values.
    #[inline]
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::ToManyRelationship | Self::ElementCollection)
    }

    /// Returns `true` for kinds that may carry a nested entity model.
    #[inline]
    #[must_use]
    pub const fn has_nested_model(self) -> bool {
        matches!(
            self,
            Self::ToOneRelationship | Self::ToManyRelationship | Self::EmbeddedValue
        )
    }

    /// Short label used in summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::EmbeddedValue => "embedded",
            Self::ToOneRelationship => "to-one",
            Self::ToManyRelationship => "to-many",
            Self::ElementCollection => "elements",
            Self::LargeObject => "lob",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an attribute can be edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditablePolicy {
    /// Editable in forms.
    #[default]
    Editable,
    /// Shown but never editable.
    ReadOnly,
}

/// When an attribute shows up in search panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPolicy {
    /// Never searchable.
    #[default]
    Never,
    /// Always part of the search panel.
    Always,
    /// Available in the extended search panel only.
    OnDemand,
}

impl SearchPolicy {
    /// Returns `true` unless the policy is [`SearchPolicy::Never`].
    #[inline]
    #[must_use]
    pub const fn is_searchable(self) -> bool {
        !matches!(self, Self::Never)
    }
}

keyword_enum!(SearchPolicy, "never, always, on_demand, true, false", {
    "never" => Never,
    "false" => Never,
    "none" => Never,
    "always" => Always,
    "true" => Always,
    "ondemand" => OnDemand,
    "advanced" => OnDemand,
});

/// The temporal kind of an attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateKind {
    /// Not a temporal attribute.
    #[default]
    None,
    /// Calendar date.
    DateOnly,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
}

impl DateKind {
    /// Returns `true` for any temporal kind.
    #[inline]
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        !matches!(self, Self::None)
    }
}

keyword_enum!(DateKind, "none, date, time, timestamp", {
    "none" => None,
    "date" => DateOnly,
    "dateonly" => DateOnly,
    "time" => Time,
    "timestamp" => Timestamp,
});

/// How a value is picked from a list of candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectMode {
    /// Drop-down box.
    #[default]
    Combo,
    /// Pop-up search dialog.
    Lookup,
    /// Single-select list.
    List,
    /// Token field (multiple values).
    Token,
    /// Multi-select list.
    MultiSelect,
}

impl SelectMode {
    /// Returns `true` for modes that select several values.
    #[inline]
    #[must_use]
    pub const fn is_multi_value(self) -> bool {
        matches!(self, Self::Token | Self::MultiSelect)
    }
}

keyword_enum!(SelectMode, "combo, lookup, list, token, multi_select", {
    "combo" => Combo,
    "lookup" => Lookup,
    "list" => List,
    "token" => Token,
    "multiselect" => MultiSelect,
});

/// Which screens a cascade rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    /// Search panels only.
    Search,
    /// Edit forms only.
    Edit,
    /// Both search panels and edit forms.
    Both,
}

keyword_enum!(CascadeMode, "search, edit, both", {
    "search" => Search,
    "edit" => Edit,
    "both" => Both,
});
