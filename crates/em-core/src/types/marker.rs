//! Structural markers attached to properties by declarative configuration.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A structural hint about a property, as read from declarative
/// configuration.
///
/// Markers feed relationship classification; they never carry presentation
/// settings.
///
/// # Examples
///
/// ```
/// use em_core::StructuralMarker;
///
/// let marker: StructuralMarker = serde_json::from_str(r#""to_many""#)?;
/// assert_eq!(marker, StructuralMarker::ToMany);
///
/// let marker: StructuralMarker =
///     serde_json::from_str(r#"{"element_collection": {"table": "order_tags"}}"#)?;
/// assert!(marker.is_element_collection());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralMarker {
    /// The entity identifier.
    Id,
    /// Optimistic-locking version column; never exposed.
    Version,
    /// Not persistent; never exposed.
    Transient,
    /// A value object flattened into the owner.
    Embedded,
    /// A reference to a single entity.
    ToOne,
    /// A collection of entities.
    ToMany,
    /// A collection of values, optionally stored in a separate table.
    ElementCollection {
        /// Backing table.
        #[serde(default)]
        table: Option<String>,
        /// Value column in the backing table.
        #[serde(default)]
        column: Option<String>,
    },
    /// Large binary or character data.
    LargeObject,
    /// The value is mandatory.
    NotNull,
}

impl StructuralMarker {
    /// Returns `true` for markers that hide the property entirely.
    #[inline]
    #[must_use]
    pub const fn hides_property(&self) -> bool {
        matches!(self, Self::Version | Self::Transient)
    }

    /// Returns `true` for [`StructuralMarker::ElementCollection`].
    #[inline]
    #[must_use]
    pub const fn is_element_collection(&self) -> bool {
        matches!(self, Self::ElementCollection { .. })
    }
}

/// The markers of one property. Almost always zero to two entries.
pub type Markers = SmallVec<[StructuralMarker; 4]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_markers() {
        assert!(StructuralMarker::Version.hides_property());
        assert!(StructuralMarker::Transient.hides_property());
        assert!(!StructuralMarker::Id.hides_property());
    }

    #[test]
    fn test_element_collection_defaults() {
        let marker: StructuralMarker =
            serde_json::from_str(r#"{"element_collection": {}}"#).unwrap();
        assert_eq!(
            marker,
            StructuralMarker::ElementCollection {
                table: None,
                column: None
            }
        );
    }

    #[test]
    fn test_markers_deserialize_as_list() {
        let markers: Markers = serde_json::from_str(r#"["id", "not_null"]"#).unwrap();
        assert_eq!(markers.len(), 2);
        assert!(!markers.spilled());
    }
}
