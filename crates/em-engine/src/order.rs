//! Attribute ordering and the default listing order.

use em_core::keys::{EntityField, entity_key};
use em_core::naming::split_list;
use em_core::{ConfigError, FxHashMap, FxHashSet};

use crate::attribute::AttributeModel;
use crate::entity::SortKey;

/// Computes the final position of each attribute.
///
/// `names` are the attribute names in introspection order. Names in
/// `explicit` get positions `0..k` in list order; the remaining attributes
/// follow in introspection order. Returns the position of each entry of
/// `names`.
pub(crate) fn positions(
    reference: &str,
    explicit: Option<&[String]>,
    names: &[&str],
) -> Result<Vec<usize>, ConfigError> {
    let index: FxHashMap<&str, usize> = names.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let mut positions = vec![usize::MAX; names.len()];
    let mut next = 0;

    for name in explicit.unwrap_or_default() {
        let Some(&i) = index.get(name.as_str()) else {
            return Err(ConfigError::unresolvable(reference, name, "attribute order"));
        };
        if positions[i] != usize::MAX {
            return Err(ConfigError::illegal_structure(
                reference,
                format!("attribute order lists '{name}' twice"),
            ));
        }
        positions[i] = next;
        next += 1;
    }

    for position in &mut positions {
        if *position == usize::MAX {
            *position = next;
            next += 1;
        }
    }

    Ok(positions)
}

/// Assigns orders and sorts `attributes` by them.
pub(crate) fn apply_order(
    reference: &str,
    explicit: Option<&[String]>,
    attributes: &mut Vec<AttributeModel>,
) -> Result<(), ConfigError> {
    let names: Vec<&str> = attributes.iter().map(AttributeModel::name).collect();
    let positions = positions(reference, explicit, &names)?;

    for (attribute, position) in attributes.iter_mut().zip(positions) {
        attribute.set_order(position);
    }
    attributes.sort_by_key(AttributeModel::order);
    Ok(())
}

/// Parses a listing order such as `"date DESC, number"`.
///
/// Every entry is an attribute name optionally followed by `ASC` or `DESC`
/// (case-insensitive); ascending is the default.
///
/// # Errors
///
/// Returns [`ConfigError::UnresolvableReference`] for names that are not
/// attributes, and [`ConfigError::InvalidValue`] for an unknown direction.
pub(crate) fn parse_sort_order(
    reference: &str,
    spec: &str,
    attributes: &FxHashSet<&str>,
) -> Result<Vec<SortKey>, ConfigError> {
    let key = entity_key(reference, EntityField::SortOrder);

    split_list(spec)
        .into_iter()
        .map(|entry| {
            let mut parts = entry.split_whitespace();
            let name = parts.next().unwrap_or_default();
            let ascending = match parts.next() {
                None => true,
                Some(direction) if direction.eq_ignore_ascii_case("asc") => true,
                Some(direction) if direction.eq_ignore_ascii_case("desc") => false,
                Some(_) => return Err(ConfigError::invalid_value(&key, &entry, "name [ASC|DESC]")),
            };
            if parts.next().is_some() {
                return Err(ConfigError::invalid_value(&key, &entry, "name [ASC|DESC]"));
            }
            if !attributes.contains(name) {
                return Err(ConfigError::unresolvable(reference, name, "sort order"));
            }
            Ok(SortKey {
                attribute: name.to_owned(),
                ascending,
            })
        })
        .collect()
}
