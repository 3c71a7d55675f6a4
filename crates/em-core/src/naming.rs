//! Conversions from identifiers to human-friendly labels.
//!
//! Display names of attributes and entities default to their identifiers
//! split into words (`orderDate` → `Order Date`); plural entity names use a
//! fixed English suffix rule.

use convert_case::{Case, Casing};

/// Splits an identifier into words and joins them with spaces.
///
/// Word boundaries are lower-to-upper case transitions, the end of an
/// acronym (`HTTPServer` → `Http Server`), and the separators `.`, `_`, `-`
/// and whitespace. Every word is capitalized when `capitalize_words` is set;
/// otherwise only the first word is.
///
/// # Examples
///
/// ```
/// use em_core::naming::humanize;
///
/// assert_eq!(humanize("orderDate", true), "Order Date");
/// assert_eq!(humanize("orderDate", false), "Order date");
/// assert_eq!(humanize("address.zipCode", true), "Address Zip Code");
/// ```
#[must_use]
pub fn humanize(identifier: &str, capitalize_words: bool) -> String {
    let case = if capitalize_words { Case::Title } else { Case::Sentence };
    identifier.replace('.', " ").to_case(case)
}

/// Returns the plural form of a display name.
///
/// Consonant + `y` becomes `ies`, names ending in `s`, `x`, `z`, `ch` or `sh`
/// get `es`, everything else gets `s`.
///
/// # Examples
///
/// ```
/// use em_core::naming::pluralize;
///
/// assert_eq!(pluralize("Category"), "Categories");
/// assert_eq!(pluralize("Day"), "Days");
/// assert_eq!(pluralize("Box"), "Boxes");
/// assert_eq!(pluralize("Order Line"), "Order Lines");
/// ```
#[must_use]
pub fn pluralize(name: &str) -> String {
    let lower = name.to_lowercase();

    if let Some(stem) = name.strip_suffix('y').or_else(|| name.strip_suffix('Y')) {
        let before = stem.chars().last();
        if before.is_some_and(|c| c.is_alphabetic() && !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{name}es");
    }

    format!("{name}s")
}

/// Returns the last segment of a qualified name (`shop::Order` → `Order`).
///
/// Both `::` and `.` are treated as separators.
///
/// # Examples
///
/// ```
/// use em_core::naming::simple_name;
///
/// assert_eq!(simple_name("shop::model::Order"), "Order");
/// assert_eq!(simple_name("com.example.Order"), "Order");
/// assert_eq!(simple_name("Order"), "Order");
/// ```
#[must_use]
pub fn simple_name(qualified: &str) -> &str {
    qualified
        .rsplit(|c: char| c == ':' || c == '.')
        .next()
        .unwrap_or(qualified)
}

/// Splits a comma separated list, trimming entries and dropping empty ones.
///
/// # Examples
///
/// ```
/// use em_core::naming::split_list;
///
/// assert_eq!(split_list(" name, code ,,qty"), vec!["name", "code", "qty"]);
/// ```
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

const fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'A' | 'E' | 'I' | 'O' | 'U')
}
