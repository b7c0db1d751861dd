//! Identifier case conversion for generated code.
//!
//! Catalog identifiers are snake_case (`person_id`); generated code wants
//! public names (`PersonID`), private names (`personID`) and file names
//! (`widget_row`). Conversion is driven by an [`Acronyms`] set so that
//! segments such as `id` or `url` come out fully upper-cased.

use std::collections::BTreeSet;

use serde::Serialize;

/// Acronym tokens used when no `[naming]` section is configured.
pub const DEFAULT_ACRONYMS: &[&str] = &["id", "ip", "url"];

/// Set of lower-case segments rendered fully upper-cased.
///
/// Matching is per whole segment: `curl` does not match `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Acronyms(BTreeSet<String>);

impl Acronyms {
    /// Build an acronym set. Tokens are lower-cased on the way in.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tokens
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// An empty set; every segment is title-cased.
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Check whether a whole segment is an acronym.
    pub fn contains(&self, segment: &str) -> bool {
        self.0.contains(&segment.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for Acronyms {
    fn default() -> Self {
        Self::new(DEFAULT_ACRONYMS)
    }
}

/// Acronym-aware conversion from catalog identifiers to generated names.
#[derive(Debug, Clone, Default)]
pub struct NameMapper {
    acronyms: Acronyms,
}

impl NameMapper {
    pub fn new(acronyms: Acronyms) -> Self {
        Self { acronyms }
    }

    pub fn acronyms(&self) -> &Acronyms {
        &self.acronyms
    }

    /// Convert to public case (e.g., "person_id" -> "PersonID").
    pub fn public_case(&self, identifier: &str) -> String {
        identifier
            .split('_')
            .map(|segment| self.public_segment(segment))
            .collect()
    }

    /// Convert to private case (e.g., "person_id" -> "personID").
    ///
    /// The first segment is always lower-cased, so "id" stays "id" and
    /// "url_base" becomes "urlBase".
    pub fn private_case(&self, identifier: &str) -> String {
        let mut segments = identifier.split('_');
        let mut out = segments.next().map(str::to_lowercase).unwrap_or_default();
        for segment in segments {
            out.push_str(&self.public_segment(segment));
        }
        out
    }

    fn public_segment(&self, segment: &str) -> String {
        if self.acronyms.contains(segment) {
            segment.to_uppercase()
        } else {
            title_case(segment)
        }
    }
}

/// Capitalize the first letter and lower the rest.
fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Convert a type name to a file name (e.g., "WidgetRow" -> "widget_row").
pub fn to_file_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result
}
