//! Type mapping between catalog type names and generated Rust types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A generated value type paired with its nullable wrapper type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappedType {
    /// Raw value type (e.g., `i32`)
    pub value: String,
    /// Nullable wrapper type name (e.g., `Int4`)
    pub wrapper: String,
}

impl MappedType {
    pub fn new(value: impl Into<String>, wrapper: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            wrapper: wrapper.into(),
        }
    }
}

/// Result of a lookup: either an explicit entry or the fallback pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMapping<'a> {
    Known(&'a MappedType),
    Fallback(&'a MappedType),
}

impl<'a> TypeMapping<'a> {
    pub fn mapped(&self) -> &'a MappedType {
        match self {
            TypeMapping::Known(t) | TypeMapping::Fallback(t) => t,
        }
    }

    pub fn value(&self) -> &'a str {
        &self.mapped().value
    }

    pub fn wrapper(&self) -> &'a str {
        &self.mapped().wrapper
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TypeMapping::Fallback(_))
    }
}

/// Immutable lookup table from catalog type names to generated types.
///
/// Unmapped catalog types resolve to the fallback pairing instead of
/// failing; callers decide whether to warn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    entries: IndexMap<String, MappedType>,
    fallback: MappedType,
}

impl TypeMap {
    /// An empty map with the given fallback.
    pub fn empty(fallback: MappedType) -> Self {
        Self {
            entries: IndexMap::new(),
            fallback,
        }
    }

    /// The built-in PostgreSQL mapping.
    pub fn postgres() -> Self {
        let table: &[(&str, &str, &str)] = &[
            ("smallint", "i16", "Int2"),
            ("integer", "i32", "Int4"),
            ("bigint", "i64", "Int8"),
            ("boolean", "bool", "Bool"),
            ("real", "f32", "Float4"),
            ("double precision", "f64", "Float8"),
            ("character varying", "String", "Varchar"),
            ("character", "String", "Bpchar"),
            ("text", "String", "Text"),
            ("date", "chrono::NaiveDate", "Date"),
            ("timestamp without time zone", "chrono::NaiveDateTime", "Timestamp"),
            ("timestamp with time zone", "chrono::DateTime<chrono::Utc>", "Timestamptz"),
            ("bytea", "Vec<u8>", "Bytea"),
            ("inet", "ipnetwork::IpNetwork", "Inet"),
            ("cidr", "ipnetwork::IpNetwork", "Cidr"),
            ("uuid", "uuid::Uuid", "Uuid"),
            ("json", "serde_json::Value", "Json"),
            ("jsonb", "serde_json::Value", "Jsonb"),
        ];

        table.iter().fold(
            Self::empty(MappedType::new("String", "Text")),
            |map, (catalog, value, wrapper)| map.with(*catalog, MappedType::new(*value, *wrapper)),
        )
    }

    /// Add or replace an entry.
    pub fn with(mut self, catalog_type: impl Into<String>, mapped: MappedType) -> Self {
        self.entries.insert(catalog_type.into(), mapped);
        self
    }

    /// Extend with overrides, replacing existing entries of the same name.
    pub fn with_overrides<'a>(
        self,
        overrides: impl IntoIterator<Item = (&'a String, &'a MappedType)>,
    ) -> Self {
        overrides
            .into_iter()
            .fold(self, |map, (name, mapped)| map.with(name.clone(), mapped.clone()))
    }

    pub fn get(&self, catalog_type: &str) -> Option<&MappedType> {
        self.entries.get(catalog_type)
    }

    /// Map a catalog type name, falling back for unknown types.
    pub fn map_type(&self, catalog_type: &str) -> TypeMapping<'_> {
        match self.entries.get(catalog_type) {
            Some(mapped) => TypeMapping::Known(mapped),
            None => TypeMapping::Fallback(&self.fallback),
        }
    }

    pub fn fallback(&self) -> &MappedType {
        &self.fallback
    }

    /// An entry that already uses `mapped.wrapper` for a different value
    /// type, as `(catalog type, mapping)`. The fallback is named
    /// `"unmapped types"`.
    pub fn wrapper_conflict(&self, mapped: &MappedType) -> Option<(&str, &MappedType)> {
        self.entries
            .iter()
            .map(|(name, m)| (name.as_str(), m))
            .chain(std::iter::once(("unmapped types", &self.fallback)))
            .find(|(_, m)| m.wrapper == mapped.wrapper && m.value != mapped.value)
    }

    /// Every distinct wrapper type, in table order, fallback included.
    pub fn wrappers(&self) -> Vec<&MappedType> {
        let mut seen: Vec<&MappedType> = Vec::new();
        for mapped in self.entries.values().chain(std::iter::once(&self.fallback)) {
            if !seen.iter().any(|m| m.wrapper == mapped.wrapper) {
                seen.push(mapped);
            }
        }
        seen
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::postgres()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_integers() {
        let map = TypeMap::postgres();
        assert_eq!(map.map_type("integer").value(), "i32");
        assert_eq!(map.map_type("integer").wrapper(), "Int4");
        assert_eq!(map.map_type("bigint").value(), "i64");
        assert_eq!(map.map_type("smallint").value(), "i16");
    }

    #[test]
    fn test_postgres_strings_and_times() {
        let map = TypeMap::postgres();
        assert_eq!(map.map_type("character varying").value(), "String");
        assert_eq!(map.map_type("text").value(), "String");
        assert_eq!(map.map_type("date").wrapper(), "Date");
        assert_eq!(
            map.map_type("timestamp with time zone").value(),
            "chrono::DateTime<chrono::Utc>"
        );
        assert_eq!(map.map_type("bytea").value(), "Vec<u8>");
        assert_eq!(map.map_type("inet").value(), "ipnetwork::IpNetwork");
        assert_eq!(map.map_type("cidr").wrapper(), "Cidr");
    }

    #[test]
    fn test_unmapped_type_falls_back() {
        let map = TypeMap::postgres();
        let mapping = map.map_type("tsvector");
        assert!(mapping.is_fallback());
        assert_eq!(mapping.value(), "String");
        assert_eq!(mapping.wrapper(), "Text");
        assert!(!map.map_type("integer").is_fallback());
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let overrides: IndexMap<String, MappedType> = [
            ("numeric".to_string(), MappedType::new("rust_decimal::Decimal", "Numeric")),
            ("integer".to_string(), MappedType::new("i64", "Int8")),
        ]
        .into_iter()
        .collect();

        let map = TypeMap::postgres().with_overrides(&overrides);
        assert_eq!(map.map_type("numeric").value(), "rust_decimal::Decimal");
        assert!(!map.map_type("numeric").is_fallback());
        assert_eq!(map.map_type("integer").value(), "i64");
    }

    #[test]
    fn test_wrapper_conflict() {
        let map = TypeMap::postgres();

        let reused = MappedType::new("rust_decimal::Decimal", "Text");
        let (name, existing) = map.wrapper_conflict(&reused).unwrap();
        assert_eq!(name, "text");
        assert_eq!(existing.value, "String");

        assert!(map.wrapper_conflict(&MappedType::new("String", "Text")).is_none());
        assert!(map.wrapper_conflict(&MappedType::new("i64", "Int8")).is_none());
        assert!(map
            .wrapper_conflict(&MappedType::new("rust_decimal::Decimal", "Numeric"))
            .is_none());
    }

    #[test]
    fn test_wrappers_are_distinct() {
        let map = TypeMap::postgres();
        let wrappers = map.wrappers();
        let text_count = wrappers.iter().filter(|m| m.wrapper == "Text").count();
        assert_eq!(text_count, 1);
        assert!(wrappers.iter().any(|m| m.wrapper == "Int4"));
    }
}
