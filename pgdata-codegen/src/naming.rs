//! Identifiers used in generated modules.

use pgdata_core::{QualifiedName, to_file_case};
use pgdata_introspect::{Column, Table};
use pgdata_manifest::is_rust_keyword;

/// Module and file stem for a table (e.g., "SemesterTerm" -> "semester_term").
pub fn module_name(table: &Table) -> String {
    to_file_case(&table.struct_name)
}

/// Escape a generated identifier that collides with a Rust keyword.
pub fn rust_ident(name: &str) -> String {
    match name {
        "self" | "Self" | "super" | "crate" => format!("{}_", name),
        _ if is_rust_keyword(name) => format!("r#{}", name),
        _ => name.to_string(),
    }
}

/// Name of the column list constant (e.g., `CUSTOMER_COLUMNS`).
pub fn columns_const(table: &Table) -> String {
    format!("{}_COLUMNS", module_name(table).to_uppercase())
}

/// Accessor suffix for a unique key (e.g., `first_name_and_last_name`).
pub fn key_suffix(columns: &[&Column]) -> String {
    columns
        .iter()
        .map(|c| snake_segment(&c.column_name))
        .collect::<Vec<_>>()
        .join("_and_")
}

/// Quote a catalog identifier for use in SQL (`createdAt` -> `"createdAt"`).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote both parts of a schema-qualified name.
pub fn quote_qualified(name: &QualifiedName) -> String {
    format!("{}.{}", quote_ident(name.schema()), quote_ident(name.table()))
}

/// A Rust string literal holding `sql`, raw when it contains quotes.
pub fn sql_literal(sql: &str) -> String {
    if !sql.contains('"') {
        return format!("{:?}", sql);
    }
    let mut hashes = String::from("#");
    while sql.contains(&format!("\"{}", hashes)) {
        hashes.push('#');
    }
    format!("r{hashes}\"{sql}\"{hashes}")
}

/// Parameter type for passing a key value by argument.
pub fn param_type(value_type: &str) -> &str {
    match value_type {
        "String" => "&str",
        "Vec<u8>" => "&[u8]",
        other => other,
    }
}

fn snake_segment(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
