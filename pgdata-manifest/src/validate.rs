//! Validation context and utilities for manifest parsing.

use std::sync::Arc;

use miette::SourceSpan;

use crate::{Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// Holds the source content, filename, and current path through the
/// manifest (e.g. `tables.customer`) so nested validation can report
/// where a problem lives.
#[derive(Debug, Clone)]
pub(crate) struct ParseContext<'a> {
    source: Arc<SourceContext>,
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path,
        }
    }

    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Context description for error messages, e.g. "field name in 'tables.customer'".
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// First quoted occurrence of a value in the source.
    pub fn find_span(&self, value: &str) -> Option<SourceSpan> {
        find_value_spans(self.source.src(), value).into_iter().next()
    }

    /// Every quoted occurrence of a value in the source.
    pub fn find_spans(&self, value: &str) -> Vec<SourceSpan> {
        find_value_spans(self.source.src(), value)
    }

    /// Span of a `key = ...` assignment's key.
    pub fn find_key_span(&self, key: &str) -> Option<SourceSpan> {
        let src = self.source.src();
        src.match_indices(key)
            .find(|(pos, _)| {
                let at_line_start = src[..*pos]
                    .chars()
                    .next_back()
                    .is_none_or(char::is_whitespace);
                let rest = src[pos + key.len()..].trim_start_matches([' ', '\t']);
                at_line_start && rest.starts_with('=')
            })
            .map(|(pos, _)| SourceSpan::from((pos, key.len())))
    }

    /// Validate that a name is usable as a Rust identifier.
    pub fn validate_name(&self, name: &str, kind: &str) -> Result<()> {
        if is_rust_keyword(name) {
            return Err(self.source.reserved_keyword_error(
                name,
                self.context_for(kind),
                self.find_span(name),
            ));
        }

        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                self.find_span(name),
            ));
        }

        Ok(())
    }
}

/// Rust reserved keywords that cannot be used as identifiers
/// Source: https://doc.rust-lang.org/reference/keywords.html
pub(crate) const RUST_KEYWORDS: &[&str] = &[
    // Strict keywords
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    // Reserved keywords
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield", "gen",
];

/// Whether `name` is reserved in Rust (strict or reserved keyword).
pub fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Find every span where `value` appears as a quoted TOML string.
///
/// The span covers the value only, not the quotes.
pub(crate) fn find_value_spans(src: &str, value: &str) -> Vec<SourceSpan> {
    let mut spans = Vec::new();
    for quote in ['"', '\''] {
        let pattern = format!("{quote}{value}{quote}");
        spans.extend(
            src.match_indices(&pattern)
                .map(|(pos, _)| SourceSpan::from((pos + 1, value.len()))),
        );
    }
    spans.sort_by_key(|s| s.offset());
    spans
}

/// Validate that a name is a valid Rust identifier.
/// Returns None if valid, Some(reason) if invalid
pub fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if is_rust_keyword(name) {
        return Some("name is a Rust reserved keyword");
    }

    if name == "_" {
        return Some("name cannot be a lone underscore");
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}
