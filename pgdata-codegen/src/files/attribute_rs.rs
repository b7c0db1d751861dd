use std::path::{Path, PathBuf};

use pgdata_core::{FileRules, GeneratedFile, MappedType, TypeMap};

use crate::builder::CodeBuilder;

/// Stem of the nullable wrapper module.
pub const ATTRIBUTE_MODULE: &str = "attribute";

/// The `attribute.rs` scaffolding: the nullable wrapper and one alias per
/// wrapper type name. Written once and then owned by the user.
pub struct AttributeRs {
    aliases: Vec<MappedType>,
}

impl AttributeRs {
    pub fn new(types: &TypeMap) -> Self {
        Self {
            aliases: types.wrappers().into_iter().cloned().collect(),
        }
    }

    /// Wrapper names this file declares an alias for.
    pub fn wrapper_names(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(|t| t.wrapper.as_str())
    }
}

const ATTRIBUTE_BODY: &str = r#"/// Whether an attribute was never set, set to SQL NULL, or holds a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Undefined,
    Null,
    Present,
}

/// A column value that tracks its presence.
///
/// Inserts and updates only write attributes that are not `Undefined`.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute<T> {
    Undefined,
    Null,
    Present(T),
}

impl<T> Default for Attribute<T> {
    fn default() -> Self {
        Attribute::Undefined
    }
}

impl<T> Attribute<T> {
    pub fn present(value: T) -> Self {
        Attribute::Present(value)
    }

    pub fn status(&self) -> Status {
        match self {
            Attribute::Undefined => Status::Undefined,
            Attribute::Null => Status::Null,
            Attribute::Present(_) => Status::Present,
        }
    }

    /// True for `Null` and `Present`: the attribute takes part in writes.
    pub fn is_present(&self) -> bool {
        !matches!(self, Attribute::Undefined)
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Attribute::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn set(&mut self, value: T) {
        *self = Attribute::Present(value);
    }

    pub fn set_null(&mut self) {
        *self = Attribute::Null;
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Attribute::Present(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Attribute<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Attribute::Present(value),
            None => Attribute::Null,
        }
    }
}
"#;

impl GeneratedFile for AttributeRs {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}.rs", ATTRIBUTE_MODULE))
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        CodeBuilder::rust()
            .line(ATTRIBUTE_BODY.trim_end())
            .blank()
            .each(&self.aliases, |b, t| {
                b.line(&format!("pub type {} = Attribute<{}>;", t.wrapper, t.value))
            })
            .build()
    }
}
