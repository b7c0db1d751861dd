use std::path::{Path, PathBuf};

use pgdata_core::{FileRules, GeneratedFile};

use super::{ATTRIBUTE_MODULE, GENERATED_HEADER};
use crate::builder::CodeBuilder;

/// The `mod.rs` tying the attribute module and the table modules together.
pub struct ModRs {
    modules: Vec<String>,
}

impl ModRs {
    /// `modules` are the table module stems, in declaration order.
    pub fn new(modules: Vec<String>) -> Self {
        Self { modules }
    }
}

impl GeneratedFile for ModRs {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("mod.rs")
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite().with_header(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let all = || std::iter::once(ATTRIBUTE_MODULE).chain(self.modules.iter().map(String::as_str));
        CodeBuilder::rust()
            .each(all(), |b, m| b.line(&format!("pub mod {};", m)))
            .blank()
            .each(all(), |b, m| b.line(&format!("pub use {}::*;", m)))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let content = ModRs::new(vec!["customer".into(), "semester".into()]).render();
        assert_eq!(
            content,
            "pub mod attribute;\npub mod customer;\npub mod semester;\n\npub use attribute::*;\npub use customer::*;\npub use semester::*;\n"
        );
    }
}
