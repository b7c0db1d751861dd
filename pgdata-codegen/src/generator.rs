use std::{collections::BTreeSet, path::Path};

use eyre::{Context, Result, bail};
use pgdata_core::{GeneratedFile, Overwrite, TypeMap, WriteResult};
use pgdata_introspect::Table;
use tracing::{debug, warn};

use crate::{
    files::{ATTRIBUTE_MODULE, AttributeRs, ModRs, TableRs},
    naming::module_name,
};

/// A generated file for preview
#[derive(Debug)]
pub struct PreviewFile {
    /// Relative path from output directory
    pub path: String,
    /// File content
    pub content: String,
    /// Whether an existing file at `path` is left untouched
    pub if_missing: bool,
}

/// Result of code generation
#[derive(Debug, Default)]
pub struct GenerateResult {
    /// Files written, relative to the output directory
    pub written: Vec<String>,
    /// Scaffolding files that already existed
    pub skipped: Vec<String>,
    /// Wrapper types used by tables but not declared in an existing attribute.rs
    pub missing_aliases: Vec<String>,
}

/// Renders resolved tables into an output module directory.
pub struct Generator<'a> {
    tables: &'a [Table],
    types: &'a TypeMap,
}

impl<'a> Generator<'a> {
    pub fn new(tables: &'a [Table], types: &'a TypeMap) -> Self {
        Self { tables, types }
    }

    /// Module stems in declaration order, rejecting collisions.
    fn modules(&self) -> Result<Vec<String>> {
        let mut modules: Vec<String> = Vec::with_capacity(self.tables.len());
        for table in self.tables {
            let module = module_name(table);
            if module == ATTRIBUTE_MODULE || module == "mod" {
                bail!(
                    "struct name '{}' of table '{}' maps to reserved module '{}'; set struct_name in pgdata.toml",
                    table.struct_name,
                    table.name,
                    module
                );
            }
            if modules.contains(&module) {
                bail!(
                    "tables map to the same module '{}'; give one of them a different struct_name",
                    module
                );
            }
            modules.push(module);
        }
        Ok(modules)
    }

    fn files(&self) -> Result<Vec<Box<dyn GeneratedFile + 'a>>> {
        let modules = self.modules()?;
        let mut files: Vec<Box<dyn GeneratedFile + 'a>> = vec![
            Box::new(AttributeRs::new(self.types)),
            Box::new(ModRs::new(modules)),
        ];
        for table in self.tables {
            files.push(Box::new(TableRs::new(table)));
        }
        Ok(files)
    }

    /// Preview generated files without writing to disk
    pub fn preview(&self) -> Result<Vec<PreviewFile>> {
        Ok(self
            .files()?
            .iter()
            .map(|file| PreviewFile {
                path: file.path(Path::new("")).display().to_string(),
                content: file.contents(),
                if_missing: file.rules().overwrite == Overwrite::IfMissing,
            })
            .collect())
    }

    /// Generate all files into the specified output directory
    pub fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        let mut result = GenerateResult::default();

        for file in self.files()? {
            let relative = file.path(Path::new("")).display().to_string();
            match file.write(output_dir)? {
                WriteResult::Written => {
                    debug!(file = %relative, "wrote");
                    result.written.push(relative);
                }
                WriteResult::Skipped => {
                    debug!(file = %relative, "kept existing");
                    result.skipped.push(relative);
                }
            }
        }

        let attribute = AttributeRs::new(self.types);
        let attribute_relative = attribute.path(Path::new("")).display().to_string();
        if result.skipped.contains(&attribute_relative) {
            let attribute_path = attribute.path(output_dir);
            result.missing_aliases = self.missing_aliases(&attribute_path)?;
            for alias in &result.missing_aliases {
                warn!(wrapper = %alias, file = %attribute_path.display(), "wrapper alias not declared");
            }
        }

        Ok(result)
    }

    /// Wrapper types referenced by the tables that an existing
    /// `attribute.rs` does not declare.
    fn missing_aliases(&self, attribute_path: &Path) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(attribute_path)
            .wrap_err_with(|| format!("failed to read '{}'", attribute_path.display()))?;

        let used: BTreeSet<&str> = self
            .tables
            .iter()
            .flat_map(|t| t.columns.iter().map(|c| c.wrapper_type.as_str()))
            .collect();

        Ok(used
            .into_iter()
            .filter(|wrapper| !content.contains(&format!("pub type {} ", wrapper)))
            .map(str::to_string)
            .collect())
    }
}
