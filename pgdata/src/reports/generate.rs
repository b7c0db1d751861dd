//! Generate command report data structures.

use std::path::PathBuf;

use pgdata_codegen::PreviewFile;
use pgdata_introspect::Diagnostic;

use super::{
    inspect::render_diagnostic,
    output::{Output, Report},
};

/// Report data from code generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Non-fatal findings from introspection.
    pub diagnostics: Vec<Diagnostic>,
    /// Generated struct names, in declaration order.
    pub structs: Vec<String>,
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written {
        output_dir: PathBuf,
        written: Vec<String>,
        skipped: Vec<String>,
        missing_aliases: Vec<String>,
    },
    /// Dry-run preview.
    Preview { files: Vec<PreviewFile> },
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for diag in &self.diagnostics {
            render_diagnostic(out, diag);
        }

        match &self.result {
            GenerationResult::Written {
                output_dir,
                written,
                skipped,
                missing_aliases,
            } => {
                for alias in missing_aliases {
                    out.warning(&format!(
                        "attribute.rs has no alias for '{}'; add `pub type {} = Attribute<...>;`",
                        alias, alias
                    ));
                }

                out.section(&format!("Tables ({})", self.structs.len()));
                for name in &self.structs {
                    out.list_item(name);
                }
                out.newline();

                out.key_value("Generated", &output_dir.display().to_string());
                for file in written {
                    out.added_item(file);
                }
                for file in skipped {
                    out.list_item(&format!("{} (kept)", file));
                }
            }
            GenerationResult::Preview { files } => {
                for file in files {
                    let label = if file.if_missing {
                        format!("{} (if missing)", file.path)
                    } else {
                        file.path.clone()
                    };
                    out.divider(&label);
                    out.preformatted(&file.content);
                }

                out.divider("Summary");
                out.preformatted(&format!("{} files would be generated", files.len()));
            }
        }
    }
}
