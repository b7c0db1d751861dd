//! Generate operation - render resolved tables to disk or preview.

use std::path::Path;

use eyre::{Context, Result};
use pgdata_codegen::Generator;
use pgdata_introspect::Introspection;
use pgdata_manifest::Manifest;

use crate::reports::{GenerateReport, GenerationResult};

/// Render `introspection` into `output_dir`, or preview it when `dry_run`.
pub fn generate(
    manifest: &Manifest,
    introspection: Introspection,
    output_dir: &Path,
    dry_run: bool,
) -> Result<GenerateReport> {
    let types = manifest.type_map();
    let generator = Generator::new(&introspection.tables, &types);

    let result = if dry_run {
        GenerationResult::Preview {
            files: generator.preview()?,
        }
    } else {
        let generated = generator
            .generate(output_dir)
            .wrap_err("Failed to generate code")?;
        GenerationResult::Written {
            output_dir: output_dir.to_path_buf(),
            written: generated.written,
            skipped: generated.skipped,
            missing_aliases: generated.missing_aliases,
        }
    };

    Ok(GenerateReport {
        structs: introspection
            .tables
            .iter()
            .map(|t| t.struct_name.clone())
            .collect(),
        diagnostics: introspection.diagnostics,
        result,
    })
}
