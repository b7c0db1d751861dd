use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Context, Result, bail};
use pgdata_codegen::files::PgdataToml;
use pgdata_core::{GeneratedFile, WriteResult};
use pgdata_manifest::{DEFAULT_CONFIG_FILE, validate_identifier};

/// Package name used when the directory name gives nothing usable.
const FALLBACK_PACKAGE: &str = "data";

#[derive(Args)]
pub struct InitCommand {
    /// Directory to create pgdata.toml in (defaults to current directory)
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Package name (defaults to the directory name)
    #[arg(short, long)]
    pub name: Option<String>,
}

impl InitCommand {
    pub fn run(&self) -> Result<()> {
        let name = match &self.name {
            Some(name) => {
                if let Some(reason) = validate_identifier(name) {
                    bail!("invalid package name '{}': {}", name, reason);
                }
                name.clone()
            }
            None => Self::package_name(&self.dir)?,
        };

        match PgdataToml::new(&name).write(&self.dir)? {
            WriteResult::Written => {
                println!(
                    "Created {}",
                    self.dir.join(DEFAULT_CONFIG_FILE).display()
                );
                println!();
                println!("Next steps:");
                println!("  edit [[tables]] in {}", DEFAULT_CONFIG_FILE);
                println!("  pgdata check");
                println!("  pgdata generate");
            }
            WriteResult::Skipped => {
                eprintln!(
                    "warning: {} already exists; left untouched",
                    self.dir.join(DEFAULT_CONFIG_FILE).display()
                );
            }
        }

        Ok(())
    }

    fn package_name(dir: &Path) -> Result<String> {
        let dir = if dir == Path::new(".") {
            std::env::current_dir().wrap_err("Failed to get current directory")?
        } else {
            dir.to_path_buf()
        };

        Ok(dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(sanitize_package_name)
            .unwrap_or_else(|| FALLBACK_PACKAGE.to_string()))
    }
}

/// Turn a directory name into a module identifier ("My-App" -> "my_app").
fn sanitize_package_name(dir_name: &str) -> String {
    let name: String = dir_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let name = name.trim_matches('_');

    if validate_identifier(name).is_some() {
        FALLBACK_PACKAGE.to_string()
    } else {
        name.to_string()
    }
}
