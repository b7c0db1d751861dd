use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use pgdata_manifest::ConfigFile;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to pgdata.toml (defaults to ./pgdata.toml)
    #[arg(short, long, default_value = "pgdata.toml")]
    pub config: PathBuf,

    /// Output directory (defaults to src/<package name>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub async fn run(&self) -> Result<()> {
        let config = ConfigFile::open(&self.config).unwrap_or_exit();
        let manifest = config.manifest();
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("src").join(&manifest.package.name));

        let catalog = ops::connect(manifest).await?;
        let introspection = ops::introspect(&catalog, manifest)
            .await
            .unwrap_or_exit();

        let report = ops::generate(manifest, introspection, &output, self.dry_run)?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
