use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use pgdata_manifest::ConfigFile;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{InspectReport, Report, TerminalOutput},
};

#[derive(Args)]
pub struct InspectCommand {
    /// Path to pgdata.toml (defaults to ./pgdata.toml)
    #[arg(short, long, default_value = "pgdata.toml")]
    pub config: PathBuf,

    /// Print the resolved metadata as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectCommand {
    /// Run the inspect command
    pub async fn run(&self) -> Result<()> {
        let config = ConfigFile::open(&self.config).unwrap_or_exit();
        let manifest = config.manifest();

        let catalog = ops::connect(manifest).await?;
        let introspection = ops::introspect(&catalog, manifest)
            .await
            .unwrap_or_exit();

        if self.json {
            let json = serde_json::to_string_pretty(&introspection)
                .wrap_err("Failed to serialize table metadata")?;
            println!("{}", json);
        } else {
            InspectReport { introspection }.render(&mut TerminalOutput::new());
        }

        Ok(())
    }
}
