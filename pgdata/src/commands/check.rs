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
pub struct CheckCommand {
    /// Path to pgdata.toml (defaults to ./pgdata.toml)
    #[arg(short, long, default_value = "pgdata.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let config = ConfigFile::open(&self.config).unwrap_or_exit();
        let report = ops::check(config.manifest(), config.path());
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
