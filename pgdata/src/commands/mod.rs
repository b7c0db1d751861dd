mod check;
mod completions;
mod generate;
mod init;
mod inspect;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use init::InitCommand;
use inspect::InspectCommand;

/// Extension trait for exiting on configuration and catalog errors with
/// pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for pgdata_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

impl<T> UnwrapOrExit<T> for pgdata_introspect::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "pgdata")]
#[command(version)]
#[command(about = "Generate typed PostgreSQL table accessors from the live catalog")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Init(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run().await,
            Commands::Generate(cmd) => cmd.run().await,
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a pgdata.toml skeleton
    Init(InitCommand),

    /// Validate pgdata.toml without connecting to the database
    Check(CheckCommand),

    /// Introspect the configured tables and print the resolved metadata
    Inspect(InspectCommand),

    /// Introspect the configured tables and generate accessor modules
    Generate(GenerateCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
