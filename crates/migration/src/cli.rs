use std::path::PathBuf;

use clap::Parser;
use sea_orm_cli::MigrateSubcommands;

/// Apply or revert database schema migrations.
#[derive(Parser)]
pub(crate) struct Cli {
    /// Path to a configuration file, `Config.toml` by default.
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<MigrateSubcommands>,
}
