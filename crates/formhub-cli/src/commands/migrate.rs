//! Database migration management commands.

use clap::{Args, Subcommand};

use formhub_core::config::{AppConfig, StoreProvider};
use formhub_core::error::AppError;
use formhub_database::DatabasePool;
use formhub_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: AppConfig) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            if config.database.provider != StoreProvider::Postgres {
                output::print_warning("database.provider is not 'postgres'; nothing to migrate");
                return Ok(());
            }
            let pool = DatabasePool::connect(&config.database).await?;
            println!("Running database migrations...");
            run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
    }
    Ok(())
}
