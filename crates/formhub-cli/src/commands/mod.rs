//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod tenant;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use formhub_api::{AppState, build_state};
use formhub_core::config::{AppConfig, StoreProvider};
use formhub_core::error::AppError;
use formhub_core::traits::SystemClock;
use formhub_database::connect_store;

use crate::output::{self, OutputFormat};

/// FormHub: multi-tenant forms platform, identity administration
#[derive(Debug, Parser)]
#[command(name = "formhub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (overlays config/{env}.toml)
    #[arg(short, long, default_value = "development", env = "FORMHUB_ENV")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tenant lifecycle
    Tenant(tenant::TenantArgs),
    /// Administrator bootstrap
    Admin(admin::AdminArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;
        match &self.command {
            Commands::Tenant(args) => tenant::execute(args, config, self.format).await,
            Commands::Admin(args) => admin::execute(args, config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, config).await,
        }
    }
}

/// Helper: connect the configured store and wire the services.
pub async fn open_state(config: AppConfig) -> Result<AppState, AppError> {
    if config.database.provider == StoreProvider::Memory {
        output::print_warning("database.provider is 'memory'; changes end with this process");
    }
    let store = connect_store(&config.database).await?;
    Ok(build_state(config, store, Arc::new(SystemClock)))
}
