//! Tenant lifecycle commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use formhub_core::config::AppConfig;
use formhub_core::error::AppError;
use formhub_entity::tenant::{CreateTenant, Tenant, TenantStatus};

use crate::output::{self, OutputFormat};

/// Arguments for tenant commands
#[derive(Debug, Args)]
pub struct TenantArgs {
    /// Tenant subcommand
    #[command(subcommand)]
    pub command: TenantCommand,
}

/// Tenant subcommands
#[derive(Debug, Subcommand)]
pub enum TenantCommand {
    /// Create a tenant
    Create {
        /// Public tenant key (lower-case letters, digits, dashes)
        #[arg(short, long)]
        key: String,
        /// Display name
        #[arg(short, long)]
        name: String,
    },
    /// List all tenants
    List,
    /// Suspend a tenant; resolver caches pick it up within one TTL
    Suspend {
        /// Tenant key
        key: String,
    },
    /// Re-activate a suspended tenant
    Activate {
        /// Tenant key
        key: String,
    },
}

/// Table row for a tenant.
#[derive(Debug, Serialize, Tabled)]
struct TenantRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Status")]
    status: TenantStatus,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Created")]
    created_at: DateTime<Utc>,
}

impl From<Tenant> for TenantRow {
    fn from(tenant: Tenant) -> Self {
        Self {
            key: tenant.key,
            display_name: tenant.display_name,
            status: tenant.status,
            id: tenant.id.to_string(),
            created_at: tenant.created_at,
        }
    }
}

/// Execute tenant commands
pub async fn execute(
    args: &TenantArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::open_state(config).await?;
    let tenants = &state.tenant_service;

    match &args.command {
        TenantCommand::Create { key, name } => {
            let tenant = tenants
                .create(CreateTenant {
                    key: key.clone(),
                    display_name: name.clone(),
                })
                .await?;
            output::print_success(&format!("Tenant '{}' created", tenant.key));
            output::print_item(&TenantRow::from(tenant), format);
        }
        TenantCommand::List => {
            let rows: Vec<TenantRow> = tenants
                .list()
                .await?
                .into_iter()
                .map(TenantRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        TenantCommand::Suspend { key } => {
            let tenant = tenants.set_status(key, TenantStatus::Suspended).await?;
            output::print_success(&format!("Tenant '{}' suspended", tenant.key));
        }
        TenantCommand::Activate { key } => {
            let tenant = tenants.set_status(key, TenantStatus::Active).await?;
            output::print_success(&format!("Tenant '{}' activated", tenant.key));
        }
    }

    Ok(())
}
