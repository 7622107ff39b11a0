//! Administrator bootstrap commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use formhub_core::config::AppConfig;
use formhub_core::error::AppError;
use formhub_service::tenant::BootstrapAdmin;

use crate::output::{self, OutputFormat};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create an administrator account
    Create {
        /// Home tenant key
        #[arg(short, long)]
        tenant: String,
        /// Email
        #[arg(short, long)]
        email: String,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Create a tenant administrator instead of a system administrator
        #[arg(long)]
        tenant_admin_only: bool,
    },
}

/// Table row for a created administrator.
#[derive(Debug, Serialize, Tabled)]
struct AdminRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Tenant")]
    tenant: String,
    #[tabled(rename = "System admin")]
    is_system_admin: bool,
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AdminCommand::Create {
            tenant,
            email,
            password,
            name,
            tenant_admin_only,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Administrator password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let state = super::open_state(config).await?;
            let user = state
                .tenant_service
                .create_admin(BootstrapAdmin {
                    tenant_key: tenant.clone(),
                    email: email.clone(),
                    password,
                    display_name: name.clone(),
                    system: !tenant_admin_only,
                })
                .await?;

            output::print_success(&format!("Administrator '{}' created", user.email));
            output::print_item(
                &AdminRow {
                    id: user.id.to_string(),
                    email: user.email,
                    tenant: tenant.clone(),
                    is_system_admin: user.is_system_admin,
                },
                format,
            );
        }
    }

    Ok(())
}
