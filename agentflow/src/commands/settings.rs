//! Global settings commands.

use anyhow::{Context, Result};
use clap::Subcommand;

use agentflow_client::types::{GlobalSettings, SettingsResponse};
use agentflow_client::AgentFlowClient;

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the stored global settings
    Show,
    /// Update the global settings
    Update {
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        model: String,
    },
}

pub async fn handle(client: &AgentFlowClient, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            let settings = client
                .settings()
                .await
                .context("failed to fetch settings")?;

            match settings {
                SettingsResponse::Configured(settings) => {
                    println!("model:   {}", settings.model);
                    println!("api_key: {}", settings.api_key);
                }
                SettingsResponse::Unset { message } => {
                    println!("{message}");
                }
            }
            Ok(())
        }

        SettingsCommand::Update { api_key, model } => {
            client
                .update_settings(&GlobalSettings { api_key, model })
                .await
                .context("failed to update settings")?;
            println!("Settings saved");
            Ok(())
        }
    }
}
