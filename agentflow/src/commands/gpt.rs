//! Agent management commands.

use anyhow::{Context, Result};
use clap::Subcommand;

use agentflow_client::types::{CreateGptRequest, UpdateGptRequest};
use agentflow_client::AgentFlowClient;
use agentflow_sdk::{log_batch_complete, log_batch_start};

#[derive(Debug, Subcommand)]
pub enum GptCommand {
    /// List agents, sorted by name
    List {
        /// Show only agents whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Create a new agent
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        system_message: String,
    },
    /// Update an existing agent
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        system_message: String,
    },
    /// Delete one or more agents
    Delete {
        /// Agent ids; several ids are deleted as one unordered batch
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

pub async fn handle(client: &AgentFlowClient, command: GptCommand) -> Result<()> {
    match command {
        GptCommand::List { filter } => {
            let mut gpts = client.list_gpts().await.context("failed to fetch agents")?;
            gpts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            if let Some(filter) = filter {
                let needle = filter.to_lowercase();
                gpts.retain(|gpt| gpt.name.to_lowercase().contains(&needle));
            }

            if gpts.is_empty() {
                println!("No agents found.");
                return Ok(());
            }
            for gpt in gpts {
                let model = gpt.model.as_deref().unwrap_or("-");
                println!("{:>6}  {}  [{}]", gpt.id, gpt.name, model);
            }
            Ok(())
        }

        GptCommand::Create {
            name,
            api_key,
            model,
            system_message,
        } => {
            let created = client
                .create_gpt(&CreateGptRequest {
                    name,
                    api_key,
                    model,
                    system_message,
                })
                .await
                .context("failed to create agent")?;
            println!("Created agent {} (id {})", created.name, created.id);
            Ok(())
        }

        GptCommand::Update {
            id,
            name,
            model,
            system_message,
        } => {
            client
                .update_gpt(
                    id,
                    &UpdateGptRequest {
                        name,
                        model,
                        system_message,
                    },
                )
                .await
                .context("failed to update agent")?;
            println!("Updated agent {id}");
            Ok(())
        }

        GptCommand::Delete { ids } => {
            if let [id] = ids[..] {
                client
                    .delete_gpt(id)
                    .await
                    .context("failed to delete agent")?;
                println!("Deleted agent {id}");
            } else {
                log_batch_start!(ids.len(), "agents");
                client
                    .delete_gpts(&ids)
                    .await
                    .context("batch delete failed")?;
                log_batch_complete!(ids.len(), "agents");
            }
            Ok(())
        }
    }
}
