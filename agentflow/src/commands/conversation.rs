//! Agent conversation commands.

use anyhow::{Context, Result};
use clap::Subcommand;

use agentflow_client::AgentFlowClient;

#[derive(Debug, Subcommand)]
pub enum ConvCommand {
    /// List an agent's conversations
    List { gpt_id: i64 },
    /// Create a conversation for an agent
    Create { gpt_id: i64 },
    /// Delete a conversation
    Delete { gpt_id: i64, conversation_id: i64 },
}

pub async fn handle(client: &AgentFlowClient, command: ConvCommand) -> Result<()> {
    match command {
        ConvCommand::List { gpt_id } => {
            let conversations = client
                .list_conversations(gpt_id)
                .await
                .context("failed to fetch conversations")?;

            if conversations.is_empty() {
                println!("No conversations for agent {gpt_id}.");
                return Ok(());
            }
            for conversation in conversations {
                println!("{}", conversation.id);
            }
            Ok(())
        }

        ConvCommand::Create { gpt_id } => {
            let created = client
                .create_conversation(gpt_id)
                .await
                .context("failed to create conversation")?;
            println!("Created conversation {}", created.conversation_id);
            Ok(())
        }

        ConvCommand::Delete {
            gpt_id,
            conversation_id,
        } => {
            client
                .delete_conversation(gpt_id, conversation_id)
                .await
                .context("failed to delete conversation")?;
            println!("Deleted conversation {conversation_id}");
            Ok(())
        }
    }
}
