//! Chat commands against a single agent.

use anyhow::{Context, Result};
use clap::Subcommand;

use agentflow_client::AgentFlowClient;

#[derive(Debug, Subcommand)]
pub enum ChatCommand {
    /// Print a conversation's transcript
    History { gpt_id: i64, conversation_id: i64 },
    /// Send a prompt and print the agent's reply
    Send {
        gpt_id: i64,
        conversation_id: i64,
        prompt: String,
    },
}

pub async fn handle(client: &AgentFlowClient, command: ChatCommand) -> Result<()> {
    match command {
        ChatCommand::History {
            gpt_id,
            conversation_id,
        } => {
            let turns = client
                .chat_history(gpt_id, conversation_id)
                .await
                .context("failed to fetch chat history")?;

            for turn in turns {
                println!("{}: {}", turn.role, turn.content);
            }
            Ok(())
        }

        ChatCommand::Send {
            gpt_id,
            conversation_id,
            prompt,
        } => {
            let reply = client
                .send_chat(gpt_id, conversation_id, &prompt)
                .await
                .context("failed to send message")?;
            println!("{}", reply.response);
            Ok(())
        }
    }
}
