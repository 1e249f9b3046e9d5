use anyhow::Result;
use clap::{Parser, Subcommand};

use agentflow::commands::{chat, conversation, flow, gpt, settings};
use agentflow::utils;
use agentflow_client::AgentFlowClient;

/// Manage GPT agents and multi-agent flows against an agentflow backend.
#[derive(Parser, Debug)]
#[command(name = "agentflow", version, about)]
struct Cli {
    /// Backend base URL (defaults to AGENTFLOW_BASE_URL, then localhost)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage chat agents
    #[command(subcommand)]
    Gpt(gpt::GptCommand),
    /// Manage agent conversations
    #[command(subcommand)]
    Conv(conversation::ConvCommand),
    /// Chat with an agent
    #[command(subcommand)]
    Chat(chat::ChatCommand),
    /// Manage flows, drafts and executions
    #[command(subcommand)]
    Flow(flow::FlowCommand),
    /// Read or update global settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();
    let client = AgentFlowClient::new(utils::resolve_base_url(cli.base_url));

    match cli.command {
        Command::Gpt(command) => gpt::handle(&client, command).await,
        Command::Conv(command) => conversation::handle(&client, command).await,
        Command::Chat(command) => chat::handle(&client, command).await,
        Command::Flow(command) => flow::handle(&client, command).await,
        Command::Settings(command) => settings::handle(&client, command).await,
    }
}
