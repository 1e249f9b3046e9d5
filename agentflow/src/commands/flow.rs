//! Flow commands: definition drafts, listing, conversations, execution.

use anyhow::{anyhow, Context, Result};
use clap::Subcommand;
use uuid::Uuid;

use agentflow_client::{AgentFlowClient, ExecutionSession};
use agentflow_sdk::{log_run_complete, log_run_start, PromptPolicy, StepResult};

use crate::database::DraftStore;
use crate::draft::{self, StepInputSpec};
use crate::utils;

#[derive(Debug, Subcommand)]
pub enum FlowCommand {
    /// List flows
    List,
    /// Delete a flow
    Delete { id: i64 },
    /// List the prompt policies the backend offers
    PromptOptions,
    /// Manage flow conversations
    #[command(subcommand)]
    Conv(FlowConvCommand),
    /// Build a flow definition incrementally
    #[command(subcommand)]
    Draft(DraftCommand),
    /// Run a flow against a conversation
    Run {
        flow_id: i64,
        conversation_id: i64,
        prompt: String,
    },
    /// Show prior execution results for a conversation
    History { flow_id: i64, conversation_id: i64 },
    /// Print one step's output raw, for piping to a clipboard utility
    Copy {
        flow_id: i64,
        conversation_id: i64,
        /// Step order within the execution
        order: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum FlowConvCommand {
    /// List a flow's conversations
    List { flow_id: i64 },
    /// Create a conversation for a flow
    Create { flow_id: i64 },
    /// Delete a flow conversation
    Delete { conversation_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Start a new draft session
    Start,
    /// List draft sessions
    List,
    /// Append a step to a draft
    AddStep {
        /// Draft session id; defaults to the most recent draft
        #[arg(long)]
        session: Option<Uuid>,
        /// Agent id the step invokes
        #[arg(long)]
        agent: i64,
        /// Prompt policy: prompt_directo, respuesta_anterior or combinado
        #[arg(long)]
        policy: String,
        /// Literal prompt text (direct policy only)
        #[arg(long)]
        prompt: Option<String>,
        /// Step order to combine; repeat for several (combined policy only)
        #[arg(long)]
        upstream: Vec<u32>,
    },
    /// Show a draft's accumulated steps
    Show {
        #[arg(long)]
        session: Option<Uuid>,
    },
    /// Submit a draft to the backend as a new flow
    Submit {
        #[arg(long)]
        session: Option<Uuid>,
        /// Name of the flow to create
        #[arg(long)]
        name: String,
    },
    /// Discard a draft
    Discard {
        #[arg(long)]
        session: Option<Uuid>,
    },
}

pub async fn handle(client: &AgentFlowClient, command: FlowCommand) -> Result<()> {
    match command {
        FlowCommand::List => {
            let flows = client.list_flows().await.context("failed to fetch flows")?;

            if flows.is_empty() {
                println!("No flows found.");
                return Ok(());
            }
            for flow in flows {
                if flow.steps.is_empty() {
                    println!("{:>6}  {}", flow.id, flow.name);
                } else {
                    println!("{:>6}  {}  ({} steps)", flow.id, flow.name, flow.steps.len());
                }
            }
            Ok(())
        }

        FlowCommand::Delete { id } => {
            client
                .delete_flow(id)
                .await
                .context("failed to delete flow")?;
            println!("Deleted flow {id}");
            Ok(())
        }

        FlowCommand::PromptOptions => {
            let options = client
                .prompt_options()
                .await
                .context("failed to fetch prompt options")?;
            for option in options {
                println!("{}  {}", option.value, option.label);
            }
            Ok(())
        }

        FlowCommand::Conv(command) => handle_conv(client, command).await,
        FlowCommand::Draft(command) => handle_draft(client, command).await,

        FlowCommand::Run {
            flow_id,
            conversation_id,
            prompt,
        } => {
            let mut session = ExecutionSession::new(flow_id, conversation_id);
            log_run_start!(flow_id, conversation_id);

            let results = session
                .run(client, &prompt)
                .await
                .context("failed to run flow")?;
            print_results(results);
            log_run_complete!(results.len());
            Ok(())
        }

        FlowCommand::History {
            flow_id,
            conversation_id,
        } => {
            let mut session = ExecutionSession::new(flow_id, conversation_id);
            session
                .load_history(client)
                .await
                .context("failed to load execution history")?;

            if session.results().is_empty() {
                println!("No prior executions.");
                return Ok(());
            }
            print_results(session.results());
            Ok(())
        }

        FlowCommand::Copy {
            flow_id,
            conversation_id,
            order,
        } => {
            let mut session = ExecutionSession::new(flow_id, conversation_id);
            session
                .load_history(client)
                .await
                .context("failed to load execution history")?;

            // Raw text only; stdout is meant for `| pbcopy` / `| xclip`.
            print!("{}", session.copy_result(order)?);
            Ok(())
        }
    }
}

async fn handle_conv(client: &AgentFlowClient, command: FlowConvCommand) -> Result<()> {
    match command {
        FlowConvCommand::List { flow_id } => {
            let conversations = client
                .flow_conversations(flow_id)
                .await
                .context("failed to fetch flow conversations")?;

            if conversations.is_empty() {
                println!("No conversations for flow {flow_id}.");
                return Ok(());
            }
            for conversation in conversations {
                println!("{}", conversation.id);
            }
            Ok(())
        }

        FlowConvCommand::Create { flow_id } => {
            let created = client
                .create_flow_conversation(flow_id)
                .await
                .context("failed to create flow conversation")?;
            println!("Created conversation {}", created.conversation_id);
            Ok(())
        }

        FlowConvCommand::Delete { conversation_id } => {
            client
                .delete_flow_conversation(conversation_id)
                .await
                .context("failed to delete flow conversation")?;
            println!("Deleted conversation {conversation_id}");
            Ok(())
        }
    }
}

async fn handle_draft(client: &AgentFlowClient, command: DraftCommand) -> Result<()> {
    let store = DraftStore::new(utils::draft_db_path())?;
    store.initialize_schema()?;

    match command {
        DraftCommand::Start => {
            let draft = draft::start(&store)?;
            println!("Started draft session {}", draft.id);
            Ok(())
        }

        DraftCommand::List => {
            let drafts = store.list_drafts()?;
            if drafts.is_empty() {
                println!("No drafts in progress.");
                return Ok(());
            }
            for draft in drafts {
                println!(
                    "{}  {} steps  (updated {})",
                    draft.id,
                    draft.steps.len(),
                    draft.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }

        DraftCommand::AddStep {
            session,
            agent,
            policy,
            prompt,
            upstream,
        } => {
            let draft = draft::resolve(&store, session)?;
            let step = draft::add_step(
                &store,
                &draft,
                StepInputSpec {
                    agent_ref: agent,
                    policy: parse_policy(&policy)?,
                    prompt_text: prompt,
                    upstream,
                },
            )?;
            println!("Appended step {} (agent {})", step.order, step.agent_ref);
            Ok(())
        }

        DraftCommand::Show { session } => {
            let draft = draft::resolve(&store, session)?;
            println!("Draft {}", draft.id);
            if draft.steps.is_empty() {
                println!("  (no steps yet)");
                return Ok(());
            }
            for step in &draft.steps {
                let detail = match step.policy {
                    PromptPolicy::Direct => {
                        format!("prompt: {:?}", step.prompt_text.as_deref().unwrap_or(""))
                    }
                    _ => format!("upstream: {:?}", step.upstream_refs),
                };
                println!(
                    "  {}. agent {}  {}  {}",
                    step.order, step.agent_ref, step.policy, detail
                );
            }
            Ok(())
        }

        DraftCommand::Submit { session, name } => {
            let draft = draft::resolve(&store, session)?;
            let spec = draft::build_spec(&draft, &name)?;

            let created = client
                .create_flow(&spec)
                .await
                .context("failed to create flow; the draft is kept")?;

            // Only a confirmed creation clears the draft.
            store.delete_draft(&draft.id)?;
            println!("Created flow {} (id {})", created.name, created.id);
            Ok(())
        }

        DraftCommand::Discard { session } => {
            let draft = draft::resolve(&store, session)?;
            store.delete_draft(&draft.id)?;
            println!("Discarded draft {}", draft.id);
            Ok(())
        }
    }
}

fn parse_policy(value: &str) -> Result<PromptPolicy> {
    PromptPolicy::from_wire(value)
        .or(match value {
            "direct" => Some(PromptPolicy::Direct),
            "prior" => Some(PromptPolicy::PriorStepOutput),
            "combined" => Some(PromptPolicy::CombinedStepOutputs),
            _ => None,
        })
        .ok_or_else(|| anyhow!("unknown prompt policy '{value}'"))
}

fn print_results(results: &[StepResult]) {
    for step in results {
        println!("--- Step {}: {} ---", step.order, step.agent_name);
        println!("{}", step.response_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_wire_values_and_aliases() {
        assert_eq!(parse_policy("prompt_directo").unwrap(), PromptPolicy::Direct);
        assert_eq!(parse_policy("direct").unwrap(), PromptPolicy::Direct);
        assert_eq!(
            parse_policy("respuesta_anterior").unwrap(),
            PromptPolicy::PriorStepOutput
        );
        assert_eq!(
            parse_policy("combined").unwrap(),
            PromptPolicy::CombinedStepOutputs
        );
        assert!(parse_policy("sideways").is_err());
    }
}
