//! Draft lifecycle for flow definitions.
//!
//! Bridges the append-only [`FlowBuilder`] and the [`DraftStore`]: every
//! accepted step is written back to disk, so a definition session survives
//! process restarts and is lost only on explicit discard or confirmed
//! submission.

use anyhow::{anyhow, Result};
use uuid::Uuid;

use agentflow_sdk::{AgentStep, FlowBuilder, FlowSpec, PromptPolicy};

use crate::database::{DraftStore, PersistedDraft};

/// Inputs for one `add-step` invocation.
#[derive(Debug, Clone)]
pub struct StepInputSpec {
    pub agent_ref: i64,
    pub policy: PromptPolicy,
    pub prompt_text: Option<String>,
    pub upstream: Vec<u32>,
}

/// Create and persist a fresh draft session.
pub fn start(store: &DraftStore) -> Result<PersistedDraft> {
    let draft = PersistedDraft::new_session();
    store.insert_draft(&draft)?;
    Ok(draft)
}

/// Resolve a draft by explicit session id, or fall back to the most
/// recently touched one.
pub fn resolve(store: &DraftStore, session: Option<Uuid>) -> Result<PersistedDraft> {
    match session {
        Some(id) => store
            .get_draft(&id)?
            .ok_or_else(|| anyhow!("no draft with session id {id}")),
        None => store
            .latest_draft()?
            .ok_or_else(|| anyhow!("no draft in progress; run `flow draft start` first")),
    }
}

/// Validate and append a step, persisting the updated draft.
pub fn add_step(
    store: &DraftStore,
    draft: &PersistedDraft,
    input: StepInputSpec,
) -> Result<AgentStep> {
    let mut builder = FlowBuilder::from_steps(draft.steps.clone());
    builder.select_agent(input.agent_ref);
    builder.select_policy(input.policy);
    if let Some(prompt) = input.prompt_text {
        builder.set_prompt_text(prompt);
    }
    for order in input.upstream {
        builder.toggle_upstream(order);
    }

    let step = builder.append_step()?;
    store.update_draft(&draft.id, draft.name.as_deref(), builder.steps())?;

    Ok(step)
}

/// Build the submission payload from a draft without touching the store.
///
/// The draft is deleted only after the backend confirms creation, never
/// here.
pub fn build_spec(draft: &PersistedDraft, name: &str) -> Result<FlowSpec> {
    let builder = FlowBuilder::from_steps(draft.steps.clone());
    Ok(builder.build(name)?)
}
