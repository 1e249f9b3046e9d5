//! Shared domain model for agentflow clients.
//!
//! A *flow* is an ordered pipeline of agent steps defined once against the
//! backend and executed repeatedly with different conversations and prompts.
//! This crate holds the types that cross the wire (field names are pinned to
//! the backend's contract), the append-only [`FlowBuilder`] with its
//! validation rules, and the console status macros used by the CLI.

pub mod builder;
pub mod error;

pub use builder::{FlowBuilder, StepInput};
pub use error::ValidationError;

use serde::{Deserialize, Serialize};

/// How a step's input prompt is derived when the backend runs the flow.
///
/// Serialized with the backend's wire values (`prompt_directo`,
/// `respuesta_anterior`, `combinado`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptPolicy {
    /// Literal prompt text captured at definition time.
    #[serde(rename = "prompt_directo")]
    Direct,
    /// Output of the immediately preceding step.
    #[serde(rename = "respuesta_anterior")]
    PriorStepOutput,
    /// Concatenation of a selected set of prior steps' outputs.
    #[serde(rename = "combinado")]
    CombinedStepOutputs,
}

impl PromptPolicy {
    /// The backend's wire value for this policy.
    pub fn wire_value(&self) -> &'static str {
        match self {
            PromptPolicy::Direct => "prompt_directo",
            PromptPolicy::PriorStepOutput => "respuesta_anterior",
            PromptPolicy::CombinedStepOutputs => "combinado",
        }
    }

    /// Parse a backend wire value.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "prompt_directo" => Some(PromptPolicy::Direct),
            "respuesta_anterior" => Some(PromptPolicy::PriorStepOutput),
            "combinado" => Some(PromptPolicy::CombinedStepOutputs),
            _ => None,
        }
    }
}

impl std::fmt::Display for PromptPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_value())
    }
}

/// One stage of a flow: an agent plus the policy deriving its input prompt.
///
/// `order` is assigned at append time and never renumbered; `upstream_refs`
/// holds `order` values of prior steps only, so a spec is acyclic by
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    /// Backend id of the agent this step invokes.
    #[serde(rename = "gpt_id")]
    pub agent_ref: i64,
    #[serde(rename = "tipo_prompt")]
    pub policy: PromptPolicy,
    /// Literal prompt text, present only for [`PromptPolicy::Direct`].
    #[serde(rename = "prompt_entrada", skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
    /// 1-based position in the step sequence.
    #[serde(rename = "orden")]
    pub order: u32,
    /// Orders of the prior steps this step consumes, all `< order`.
    #[serde(rename = "referencias_respuestas")]
    pub upstream_refs: Vec<u32>,
}

/// A complete flow definition as submitted to the backend create endpoint.
///
/// Immutable after submission; there is no client-side edit path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSpec {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "agentes")]
    pub steps: Vec<AgentStep>,
}

/// One step's output within an execution, as returned by the run and
/// history endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    #[serde(rename = "position")]
    pub order: u32,
    pub agent_name: String,
    #[serde(rename = "response")]
    pub response_text: String,
}

// ============================================================================
// Console Logging Macros (for the CLI application)
// ============================================================================
// Colored, human-readable status lines for command progress output.

/// Logs the start of a flow execution.
///
/// # Example
/// ```
/// use agentflow_sdk::log_run_start;
/// log_run_start!(7, 3);
/// ```
///
/// Outputs:
/// ```text
/// ═══ Running flow 7 (conversation 3) ═══
/// ```
#[macro_export]
macro_rules! log_run_start {
    ($flow_id:expr, $conversation_id:expr) => {
        println!(
            "\x1b[1;36m═══ Running flow {} (conversation {}) ═══\x1b[0m",
            $flow_id, $conversation_id
        );
    };
}

/// Logs the completion of a flow execution.
///
/// # Example
/// ```
/// use agentflow_sdk::log_run_complete;
/// log_run_complete!(4);
/// ```
///
/// Outputs:
/// ```text
/// ✓ Flow complete (4 steps)
/// ```
#[macro_export]
macro_rules! log_run_complete {
    ($num_steps:expr) => {
        println!("\x1b[32m✓ Flow complete ({} steps)\x1b[0m", $num_steps);
    };
}

/// Logs the start of a batch operation.
///
/// # Example
/// ```
/// use agentflow_sdk::log_batch_start;
/// log_batch_start!(3, "agents");
/// ```
///
/// Outputs:
/// ```text
/// → Deleting 3 agents
/// ```
#[macro_export]
macro_rules! log_batch_start {
    ($num_items:expr, $item_type:expr) => {
        println!("\x1b[36m→ Deleting {} {}\x1b[0m", $num_items, $item_type);
    };
}

/// Logs the completion of a batch operation.
///
/// # Example
/// ```
/// use agentflow_sdk::log_batch_complete;
/// log_batch_complete!(3, "agents");
/// ```
///
/// Outputs:
/// ```text
/// ✓ 3 agents deleted
/// ```
#[macro_export]
macro_rules! log_batch_complete {
    ($num_items:expr, $item_type:expr) => {
        println!("\x1b[32m✓ {} {} deleted\x1b[0m", $num_items, $item_type);
    };
}
