//! Validation errors raised before any network activity.

use thiserror::Error;

/// Local, user-correctable validation failures.
///
/// Every variant blocks the attempted action without contacting the backend;
/// the acting view or command stays on unchanged state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required per-step input was not provided.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// `PriorStepOutput` was chosen while the step sequence is empty.
    #[error("no prior step exists to reference")]
    NoPriorStep,
    /// `CombinedStepOutputs` was chosen with no upstream steps selected.
    #[error("no upstream steps selected for a combined prompt")]
    EmptySelection,
    /// An upstream reference does not name an existing prior step.
    #[error("upstream reference {0} does not name an existing step")]
    UnknownUpstream(u32),
    #[error("flow name must not be empty")]
    EmptyName,
    #[error("a flow requires at least one step")]
    NoSteps,
    #[error("prompt must not be empty")]
    EmptyPrompt,
}
