//! Append-only builder for flow definitions.
//!
//! The builder models a single-shot definition form: per-step inputs are
//! collected into [`StepInput`], validated and committed by
//! [`FlowBuilder::append_step`], and reset to their empty state on success.
//! Steps are only ever appended — there is no remove or reorder operation —
//! so upstream references stay strictly behind the step that holds them.

use crate::error::ValidationError;
use crate::{AgentStep, FlowSpec, PromptPolicy};

/// Transient per-step form state, cleared after each successful append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInput {
    /// Selected agent, if any.
    pub agent_ref: Option<i64>,
    /// Selected prompt policy, if any.
    pub policy: Option<PromptPolicy>,
    /// Literal prompt text, meaningful only for [`PromptPolicy::Direct`].
    pub prompt_text: String,
    /// Selected upstream step orders for [`PromptPolicy::CombinedStepOutputs`].
    pub selected_upstream: Vec<u32>,
}

/// Accumulates a validated, ordered list of [`AgentStep`] and produces a
/// [`FlowSpec`] for submission.
#[derive(Debug, Clone, Default)]
pub struct FlowBuilder {
    steps: Vec<AgentStep>,
    pending: StepInput,
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a builder from previously accumulated steps (draft resume).
    pub fn from_steps(steps: Vec<AgentStep>) -> Self {
        Self {
            steps,
            pending: StepInput::default(),
        }
    }

    /// Steps appended so far, in order.
    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    /// The transient per-step inputs currently collected.
    pub fn pending(&self) -> &StepInput {
        &self.pending
    }

    pub fn select_agent(&mut self, agent_ref: i64) {
        self.pending.agent_ref = Some(agent_ref);
    }

    pub fn select_policy(&mut self, policy: PromptPolicy) {
        self.pending.policy = Some(policy);
    }

    pub fn set_prompt_text(&mut self, text: impl Into<String>) {
        self.pending.prompt_text = text.into();
    }

    /// Add or remove an upstream step from the combined-prompt selection.
    pub fn toggle_upstream(&mut self, order: u32) {
        if let Some(pos) = self.pending.selected_upstream.iter().position(|&o| o == order) {
            self.pending.selected_upstream.remove(pos);
        } else {
            self.pending.selected_upstream.push(order);
        }
    }

    /// Validate the pending inputs and append a step.
    ///
    /// On success the step's `order` is `len + 1`, `upstream_refs` are
    /// resolved per the selected policy, and the pending inputs reset to
    /// their empty state. On failure the pending inputs are left untouched
    /// so the caller can correct them.
    pub fn append_step(&mut self) -> Result<AgentStep, ValidationError> {
        let agent_ref = self
            .pending
            .agent_ref
            .ok_or(ValidationError::MissingField("agent"))?;
        let policy = self
            .pending
            .policy
            .ok_or(ValidationError::MissingField("prompt policy"))?;

        let order = self.steps.len() as u32 + 1;

        let upstream_refs = match policy {
            PromptPolicy::Direct => Vec::new(),
            PromptPolicy::PriorStepOutput => {
                let prior = self.steps.last().ok_or(ValidationError::NoPriorStep)?;
                vec![prior.order]
            }
            PromptPolicy::CombinedStepOutputs => {
                if self.pending.selected_upstream.is_empty() {
                    return Err(ValidationError::EmptySelection);
                }
                let mut refs: Vec<u32> = Vec::new();
                for &selected in &self.pending.selected_upstream {
                    if selected == 0 || selected as usize > self.steps.len() {
                        return Err(ValidationError::UnknownUpstream(selected));
                    }
                    if !refs.contains(&selected) {
                        refs.push(selected);
                    }
                }
                refs
            }
        };

        let prompt_text = match policy {
            PromptPolicy::Direct => Some(std::mem::take(&mut self.pending.prompt_text)),
            _ => None,
        };

        let step = AgentStep {
            agent_ref,
            policy,
            prompt_text,
            order,
            upstream_refs,
        };
        self.steps.push(step.clone());
        self.pending = StepInput::default();

        Ok(step)
    }

    /// Produce the flow spec for submission.
    ///
    /// Validation only; transmitting the spec is the API client's concern.
    pub fn build(&self, name: &str) -> Result<FlowSpec, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }

        Ok(FlowSpec {
            name: name.to_string(),
            steps: self.steps.clone(),
        })
    }

    /// Consume the builder, keeping the accumulated steps (draft save).
    pub fn into_steps(self) -> Vec<AgentStep> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append_direct(builder: &mut FlowBuilder, agent_ref: i64, text: &str) -> AgentStep {
        builder.select_agent(agent_ref);
        builder.select_policy(PromptPolicy::Direct);
        builder.set_prompt_text(text);
        builder.append_step().unwrap()
    }

    #[test]
    fn orders_are_sequential_and_stable() {
        let mut builder = FlowBuilder::new();
        for i in 0..5 {
            append_direct(&mut builder, i, "x");
        }

        let orders: Vec<u32> = builder.steps().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn missing_agent_or_policy_is_rejected() {
        let mut builder = FlowBuilder::new();
        builder.select_policy(PromptPolicy::Direct);
        assert_eq!(
            builder.append_step(),
            Err(ValidationError::MissingField("agent"))
        );

        let mut builder = FlowBuilder::new();
        builder.select_agent(1);
        assert_eq!(
            builder.append_step(),
            Err(ValidationError::MissingField("prompt policy"))
        );
    }

    #[test]
    fn prior_step_policy_requires_a_prior_step() {
        let mut builder = FlowBuilder::new();
        builder.select_agent(1);
        builder.select_policy(PromptPolicy::PriorStepOutput);
        assert_eq!(builder.append_step(), Err(ValidationError::NoPriorStep));

        append_direct(&mut builder, 1, "seed");
        builder.select_agent(2);
        builder.select_policy(PromptPolicy::PriorStepOutput);
        let step = builder.append_step().unwrap();
        assert_eq!(step.order, 2);
        assert_eq!(step.upstream_refs, vec![1]);
        assert_eq!(step.prompt_text, None);
    }

    #[test]
    fn combined_policy_requires_a_selection() {
        let mut builder = FlowBuilder::new();
        append_direct(&mut builder, 1, "a");
        builder.select_agent(2);
        builder.select_policy(PromptPolicy::CombinedStepOutputs);
        assert_eq!(builder.append_step(), Err(ValidationError::EmptySelection));
    }

    #[test]
    fn combined_policy_keeps_selected_orders() {
        let mut builder = FlowBuilder::new();
        append_direct(&mut builder, 1, "a");
        append_direct(&mut builder, 2, "b");
        append_direct(&mut builder, 3, "c");

        builder.select_agent(4);
        builder.select_policy(PromptPolicy::CombinedStepOutputs);
        builder.toggle_upstream(1);
        builder.toggle_upstream(2);
        let step = builder.append_step().unwrap();

        assert_eq!(step.order, 4);
        assert_eq!(step.upstream_refs, vec![1, 2]);
    }

    #[test]
    fn combined_policy_rejects_forward_references() {
        let mut builder = FlowBuilder::new();
        append_direct(&mut builder, 1, "a");

        builder.select_agent(2);
        builder.select_policy(PromptPolicy::CombinedStepOutputs);
        builder.toggle_upstream(5);
        assert_eq!(
            builder.append_step(),
            Err(ValidationError::UnknownUpstream(5))
        );
    }

    #[test]
    fn toggle_upstream_deselects_on_second_toggle() {
        let mut builder = FlowBuilder::new();
        builder.toggle_upstream(1);
        builder.toggle_upstream(2);
        builder.toggle_upstream(1);
        assert_eq!(builder.pending().selected_upstream, vec![2]);
    }

    #[test]
    fn pending_inputs_reset_after_append_and_survive_errors() {
        let mut builder = FlowBuilder::new();
        builder.select_agent(1);
        builder.select_policy(PromptPolicy::PriorStepOutput);
        // Fails: no prior step. The form keeps its inputs.
        assert!(builder.append_step().is_err());
        assert_eq!(builder.pending().agent_ref, Some(1));
        assert_eq!(builder.pending().policy, Some(PromptPolicy::PriorStepOutput));

        builder.select_policy(PromptPolicy::Direct);
        builder.set_prompt_text("hello");
        builder.append_step().unwrap();
        assert_eq!(builder.pending(), &StepInput::default());
    }

    #[test]
    fn upstream_refs_always_precede_their_step() {
        let mut builder = FlowBuilder::new();
        append_direct(&mut builder, 1, "a");
        append_direct(&mut builder, 2, "b");

        builder.select_agent(3);
        builder.select_policy(PromptPolicy::CombinedStepOutputs);
        builder.toggle_upstream(2);
        builder.toggle_upstream(1);
        let step = builder.append_step().unwrap();

        assert!(step.upstream_refs.iter().all(|&r| r < step.order));
    }

    #[test]
    fn build_validates_name_and_steps() {
        let builder = FlowBuilder::new();
        assert_eq!(builder.build(""), Err(ValidationError::EmptyName));
        assert_eq!(builder.build("MyFlow"), Err(ValidationError::NoSteps));

        let mut builder = FlowBuilder::new();
        append_direct(&mut builder, 1, "hi");
        let spec = builder.build("MyFlow").unwrap();
        assert_eq!(spec.name, "MyFlow");
        assert_eq!(spec.steps.len(), 1);
    }
}
