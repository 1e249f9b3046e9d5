//! Execution session for running one flow against one conversation.
//!
//! The session owns the displayed result list and the single-slot in-flight
//! guard: each run takes a fresh [`RunToken`], and only a response that still
//! presents the current token may touch the display. A late response from a
//! superseded run is discarded, so arrival order can never overwrite a newer
//! run's output.

use uuid::Uuid;

use agentflow_sdk::{StepResult, ValidationError};

use crate::client::AgentFlowClient;
use crate::error::{ClientError, Result};
use crate::types::RunResponse;

/// Single-use token identifying one outstanding run request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(Uuid);

/// Display state for one flow/conversation pair.
pub struct ExecutionSession {
    flow_id: i64,
    conversation_id: i64,
    results: Vec<StepResult>,
    in_flight: Option<RunToken>,
}

impl ExecutionSession {
    pub fn new(flow_id: i64, conversation_id: i64) -> Self {
        Self {
            flow_id,
            conversation_id,
            results: Vec::new(),
            in_flight: None,
        }
    }

    pub fn flow_id(&self) -> i64 {
        self.flow_id
    }

    pub fn conversation_id(&self) -> i64 {
        self.conversation_id
    }

    /// The currently displayed step results, in execution order.
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    /// Whether a run is outstanding.
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Fetch prior execution results for this conversation.
    ///
    /// Fetched once on entry; on failure the displayed history is empty and
    /// the error is surfaced to the caller, with no retry.
    pub async fn load_history(&mut self, client: &AgentFlowClient) -> Result<()> {
        match client.run_history(self.flow_id, self.conversation_id).await {
            Ok(history) => {
                self.results = history;
                Ok(())
            }
            Err(err) => {
                self.results.clear();
                Err(err)
            }
        }
    }

    /// Validate the prompt and claim the in-flight slot.
    ///
    /// A new run supersedes any outstanding one: the older token stops
    /// matching, so its response will be discarded on arrival.
    pub fn begin_run(&mut self, prompt: &str) -> Result<RunToken> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }

        let token = RunToken(Uuid::new_v4());
        self.in_flight = Some(token);
        Ok(token)
    }

    /// Apply a run response, replacing the displayed results.
    ///
    /// Returns `false` (leaving the display untouched) when `token` no
    /// longer matches the outstanding request.
    pub fn apply_response(&mut self, token: RunToken, response: RunResponse) -> bool {
        if self.in_flight != Some(token) {
            return false;
        }

        self.in_flight = None;
        self.results = response.results;
        true
    }

    /// Record a failed run. The display stays whatever was shown before.
    ///
    /// Returns `false` when `token` was already superseded.
    pub fn fail_run(&mut self, token: RunToken) -> bool {
        if self.in_flight != Some(token) {
            return false;
        }

        self.in_flight = None;
        true
    }

    /// Submit a prompt and replace the display with the response's ordered
    /// step outputs.
    pub async fn run(&mut self, client: &AgentFlowClient, prompt: &str) -> Result<&[StepResult]> {
        let token = self.begin_run(prompt)?;

        match client
            .run_flow(self.flow_id, self.conversation_id, prompt)
            .await
        {
            Ok(response) => {
                self.apply_response(token, response);
                Ok(&self.results)
            }
            Err(err) => {
                self.fail_run(token);
                Err(err)
            }
        }
    }

    /// The response text of the displayed step with the given order, for
    /// handing to a clipboard utility or pipe.
    pub fn copy_result(&self, order: u32) -> Result<&str> {
        self.results
            .iter()
            .find(|result| result.order == order)
            .map(|result| result.response_text.as_str())
            .ok_or(ClientError::UnknownResult(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(order: u32, agent_name: &str, text: &str) -> StepResult {
        StepResult {
            order,
            agent_name: agent_name.to_string(),
            response_text: text.to_string(),
        }
    }

    #[test]
    fn empty_prompt_never_claims_the_slot() {
        let mut session = ExecutionSession::new(7, 3);
        let err = session.begin_run("  ").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::EmptyPrompt)
        ));
        assert!(!session.is_running());
    }

    #[test]
    fn response_replaces_the_display_instead_of_appending() {
        let mut session = ExecutionSession::new(7, 3);

        let first = session.begin_run("one").unwrap();
        assert!(session.apply_response(
            first,
            RunResponse {
                results: vec![result(1, "Alpha", "hi"), result(2, "Beta", "bye")],
            },
        ));
        assert_eq!(session.results().len(), 2);

        let second = session.begin_run("two").unwrap();
        assert!(session.apply_response(
            second,
            RunResponse {
                results: vec![result(1, "Alpha", "only")],
            },
        ));

        let shown: Vec<&str> = session
            .results()
            .iter()
            .map(|r| r.response_text.as_str())
            .collect();
        assert_eq!(shown, vec!["only"]);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut session = ExecutionSession::new(7, 3);

        let stale = session.begin_run("first").unwrap();
        let current = session.begin_run("second").unwrap();

        // The superseded run's response arrives first and must not land.
        assert!(!session.apply_response(
            stale,
            RunResponse {
                results: vec![result(1, "Alpha", "stale")],
            },
        ));
        assert!(session.results().is_empty());
        assert!(session.is_running());

        assert!(session.apply_response(
            current,
            RunResponse {
                results: vec![result(1, "Alpha", "fresh")],
            },
        ));
        assert_eq!(session.results()[0].response_text, "fresh");
        assert!(!session.is_running());
    }

    #[test]
    fn failed_run_leaves_prior_display_unchanged() {
        let mut session = ExecutionSession::new(7, 3);

        let token = session.begin_run("one").unwrap();
        session.apply_response(
            token,
            RunResponse {
                results: vec![result(1, "Alpha", "kept")],
            },
        );

        let failing = session.begin_run("two").unwrap();
        assert!(session.fail_run(failing));
        assert_eq!(session.results()[0].response_text, "kept");
        assert!(!session.is_running());
    }

    #[test]
    fn stale_failure_does_not_clear_a_newer_slot() {
        let mut session = ExecutionSession::new(7, 3);

        let stale = session.begin_run("first").unwrap();
        let _current = session.begin_run("second").unwrap();

        assert!(!session.fail_run(stale));
        assert!(session.is_running());
    }

    #[test]
    fn copy_result_selects_by_order() {
        let mut session = ExecutionSession::new(7, 3);
        let token = session.begin_run("go").unwrap();
        session.apply_response(
            token,
            RunResponse {
                results: vec![result(1, "Alpha", "hi"), result(2, "Beta", "bye")],
            },
        );

        assert_eq!(session.copy_result(2).unwrap(), "bye");
        assert!(matches!(
            session.copy_result(9),
            Err(ClientError::UnknownResult(9))
        ));
    }
}
