//! HTTP client for the agentflow backend.
//!
//! Every endpoint is a thin request/response round trip: plain
//! unauthenticated JSON against a fixed host, no retry, no backoff, no
//! pagination. Non-2xx answers become [`ClientError::Api`] with the status
//! and raw body preserved.

use futures::future;
use serde::de::DeserializeOwned;
use serde::Serialize;

use agentflow_sdk::{FlowSpec, StepResult, ValidationError};

use crate::error::{ClientError, Result};
use crate::types::{
    ChatResponse, ChatTurn, Conversation, ConversationCreated, CreateGptRequest, Flow,
    GlobalSettings, Gpt, PromptOption, PromptRequest, RunResponse, SettingsResponse,
    UpdateGptRequest,
};

/// Default backend host, matching the development server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Environment variable consulted by [`AgentFlowClient::from_env`].
pub const BASE_URL_ENV: &str = "AGENTFLOW_BASE_URL";

/// Client for the agent/flow backend.
#[derive(Debug, Clone)]
pub struct AgentFlowClient {
    http: reqwest::Client,
    base_url: String,
}

impl AgentFlowClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client from `AGENTFLOW_BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Agents
    // ------------------------------------------------------------------

    /// `GET /gpts`
    pub async fn list_gpts(&self) -> Result<Vec<Gpt>> {
        self.get_json("/gpts").await
    }

    /// `POST /gpt/create`
    pub async fn create_gpt(&self, request: &CreateGptRequest) -> Result<Gpt> {
        self.post_json("/gpt/create", request).await
    }

    /// `POST /gpt/update/{id}`
    pub async fn update_gpt(&self, id: i64, request: &UpdateGptRequest) -> Result<()> {
        self.post_no_response(&format!("/gpt/update/{id}"), request)
            .await
    }

    /// `DELETE /gpt/delete/{id}`
    pub async fn delete_gpt(&self, id: i64) -> Result<()> {
        self.delete(&format!("/gpt/delete/{id}")).await
    }

    /// Delete several agents as one unordered concurrent batch.
    ///
    /// Individual outcomes are not surfaced: the batch reports success only
    /// when every request succeeded, otherwise a single [`ClientError::Batch`].
    pub async fn delete_gpts(&self, ids: &[i64]) -> Result<()> {
        let outcomes = future::join_all(ids.iter().map(|&id| self.delete_gpt(id))).await;
        let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
        collapse_batch(outcomes.len(), failed)
    }

    // ------------------------------------------------------------------
    // Agent conversations and chat
    // ------------------------------------------------------------------

    /// `GET /gpt/conversations/{gptId}`
    pub async fn list_conversations(&self, gpt_id: i64) -> Result<Vec<Conversation>> {
        self.get_json(&format!("/gpt/conversations/{gpt_id}")).await
    }

    /// `POST /gpt/conversation/create/{gptId}`
    pub async fn create_conversation(&self, gpt_id: i64) -> Result<ConversationCreated> {
        self.post_bodyless(&format!("/gpt/conversation/create/{gpt_id}"))
            .await
    }

    /// `DELETE /gpt/conversation/delete/{gptId}/{convId}`
    pub async fn delete_conversation(&self, gpt_id: i64, conversation_id: i64) -> Result<()> {
        self.delete(&format!("/gpt/conversation/delete/{gpt_id}/{conversation_id}"))
            .await
    }

    /// `GET /gpt/history/{gptId}/{convId}`
    pub async fn chat_history(&self, gpt_id: i64, conversation_id: i64) -> Result<Vec<ChatTurn>> {
        self.get_json(&format!("/gpt/history/{gpt_id}/{conversation_id}"))
            .await
    }

    /// `POST /gpt/chat/{gptId}/{convId}`
    ///
    /// Empty prompts fail locally and never reach the network.
    pub async fn send_chat(
        &self,
        gpt_id: i64,
        conversation_id: i64,
        prompt: &str,
    ) -> Result<ChatResponse> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }
        self.post_json(
            &format!("/gpt/chat/{gpt_id}/{conversation_id}"),
            &PromptRequest {
                prompt: prompt.to_string(),
            },
        )
        .await
    }

    // ------------------------------------------------------------------
    // Flows
    // ------------------------------------------------------------------

    /// `GET /flujo/prompt-options`
    pub async fn prompt_options(&self) -> Result<Vec<PromptOption>> {
        self.get_json("/flujo/prompt-options").await
    }

    /// `POST /flujo/create`
    pub async fn create_flow(&self, spec: &FlowSpec) -> Result<Flow> {
        self.post_json("/flujo/create", spec).await
    }

    /// `GET /flujo`
    pub async fn list_flows(&self) -> Result<Vec<Flow>> {
        self.get_json("/flujo").await
    }

    /// `DELETE /flujo/eliminar/{id}`
    pub async fn delete_flow(&self, id: i64) -> Result<()> {
        self.delete(&format!("/flujo/eliminar/{id}")).await
    }

    /// `GET /flujo/{id}/conversaciones`
    pub async fn flow_conversations(&self, flow_id: i64) -> Result<Vec<Conversation>> {
        self.get_json(&format!("/flujo/{flow_id}/conversaciones"))
            .await
    }

    /// `POST /flujo/conversation/create/{flujoId}`
    pub async fn create_flow_conversation(&self, flow_id: i64) -> Result<ConversationCreated> {
        self.post_bodyless(&format!("/flujo/conversation/create/{flow_id}"))
            .await
    }

    /// `DELETE /flujo/conversation/delete/{convId}`
    pub async fn delete_flow_conversation(&self, conversation_id: i64) -> Result<()> {
        self.delete(&format!("/flujo/conversation/delete/{conversation_id}"))
            .await
    }

    /// `GET /flujo/history/{flujoId}/{convId}`
    pub async fn run_history(
        &self,
        flow_id: i64,
        conversation_id: i64,
    ) -> Result<Vec<StepResult>> {
        self.get_json(&format!("/flujo/history/{flow_id}/{conversation_id}"))
            .await
    }

    /// `POST /flujo/run/{flujoId}/{convId}`
    ///
    /// Empty prompts fail locally and never reach the network.
    pub async fn run_flow(
        &self,
        flow_id: i64,
        conversation_id: i64,
        prompt: &str,
    ) -> Result<RunResponse> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }
        self.post_json(
            &format!("/flujo/run/{flow_id}/{conversation_id}"),
            &PromptRequest {
                prompt: prompt.to_string(),
            },
        )
        .await
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// `GET /settings`
    pub async fn settings(&self) -> Result<SettingsResponse> {
        self.get_json("/settings").await
    }

    /// `POST /settings/update`
    pub async fn update_settings(&self, settings: &GlobalSettings) -> Result<()> {
        self.post_no_response("/settings/update", settings).await
    }

    // ------------------------------------------------------------------
    // Request helpers
    // ------------------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        #[cfg(feature = "tracing-support")]
        tracing::debug!(%url, "GET");

        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        #[cfg(feature = "tracing-support")]
        tracing::debug!(%url, "POST");

        let response = self.http.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    /// POST without a request body (the create-conversation endpoints).
    async fn post_bodyless<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        #[cfg(feature = "tracing-support")]
        tracing::debug!(%url, "POST");

        let response = self.http.post(&url).send().await?;
        Self::decode(response).await
    }

    /// POST whose response body is irrelevant beyond the status code.
    async fn post_no_response<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        #[cfg(feature = "tracing-support")]
        tracing::debug!(%url, "POST");

        let response = self.http.post(&url).json(body).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        #[cfg(feature = "tracing-support")]
        tracing::debug!(%url, "DELETE");

        let response = self.http.delete(&url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        let value = serde_json::from_str(&body)?;
        Ok(value)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        #[cfg(feature = "tracing-support")]
        tracing::error!(%status, %body, "backend request failed");
        Err(ClientError::api(status, body))
    }
}

/// Collapse unordered batch outcomes into one success or one failure.
fn collapse_batch(total: usize, failed: usize) -> Result<()> {
    if failed == 0 {
        Ok(())
    } else {
        Err(ClientError::Batch { failed, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_succeeds_only_when_every_request_succeeded() {
        assert!(collapse_batch(3, 0).is_ok());

        match collapse_batch(3, 1) {
            Err(ClientError::Batch { failed, total }) => {
                assert_eq!(failed, 1);
                assert_eq!(total, 3);
            }
            other => panic!("expected batch failure, got {other:?}"),
        }
    }

    #[test]
    fn base_url_is_normalized() {
        let client = AgentFlowClient::new("http://backend:5000///");
        assert_eq!(client.base_url(), "http://backend:5000");
    }

    #[tokio::test]
    async fn empty_prompts_fail_before_any_request() {
        // An unroutable base URL: reaching the network would error with a
        // connection failure rather than a validation failure.
        let client = AgentFlowClient::new("http://127.0.0.1:1");

        let run = client.run_flow(7, 3, "   ").await;
        assert!(matches!(
            run,
            Err(ClientError::Validation(
                agentflow_sdk::ValidationError::EmptyPrompt
            ))
        ));

        let chat = client.send_chat(1, 1, "").await;
        assert!(matches!(
            chat,
            Err(ClientError::Validation(
                agentflow_sdk::ValidationError::EmptyPrompt
            ))
        ));
    }
}
