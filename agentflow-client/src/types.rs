//! Request and response types for the backend's JSON-over-HTTP interface.
//!
//! Field names are pinned to the backend contract; structs stay liberal on
//! optional fields the list endpoints may omit.

use serde::{Deserialize, Serialize};

/// A configured chat agent as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gpt {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

/// Payload for `POST /gpt/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGptRequest {
    pub name: String,
    pub api_key: String,
    pub model: String,
    pub system_message: String,
}

/// Payload for `POST /gpt/update/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGptRequest {
    pub name: String,
    pub model: String,
    pub system_message: String,
}

/// A backend-managed conversation, scoped to an agent or a flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
}

/// Response of the conversation create endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationCreated {
    pub conversation_id: i64,
}

/// One turn of an agent chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Payload for the chat and flow-run endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Response of `POST /gpt/chat/{gptId}/{convId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// One prompt-policy choice offered by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOption {
    pub value: String,
    pub label: String,
}

/// A persisted flow as returned by the list and create endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(
        rename = "agentes",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub steps: Vec<agentflow_sdk::AgentStep>,
}

/// Response of `POST /flujo/run/{flujoId}/{convId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    #[serde(rename = "resultados")]
    pub results: Vec<agentflow_sdk::StepResult>,
}

/// Global credential defaults applied to agents without their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub api_key: String,
    pub model: String,
}

/// `GET /settings` returns either the stored values or a notice that none
/// are configured yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SettingsResponse {
    Configured(GlobalSettings),
    Unset { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_response_parses_ordered_results() {
        let response: RunResponse = serde_json::from_str(
            r#"{"resultados": [
                {"position": 1, "agent_name": "Alpha", "response": "hi"},
                {"position": 2, "agent_name": "Beta", "response": "bye"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].order, 1);
        assert_eq!(response.results[1].agent_name, "Beta");
    }

    #[test]
    fn settings_response_handles_both_shapes() {
        let configured: SettingsResponse =
            serde_json::from_str(r#"{"api_key": "sk-1", "model": "gpt-4"}"#).unwrap();
        match configured {
            SettingsResponse::Configured(settings) => {
                assert_eq!(settings.model, "gpt-4");
            }
            SettingsResponse::Unset { .. } => panic!("expected configured settings"),
        }

        let unset: SettingsResponse =
            serde_json::from_str(r#"{"message": "no settings stored"}"#).unwrap();
        assert!(matches!(unset, SettingsResponse::Unset { .. }));
    }

    #[test]
    fn flow_list_entries_tolerate_missing_steps() {
        let flow: Flow = serde_json::from_str(r#"{"id": 7, "nombre": "pipeline"}"#).unwrap();
        assert_eq!(flow.name, "pipeline");
        assert!(flow.steps.is_empty());
    }
}
