//! Client SDK for the agentflow backend.
//!
//! Wraps the backend's JSON-over-HTTP interface in typed methods
//! ([`AgentFlowClient`]) and provides the per-conversation execution
//! session ([`ExecutionSession`]) with its single-slot in-flight guard.
//!
//! # Example
//!
//! ```no_run
//! use agentflow_client::{AgentFlowClient, ExecutionSession};
//!
//! # async fn example() -> agentflow_client::Result<()> {
//! let client = AgentFlowClient::from_env();
//!
//! let mut session = ExecutionSession::new(7, 3);
//! session.load_history(&client).await?;
//!
//! let results = session.run(&client, "Summarize the findings").await?;
//! for step in results {
//!     println!("{}: {}", step.agent_name, step.response_text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod execution;
pub mod types;

pub use client::{AgentFlowClient, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use execution::{ExecutionSession, RunToken};

// Re-export the domain crate for convenience
pub use agentflow_sdk;
