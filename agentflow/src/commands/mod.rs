//! Command handler implementations for the CLI.
//!
//! One module per backend resource. Validation failures print an actionable
//! message without touching the network; network failures surface once with
//! context and leave nothing half-applied locally.

pub mod chat;
pub mod conversation;
pub mod flow;
pub mod gpt;
pub mod settings;
