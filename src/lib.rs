//! Onboarding Copilot - standup mapping service
//!
//! Transcribes uploaded standup recordings via a speech API, maps the
//! transcript against reference collections (tickets, glossary, docs,
//! tutorial videos) with deterministic fallback policies, and hands the
//! transcript to a managed LLM agent for summary generation and
//! follow-up chat.

pub mod types;
pub mod mapping;
pub mod ranking;
pub mod services;
pub mod engine;
pub mod server;
pub mod speech_client;
pub mod tools_client;
pub mod agent_client;

pub use types::*;
pub use engine::{StandupEngine, UpstreamError};
pub use services::{
    AgentRuntime, MockAgent, MockReferenceData, MockTranscription, ReferenceData,
    TranscriptionService,
};
pub use agent_client::AgentClient;
pub use speech_client::SpeechClient;
pub use tools_client::ToolsClient;

#[cfg(test)]
mod tests;
