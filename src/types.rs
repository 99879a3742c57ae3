//! Core type definitions for the standup mapping pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Term -> definition mapping, matched case-insensitively against transcripts
pub type Glossary = HashMap<String, String>;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Immutable ticket reference data, fetched fresh per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_hours: f64,
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Immutable tutorial-video reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub difficulty: Difficulty,
    pub keywords: Vec<String>,
    pub related_tickets: Vec<String>,
}

/// Result of fetching a document from the reference-data service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocFetch {
    pub success: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub doc_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// One documentation entry in the mapped response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocRef {
    pub name: String,
    pub source: String,
}

/// Combined mapping output for one uploaded standup recording.
///
/// Constructed fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandupMapping {
    pub transcript: String,
    pub mapped_tickets: Vec<Ticket>,
    pub technical_terms: Glossary,
    pub mapped_docs: Vec<DocRef>,
    pub mapped_tutorials: Vec<TutorialVideo>,
    pub user_id: String,
}

/// A tool invocation observed in the agent's trace stream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub action_group: Option<String>,
    pub function: Option<String>,
}

/// Final agent output after the completion stream is exhausted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReply {
    pub response: String,
    pub session_id: String,
    pub tool_calls: Vec<ToolCall>,
}

/// Compliance requirements returned by the reference-data service.
/// Requirement entries are passed through to the agent opaquely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceInfo {
    pub framework: String,
    pub requirements: Vec<serde_json::Value>,
}

/// Generated onboarding plan plus the identifier it was saved under
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    pub plan: serde_json::Value,
    pub plan_id: String,
}

/// Daily progress entry logged by a new joiner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub task: String,
    #[serde(default)]
    pub feeling: Option<String>,
    #[serde(default)]
    pub stuck_area: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
}
