//! Collaborator seams for transcription, reference data, and the agent runtime
//!
//! The orchestrator receives these as trait objects at construction time;
//! the mapping functions themselves take plain data and never touch them.

use crate::types::{
    AgentReply, ComplianceInfo, Difficulty, DocFetch, Glossary, Priority, ProgressEntry, Ticket,
    ToolCall, TutorialVideo,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

/// Speech-to-text collaborator: audio bytes in, plain transcript out
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<String>;
}

/// Reference-data collaborator backing the mapping core and the plan flow
#[async_trait]
pub trait ReferenceData: Send + Sync {
    async fn tickets(&self) -> Result<Vec<Ticket>>;
    async fn glossary(&self) -> Result<Glossary>;
    async fn tutorials(&self) -> Result<Vec<TutorialVideo>>;
    async fn fetch_doc(&self, doc_name: &str) -> Result<DocFetch>;
    async fn compliance_requirements(&self) -> Result<ComplianceInfo>;
    async fn write_plan(&self, plan: &serde_json::Value) -> Result<String>;
    async fn log_progress(&self, entry: &ProgressEntry) -> Result<serde_json::Value>;
    async fn progress(&self, user_id: Option<&str>) -> Result<serde_json::Value>;
}

/// Managed LLM agent collaborator with session continuity
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn invoke(&self, input_text: &str, session_id: &str) -> Result<AgentReply>;
}

/// Fixed-transcript transcription stub for tests and offline runs
pub struct MockTranscription {
    transcript: Option<String>,
}

impl MockTranscription {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: Some(transcript.into()),
        }
    }

    /// Stub that always fails, for exercising the error path
    pub fn failing() -> Self {
        Self { transcript: None }
    }
}

#[async_trait]
impl TranscriptionService for MockTranscription {
    async fn transcribe(&self, _audio: Vec<u8>, _content_type: &str) -> Result<String> {
        self.transcript
            .clone()
            .ok_or_else(|| anyhow::anyhow!("mock transcription failure"))
    }
}

/// In-memory reference data for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct MockReferenceData {
    pub tickets: Vec<Ticket>,
    pub glossary: Glossary,
    pub tutorials: Vec<TutorialVideo>,
    pub doc: Option<DocFetch>,
    pub compliance: ComplianceInfo,
}

impl MockReferenceData {
    /// Sample data set mirroring the seeded reference collections
    pub fn sample() -> Self {
        let tickets = vec![
            Ticket {
                id: "BE-101".to_string(),
                title: "Set up local development environment".to_string(),
                description: "Install Node.js, Docker, and configure AWS CLI".to_string(),
                priority: Priority::High,
                estimated_hours: 4.0,
            },
            Ticket {
                id: "BE-102".to_string(),
                title: "Understand API Gateway architecture".to_string(),
                description: "Review API Gateway setup and routing logic".to_string(),
                priority: Priority::High,
                estimated_hours: 6.0,
            },
            Ticket {
                id: "BE-103".to_string(),
                title: "Set up DynamoDB local".to_string(),
                description: "Configure local DynamoDB for development".to_string(),
                priority: Priority::Medium,
                estimated_hours: 3.0,
            },
        ];

        let glossary: Glossary = [
            (
                "API Gateway",
                "AWS service that handles HTTP requests and routes them to backend services",
            ),
            (
                "Lambda",
                "Serverless compute service that runs code without managing servers",
            ),
            ("DynamoDB", "NoSQL database service provided by AWS"),
            ("S3", "Simple Storage Service - object storage for files and data"),
            ("Standup", "Daily team meeting to share progress and blockers"),
            (
                "PR",
                "Pull Request - code review process before merging changes",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let tutorials = vec![
            TutorialVideo {
                id: "T1".to_string(),
                title: "Docker for new joiners".to_string(),
                description: "Local containers from zero to running".to_string(),
                duration: "12 min".to_string(),
                difficulty: Difficulty::Beginner,
                keywords: vec!["docker".to_string(), "environment".to_string()],
                related_tickets: vec!["BE-101".to_string()],
            },
            TutorialVideo {
                id: "T2".to_string(),
                title: "API Gateway routing deep dive".to_string(),
                description: "How requests reach our backend services".to_string(),
                duration: "25 min".to_string(),
                difficulty: Difficulty::Intermediate,
                keywords: vec!["api gateway".to_string(), "routing".to_string()],
                related_tickets: vec!["BE-102".to_string()],
            },
            TutorialVideo {
                id: "T3".to_string(),
                title: "DynamoDB data modeling".to_string(),
                description: "Single-table design patterns".to_string(),
                duration: "40 min".to_string(),
                difficulty: Difficulty::Advanced,
                keywords: vec!["dynamodb".to_string()],
                related_tickets: vec!["BE-103".to_string()],
            },
        ];

        Self {
            tickets,
            glossary,
            tutorials,
            doc: Some(DocFetch {
                success: true,
                content: Some("# Architecture Overview\n\nAPI Gateway fronts Lambda handlers backed by DynamoDB.".to_string()),
                doc_name: Some("architecture_overview.md".to_string()),
                source: Some("S3 Documentation".to_string()),
            }),
            compliance: ComplianceInfo {
                framework: "SOC2".to_string(),
                requirements: vec![json!({
                    "id": "SEC-1",
                    "name": "Complete security awareness training"
                })],
            },
        }
    }
}

#[async_trait]
impl ReferenceData for MockReferenceData {
    async fn tickets(&self) -> Result<Vec<Ticket>> {
        Ok(self.tickets.clone())
    }

    async fn glossary(&self) -> Result<Glossary> {
        Ok(self.glossary.clone())
    }

    async fn tutorials(&self) -> Result<Vec<TutorialVideo>> {
        Ok(self.tutorials.clone())
    }

    async fn fetch_doc(&self, doc_name: &str) -> Result<DocFetch> {
        Ok(self.doc.clone().unwrap_or(DocFetch {
            success: false,
            content: None,
            doc_name: Some(doc_name.to_string()),
            source: None,
        }))
    }

    async fn compliance_requirements(&self) -> Result<ComplianceInfo> {
        Ok(self.compliance.clone())
    }

    async fn write_plan(&self, _plan: &serde_json::Value) -> Result<String> {
        Ok("plan-mock-1".to_string())
    }

    async fn log_progress(&self, _entry: &ProgressEntry) -> Result<serde_json::Value> {
        Ok(json!({ "success": true }))
    }

    async fn progress(&self, _user_id: Option<&str>) -> Result<serde_json::Value> {
        Ok(json!({ "success": true, "entries": [] }))
    }
}

/// Canned-response agent stub for tests and offline runs
pub struct MockAgent {
    response: String,
}

impl MockAgent {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl AgentRuntime for MockAgent {
    async fn invoke(&self, _input_text: &str, session_id: &str) -> Result<AgentReply> {
        Ok(AgentReply {
            response: self.response.clone(),
            session_id: session_id.to_string(),
            tool_calls: vec![ToolCall {
                action_group: Some("onboarding-tools".to_string()),
                function: Some("get_tickets".to_string()),
            }],
        })
    }
}
