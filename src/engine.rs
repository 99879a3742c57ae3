//! Request orchestrator for the standup mapping and agent flows

use crate::mapping;
use crate::ranking;
use crate::services::{AgentRuntime, ReferenceData, TranscriptionService};
use crate::types::{
    AgentReply, DocFetch, Glossary, PlanOutcome, ProgressEntry, StandupMapping, Ticket,
    TutorialVideo,
};
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tracing::info;

/// Upstream collaborator failures, surfaced to the caller as structured
/// errors. The mapping core is never invoked with known-bad inputs.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("transcription failed: {0}")]
    Transcription(anyhow::Error),
    #[error("reference data fetch failed ({what}): {cause}")]
    Reference {
        what: &'static str,
        cause: anyhow::Error,
    },
    #[error("agent invocation failed: {0}")]
    Agent(anyhow::Error),
}

/// Main orchestrator (thread-safe via Arc). Collaborators are injected at
/// construction; mapping functions take plain data only.
pub struct StandupEngine {
    transcription: Box<dyn TranscriptionService>,
    reference: Box<dyn ReferenceData>,
    agent: Box<dyn AgentRuntime>,
}

pub type SharedEngine = Arc<StandupEngine>;

impl StandupEngine {
    pub fn new(
        transcription: Box<dyn TranscriptionService>,
        reference: Box<dyn ReferenceData>,
        agent: Box<dyn AgentRuntime>,
    ) -> SharedEngine {
        Arc::new(Self {
            transcription,
            reference,
            agent,
        })
    }

    /// Transcribe an uploaded recording without further processing
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UpstreamError> {
        self.transcription
            .transcribe(audio, content_type)
            .await
            .map_err(UpstreamError::Transcription)
    }

    /// Main entry point: transcribe an upload, fetch the reference
    /// collections, and run the mapping core over the transcript.
    pub async fn process_upload(
        &self,
        audio: Vec<u8>,
        content_type: &str,
        user_id: String,
    ) -> Result<StandupMapping, UpstreamError> {
        let start = Instant::now();

        info!(
            "Processing upload: {} bytes, user_id={}",
            audio.len(),
            user_id
        );

        let transcript = self.transcribe(audio, content_type).await?;
        info!("Transcription complete: {} chars", transcript.len());

        // Independent collections, fetched concurrently. Mapping only
        // starts once every fetch has succeeded.
        let (tickets, glossary, doc, tutorials) = self.fetch_reference_collections().await?;

        let mapping = build_mapping(transcript, &tickets, &glossary, &doc, &tutorials, user_id);

        info!(
            "Mapping complete in {}ms: {} tickets, {} terms, {} docs, {} tutorials",
            start.elapsed().as_millis(),
            mapping.mapped_tickets.len(),
            mapping.technical_terms.len(),
            mapping.mapped_docs.len(),
            mapping.mapped_tutorials.len()
        );

        Ok(mapping)
    }

    /// Hand a standup transcript to the agent for autonomous processing.
    /// A fresh session id is minted when none is supplied.
    pub async fn process_standup(
        &self,
        transcript: &str,
        user_id: &str,
        session_id: Option<String>,
    ) -> Result<AgentReply, UpstreamError> {
        let session_id = session_id.unwrap_or_else(new_session_id);
        let prompt = standup_prompt(user_id, transcript);

        info!(
            "Processing standup with agent: user_id={}, session={}, transcript={} chars",
            user_id,
            session_id,
            transcript.len()
        );

        let reply = self
            .agent
            .invoke(&prompt, &session_id)
            .await
            .map_err(UpstreamError::Agent)?;

        info!(
            "Agent completed: {} chars, {} tool calls",
            reply.response.len(),
            reply.tool_calls.len()
        );

        Ok(reply)
    }

    /// Continue an existing agent conversation
    pub async fn continue_chat(
        &self,
        message: &str,
        session_id: &str,
    ) -> Result<AgentReply, UpstreamError> {
        self.agent
            .invoke(message, session_id)
            .await
            .map_err(UpstreamError::Agent)
    }

    /// Generate a personalized onboarding plan from the architecture doc,
    /// ticket list, and compliance requirements, then persist it.
    pub async fn generate_plan(
        &self,
        role: &str,
        background: &str,
    ) -> Result<PlanOutcome, UpstreamError> {
        info!("Generating onboarding plan: role={}", role);

        let (doc, tickets, compliance) = futures::join!(
            self.reference.fetch_doc(mapping::ARCHITECTURE_DOC),
            self.reference.tickets(),
            self.reference.compliance_requirements(),
        );
        let doc = doc.map_err(|e| UpstreamError::Reference {
            what: "docs",
            cause: e,
        })?;
        let tickets = tickets.map_err(|e| UpstreamError::Reference {
            what: "tickets",
            cause: e,
        })?;
        let compliance = compliance.map_err(|e| UpstreamError::Reference {
            what: "compliance",
            cause: e,
        })?;

        let prompt = plan_prompt(
            role,
            background,
            doc.content.as_deref().unwrap_or_default(),
            &tickets,
            &compliance.requirements,
        );

        let reply = self
            .agent
            .invoke(&prompt, &new_session_id())
            .await
            .map_err(UpstreamError::Agent)?;

        let plan = extract_json_object(&reply.response)
            .unwrap_or_else(|| serde_json::json!({ "days": [] }));

        let plan_id = self
            .reference
            .write_plan(&plan)
            .await
            .map_err(|e| UpstreamError::Reference {
                what: "write_plan",
                cause: e,
            })?;

        info!("Plan saved: {}", plan_id);

        Ok(PlanOutcome { plan, plan_id })
    }

    /// Log a daily progress entry via the tools service
    pub async fn log_progress(
        &self,
        entry: &ProgressEntry,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.reference
            .log_progress(entry)
            .await
            .map_err(|e| UpstreamError::Reference {
                what: "log_progress",
                cause: e,
            })
    }

    /// Read progress entries for the manager dashboard
    pub async fn progress(
        &self,
        user_id: Option<&str>,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.reference
            .progress(user_id)
            .await
            .map_err(|e| UpstreamError::Reference {
                what: "progress",
                cause: e,
            })
    }

    async fn fetch_reference_collections(
        &self,
    ) -> Result<(Vec<Ticket>, Glossary, DocFetch, Vec<TutorialVideo>), UpstreamError> {
        let (tickets, glossary, doc, tutorials) = futures::join!(
            self.reference.tickets(),
            self.reference.glossary(),
            self.reference.fetch_doc(mapping::ARCHITECTURE_DOC),
            self.reference.tutorials(),
        );

        Ok((
            tickets.map_err(|e| UpstreamError::Reference {
                what: "tickets",
                cause: e,
            })?,
            glossary.map_err(|e| UpstreamError::Reference {
                what: "glossary",
                cause: e,
            })?,
            doc.map_err(|e| UpstreamError::Reference {
                what: "docs",
                cause: e,
            })?,
            tutorials.map_err(|e| UpstreamError::Reference {
                what: "tutorials",
                cause: e,
            })?,
        ))
    }
}

/// Run the full mapping core over one transcript. Pure; exposed for tests.
pub fn build_mapping(
    transcript: String,
    tickets: &[Ticket],
    glossary: &Glossary,
    doc: &DocFetch,
    tutorials: &[TutorialVideo],
    user_id: String,
) -> StandupMapping {
    let normalized = mapping::normalize_transcript(&transcript);

    let mapped_tickets = mapping::map_tickets(&normalized, tickets);
    let technical_terms = mapping::extract_terms(&normalized, glossary);
    let mapped_docs = mapping::map_docs(doc);

    let matched_ids: Vec<String> = mapped_tickets.iter().map(|t| t.id.clone()).collect();
    let mapped_tutorials = ranking::rank_tutorials(&normalized, &matched_ids, tutorials);

    StandupMapping {
        transcript,
        mapped_tickets,
        technical_terms,
        mapped_docs,
        mapped_tutorials,
        user_id,
    }
}

fn new_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_millis();
    format!("session-{}", millis)
}

fn standup_prompt(user_id: &str, transcript: &str) -> String {
    format!(
        "Process this standup transcript for new joiner \"{user_id}\":\n\
         \n\
         {transcript}\n\
         \n\
         Please:\n\
         1. Use get_tickets() to see available tasks\n\
         2. Use get_docs() to understand the architecture\n\
         3. Use get_glossary() to explain technical terms\n\
         4. Generate a beginner-friendly summary\n\
         5. Use write_summary() to save the result\n\
         \n\
         Focus on what the new joiner should know and do."
    )
}

fn plan_prompt(
    role: &str,
    background: &str,
    architecture: &str,
    tickets: &[Ticket],
    compliance: &[serde_json::Value],
) -> String {
    let tickets_json = serde_json::to_string_pretty(tickets).unwrap_or_default();
    let compliance_json = serde_json::to_string_pretty(compliance).unwrap_or_default();

    format!(
        "You are an AI onboarding assistant. Generate a personalized 14-day onboarding plan.\n\
         \n\
         Role: {role}\n\
         Engineer Background: {background}\n\
         \n\
         Architecture Overview:\n\
         {architecture}\n\
         \n\
         Available Starter Tickets:\n\
         {tickets_json}\n\
         \n\
         Compliance Requirements:\n\
         {compliance_json}\n\
         \n\
         Generate a structured 14-day plan with daily learning goals, specific tasks from \
         the tickets, compliance items integrated naturally, and checkpoints. Return as JSON \
         with a top-level \"days\" array."
    )
}

/// Extract the first top-level JSON object embedded in free text
pub fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}
