/// HTTP client for the reference-data / tools service
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::services::ReferenceData;
use crate::types::{ComplianceInfo, DocFetch, Glossary, ProgressEntry, Ticket, TutorialVideo};

#[derive(Debug, Clone)]
pub struct ToolsClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TicketsEnvelope {
    success: bool,
    #[serde(default)]
    tickets: Vec<Ticket>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlossaryEnvelope {
    success: bool,
    #[serde(default)]
    glossary: Glossary,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TutorialsEnvelope {
    success: bool,
    #[serde(default)]
    videos: Vec<TutorialVideo>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComplianceEnvelope {
    success: bool,
    #[serde(default)]
    framework: String,
    #[serde(default)]
    requirements: Vec<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanEnvelope {
    success: bool,
    #[serde(default)]
    plan_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ToolsClient {
    /// Create a new tools client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tools API error {}: {}", status, body);
        }

        Ok(response)
    }

    fn envelope_err(what: &str, error: Option<String>) -> anyhow::Error {
        anyhow::anyhow!(
            "Tools API reported failure for {}: {}",
            what,
            error.unwrap_or_else(|| "unknown error".to_string())
        )
    }

    /// Health check
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl ReferenceData for ToolsClient {
    async fn tickets(&self) -> Result<Vec<Ticket>> {
        let envelope: TicketsEnvelope = self
            .get("/tools/get_tickets")
            .await?
            .json()
            .await
            .context("Failed to parse tickets response")?;

        if !envelope.success {
            return Err(Self::envelope_err("tickets", envelope.error));
        }

        debug!("Retrieved {} tickets", envelope.tickets.len());
        Ok(envelope.tickets)
    }

    async fn glossary(&self) -> Result<Glossary> {
        let envelope: GlossaryEnvelope = self
            .get("/tools/get_glossary")
            .await?
            .json()
            .await
            .context("Failed to parse glossary response")?;

        if !envelope.success {
            return Err(Self::envelope_err("glossary", envelope.error));
        }

        debug!("Retrieved glossary with {} terms", envelope.glossary.len());
        Ok(envelope.glossary)
    }

    async fn tutorials(&self) -> Result<Vec<TutorialVideo>> {
        let envelope: TutorialsEnvelope = self
            .get("/tools/get_tutorial_videos")
            .await?
            .json()
            .await
            .context("Failed to parse tutorials response")?;

        if !envelope.success {
            return Err(Self::envelope_err("tutorials", envelope.error));
        }

        debug!("Retrieved {} tutorial videos", envelope.videos.len());
        Ok(envelope.videos)
    }

    async fn fetch_doc(&self, doc_name: &str) -> Result<DocFetch> {
        // A failed fetch is a valid payload here: the doc mapper falls
        // back to static defaults when success is false.
        let path = format!("/tools/get_docs?doc_name={}", urlencoding::encode(doc_name));
        let doc: DocFetch = self
            .get(&path)
            .await?
            .json()
            .await
            .context("Failed to parse document response")?;

        debug!("Fetched doc {} (success={})", doc_name, doc.success);
        Ok(doc)
    }

    async fn compliance_requirements(&self) -> Result<ComplianceInfo> {
        let envelope: ComplianceEnvelope = self
            .get("/tools/get_compliance_requirements")
            .await?
            .json()
            .await
            .context("Failed to parse compliance response")?;

        if !envelope.success {
            return Err(Self::envelope_err("compliance", envelope.error));
        }

        Ok(ComplianceInfo {
            framework: envelope.framework,
            requirements: envelope.requirements,
        })
    }

    async fn write_plan(&self, plan: &serde_json::Value) -> Result<String> {
        let url = format!("{}/tools/write_plan", self.base_url);
        debug!("Saving onboarding plan via {}", url);

        let response = self.client.post(&url).json(plan).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tools API error {}: {}", status, body);
        }

        let envelope: PlanEnvelope = response
            .json()
            .await
            .context("Failed to parse plan write response")?;

        if !envelope.success {
            return Err(Self::envelope_err("write_plan", envelope.error));
        }

        envelope
            .plan_id
            .context("Plan write response missing planId")
    }

    async fn log_progress(&self, entry: &ProgressEntry) -> Result<serde_json::Value> {
        let url = format!("{}/tools/log_progress", self.base_url);

        let response = self.client.post(&url).json(entry).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tools API error {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse progress log response")
    }

    async fn progress(&self, user_id: Option<&str>) -> Result<serde_json::Value> {
        let path = match user_id {
            Some(id) => format!("/tools/get_progress?user_id={}", urlencoding::encode(id)),
            None => "/tools/get_progress".to_string(),
        };

        self.get(&path)
            .await?
            .json()
            .await
            .context("Failed to parse progress response")
    }
}
