/// HTTP client for the managed agent runtime
///
/// The runtime answers an invocation with a streamed body of
/// newline-delimited JSON events: text chunks interleaved with
/// tool-invocation traces. The stream is accumulated to a final
/// response string before returning.
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::services::AgentRuntime;
use crate::types::{AgentReply, ToolCall};

#[derive(Debug, Clone)]
pub struct AgentClient {
    base_url: String,
    agent_id: String,
    agent_alias_id: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    agent_id: &'a str,
    agent_alias_id: &'a str,
    session_id: &'a str,
    input_text: &'a str,
}

/// One event on the completion stream
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(default)]
    chunk: Option<ChunkEvent>,
    #[serde(default)]
    trace: Option<TraceEvent>,
}

#[derive(Debug, Deserialize)]
struct ChunkEvent {
    text: String,
}

#[derive(Debug, Deserialize)]
struct TraceEvent {
    #[serde(default)]
    action_group: Option<String>,
    #[serde(default)]
    function: Option<String>,
}

/// Accumulates streamed agent events into the final response text,
/// collecting tool-invocation traces along the way. Events may arrive
/// split across arbitrary chunk boundaries.
#[derive(Debug, Default)]
pub struct EventAccumulator {
    buf: String,
    response: String,
    tool_calls: Vec<ToolCall>,
}

impl EventAccumulator {
    pub fn push_chunk(&mut self, data: &str) {
        self.buf.push_str(data);
        while let Some(pos) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=pos).collect();
            self.consume_line(line.trim());
        }
    }

    pub fn finish(mut self) -> (String, Vec<ToolCall>) {
        let rest = std::mem::take(&mut self.buf);
        self.consume_line(rest.trim());
        (self.response, self.tool_calls)
    }

    fn consume_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }

        match serde_json::from_str::<StreamEvent>(line) {
            Ok(event) => {
                if let Some(chunk) = event.chunk {
                    self.response.push_str(&chunk.text);
                }
                if let Some(trace) = event.trace {
                    self.tool_calls.push(ToolCall {
                        action_group: trace.action_group,
                        function: trace.function,
                    });
                }
            }
            Err(e) => warn!("Skipping malformed agent event: {}", e),
        }
    }
}

impl AgentClient {
    /// Create a new agent client. Agent ids are opaque identifiers.
    pub fn new(
        base_url: impl Into<String>,
        agent_id: impl Into<String>,
        agent_alias_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            agent_id: agent_id.into(),
            agent_alias_id: agent_alias_id.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AgentRuntime for AgentClient {
    async fn invoke(&self, input_text: &str, session_id: &str) -> Result<AgentReply> {
        let url = format!("{}/agent/invoke", self.base_url);
        let request = InvokeRequest {
            agent_id: &self.agent_id,
            agent_alias_id: &self.agent_alias_id,
            session_id,
            input_text,
        };

        debug!("Invoking agent {} (session {})", self.agent_id, session_id);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to reach agent runtime")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Agent runtime error {}: {}", status, body);
        }

        let mut accumulator = EventAccumulator::default();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.context("Agent completion stream interrupted")?;
            accumulator.push_chunk(&String::from_utf8_lossy(&bytes));
        }

        let (text, tool_calls) = accumulator.finish();
        debug!(
            "Agent completed: {} chars, {} tool calls",
            text.len(),
            tool_calls.len()
        );

        Ok(AgentReply {
            response: text,
            session_id: session_id.to_string(),
            tool_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_chunks_across_boundaries() {
        let mut acc = EventAccumulator::default();
        acc.push_chunk("{\"chunk\":{\"text\":\"Hello \"}}\n{\"chunk\":");
        acc.push_chunk("{\"text\":\"world\"}}\n");

        let (response, tool_calls) = acc.finish();
        assert_eq!(response, "Hello world");
        assert!(tool_calls.is_empty());
    }

    #[test]
    fn collects_trace_events() {
        let mut acc = EventAccumulator::default();
        acc.push_chunk(
            "{\"trace\":{\"action_group\":\"onboarding-tools\",\"function\":\"get_tickets\"}}\n",
        );
        acc.push_chunk("{\"chunk\":{\"text\":\"Summary\"}}");

        let (response, tool_calls) = acc.finish();
        assert_eq!(response, "Summary");
        assert_eq!(tool_calls.len(), 1);
        assert_eq!(tool_calls[0].function.as_deref(), Some("get_tickets"));
    }

    #[test]
    fn skips_malformed_lines() {
        let mut acc = EventAccumulator::default();
        acc.push_chunk("not json\n{\"chunk\":{\"text\":\"ok\"}}\n");

        let (response, _) = acc.finish();
        assert_eq!(response, "ok");
    }
}
