/// HTTP client for the speech-to-text API
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::services::TranscriptionService;

#[derive(Debug, Clone)]
pub struct SpeechClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    channels: Vec<ListenChannel>,
}

#[derive(Debug, Deserialize)]
struct ListenChannel {
    alternatives: Vec<ListenAlternative>,
}

#[derive(Debug, Deserialize)]
struct ListenAlternative {
    transcript: String,
}

impl SpeechClient {
    /// Create a new speech client. The key is passed through opaquely.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TranscriptionService for SpeechClient {
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<String> {
        let url = format!(
            "{}/v1/listen?model=nova-2&smart_format=true&punctuate=true",
            self.base_url
        );

        debug!("Transcribing {} bytes via {}", audio.len(), url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", content_type)
            .body(audio)
            .send()
            .await
            .context("Failed to reach speech service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Speech service error {}: {}", status, body);
        }

        let listen: ListenResponse = response
            .json()
            .await
            .context("Failed to parse speech service response")?;

        let transcript = listen
            .results
            .channels
            .first()
            .and_then(|channel| channel.alternatives.first())
            .map(|alt| alt.transcript.clone())
            .context("Speech service returned no transcript channel")?;

        debug!("Transcription complete ({} chars)", transcript.len());

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_transcript_payload() {
        let body = r#"{
            "results": {
                "channels": [
                    { "alternatives": [ { "transcript": "working on BE-101" } ] }
                ]
            }
        }"#;
        let parsed: ListenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.results.channels[0].alternatives[0].transcript,
            "working on BE-101"
        );
    }
}
