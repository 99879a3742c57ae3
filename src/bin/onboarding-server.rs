//! Onboarding copilot HTTP server binary

use onboarding_copilot::{
    AgentClient, MockAgent, MockReferenceData, MockTranscription, SpeechClient, StandupEngine,
    ToolsClient,
};
use tracing_subscriber;

mod server {
    pub use onboarding_copilot::server::*;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    println!("🚀 Onboarding Copilot");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);

    // Check for --use-mock flag
    let use_mock = std::env::args().any(|arg| arg == "--use-mock");

    let engine = if use_mock {
        println!("✓ Mode: MOCK collaborators (sample data, canned agent)");
        println!("   (omit --use-mock to talk to real services)");

        StandupEngine::new(
            Box::new(MockTranscription::new(
                "Today I worked on ticket BE-101 setting up my development environment. \
                 I got Docker installed and configured AWS CLI. Tomorrow I will work on \
                 BE-102 about the API Gateway architecture.",
            )),
            Box::new(MockReferenceData::sample()),
            Box::new(MockAgent::new(
                "Welcome aboard! Start with BE-101 and read the architecture overview.",
            )),
        )
    } else {
        println!("✓ Mode: REAL collaborators");

        let tools_url = std::env::var("TOOLS_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8090".to_string());
        let speech_url = std::env::var("SPEECH_API_URL")
            .unwrap_or_else(|_| "https://api.deepgram.com".to_string());
        let speech_key = std::env::var("SPEECH_API_KEY").unwrap_or_default();
        let agent_url = std::env::var("AGENT_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8091".to_string());
        let agent_id = std::env::var("AGENT_ID").unwrap_or_else(|_| "onboarding-agent".to_string());
        let agent_alias_id = std::env::var("AGENT_ALIAS_ID").unwrap_or_else(|_| "live".to_string());

        println!("✓ Tools service: {}", tools_url);
        println!("✓ Speech service: {}", speech_url);
        println!("✓ Agent runtime: {} (agent {})", agent_url, agent_id);

        if speech_key.is_empty() {
            eprintln!("⚠️  SPEECH_API_KEY is not set; transcription requests will be rejected");
        }

        // Test connection to the tools service
        let tools = ToolsClient::new(tools_url);
        match tools.health_check().await {
            Ok(true) => {
                println!("✓ Tools service is healthy");
            }
            Ok(false) => {
                eprintln!("⚠️  Tools service health check returned non-success");
            }
            Err(e) => {
                eprintln!("❌ Failed to connect to tools service: {}", e);
                eprintln!("   Make sure it's running, or set TOOLS_API_URL");
                return Err(e);
            }
        }

        StandupEngine::new(
            Box::new(SpeechClient::new(speech_url, speech_key)),
            Box::new(tools),
            Box::new(AgentClient::new(agent_url, agent_id, agent_alias_id)),
        )
    };

    println!("✓ Engine initialized");
    println!("✓ Starting HTTP server on port {}...", port);
    println!();

    server::run_server(engine, port).await?;

    Ok(())
}
