//! Unit tests for the mapping core and the orchestrator

use crate::engine::build_mapping;
use crate::mapping::{extract_terms, map_docs, map_tickets, normalize_transcript};
use crate::ranking::{rank_tutorials, relevance_score};
use crate::*;

/// Helper to create a ticket
fn ticket(id: &str, title: &str, priority: Priority) -> Ticket {
    Ticket {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("Description of {}", id),
        priority,
        estimated_hours: 4.0,
    }
}

/// Helper to create a tutorial video
fn video(id: &str, keywords: &[&str], difficulty: Difficulty, related: &[&str]) -> TutorialVideo {
    TutorialVideo {
        id: id.to_string(),
        title: format!("Tutorial {}", id),
        description: format!("Covers {}", keywords.join(", ")),
        duration: "10 min".to_string(),
        difficulty,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        related_tickets: related.iter().map(|r| r.to_string()).collect(),
    }
}

fn glossary_of(pairs: &[(&str, &str)]) -> Glossary {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn ticket_id_match_selects_only_mentioned_ticket() {
    let tickets = vec![
        ticket("BE-101", "Setup env", Priority::High),
        ticket("BE-102", "API Gateway", Priority::Medium),
    ];

    let transcript = normalize_transcript("Working on BE-101 today");
    let mapped = map_tickets(&transcript, &tickets);

    assert_eq!(mapped.len(), 1);
    assert_eq!(mapped[0].id, "BE-101");
}

#[test]
fn ticket_title_words_imply_match() {
    let tickets = vec![ticket(
        "BE-102",
        "Understand API Gateway architecture",
        Priority::Medium,
    )];

    // "understand" and "architecture" are both longer than 4 chars
    let transcript =
        normalize_transcript("Trying to understand the gateway architecture this week");
    let mapped = map_tickets(&transcript, &tickets);

    assert_eq!(mapped.len(), 1);

    // A single long-word hit is not enough, and the only ticket is not
    // High priority, so the fallback yields nothing either
    let transcript = normalize_transcript("Reading about architecture in general");
    assert!(map_tickets(&transcript, &tickets).is_empty());
}

#[test]
fn ticket_fallback_returns_top_high_priority_in_order() {
    let tickets = vec![
        ticket("T-1", "First", Priority::High),
        ticket("T-2", "Second", Priority::Medium),
        ticket("T-3", "Third", Priority::High),
        ticket("T-4", "Fourth", Priority::High),
        ticket("T-5", "Fifth", Priority::High),
    ];

    let transcript = normalize_transcript("Nothing relevant here");
    let mapped = map_tickets(&transcript, &tickets);

    let ids: Vec<&str> = mapped.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["T-1", "T-3", "T-4"]);
}

#[test]
fn ticket_fallback_is_empty_without_high_priority() {
    let tickets = vec![
        ticket("T-1", "First", Priority::Medium),
        ticket("T-2", "Second", Priority::Low),
    ];

    let mapped = map_tickets("nothing relevant", &tickets);
    assert!(mapped.is_empty());
}

#[test]
fn glossary_matching_is_case_insensitive_and_subset() {
    let glossary = glossary_of(&[
        ("Lambda", "Serverless compute"),
        ("DynamoDB", "NoSQL database"),
    ]);

    let transcript = normalize_transcript("We deployed a LAMBDA yesterday");
    let found = extract_terms(&transcript, &glossary);

    assert_eq!(found.len(), 1);
    assert!(found.contains_key("Lambda"));
    assert!(found.keys().all(|k| glossary.contains_key(k)));
}

#[test]
fn glossary_falls_back_to_default_terms() {
    let glossary = glossary_of(&[
        ("API Gateway", "Routes HTTP requests"),
        ("Lambda", "Serverless compute"),
        ("Kubernetes", "Container orchestration"),
    ]);

    let found = extract_terms("", &glossary);

    // Defaults intersected with the source glossary: Kubernetes is not a
    // default, DynamoDB/S3/Node.js are not in the glossary.
    assert_eq!(found.len(), 2);
    assert!(found.contains_key("API Gateway"));
    assert!(found.contains_key("Lambda"));
}

#[test]
fn docs_always_yield_two_entries_architecture_first() {
    let fetched = DocFetch {
        success: true,
        content: Some("# Overview".to_string()),
        doc_name: Some("architecture_overview.md".to_string()),
        source: Some("s3://docs/architecture_overview.md".to_string()),
    };

    let docs = map_docs(&fetched);
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].name, "architecture_overview.md");
    assert_eq!(docs[0].source, "s3://docs/architecture_overview.md");
    assert_eq!(docs[1].name, "onboarding_guide.md");
}

#[test]
fn docs_use_static_defaults_when_fetch_failed() {
    let failed = DocFetch {
        success: false,
        content: None,
        doc_name: None,
        source: None,
    };

    let docs = map_docs(&failed);
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].name, "architecture_overview.md");
    assert_eq!(docs[0].source, "S3 Documentation");
}

#[test]
fn tutorial_score_combines_keyword_and_difficulty() {
    let v = video("T1", &["docker"], Difficulty::Beginner, &[]);

    let transcript = normalize_transcript("We set up docker today");
    let score = relevance_score(&transcript, &[], &v);
    assert_eq!(score, 15); // 10 keyword + 5 beginner

    let ranked = rank_tutorials(&transcript, &[], &[v]);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].id, "T1");
}

#[test]
fn tutorial_ranker_caps_at_five_and_orders_by_score() {
    let matched = vec!["BE-101".to_string()];
    let videos = vec![
        video("V1", &["docker"], Difficulty::Advanced, &[]),          // 10
        video("V2", &["docker"], Difficulty::Beginner, &["BE-101"]),  // 65
        video("V3", &[], Difficulty::Advanced, &[]),                  // 0, dropped
        video("V4", &["docker", "aws"], Difficulty::Advanced, &[]),   // 20
        video("V5", &[], Difficulty::Beginner, &[]),                  // 5
        video("V6", &[], Difficulty::Advanced, &["BE-101"]),          // 50
        video("V7", &["aws"], Difficulty::Advanced, &[]),             // 10
    ];

    let transcript = normalize_transcript("Installed docker and configured aws today");
    let ranked = rank_tutorials(&transcript, &matched, &videos);

    assert_eq!(ranked.len(), 5);
    let ids: Vec<&str> = ranked.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["V2", "V6", "V4", "V1", "V7"]);

    let scores: Vec<i32> = ranked
        .iter()
        .map(|v| relevance_score(&transcript, &matched, v))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(scores.iter().all(|s| *s > 0));
}

#[test]
fn tutorial_ties_keep_input_order() {
    let videos = vec![
        video("A", &["docker"], Difficulty::Advanced, &[]),
        video("B", &["docker"], Difficulty::Advanced, &[]),
    ];

    let ranked = rank_tutorials("docker docker", &[], &videos);
    let ids: Vec<&str> = ranked.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[test]
fn mapping_functions_are_idempotent() {
    let tickets = vec![
        ticket("BE-101", "Setup env", Priority::High),
        ticket("BE-102", "API Gateway", Priority::Medium),
    ];
    let glossary = glossary_of(&[("Lambda", "Serverless compute")]);
    let videos = vec![video("T1", &["lambda"], Difficulty::Beginner, &["BE-101"])];
    let transcript = normalize_transcript("Worked on be-101 and a lambda function");

    assert_eq!(
        map_tickets(&transcript, &tickets),
        map_tickets(&transcript, &tickets)
    );
    assert_eq!(
        extract_terms(&transcript, &glossary),
        extract_terms(&transcript, &glossary)
    );
    let matched = vec!["BE-101".to_string()];
    assert_eq!(
        rank_tutorials(&transcript, &matched, &videos),
        rank_tutorials(&transcript, &matched, &videos)
    );
}

#[test]
fn build_mapping_wires_matched_tickets_into_ranker() {
    let reference = MockReferenceData::sample();
    let transcript = "Working on BE-101 today and learning docker".to_string();

    let mapping = build_mapping(
        transcript,
        &reference.tickets,
        &reference.glossary,
        reference.doc.as_ref().unwrap(),
        &reference.tutorials,
        "new_engineer".to_string(),
    );

    assert_eq!(mapping.mapped_tickets.len(), 1);
    assert_eq!(mapping.mapped_tickets[0].id, "BE-101");
    // T1 relates to BE-101 and mentions docker; the others score zero
    assert_eq!(mapping.mapped_tutorials.len(), 1);
    assert_eq!(mapping.mapped_tutorials[0].id, "T1");
    assert_eq!(mapping.mapped_docs.len(), 2);
}

#[tokio::test]
async fn test_end_to_end_upload() {
    let engine = StandupEngine::new(
        Box::new(MockTranscription::new(
            "Working on BE-101 today and learning docker",
        )),
        Box::new(MockReferenceData::sample()),
        Box::new(MockAgent::new("summary")),
    );

    let mapping = engine
        .process_upload(vec![0u8; 16], "audio/mp4", "alex".to_string())
        .await
        .unwrap();

    assert_eq!(mapping.user_id, "alex");
    assert_eq!(mapping.transcript, "Working on BE-101 today and learning docker");
    assert_eq!(mapping.mapped_tickets.len(), 1);
    assert_eq!(mapping.mapped_tickets[0].id, "BE-101");
    // No glossary term appears in the transcript, so defaults fire
    assert!(mapping.technical_terms.contains_key("Lambda"));
    assert!(mapping
        .technical_terms
        .keys()
        .all(|k| MockReferenceData::sample().glossary.contains_key(k)));
    assert_eq!(mapping.mapped_docs[0].name, "architecture_overview.md");
    assert!(mapping.mapped_tutorials.len() <= 5);
}

#[tokio::test]
async fn test_transcription_failure_is_surfaced() {
    let engine = StandupEngine::new(
        Box::new(MockTranscription::failing()),
        Box::new(MockReferenceData::sample()),
        Box::new(MockAgent::new("summary")),
    );

    let result = engine
        .process_upload(vec![0u8; 16], "audio/mp4", "alex".to_string())
        .await;

    assert!(matches!(result, Err(UpstreamError::Transcription(_))));
}

#[tokio::test]
async fn test_standup_mints_session_id() {
    let engine = StandupEngine::new(
        Box::new(MockTranscription::new("unused")),
        Box::new(MockReferenceData::sample()),
        Box::new(MockAgent::new("Welcome aboard")),
    );

    let reply = engine
        .process_standup("Working on BE-101", "new_joiner", None)
        .await
        .unwrap();

    assert!(reply.session_id.starts_with("session-"));
    assert_eq!(reply.response, "Welcome aboard");

    // An explicit session id is preserved for continuation
    let reply = engine
        .continue_chat("What next?", "session-42")
        .await
        .unwrap();
    assert_eq!(reply.session_id, "session-42");
}

#[tokio::test]
async fn test_generate_plan_persists_extracted_json() {
    let engine = StandupEngine::new(
        Box::new(MockTranscription::new("unused")),
        Box::new(MockReferenceData::sample()),
        Box::new(MockAgent::new(
            "Here is your plan: {\"days\": [{\"day\": 1, \"title\": \"Setup\"}]}",
        )),
    );

    let outcome = engine
        .generate_plan("Backend Engineer", "3 years of Python")
        .await
        .unwrap();

    assert_eq!(outcome.plan_id, "plan-mock-1");
    assert_eq!(outcome.plan["days"][0]["day"], 1);
}
