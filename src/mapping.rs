//! Transcript-to-entity mapping heuristics
//!
//! Pure, synchronous functions over plain data. Callers lower-case the
//! transcript once via [`normalize_transcript`] and pass it to each mapper.

use crate::types::{DocFetch, DocRef, Glossary, Priority, Ticket};

/// Glossary terms surfaced when the transcript mentions none
pub const DEFAULT_TERMS: [&str; 5] = ["API Gateway", "Lambda", "DynamoDB", "S3", "Node.js"];

/// Document always fetched for the mapping flow
pub const ARCHITECTURE_DOC: &str = "architecture_overview.md";

/// Second, hardcoded documentation entry
pub const ONBOARDING_GUIDE: &str = "onboarding_guide.md";

const DEFAULT_DOC_SOURCE: &str = "S3 Documentation";

/// How many highest-priority tickets to return when nothing matches
const FALLBACK_TICKET_LIMIT: usize = 3;

/// Title words at or below this length are ignored when matching
const MIN_TITLE_WORD_LEN: usize = 4;

/// Title-word hits required to count a ticket as implied
const MIN_TITLE_WORD_HITS: usize = 2;

/// Lower-case a transcript for case-insensitive substring search.
/// No stemming or tokenization; empty input yields empty output.
pub fn normalize_transcript(transcript: &str) -> String {
    transcript.to_lowercase()
}

/// Select tickets mentioned or implied by the transcript.
///
/// A ticket matches when its id appears as a substring, or when at least
/// two words of its title longer than four characters do. Output preserves
/// the input collection order; no relevance ranking is applied. When
/// nothing matches, up to three `High` priority tickets are returned
/// instead of an empty result.
pub fn map_tickets(transcript: &str, tickets: &[Ticket]) -> Vec<Ticket> {
    let mapped: Vec<Ticket> = tickets
        .iter()
        .filter(|t| ticket_matches(transcript, t))
        .cloned()
        .collect();

    if mapped.is_empty() {
        return tickets
            .iter()
            .filter(|t| t.priority == Priority::High)
            .take(FALLBACK_TICKET_LIMIT)
            .cloned()
            .collect();
    }

    mapped
}

fn ticket_matches(transcript: &str, ticket: &Ticket) -> bool {
    if transcript.contains(&ticket.id.to_lowercase()) {
        return true;
    }

    let hits = ticket
        .title
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.len() > MIN_TITLE_WORD_LEN && transcript.contains(*word))
        .count();

    hits >= MIN_TITLE_WORD_HITS
}

/// Collect glossary terms present in the transcript.
///
/// Keys of the result are always a subset of the input glossary's keys.
/// When no term is present, the fixed [`DEFAULT_TERMS`] list is used,
/// skipping defaults absent from the source glossary.
pub fn extract_terms(transcript: &str, glossary: &Glossary) -> Glossary {
    let mut found: Glossary = glossary
        .iter()
        .filter(|(term, _)| transcript.contains(&term.to_lowercase()))
        .map(|(term, def)| (term.clone(), def.clone()))
        .collect();

    if found.is_empty() {
        for term in DEFAULT_TERMS {
            if let Some(def) = glossary.get(term) {
                found.insert(term.to_string(), def.clone());
            }
        }
    }

    found
}

/// Emit the fixed documentation pair: the architecture overview (taken
/// from the fetch result, static defaults when the fetch failed) followed
/// by the onboarding guide. Not transcript-driven.
pub fn map_docs(doc: &DocFetch) -> Vec<DocRef> {
    let architecture = if doc.success {
        DocRef {
            name: doc
                .doc_name
                .clone()
                .unwrap_or_else(|| ARCHITECTURE_DOC.to_string()),
            source: doc
                .source
                .clone()
                .unwrap_or_else(|| DEFAULT_DOC_SOURCE.to_string()),
        }
    } else {
        DocRef {
            name: ARCHITECTURE_DOC.to_string(),
            source: DEFAULT_DOC_SOURCE.to_string(),
        }
    };

    vec![
        architecture,
        DocRef {
            name: ONBOARDING_GUIDE.to_string(),
            source: DEFAULT_DOC_SOURCE.to_string(),
        },
    ]
}
