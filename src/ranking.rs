//! Relevance ranking for tutorial videos

use crate::types::{Difficulty, TutorialVideo};

/// Upper bound on ranked tutorials returned per request
pub const MAX_TUTORIALS: usize = 5;

const RELATED_TICKET_BONUS: i32 = 50;
const KEYWORD_HIT_BONUS: i32 = 10;
const BEGINNER_BONUS: i32 = 5;

/// Rank tutorial videos by relevance to the transcript and matched tickets.
///
/// Videos scoring zero are dropped; the rest are sorted by descending score
/// (stable, so ties keep the original collection order) and truncated to
/// [`MAX_TUTORIALS`]. The score itself is not part of the output.
pub fn rank_tutorials(
    transcript: &str,
    matched_ticket_ids: &[String],
    videos: &[TutorialVideo],
) -> Vec<TutorialVideo> {
    let mut scored: Vec<(i32, &TutorialVideo)> = videos
        .iter()
        .map(|video| (relevance_score(transcript, matched_ticket_ids, video), video))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(MAX_TUTORIALS);

    scored.into_iter().map(|(_, video)| video.clone()).collect()
}

/// Compute the relevance score for one video: 50 for overlap with the
/// matched tickets, 10 per keyword found in the transcript, 5 for
/// beginner difficulty.
pub fn relevance_score(
    transcript: &str,
    matched_ticket_ids: &[String],
    video: &TutorialVideo,
) -> i32 {
    let mut score = 0;

    if video
        .related_tickets
        .iter()
        .any(|id| matched_ticket_ids.contains(id))
    {
        score += RELATED_TICKET_BONUS;
    }

    let keyword_hits = video
        .keywords
        .iter()
        .filter(|keyword| transcript.contains(&keyword.to_lowercase()))
        .count() as i32;
    score += keyword_hits * KEYWORD_HIT_BONUS;

    if video.difficulty == Difficulty::Beginner {
        score += BEGINNER_BONUS;
    }

    score
}
