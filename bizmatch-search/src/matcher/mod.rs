//! Matcher: score candidates against the raw query and pick a primary match.
//!
//! Candidates are scored with [`similarity::token_set_ratio`], cut to the
//! best `top_k` (stable, so ties keep directory order), and handed to the
//! rule table in [`policy`].

pub mod policy;
pub mod similarity;

use crate::config::MatchConfig;
use crate::types::{Candidate, MatchDecision, MatchScore};

/// Rank `candidates` against `raw_query` with the token-set metric.
///
/// The query is scored as typed; the metric handles case and punctuation.
/// An empty candidate list yields an empty decision without scoring.
pub fn rank(raw_query: &str, candidates: &[Candidate], config: &MatchConfig) -> MatchDecision {
    rank_with(raw_query, candidates, config, similarity::token_set_ratio)
}

/// [`rank`] with a caller-supplied scorer, called as
/// `scorer(raw_query, candidate.normalized_name)`.
pub fn rank_with<F>(
    raw_query: &str,
    candidates: &[Candidate],
    config: &MatchConfig,
    scorer: F,
) -> MatchDecision
where
    F: Fn(&str, &str) -> u8,
{
    if candidates.is_empty() {
        tracing::debug!("no candidates to rank");
        return MatchDecision::default();
    }

    let ranked = top_scores(raw_query, candidates, config.top_k, scorer);
    let outcome = policy::decide(&ranked, &config.thresholds);

    tracing::debug!(
        tier = %outcome.tier,
        candidates = candidates.len(),
        top_score = ranked.first().map(|s| s.score),
        suggestions = outcome.suggestions.len(),
        "match decided"
    );

    MatchDecision {
        primary: outcome.primary.map(|i| candidates[i].clone()),
        suggestions: outcome
            .suggestions
            .iter()
            .map(|&i| candidates[i].clone())
            .collect(),
    }
}

/// Score every candidate and keep the best `top_k`, best first.
pub fn top_scores<F>(
    raw_query: &str,
    candidates: &[Candidate],
    top_k: usize,
    scorer: F,
) -> Vec<MatchScore>
where
    F: Fn(&str, &str) -> u8,
{
    let mut scores: Vec<MatchScore> = candidates
        .iter()
        .enumerate()
        .map(|(candidate_index, candidate)| MatchScore {
            candidate_index,
            score: scorer(raw_query, &candidate.normalized_name),
        })
        .collect();

    // sort_by is stable: equal scores stay in directory order.
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(top_k);
    scores
}
