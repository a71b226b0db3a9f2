//! Tiered decision policy over ranked scores.
//!
//! The policy is an ordered rule table: the first rule whose predicate holds
//! for the top score picks the primary match and the suggestions. Scores are
//! expected best-first; every threshold comparison is strict.

use crate::config::MatchThresholds;
use crate::types::{MatchScore, Tier};

/// What the policy chose, as candidate indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyOutcome {
    pub tier: Tier,
    pub primary: Option<usize>,
    pub suggestions: Vec<usize>,
}

struct TierRule {
    tier: Tier,
    applies: fn(top: u8, thresholds: &MatchThresholds) -> bool,
    select: fn(ranked: &[MatchScore], thresholds: &MatchThresholds) -> Selection,
}

struct Selection {
    primary: Option<usize>,
    suggestions: Vec<usize>,
}

static RULES: [TierRule; 3] = [
    TierRule {
        tier: Tier::Confident,
        applies: above_high,
        select: select_confident,
    },
    TierRule {
        tier: Tier::Probable,
        applies: above_medium,
        select: select_probable,
    },
    TierRule {
        tier: Tier::Uncertain,
        applies: always,
        select: select_uncertain,
    },
];

/// Apply the rule table to `ranked` (best first, already cut to top-K).
///
/// An empty slice is [`Tier::Uncertain`] with nothing selected.
pub fn decide(ranked: &[MatchScore], thresholds: &MatchThresholds) -> PolicyOutcome {
    let Some(top) = ranked.first() else {
        return PolicyOutcome {
            tier: Tier::Uncertain,
            primary: None,
            suggestions: Vec::new(),
        };
    };

    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(top.score, thresholds))
        .unwrap_or(&RULES[RULES.len() - 1]);
    let selection = (rule.select)(ranked, thresholds);

    PolicyOutcome {
        tier: rule.tier,
        primary: selection.primary,
        suggestions: selection.suggestions,
    }
}

fn above_high(top: u8, t: &MatchThresholds) -> bool {
    top > t.high
}

fn above_medium(top: u8, t: &MatchThresholds) -> bool {
    top > t.medium
}

fn always(_top: u8, _t: &MatchThresholds) -> bool {
    true
}

/// Primary is the top hit; runners-up are suggested only if the second
/// best is itself confident, and then only the confident ones.
fn select_confident(ranked: &[MatchScore], t: &MatchThresholds) -> Selection {
    let runners_up = &ranked[1..];
    let suggestions = match runners_up.first() {
        Some(second) if second.score > t.high => indices_above(runners_up, t.high),
        _ => Vec::new(),
    };
    Selection {
        primary: Some(ranked[0].candidate_index),
        suggestions,
    }
}

/// Primary is the top hit; runners-up above the floor are suggested unless
/// there is no runner-up or the second best is below the floor.
fn select_probable(ranked: &[MatchScore], t: &MatchThresholds) -> Selection {
    let runners_up = &ranked[1..];
    let suggestions = match runners_up.first() {
        None => Vec::new(),
        Some(second) if second.score < t.floor => Vec::new(),
        Some(_) => indices_above(runners_up, t.floor),
    };
    Selection {
        primary: Some(ranked[0].candidate_index),
        suggestions,
    }
}

/// No primary; everything above the floor, top hit included, is suggested.
fn select_uncertain(ranked: &[MatchScore], t: &MatchThresholds) -> Selection {
    Selection {
        primary: None,
        suggestions: indices_above(ranked, t.floor),
    }
}

fn indices_above(scores: &[MatchScore], threshold: u8) -> Vec<usize> {
    scores
        .iter()
        .filter(|s| s.score > threshold)
        .map(|s| s.candidate_index)
        .collect()
}
