//! Token-set similarity: order- and duplicate-insensitive, 0-100.
//!
//! Both sides are reduced to lowercase alphanumeric tokens, split into their
//! shared and distinct token sets, and the best pairwise [`ratio`] among
//! `shared`, `shared + only_a` and `shared + only_b` is the score.
//! A name whose tokens are a subset of the query's therefore scores 100.
//!
//! [`ratio`] is the diff similarity `2 * matched / total` over characters,
//! rounded half-to-even, so the 90/75/50 tier thresholds keep their meaning.

use std::collections::BTreeSet;

use similar::{DiffOp, TextDiff};

/// Score `a` against `b` on a 0-100 scale.
///
/// Returns 0 when either side has no alphanumeric content.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a = process(a);
    let b = process(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let shared = join(tokens_a.intersection(&tokens_b).copied());
    let only_a = join(tokens_a.difference(&tokens_b).copied());
    let only_b = join(tokens_b.difference(&tokens_a).copied());

    let combined_a = format!("{shared} {only_a}").trim().to_owned();
    let combined_b = format!("{shared} {only_b}").trim().to_owned();

    ratio(&shared, &combined_a)
        .max(ratio(&shared, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

/// Character diff similarity of two strings as a rounded percentage.
///
/// `matched` is the number of characters in the equal runs of a minimal
/// character diff, `total` is the combined length of both strings.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let diff = TextDiff::from_chars(a, b);
    let matched: usize = diff
        .ops()
        .iter()
        .map(|op| match *op {
            DiffOp::Equal { len, .. } => len,
            _ => 0,
        })
        .sum();
    let total = a.chars().count() + b.chars().count();
    (200.0 * matched as f64 / total as f64).round_ties_even() as u8
}

/// Replace every non-alphanumeric character with a space, lowercase, trim.
fn process(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_owned()
}

fn join<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}
