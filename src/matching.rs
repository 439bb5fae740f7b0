//! Token-order-insensitive string similarity.
//!
//! Scores are 0-100: whitespace tokens of both strings are sorted and
//! rejoined, then compared with a normalized edit-distance ratio. Two lines
//! with the same token multiset score 100 regardless of token order.

use strsim::normalized_levenshtein;

/// Sort a string's whitespace tokens and rejoin with single spaces.
fn token_sort(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity of two strings, invariant to token order.
pub fn token_sort_ratio(a: &str, b: &str) -> u32 {
    ratio(&token_sort(a), &token_sort(b))
}

fn ratio(a_sorted: &str, b_sorted: &str) -> u32 {
    (normalized_levenshtein(a_sorted, b_sorted) * 100.0).round() as u32
}

/// Best-scoring candidate for `query`, with its score. Ties go to the
/// earliest candidate; an empty pool has no best match and callers must
/// handle `None`.
pub fn best_match<'a>(query: &str, candidates: &'a [String]) -> Option<(&'a str, u32)> {
    let query_sorted = token_sort(query);
    let mut best: Option<(&'a str, u32)> = None;
    for candidate in candidates {
        let score = ratio(&query_sorted, &token_sort(candidate));
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(token_sort_ratio("artist - title", "artist - title"), 100);
    }

    #[test]
    fn test_token_order_is_ignored() {
        assert_eq!(token_sort_ratio("title - artist", "artist - title"), 100);
        assert_eq!(token_sort_ratio("one two three", "three one two"), 100);
    }

    #[test]
    fn test_unrelated_strings_score_low() {
        assert!(token_sort_ratio("alpha - song one", "completely different") < 50);
    }

    #[test]
    fn test_near_duplicates_score_high() {
        let score = token_sort_ratio("daft punk - one more time", "daft punk - one more tyme");
        assert!(score >= 90, "score was {score}");
        assert!(score < 100);
    }

    #[test]
    fn test_best_match_picks_highest() {
        let pool = vec![
            "totally unrelated".to_string(),
            "artist - title".to_string(),
            "artist - titles".to_string(),
        ];
        let (m, score) = best_match("artist - title", &pool).unwrap();
        assert_eq!(m, "artist - title");
        assert_eq!(score, 100);
    }

    #[test]
    fn test_best_match_tie_goes_to_first() {
        let pool = vec!["beta - song".to_string(), "song - beta".to_string()];
        // Both candidates have identical token sets; the first wins.
        let (m, score) = best_match("beta - song", &pool).unwrap();
        assert_eq!(m, "beta - song");
        assert_eq!(score, 100);
    }

    #[test]
    fn test_best_match_empty_pool() {
        assert!(best_match("anything", &[]).is_none());
    }
}
