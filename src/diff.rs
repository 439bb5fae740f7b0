//! Fuzzy set differ.
//!
//! Given two line lists, reports lines whose normalized form has no exact
//! match on the other side and whose best fuzzy score stays below the
//! configured threshold. Exact normalized matches are elided outright via a
//! set-membership prefilter; only the residue is fuzzy-matched, each
//! candidate against the full normalized opposite list. That fuzzy pass is
//! O(n*m) in the worst case and dominates the cost; there is no indexing or
//! pruning beyond the prefilter.

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::matching;
use crate::normalize::normalize;
use crate::progress::create_progress_bar;

/// A line present on one side only, with its closest fuzzy match (if the
/// opposite list was non-empty) and the similarity score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub line: String,
    pub best_match: Option<String>,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub similarity_threshold: u32,
    pub strip_leading_numbers: bool,
    pub thread_cap: usize,
}

#[derive(Debug)]
pub struct DiffOutcome {
    pub only_in_main: Vec<DiffRecord>,
    pub only_in_new: Vec<DiffRecord>,
    pub threads_used: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Score,
    Default,
}

impl SortMode {
    /// "score" sorts by (score, line); anything else sorts by line alone.
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("score") {
            SortMode::Score
        } else {
            SortMode::Default
        }
    }
}

/// Resolve the configured worker cap to an actual thread count:
/// 0 = all available cores minus one, 1 = sequential, >1 = capped at 8.
pub fn resolve_thread_count(thread_cap: usize) -> usize {
    if thread_cap == 0 {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        cpus.saturating_sub(1).max(1)
    } else if thread_cap == 1 {
        1
    } else {
        thread_cap.min(8)
    }
}

/// One fuzzy evaluation. Pure: reads immutable inputs, returns a value, so
/// scheduling across workers cannot change the result set.
fn evaluate(raw: &str, norm: &str, opposite: &[String], threshold: u32) -> Option<DiffRecord> {
    match matching::best_match(norm, opposite) {
        Some((_, score)) if score >= threshold => None,
        Some((m, score)) => Some(DiffRecord {
            line: raw.to_string(),
            best_match: Some(m.to_string()),
            score,
        }),
        // Empty opposite list: nothing to be fuzzy-equivalent to.
        None => Some(DiffRecord {
            line: raw.to_string(),
            best_match: None,
            score: 0,
        }),
    }
}

pub fn compare_lists(
    main_raw: &[String],
    new_raw: &[String],
    opts: &DiffOptions,
) -> Result<DiffOutcome> {
    let main_norm: Vec<String> = main_raw
        .iter()
        .map(|l| normalize(l, opts.strip_leading_numbers))
        .collect();
    let new_norm: Vec<String> = new_raw
        .iter()
        .map(|l| normalize(l, opts.strip_leading_numbers))
        .collect();

    let main_set: FxHashSet<&str> = main_norm.iter().map(String::as_str).collect();
    let new_set: FxHashSet<&str> = new_norm.iter().map(String::as_str).collect();

    // Exact normalized matches never reach the fuzzy pass, whatever their score.
    let candidates_main: Vec<(&str, &str)> = main_raw
        .iter()
        .zip(&main_norm)
        .filter(|(_, norm)| !new_set.contains(norm.as_str()))
        .map(|(raw, norm)| (raw.as_str(), norm.as_str()))
        .collect();
    let candidates_new: Vec<(&str, &str)> = new_raw
        .iter()
        .zip(&new_norm)
        .filter(|(_, norm)| !main_set.contains(norm.as_str()))
        .map(|(raw, norm)| (raw.as_str(), norm.as_str()))
        .collect();

    let threads = resolve_thread_count(opts.thread_cap);
    let threshold = opts.similarity_threshold;
    let total = (candidates_main.len() + candidates_new.len()) as u64;
    let pb = create_progress_bar(total, "Fuzzy matching");

    let (only_in_main, only_in_new) = if threads == 1 {
        let main = candidates_main
            .iter()
            .filter_map(|&(raw, norm)| {
                let rec = evaluate(raw, norm, &new_norm, threshold);
                pb.inc(1);
                rec
            })
            .collect();
        let new = candidates_new
            .iter()
            .filter_map(|&(raw, norm)| {
                let rec = evaluate(raw, norm, &main_norm, threshold);
                pb.inc(1);
                rec
            })
            .collect();
        (main, new)
    } else {
        // Scoped pool so the cap applies per invocation. Results are
        // gathered through rayon's collect, never pushed to shared state.
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.install(|| {
            let main = candidates_main
                .par_iter()
                .filter_map(|&(raw, norm)| {
                    let rec = evaluate(raw, norm, &new_norm, threshold);
                    pb.inc(1);
                    rec
                })
                .collect();
            let new = candidates_new
                .par_iter()
                .filter_map(|&(raw, norm)| {
                    let rec = evaluate(raw, norm, &main_norm, threshold);
                    pb.inc(1);
                    rec
                })
                .collect();
            (main, new)
        })
    };
    pb.finish_and_clear();

    Ok(DiffOutcome {
        only_in_main,
        only_in_new,
        threads_used: threads,
    })
}

/// Stable, total ordering of diff records. Parallel collection order is
/// irrelevant because every consumer sorts first.
pub fn sort_records(records: &mut [DiffRecord], mode: SortMode) {
    match mode {
        SortMode::Score => records.sort_by(|a, b| {
            a.score
                .cmp(&b.score)
                .then_with(|| a.line.to_lowercase().cmp(&b.line.to_lowercase()))
        }),
        SortMode::Default => records.sort_by_key(|r| r.line.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn opts(threshold: u32, threads: usize) -> DiffOptions {
        DiffOptions {
            similarity_threshold: threshold,
            strip_leading_numbers: true,
            thread_cap: threads,
        }
    }

    #[test]
    fn test_resolve_thread_count() {
        assert_eq!(resolve_thread_count(1), 1);
        assert_eq!(resolve_thread_count(4), 4);
        assert_eq!(resolve_thread_count(20), 8);
        assert!(resolve_thread_count(0) >= 1);
    }

    #[test]
    fn test_exact_matches_are_elided() {
        let main = lines(&["1. Alpha - Song One", "2. Beta - Song Two"]);
        let new = lines(&["7. ALPHA - Song One", "9. beta - song two"]);
        // Even with an impossible threshold, exact normalized matches never
        // produce records.
        let outcome = compare_lists(&main, &new, &opts(101, 1)).unwrap();
        assert!(outcome.only_in_main.is_empty());
        assert!(outcome.only_in_new.is_empty());
    }

    #[test]
    fn test_asymmetric_diff_example() {
        let main = lines(&["1. Alpha - Song One", "2. Beta - Song Two"]);
        let new = lines(&["1. alpha - song one"]);
        let outcome = compare_lists(&main, &new, &opts(85, 1)).unwrap();

        assert_eq!(outcome.only_in_main.len(), 1);
        let rec = &outcome.only_in_main[0];
        assert_eq!(rec.line, "2. Beta - Song Two");
        assert!(rec.score < 85, "score was {}", rec.score);
        assert_eq!(rec.best_match.as_deref(), Some("alpha - song one"));
        assert!(outcome.only_in_new.is_empty());
    }

    #[test]
    fn test_near_duplicate_below_threshold_is_dropped() {
        let main = lines(&["Daft Punk - One More Time"]);
        let new = lines(&["Daft Punk - One More Tyme"]);
        // Low threshold: the near-duplicate counts as present on both sides.
        let outcome = compare_lists(&main, &new, &opts(80, 1)).unwrap();
        assert!(outcome.only_in_main.is_empty());
        assert!(outcome.only_in_new.is_empty());
    }

    #[test]
    fn test_threshold_monotonicity() {
        let main = lines(&["Daft Punk - One More Time", "Beta - Unrelated Thing"]);
        let new = lines(&["Daft Punk - One More Tyme"]);
        let low = compare_lists(&main, &new, &opts(80, 1)).unwrap();
        let high = compare_lists(&main, &new, &opts(100, 1)).unwrap();
        // Raising the threshold can only add records, never remove them.
        assert!(high.only_in_main.len() >= low.only_in_main.len());
        for rec in &low.only_in_main {
            assert!(high.only_in_main.iter().any(|r| r.line == rec.line));
        }
    }

    #[test]
    fn test_empty_opposite_list_reports_without_match() {
        let main = lines(&["1. Alpha - Song One"]);
        let outcome = compare_lists(&main, &[], &opts(85, 1)).unwrap();
        assert_eq!(outcome.only_in_main.len(), 1);
        assert_eq!(outcome.only_in_main[0].best_match, None);
        assert_eq!(outcome.only_in_main[0].score, 0);
        assert!(outcome.only_in_new.is_empty());
    }

    #[test]
    fn test_deterministic_across_worker_counts() {
        let main = lines(&[
            "1. Alpha - Song One",
            "2. Beta - Song Two",
            "3. Gamma - Song Three",
            "4. Delta - Song Four",
            "5. Epsilon - Song Five",
        ]);
        let new = lines(&[
            "1. alpha - song one",
            "2. Betta - Song Too",
            "9. Zeta - Other Song",
        ]);

        let mut sequential = compare_lists(&main, &new, &opts(85, 1)).unwrap();
        let mut parallel = compare_lists(&main, &new, &opts(85, 8)).unwrap();
        assert_eq!(parallel.threads_used, 8);

        for outcome in [&mut sequential, &mut parallel] {
            sort_records(&mut outcome.only_in_main, SortMode::Score);
            sort_records(&mut outcome.only_in_new, SortMode::Score);
        }
        assert_eq!(sequential.only_in_main, parallel.only_in_main);
        assert_eq!(sequential.only_in_new, parallel.only_in_new);
    }

    #[test]
    fn test_sort_by_score_then_line() {
        let mut records = vec![
            DiffRecord { line: "b line".into(), best_match: None, score: 40 },
            DiffRecord { line: "A line".into(), best_match: None, score: 40 },
            DiffRecord { line: "z line".into(), best_match: None, score: 10 },
        ];
        sort_records(&mut records, SortMode::Score);
        assert_eq!(records[0].line, "z line");
        assert_eq!(records[1].line, "A line");
        assert_eq!(records[2].line, "b line");
    }

    #[test]
    fn test_sort_default_is_case_insensitive() {
        let mut records = vec![
            DiffRecord { line: "beta".into(), best_match: None, score: 1 },
            DiffRecord { line: "Alpha".into(), best_match: None, score: 99 },
        ];
        sort_records(&mut records, SortMode::Default);
        assert_eq!(records[0].line, "Alpha");
    }
}
