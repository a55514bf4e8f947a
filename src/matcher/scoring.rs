//! Scoring functions for matching a source track against search candidates.
//!
//! Two independent strategies:
//! - **Exact**: case-insensitive containment of the track name and any artist
//!   in the video title, with a tight duration window
//! - **Fuzzy**: weighted blend of title similarity and duration proximity

use std::collections::HashMap;

use super::domain::{Candidate, MatchScore, SourceTrack};
use super::policy::MatchPolicy;

// ============================================================================
// Duration
// ============================================================================

/// Absolute difference in seconds between the video and the source track.
pub fn duration_diff(track: &SourceTrack, candidate: &Candidate) -> f64 {
    (f64::from(candidate.duration_sec) - track.duration_secs()).abs()
}

/// Linear decay from 1.0 at `diff == 0` to 0.0 at `diff >= window`.
pub fn duration_score(diff: f64, window: f64) -> f64 {
    (1.0 - diff / window).max(0.0)
}

// ============================================================================
// Exact Match
// ============================================================================

/// Exact test: duration within tolerance, title contains the track name,
/// and title contains at least one credited artist.
pub fn is_exact_match(track: &SourceTrack, candidate: &Candidate, policy: &MatchPolicy) -> bool {
    if duration_diff(track, candidate) > policy.exact_duration_tolerance {
        return false;
    }

    let title = candidate.title.to_lowercase();
    let has_track_name = title.contains(&track.name.to_lowercase());
    let has_artist = track
        .artists
        .iter()
        .map(|a| a.name.to_lowercase())
        .filter(|name| !name.trim().is_empty())
        .any(|name| title.contains(&name));

    has_track_name && has_artist
}

// ============================================================================
// Fuzzy Scoring
// ============================================================================

/// `"<name> <primary artist>"`, lower-cased.
pub fn comparison_string(track: &SourceTrack) -> String {
    format!("{} {}", track.name, track.primary_artist()).to_lowercase()
}

/// Sorensen-Dice similarity over character bigrams (whitespace ignored), 0.0 to 1.0.
///
/// Bigrams are counted per `char`, so accented and CJK titles score the
/// same as their ASCII equivalents. Shared bigrams are matched as a multiset.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut hits = 0usize;
    for pair in b.windows(2) {
        match bigrams.get_mut(&(pair[0], pair[1])) {
            Some(count) if *count > 0 => {
                *count -= 1;
                hits += 1;
            }
            _ => {}
        }
    }

    (2 * hits) as f64 / (a.len() + b.len() - 2) as f64
}

/// Score a single candidate against a precomputed comparison string.
pub fn score_candidate<'a>(
    track: &SourceTrack,
    comparison: &str,
    candidate: &'a Candidate,
    policy: &MatchPolicy,
) -> MatchScore<'a> {
    let title_similarity = title_similarity(comparison, &candidate.title.to_lowercase());
    let duration_score = duration_score(duration_diff(track, candidate), policy.duration_window);
    let combined_score =
        policy.title_weight * title_similarity + policy.duration_weight * duration_score;

    MatchScore {
        candidate,
        title_similarity,
        duration_score,
        combined_score,
    }
}

/// Score every candidate and sort best-first.
///
/// The sort is stable, so equal scores keep their fetch order.
pub fn score_candidates<'a>(
    track: &SourceTrack,
    candidates: &'a [Candidate],
    policy: &MatchPolicy,
) -> Vec<MatchScore<'a>> {
    let comparison = comparison_string(track);

    let mut scored: Vec<_> = candidates
        .iter()
        .map(|c| score_candidate(track, &comparison, c, policy))
        .collect();

    scored.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{candidate, track};

    fn policy() -> MatchPolicy {
        MatchPolicy::default()
    }

    #[test]
    fn test_exact_match_accepts_official_video() {
        let t = track("Test Song", &["Artist A"], 200000);
        let c = candidate("v1", "Test Song - Artist A (Official Video)", 202);
        assert!(is_exact_match(&t, &c, &policy()));
    }

    #[test]
    fn test_exact_match_rejects_duration_over_tolerance() {
        let t = track("Test Song", &["Artist A"], 200000);
        let c = candidate("v1", "Test Song - Artist A (Official Video)", 210);
        assert_eq!(duration_diff(&t, &c), 10.0);
        assert!(!is_exact_match(&t, &c, &policy()));
    }

    #[test]
    fn test_exact_match_tolerance_is_inclusive() {
        let t = track("Test Song", &["Artist A"], 200000);
        assert!(is_exact_match(&t, &candidate("v", "Artist A - Test Song", 205), &policy()));
        assert!(is_exact_match(&t, &candidate("v", "Artist A - Test Song", 195), &policy()));

        let t = track("Test Song", &["Artist A"], 200500);
        assert!(!is_exact_match(&t, &candidate("v", "Artist A - Test Song", 206), &policy()));
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let t = track("Test Song", &["Artist A"], 200000);
        let c = candidate("v1", "TEST SONG | ARTIST A", 200);
        assert!(is_exact_match(&t, &c, &policy()));
    }

    #[test]
    fn test_exact_match_any_artist_qualifies() {
        let t = track("Under Pressure", &["Queen", "David Bowie"], 248000);
        let c = candidate("v1", "David Bowie - Under Pressure", 247);
        assert!(is_exact_match(&t, &c, &policy()));
    }

    #[test]
    fn test_exact_match_requires_both_name_and_artist() {
        let t = track("Test Song", &["Artist A"], 200000);
        assert!(!is_exact_match(&t, &candidate("v", "Test Song (Lyrics)", 200), &policy()));
        assert!(!is_exact_match(&t, &candidate("v", "Artist A - Live", 200), &policy()));
    }

    #[test]
    fn test_exact_match_ignores_blank_artist_names() {
        let t = track("Test Song", &[""], 200000);
        let c = candidate("v1", "Test Song", 200);
        assert!(!is_exact_match(&t, &c, &policy()));
    }

    #[test]
    fn test_duration_score_endpoints() {
        assert_eq!(duration_score(0.0, 30.0), 1.0);
        assert_eq!(duration_score(15.0, 30.0), 0.5);
        assert_eq!(duration_score(30.0, 30.0), 0.0);
        assert_eq!(duration_score(300.0, 30.0), 0.0);
    }

    #[test]
    fn test_comparison_string_uses_primary_artist_only() {
        let t = track("Under Pressure", &["Queen", "David Bowie"], 0);
        assert_eq!(comparison_string(&t), "under pressure queen");
    }

    #[test]
    fn test_title_similarity_bounds() {
        assert_eq!(title_similarity("test song artist a", "test song artist a"), 1.0);
        assert_eq!(title_similarity("abc", "xyz"), 0.0);
        let partial = title_similarity("test song artist a", "test song - artist a (official video)");
        assert!(partial > 0.5 && partial < 1.0, "got {}", partial);
    }

    #[test]
    fn test_title_similarity_counts_chars_not_bytes() {
        // 13 and 14 chars after whitespace removal, 11 shared bigrams
        let sim = title_similarity("déjà vu beyoncé", "déjà vu - beyoncé");
        assert!((sim - 22.0 / 25.0).abs() < 1e-9, "got {}", sim);
    }

    #[test]
    fn test_title_similarity_cjk_title() {
        // 12 and 17 chars, 10 shared bigrams
        let sim = title_similarity("夜に駆ける yoasobi", "夜に駆ける / yoasobi (mv)");
        assert!((sim - 20.0 / 27.0).abs() < 1e-9, "got {}", sim);
    }

    #[test]
    fn test_title_similarity_repeated_bigrams_counted_once_each() {
        // "aaaa" has three "aa" bigrams, "aa" only one
        assert!((title_similarity("aaaa", "aa") - 2.0 / 4.0).abs() < 1e-9);
        assert_eq!(title_similarity("a", "ab"), 0.0);
        assert_eq!(title_similarity("a b", "ab"), 1.0);
    }

    #[test]
    fn test_score_candidates_perfect_candidate() {
        let t = track("Test Song", &["Artist A"], 200000);
        let candidates = vec![candidate("v1", "Test Song Artist A", 200)];
        let scored = score_candidates(&t, &candidates, &policy());
        assert_eq!(scored.len(), 1);
        assert!((scored[0].combined_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_candidates_sorted_best_first() {
        let t = track("Test Song", &["Artist A"], 200000);
        let candidates = vec![
            candidate("far", "Unrelated Upload", 500),
            candidate("close", "Test Song Artist A", 208),
            candidate("mid", "Test Song Artist A", 220),
        ];
        let ids: Vec<_> = score_candidates(&t, &candidates, &policy())
            .iter()
            .map(|s| s.candidate.id.as_str())
            .collect();
        assert_eq!(ids, vec!["close", "mid", "far"]);
    }

    #[test]
    fn test_score_candidates_ties_keep_fetch_order() {
        let t = track("Test Song", &["Artist A"], 200000);
        let candidates = vec![
            candidate("first", "Test Song Artist A", 208),
            candidate("second", "Test Song Artist A", 208),
        ];
        let scored = score_candidates(&t, &candidates, &policy());
        assert_eq!(scored[0].candidate.id, "first");
        assert_eq!(scored[1].candidate.id, "second");
    }
}

/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::matcher::policy::FUZZY_THRESHOLD;
    use crate::test_utils::{candidate, track};
    use proptest::prelude::*;

    proptest! {
        /// Duration score stays within [0, 1]
        #[test]
        fn duration_score_is_bounded(diff in 0.0f64..10_000.0) {
            let score = duration_score(diff, 30.0);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        /// Larger differences never score higher
        #[test]
        fn duration_score_is_non_increasing(a in 0.0f64..200.0, b in 0.0f64..200.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(duration_score(lo, 30.0) >= duration_score(hi, 30.0));
        }

        /// Any difference of 30 seconds or more scores zero
        #[test]
        fn duration_score_zero_beyond_window(diff in 30.0f64..10_000.0) {
            prop_assert_eq!(duration_score(diff, 30.0), 0.0);
        }

        /// A title that only adds a short tag to the comparison string stays above threshold
        #[test]
        fn near_identical_titles_clear_threshold(text in "\\PC{10,30}") {
            let chars = text.chars().filter(|c| !c.is_whitespace()).count();
            prop_assume!(chars >= 10);
            let sim = title_similarity(&text, &format!("{} (mv)", text));
            prop_assert!(sim > FUZZY_THRESHOLD, "similarity {} for {:?}", sim, text);
        }

        /// Similarity is symmetric and bounded for arbitrary text
        #[test]
        fn title_similarity_is_symmetric(a in "\\PC{0,30}", b in "\\PC{0,30}") {
            let ab = title_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&ab));
            prop_assert!((ab - title_similarity(&b, &a)).abs() < 1e-12);
        }

        /// Combined score stays within [0, 1] for arbitrary titles and durations
        #[test]
        fn combined_score_is_bounded(
            name in "[a-zA-Z ]{1,20}",
            artist in "[a-zA-Z ]{0,15}",
            title in "\\PC{0,40}",
            duration_ms in 0u64..1_000_000,
            duration_sec in 0u32..2_000,
        ) {
            let t = track(&name, &[artist.as_str()], duration_ms);
            let candidates = vec![candidate("v", &title, duration_sec)];
            for s in score_candidates(&t, &candidates, &MatchPolicy::default()) {
                prop_assert!((0.0..=1.0).contains(&s.title_similarity));
                prop_assert!((0.0..=1.0).contains(&s.duration_score));
                prop_assert!(s.combined_score >= 0.0);
                prop_assert!(s.combined_score <= 1.0 + 1e-12);
            }
        }
    }
}
