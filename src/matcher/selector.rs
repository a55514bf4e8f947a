//! Decision policy: exact match first, then fuzzy above threshold, then fallback.

use super::domain::{Candidate, MatchDecision, SourceTrack};
use super::policy::{FallbackPolicy, MatchPolicy};
use super::scoring::{is_exact_match, score_candidates};

/// Pick the best candidate for a track.
///
/// 1. No candidates: `NoMatch`
/// 2. First candidate (in fetch order) passing the exact test wins
/// 3. Otherwise the best fuzzy score wins if it is strictly above the threshold
/// 4. Otherwise the fallback policy decides
pub fn select(track: &SourceTrack, candidates: &[Candidate], policy: &MatchPolicy) -> MatchDecision {
    let Some(first) = candidates.first() else {
        tracing::debug!("No candidates for '{}'", track.name);
        return MatchDecision::NoMatch;
    };

    if let Some(exact) = find_exact_match(track, candidates, policy) {
        tracing::debug!("Exact match for '{}': {}", track.name, exact.title);
        return MatchDecision::Exact(exact.clone());
    }

    if let Some(fuzzy) = find_fuzzy_match(track, candidates, policy) {
        return MatchDecision::Fuzzy(fuzzy.clone());
    }

    match policy.fallback {
        FallbackPolicy::NoMatch => MatchDecision::NoMatch,
        FallbackPolicy::FirstCandidate => {
            tracing::debug!(
                "No acceptable match for '{}', falling back to first result: {}",
                track.name,
                first.title
            );
            MatchDecision::Fallback(first.clone())
        }
    }
}

/// First candidate passing the exact test, in fetch order.
pub fn find_exact_match<'a>(
    track: &SourceTrack,
    candidates: &'a [Candidate],
    policy: &MatchPolicy,
) -> Option<&'a Candidate> {
    candidates.iter().find(|c| is_exact_match(track, c, policy))
}

/// Top fuzzy-scored candidate, if its combined score clears the threshold.
pub fn find_fuzzy_match<'a>(
    track: &SourceTrack,
    candidates: &'a [Candidate],
    policy: &MatchPolicy,
) -> Option<&'a Candidate> {
    let scored = score_candidates(track, candidates, policy);

    for s in &scored {
        tracing::debug!(
            "  {:.3} (title {:.3}, duration {:.3}) {}",
            s.combined_score,
            s.title_similarity,
            s.duration_score,
            s.candidate.title
        );
    }

    scored
        .first()
        .filter(|top| top.combined_score > policy.fuzzy_threshold)
        .map(|top| {
            tracing::debug!(
                "Fuzzy match for '{}' ({:.3}): {}",
                track.name,
                top.combined_score,
                top.candidate.title
            );
            top.candidate
        })
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_utils::{candidate, track};
    use proptest::prelude::*;

    fn candidates_strategy() -> impl Strategy<Value = Vec<Candidate>> {
        prop::collection::vec(("[a-zA-Z \\-()]{0,30}", 0u32..600), 0..6).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (title, secs))| candidate(&format!("v{}", i), &title, secs))
                .collect()
        })
    }

    proptest! {
        /// A fuzzy decision never carries a candidate at or below the threshold
        #[test]
        fn fuzzy_never_below_threshold(
            name in "[a-zA-Z]{1,12}",
            artist in "[a-zA-Z]{1,12}",
            duration_ms in 0u64..600_000,
            candidates in candidates_strategy(),
        ) {
            let t = track(&name, &[artist.as_str()], duration_ms);
            let policy = MatchPolicy::default();
            if let MatchDecision::Fuzzy(chosen) = select(&t, &candidates, &policy) {
                let scored = score_candidates(&t, &candidates, &policy);
                let top = &scored[0];
                prop_assert_eq!(&top.candidate.id, &chosen.id);
                prop_assert!(top.combined_score > policy.fuzzy_threshold);
            }
        }

        /// If any candidate is exact, the first exact candidate is returned
        #[test]
        fn exact_candidate_always_wins(
            duration_ms in 10_000u64..600_000,
            candidates in candidates_strategy(),
            insert_at in 0usize..6,
        ) {
            let t = track("Song", &["Band"], duration_ms);
            let mut candidates = candidates;
            let exact = candidate("exact", "Band - Song", (duration_ms / 1000) as u32);
            let at = insert_at.min(candidates.len());
            candidates.insert(at, exact);

            let policy = MatchPolicy::default();
            let expected = find_exact_match(&t, &candidates, &policy).cloned();
            prop_assert!(expected.is_some());
            prop_assert_eq!(
                select(&t, &candidates, &policy),
                MatchDecision::Exact(expected.unwrap())
            );
        }

        /// Same inputs, same decision
        #[test]
        fn selection_is_deterministic(
            duration_ms in 0u64..600_000,
            candidates in candidates_strategy(),
        ) {
            let t = track("Song", &["Band"], duration_ms);
            let policy = MatchPolicy::default();
            prop_assert_eq!(select(&t, &candidates, &policy), select(&t, &candidates, &policy));
        }
    }
}
