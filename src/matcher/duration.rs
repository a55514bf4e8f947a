//! ISO-8601-style video duration parsing.
//!
//! YouTube reports `contentDetails.duration` as tokens like `PT4M13S`.
//! The parser is permissive: anything it cannot read counts as zero seconds
//! rather than an error. A candidate with an unreadable duration therefore
//! looks like a 0s video and is heavily penalized by the duration score.

use std::sync::LazyLock;

use regex::Regex;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration pattern is valid")
});

/// Parse a `PT[nH][nM][nS]` token into whole seconds.
///
/// Missing components are zero. Input without a `PT` marker yields 0.
pub fn parse_duration(token: &str) -> u32 {
    let Some(caps) = DURATION_PATTERN.captures(token) else {
        return 0;
    };

    let group = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };

    group(1)
        .saturating_mul(3600)
        .saturating_add(group(2).saturating_mul(60))
        .saturating_add(group(3))
}
