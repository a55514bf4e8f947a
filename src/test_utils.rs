//! Test utilities and fixtures for syncify tests.
//!
//! Factories for source tracks and video candidates so tests can state
//! only the fields that matter to them.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{candidate, track};
//!
//! let t = track("Test Song", &["Artist A"], 200_000);
//! let c = candidate("v1", "Test Song - Artist A (Official Video)", 200);
//! assert!(scoring::is_exact_match(&t, &c, &MatchPolicy::default()));
//! ```

use crate::matcher::domain::{Artist, Candidate, SourceTrack};

/// Creates a source track.
///
/// The ID is derived from the name (`sp-test-song`). Customize other
/// fields with struct update syntax:
///
/// ```ignore
/// let t = SourceTrack {
///     id: "4uLU6hMCjMI75M1A2tKUQC".to_string(),
///     ..track("Never Gonna Give You Up", &["Rick Astley"], 213_573)
/// };
/// ```
pub fn track(name: &str, artists: &[&str], duration_ms: u64) -> SourceTrack {
    SourceTrack {
        id: format!("sp-{}", name.trim().to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        artists: artists.iter().map(|a| Artist::new(*a)).collect(),
        duration_ms,
    }
}

/// Creates a video candidate with no channel or thumbnail.
pub fn candidate(id: &str, title: &str, duration_sec: u32) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: title.to_string(),
        duration_sec,
        channel_title: None,
        thumbnail_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_defaults() {
        let t = track("Test Song", &["Artist A", "Artist B"], 200_000);
        assert_eq!(t.id, "sp-test-song");
        assert_eq!(t.primary_artist(), "Artist A");
        assert_eq!(t.artists.len(), 2);
        assert_eq!(t.duration_ms, 200_000);
    }

    #[test]
    fn test_candidate_defaults() {
        let c = candidate("v1", "Title", 180);
        assert_eq!(c.id, "v1");
        assert_eq!(c.duration_sec, 180);
        assert!(c.channel_title.is_none());
        assert!(c.thumbnail_url.is_none());
    }
}
