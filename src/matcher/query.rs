//! Search query construction.

use super::domain::SourceTrack;

/// Token appended to every query to bias results toward official uploads
pub const DEFAULT_QUERY_SUFFIX: &str = "official";

/// Build `"<name> <artist1> <artist2> ... official"` for a track.
pub fn build_search_query(track: &SourceTrack) -> String {
    build_search_query_with(track, DEFAULT_QUERY_SUFFIX)
}

/// Same as [`build_search_query`] with a custom trailing token.
/// An empty suffix adds nothing.
pub fn build_search_query_with(track: &SourceTrack, suffix: &str) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(track.artists.len() + 2);
    parts.push(&track.name);
    parts.extend(track.artists.iter().map(|a| a.name.as_str()));
    if !suffix.is_empty() {
        parts.push(suffix);
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::track;

    #[test]
    fn test_single_artist() {
        let t = track("Bohemian Rhapsody", &["Queen"], 354000);
        assert_eq!(build_search_query(&t), "Bohemian Rhapsody Queen official");
    }

    #[test]
    fn test_all_artists_in_order() {
        let t = track("Under Pressure", &["Queen", "David Bowie"], 248000);
        assert_eq!(
            build_search_query(&t),
            "Under Pressure Queen David Bowie official"
        );
    }

    #[test]
    fn test_custom_suffix() {
        let t = track("Song", &["Artist"], 0);
        assert_eq!(build_search_query_with(&t, "audio"), "Song Artist audio");
        assert_eq!(build_search_query_with(&t, ""), "Song Artist");
    }
}
