//! Internal domain models for track matching.
//!
//! These types are OUR types - they don't change when the YouTube or Spotify
//! APIs change. Search responses get converted into [`Candidate`]s by the
//! `youtube` adapter before they ever reach the scorer.

use serde::{Deserialize, Serialize};

/// A credited artist on a source track
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub name: String,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A Spotify track we want to find on YouTube.
///
/// Deserialization is lenient: a track with no name or no artists
/// still parses, and is rejected later by [`SourceTrack::validate`] so a single
/// malformed entry becomes a per-track error instead of failing a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceTrack {
    /// Spotify track ID
    #[serde(default)]
    pub id: String,
    /// Track title
    #[serde(default)]
    pub name: String,
    /// Credited artists in Spotify's credited order
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Track length in milliseconds
    #[serde(default, alias = "duration", alias = "durationMs")]
    pub duration_ms: u64,
}

impl SourceTrack {
    /// Reject tracks that cannot be matched before any network call is made.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.name.trim().is_empty() {
            return Err(MatchError::InvalidInput(
                "track is missing a name".to_string(),
            ));
        }
        if self.artists.is_empty() {
            return Err(MatchError::InvalidInput(format!(
                "track '{}' has no artists",
                self.name
            )));
        }
        Ok(())
    }

    /// First credited artist, or "" when there is none.
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(|a| a.name.as_str()).unwrap_or("")
    }

    /// Track length in (fractional) seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

/// A video returned by search, eligible for matching.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// YouTube video ID
    pub id: String,
    /// Video title as shown on YouTube
    pub title: String,
    /// Resolved video length in seconds
    #[serde(default)]
    pub duration_sec: u32,
    /// Uploading channel (pass-through)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    /// Best available thumbnail URL (pass-through)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Per-candidate fuzzy scores, only alive while a decision is being made.
#[derive(Debug, Clone, Copy)]
pub struct MatchScore<'a> {
    pub candidate: &'a Candidate,
    /// Dice similarity between the comparison string and the title (0.0 to 1.0)
    pub title_similarity: f64,
    /// Duration proximity (0.0 to 1.0)
    pub duration_score: f64,
    /// Weighted blend of the two (0.0 to 1.0)
    pub combined_score: f64,
}

/// Which rule produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Fuzzy,
    Fallback,
}

/// Result of matching one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    /// Title contains name and an artist, duration within tolerance
    Exact(Candidate),
    /// Best fuzzy score cleared the threshold
    Fuzzy(Candidate),
    /// Nothing qualified, but the fallback policy returns the first result anyway
    Fallback(Candidate),
    NoMatch,
}

impl MatchDecision {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Exact(c) | Self::Fuzzy(c) | Self::Fallback(c) => Some(c),
            Self::NoMatch => None,
        }
    }

    pub fn into_candidate(self) -> Option<Candidate> {
        match self {
            Self::Exact(c) | Self::Fuzzy(c) | Self::Fallback(c) => Some(c),
            Self::NoMatch => None,
        }
    }

    pub fn kind(&self) -> Option<MatchKind> {
        match self {
            Self::Exact(_) => Some(MatchKind::Exact),
            Self::Fuzzy(_) => Some(MatchKind::Fuzzy),
            Self::Fallback(_) => Some(MatchKind::Fallback),
            Self::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, Self::NoMatch)
    }

    /// Wire shape for a single-track match, `None` for [`MatchDecision::NoMatch`].
    pub fn to_video_match(&self) -> Option<VideoMatch> {
        let kind = self.kind()?;
        let candidate = self.candidate()?;
        Some(VideoMatch {
            video_id: candidate.id.clone(),
            title: candidate.title.clone(),
            thumbnail: candidate.thumbnail_url.clone(),
            duration: candidate.duration_sec,
            match_kind: kind,
        })
    }
}

/// Single-track match as returned to the surrounding application
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMatch {
    pub video_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub duration: u32,
    pub match_kind: MatchKind,
}

/// A matched track inside a [`BatchResult`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMatch {
    /// Position of the track in the input sequence
    pub index: usize,
    pub source_id: String,
    pub matched_id: String,
    pub name: String,
    pub primary_artist: String,
    pub match_kind: MatchKind,
}

/// A track that could not be matched inside a [`BatchResult`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchError {
    /// Position of the track in the input sequence
    pub index: usize,
    pub track_name: String,
    pub error_message: String,
}

/// A batch input entry that could not be read as a [`SourceTrack`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedTrack {
    /// Best-effort `name` taken from the raw entry (empty if absent)
    pub name: String,
    /// Why the entry was rejected
    pub reason: String,
}

/// One slot of batch input: a track, or the reason it could not be read
pub type TrackEntry = Result<SourceTrack, MalformedTrack>;

/// Message recorded for tracks whose decision was [`MatchDecision::NoMatch`]
pub const NO_MATCH_MESSAGE: &str = "No matching video found";

/// Aggregated outcome of a batch run.
///
/// Counts are kept in lockstep with the entry lists, so a partially built
/// result (e.g. after cancellation) is always internally consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    matched: usize,
    failed: usize,
    results: Vec<BatchMatch>,
    errors: Vec<BatchError>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    cancelled: bool,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the final outcome for the track at `index`.
    pub fn record(
        &mut self,
        index: usize,
        track: &SourceTrack,
        outcome: Result<MatchDecision, MatchError>,
    ) {
        match outcome {
            Ok(decision) => match (decision.kind(), decision.into_candidate()) {
                (Some(match_kind), Some(candidate)) => self.push_match(BatchMatch {
                    index,
                    source_id: track.id.clone(),
                    matched_id: candidate.id,
                    name: track.name.clone(),
                    primary_artist: track.primary_artist().to_string(),
                    match_kind,
                }),
                _ => self.push_error(BatchError {
                    index,
                    track_name: track.name.clone(),
                    error_message: NO_MATCH_MESSAGE.to_string(),
                }),
            },
            Err(e) => self.push_error(BatchError {
                index,
                track_name: track.name.clone(),
                error_message: e.to_string(),
            }),
        }
    }

    /// Record an input entry that never became a track.
    pub fn record_malformed(&mut self, index: usize, entry: &MalformedTrack) {
        self.push_error(BatchError {
            index,
            track_name: entry.name.clone(),
            error_message: MatchError::InvalidInput(entry.reason.clone()).to_string(),
        });
    }

    fn push_match(&mut self, entry: BatchMatch) {
        self.results.push(entry);
        self.matched = self.results.len();
    }

    fn push_error(&mut self, entry: BatchError) {
        self.errors.push(entry);
        self.failed = self.errors.len();
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn results(&self) -> &[BatchMatch] {
        &self.results
    }

    pub fn errors(&self) -> &[BatchError] {
        &self.errors
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of tracks with a recorded outcome
    pub fn processed(&self) -> usize {
        self.matched + self.failed
    }
}

/// Errors that can occur while matching a track
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("Invalid track: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Video search timed out")]
    Timeout,

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl MatchError {
    /// True when the candidate-fetch collaborator failed (as opposed to bad input).
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, Self::InvalidInput(_))
    }
}
