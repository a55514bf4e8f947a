//! Matcher service - runs the single-track pipeline and batches of it
//!
//! For each track:
//! 1. Validate the track (name + at least one artist)
//! 2. Build the search query
//! 3. Fetch candidates from the search collaborator (bounded by a deadline)
//! 4. Select exact / fuzzy / fallback / no match

use std::future::Future;
use std::time::Duration;

use futures::{StreamExt, stream};
use tracing::Instrument;

use super::domain::{
    BatchResult, Candidate, MalformedTrack, MatchDecision, MatchError, SourceTrack, TrackEntry,
};
use super::policy::MatchPolicy;
use super::query::{DEFAULT_QUERY_SUFFIX, build_search_query_with};
use super::selector::select;
use super::traits::VideoSearch;

/// Configuration for the matcher service
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Scoring and selection parameters
    pub policy: MatchPolicy,
    /// How many search results to score per track
    pub search_limit: u32,
    /// Token appended to every search query
    pub query_suffix: String,
    /// Upper bound on a single candidate fetch
    pub fetch_timeout: Option<Duration>,
    /// Tracks in flight at once during batch matching
    pub concurrency: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::default(),
            search_limit: 5,
            query_suffix: DEFAULT_QUERY_SUFFIX.to_string(),
            fetch_timeout: Some(Duration::from_secs(15)),
            concurrency: 1,
        }
    }
}

impl From<&crate::config::Config> for MatcherConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            policy: MatchPolicy::from(&config.matching),
            search_limit: config.matching.search_limit,
            query_suffix: config.matching.query_suffix.clone(),
            fetch_timeout: (config.matching.fetch_timeout_secs > 0)
                .then(|| Duration::from_secs(config.matching.fetch_timeout_secs)),
            concurrency: config.batch.concurrency,
        }
    }
}

/// Service for matching source tracks to videos
pub struct MatcherService<S> {
    config: MatcherConfig,
    search: S,
}

impl<S: VideoSearch> MatcherService<S> {
    /// Create a new matcher around a search collaborator
    pub fn new(search: S, config: MatcherConfig) -> Self {
        Self { config, search }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Match a single track.
    ///
    /// Invalid tracks and fetch failures are returned as errors; "nothing
    /// found" and "nothing good enough" are [`MatchDecision::NoMatch`].
    pub async fn match_track(&self, track: &SourceTrack) -> Result<MatchDecision, MatchError> {
        track.validate()?;

        let query = build_search_query_with(track, &self.config.query_suffix);
        tracing::debug!("Search query: {}", query);

        let candidates = self.fetch_candidates(&query).await?;
        if candidates.is_empty() {
            tracing::info!("No search results for '{}'", track.name);
            return Ok(MatchDecision::NoMatch);
        }

        let decision = select(track, &candidates, &self.config.policy);
        match (decision.kind(), decision.candidate()) {
            (Some(kind), Some(c)) => {
                tracing::info!("{:?} match for '{}': {} ({})", kind, track.name, c.title, c.id);
            }
            _ => {
                tracing::info!(
                    "No acceptable match for '{}' among {} candidates",
                    track.name,
                    candidates.len()
                );
            }
        }

        Ok(decision)
    }

    async fn fetch_candidates(&self, query: &str) -> Result<Vec<Candidate>, MatchError> {
        let fetch = self.search.search(query, self.config.search_limit);
        match self.config.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| MatchError::Timeout)?,
            None => fetch.await,
        }
    }

    /// Match every track, recording one outcome per track in input order.
    pub async fn match_batch(&self, tracks: &[SourceTrack]) -> BatchResult {
        self.match_batch_until(tracks, std::future::pending()).await
    }

    /// Match tracks until `cancel` resolves.
    ///
    /// Up to `concurrency` tracks are in flight at once, but outcomes are
    /// recorded strictly in input order, so a cancelled batch holds a
    /// consistent prefix of the input.
    pub async fn match_batch_until<F>(&self, tracks: &[SourceTrack], cancel: F) -> BatchResult
    where
        F: Future<Output = ()>,
    {
        let entries = tracks.iter().map(Ok::<_, &MalformedTrack>).collect();
        self.run_batch(entries, cancel).await
    }

    /// Like [`Self::match_batch_until`], for raw batch input.
    ///
    /// Entries that could not be read as tracks are recorded as failures
    /// in their slot without a search.
    pub async fn match_entries_until<F>(&self, entries: &[TrackEntry], cancel: F) -> BatchResult
    where
        F: Future<Output = ()>,
    {
        self.run_batch(entries.iter().map(Result::as_ref).collect(), cancel)
            .await
    }

    async fn run_batch<F>(
        &self,
        entries: Vec<Result<&SourceTrack, &MalformedTrack>>,
        cancel: F,
    ) -> BatchResult
    where
        F: Future<Output = ()>,
    {
        let total = entries.len();
        let mut result = BatchResult::new();

        let outcomes = stream::iter(entries.into_iter().enumerate())
            .map(|(index, entry)| async move {
                match entry {
                    Ok(track) => {
                        let span = tracing::info_span!("match_track", index, track = %track.name);
                        let outcome = self.match_track(track).instrument(span).await;
                        (index, Ok((track, outcome)))
                    }
                    Err(malformed) => (index, Err(malformed)),
                }
            })
            .buffered(self.config.concurrency.max(1))
            .take_until(cancel);
        futures::pin_mut!(outcomes);

        while let Some((index, entry)) = outcomes.next().await {
            match entry {
                Ok((track, outcome)) => {
                    match outcome {
                        Err(ref e) if e.is_fetch_failure() => {
                            tracing::warn!("Track {} ('{}') failed: {}", index + 1, track.name, e);
                        }
                        Err(ref e) => tracing::info!("Skipping track {}: {}", index + 1, e),
                        Ok(_) => {}
                    }
                    result.record(index, track, outcome);
                }
                Err(malformed) => {
                    tracing::info!("Skipping malformed track {}: {}", index + 1, malformed.reason);
                    result.record_malformed(index, malformed);
                }
            }

            // Progress logging
            if (index + 1) % 10 == 0 {
                tracing::info!("Matched {}/{} tracks", index + 1, total);
            }
        }

        if result.processed() < total {
            tracing::warn!(
                "Batch cancelled after {}/{} tracks",
                result.processed(),
                total
            );
            result.mark_cancelled();
        }

        tracing::info!(
            "Batch finished: {} matched, {} failed",
            result.matched(),
            result.failed()
        );
        result
    }
}
