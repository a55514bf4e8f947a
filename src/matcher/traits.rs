//! Collaborator traits for candidate fetching.
//!
//! The matcher only needs two capabilities from the outside world: search
//! for videos, and resolve their durations. These traits enable dependency
//! injection - production code uses [`crate::youtube::YouTubeClient`], tests
//! substitute the mocks below.
//!
//! # Example
//!
//! ```ignore
//! use syncify::matcher::traits::VideoSearch;
//!
//! async fn first_title<S: VideoSearch>(search: &S) -> Option<String> {
//!     let results = search.search("Bohemian Rhapsody Queen official", 5).await.ok()?;
//!     results.into_iter().next().map(|c| c.title)
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use super::domain::{Candidate, MatchError};

/// Video search capability.
///
/// Implementations must return every candidate with a resolved
/// `duration_sec`, and an empty vector (not an error) when nothing is found.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search for up to `limit` videos matching `query`.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Candidate>, MatchError>;
}

/// Video detail capability: resolve durations for known video IDs.
#[async_trait]
pub trait VideoDetails: Send + Sync {
    /// Map each found video ID to its duration in seconds.
    /// IDs the service does not know are absent from the map.
    async fn fetch_durations(&self, ids: &[String]) -> Result<HashMap<String, u32>, MatchError>;
}

#[async_trait]
impl<T: VideoSearch + ?Sized> VideoSearch for std::sync::Arc<T> {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Candidate>, MatchError> {
        (**self).search(query, limit).await
    }
}
