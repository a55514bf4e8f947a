//! Track matching engine - finds the YouTube video for a Spotify track.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - source tracks, candidates, decisions, batch results
//! - **Duration** - `PT#H#M#S` token parsing
//! - **Query** - search string construction
//! - **Scoring** - exact-match test and fuzzy scores
//! - **Selector** - exact, then fuzzy above threshold, then fallback policy
//! - **Traits** - the search collaborator the matcher depends on
//! - **Service** - single-track pipeline and batch orchestration
//!
//! Everything up to the selector is pure. Only the service talks to a
//! [`traits::VideoSearch`] implementation, so the engine is testable without
//! a network and the YouTube client can be swapped out.
//!
//! # Usage
//!
//! ```ignore
//! use matcher::{MatcherService, MatcherConfig};
//!
//! let client = YouTubeClient::new(token, &config.youtube)?;
//! let service = MatcherService::new(client, MatcherConfig::from(&config));
//!
//! match service.match_track(&track).await? {
//!     MatchDecision::NoMatch => println!("not found"),
//!     decision => println!("{:?}", decision.candidate()),
//! }
//! ```

pub mod domain;
pub mod duration;
pub mod policy;
pub mod query;
pub mod scoring;
pub mod selector;
pub mod service;
pub mod traits;

pub use domain::{
    Artist, BatchResult, Candidate, MalformedTrack, MatchDecision, MatchError, MatchKind,
    SourceTrack, TrackEntry, VideoMatch,
};
pub use duration::parse_duration;
pub use policy::{FallbackPolicy, MatchPolicy};
pub use query::build_search_query;
pub use selector::select;
pub use service::{MatcherConfig, MatcherService};
pub use traits::{VideoDetails, VideoSearch};
