//! Adapter layer: Convert YouTube DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use std::collections::HashMap;

use super::dto;
use crate::matcher::domain::{Candidate, MatchError};
use crate::matcher::duration::parse_duration;

/// Error reasons YouTube uses for quota and rate limiting
const RATE_LIMIT_REASONS: &[&str] = &["quotaExceeded", "rateLimitExceeded", "userRateLimitExceeded"];

/// Video IDs of the video hits in a search response, in result order.
pub fn video_ids(response: &dto::SearchListResponse) -> Vec<String> {
    response
        .items
        .iter()
        .filter_map(|item| item.id.video_id.clone())
        .collect()
}

/// Convert a `videos.list` response into an id → seconds map.
pub fn to_durations(response: dto::VideoListResponse) -> HashMap<String, u32> {
    response
        .items
        .into_iter()
        .map(|video| {
            let secs = video
                .content_details
                .and_then(|d| d.duration)
                .map(|d| parse_duration(&d))
                .unwrap_or(0);
            (video.id, secs)
        })
        .collect()
}

/// Convert search hits into candidates, joining durations by video ID.
///
/// Non-video hits are skipped. Videos missing from `durations` get 0 seconds.
pub fn to_candidates(
    response: dto::SearchListResponse,
    durations: &HashMap<String, u32>,
) -> Vec<Candidate> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.video_id?;
            let snippet = item.snippet.unwrap_or_else(|| dto::Snippet {
                published_at: None,
                channel_id: None,
                title: String::new(),
                description: None,
                channel_title: None,
                thumbnails: None,
            });

            let duration_sec = match durations.get(&id) {
                Some(secs) => *secs,
                None => {
                    tracing::debug!("No duration for video {}, treating as 0s", id);
                    0
                }
            };

            Some(Candidate {
                duration_sec,
                title: snippet.title,
                channel_title: snippet.channel_title,
                thumbnail_url: snippet.thumbnails.as_ref().and_then(best_thumbnail),
                id,
            })
        })
        .collect()
}

/// Prefer the largest thumbnail available
fn best_thumbnail(thumbnails: &dto::Thumbnails) -> Option<String> {
    thumbnails
        .high
        .as_ref()
        .or(thumbnails.medium.as_ref())
        .or(thumbnails.default.as_ref())
        .map(|t| t.url.clone())
}

/// Map an error envelope to a domain error.
pub fn to_error(status: u16, response: Option<dto::ErrorResponse>) -> MatchError {
    let (message, reasons): (String, Vec<String>) = match response {
        Some(r) => (
            r.error.message,
            r.error.errors.into_iter().filter_map(|e| e.reason).collect(),
        ),
        None => (String::new(), Vec::new()),
    };
    let rate_limited = reasons
        .iter()
        .any(|r| RATE_LIMIT_REASONS.contains(&r.as_str()));

    match status {
        429 => MatchError::RateLimited,
        403 if rate_limited => MatchError::RateLimited,
        401 | 403 => MatchError::Unauthorized(if message.is_empty() {
            format!("HTTP {}", status)
        } else {
            message
        }),
        _ => MatchError::Api(format!("HTTP {}: {}", status, message)),
    }
}
