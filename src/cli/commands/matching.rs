//! Online matching commands (hit the YouTube Data API).

use anyhow::Context;
use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::matcher::query::build_search_query_with;
use crate::matcher::{BatchResult, MatchDecision, MatcherConfig, MatcherService, SourceTrack};
use crate::youtube::{AccessToken, YouTubeClient};

use super::input::read_tracks;

/// Printed (as JSON) when a single track has no acceptable video
const NO_VIDEO_ERROR: &str = "No matching YouTube video found";

/// Match one track and print the chosen video
pub fn cmd_match(
    rt: &Runtime,
    config: &Config,
    token: AccessToken,
    track: &SourceTrack,
    json: bool,
) -> anyhow::Result<()> {
    let client = YouTubeClient::new(token, &config.youtube)?;
    let service = MatcherService::new(client, MatcherConfig::from(config));

    let decision = rt.block_on(service.match_track(track))?;

    if json {
        println!("{}", single_output(&decision));
        return Ok(());
    }

    match decision.to_video_match() {
        Some(video) => {
            println!("✓ {:?} match", video.match_kind);
            println!();
            println!("  Title:    {}", video.title);
            println!("  Video:    https://www.youtube.com/watch?v={}", video.video_id);
            println!("  Duration: {}:{:02}", video.duration / 60, video.duration % 60);
            if let Some(thumb) = &video.thumbnail {
                println!("  Thumb:    {}", thumb);
            }
        }
        None => {
            println!("✗ {}", NO_VIDEO_ERROR);
            let query = build_search_query_with(track, &config.matching.query_suffix);
            println!("  Query was: {}", query);
        }
    }
    Ok(())
}

/// JSON shape for a single-track result
fn single_output(decision: &MatchDecision) -> serde_json::Value {
    match decision.to_video_match() {
        Some(video) => serde_json::to_value(video).unwrap_or_default(),
        None => serde_json::json!({ "error": NO_VIDEO_ERROR }),
    }
}

/// Match every track in a file, stopping early on Ctrl-C
pub fn cmd_batch(
    rt: &Runtime,
    config: &Config,
    token: AccessToken,
    file: &Path,
    concurrency: Option<usize>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let tracks = read_tracks(file)?;

    let mut matcher_config = MatcherConfig::from(config);
    if let Some(n) = concurrency {
        matcher_config.concurrency = n.max(1);
    }

    let client = YouTubeClient::new(token, &config.youtube)?;
    let service = MatcherService::new(client, matcher_config);

    eprintln!("Matching {} tracks...", tracks.len());

    let result = rt.block_on(async {
        let cancel = async {
            // If the handler can't be installed, never cancel
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
            eprintln!("Interrupted, stopping after tracks already in flight...");
        };
        service.match_entries_until(&tracks, cancel).await
    });

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
            eprintln!("Results written to {:?}", path);
        }
        None => println!("{}", json),
    }

    print_summary(&result, tracks.len());
    Ok(())
}

fn print_summary(result: &BatchResult, total: usize) {
    eprintln!();
    eprintln!("=== Summary ===");
    eprintln!("  Matched: {}", result.matched());
    eprintln!("  Failed:  {}", result.failed());
    if result.is_cancelled() {
        eprintln!("  Cancelled after {}/{} tracks", result.processed(), total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::candidate;

    #[test]
    fn test_single_output_match() {
        let decision = MatchDecision::Exact(candidate("v1", "Song - Band", 200));
        let value = single_output(&decision);

        assert_eq!(value["videoId"], "v1");
        assert_eq!(value["duration"], 200);
        assert_eq!(value["matchKind"], "exact");
        assert!(value.get("thumbnail").is_none());
    }

    #[test]
    fn test_single_output_no_match() {
        let value = single_output(&MatchDecision::NoMatch);
        assert_eq!(value, serde_json::json!({ "error": "No matching YouTube video found" }));
    }
}
