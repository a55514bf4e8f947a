//! Offline commands: no token and no network needed.

use std::path::Path;

use crate::config::{self, Config};
use crate::matcher::domain::MatchScore;
use crate::matcher::policy::MatchPolicy;
use crate::matcher::query::build_search_query_with;
use crate::matcher::scoring::{is_exact_match, score_candidates};
use crate::matcher::{Artist, Candidate, FallbackPolicy, SourceTrack, parse_duration, select};

use super::read_json;

/// Score local candidates against a track and show the decision
pub fn cmd_rank(
    config: &Config,
    track_path: &Path,
    candidates_path: &Path,
    fallback: Option<FallbackPolicy>,
    json: bool,
) -> anyhow::Result<()> {
    let track: SourceTrack = read_json(track_path)?;
    let candidates: Vec<Candidate> = read_json(candidates_path)?;
    track.validate()?;

    let mut policy = MatchPolicy::from(&config.matching);
    if let Some(fallback) = fallback {
        policy = policy.with_fallback(fallback);
    }

    let scores = score_candidates(&track, &candidates, &policy);
    let decision = select(&track, &candidates, &policy);

    if json {
        let rows: Vec<_> = scores.iter().map(|s| score_row(&track, s, &policy)).collect();
        let output = serde_json::json!({
            "decision": decision.to_video_match(),
            "scores": rows,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Track: {} - {} ({:.0}s)",
        track.name,
        track.primary_artist(),
        track.duration_secs()
    );
    println!();
    println!(
        "  {:<14} {:>5} {:>6} {:>6} {:>6}  TITLE",
        "VIDEO", "EXACT", "TITLE", "DUR", "SCORE"
    );
    for s in &scores {
        let exact = if is_exact_match(&track, s.candidate, &policy) {
            "yes"
        } else {
            ""
        };
        println!(
            "  {:<14} {:>5} {:>6.3} {:>6.3} {:>6.3}  {}",
            s.candidate.id,
            exact,
            s.title_similarity,
            s.duration_score,
            s.combined_score,
            s.candidate.title
        );
    }
    println!();

    match (decision.kind(), decision.candidate()) {
        (Some(kind), Some(c)) => println!("Decision: {:?} -> {} ({})", kind, c.id, c.title),
        _ => println!(
            "Decision: no match (threshold {:.2})",
            policy.fuzzy_threshold
        ),
    }
    Ok(())
}

fn score_row(track: &SourceTrack, score: &MatchScore<'_>, policy: &MatchPolicy) -> serde_json::Value {
    serde_json::json!({
        "videoId": score.candidate.id,
        "title": score.candidate.title,
        "exact": is_exact_match(track, score.candidate, policy),
        "titleSimilarity": score.title_similarity,
        "durationScore": score.duration_score,
        "combinedScore": score.combined_score,
    })
}

/// Print the seconds a duration token parses to
pub fn cmd_duration(token: &str) {
    println!("{}", parse_duration(token));
}

/// Print the search query for a track
pub fn cmd_query(config: &Config, name: &str, artists: &[String]) {
    let track = SourceTrack {
        name: name.to_string(),
        artists: artists.iter().map(Artist::new).collect(),
        ..SourceTrack::default()
    };
    println!("{}", build_search_query_with(&track, &config.matching.query_suffix));
}

/// Show the config file location or the effective configuration
pub fn cmd_config(
    config: &Config,
    explicit_path: Option<&Path>,
    path_only: bool,
    init: bool,
) -> anyhow::Result<()> {
    let path = match explicit_path {
        Some(p) => Some(p.to_path_buf()),
        None => config::config_path(),
    };

    if path_only {
        match path {
            Some(p) => println!("{}", p.display()),
            None => anyhow::bail!("Could not determine config directory"),
        }
        return Ok(());
    }

    if init {
        match explicit_path {
            Some(p) => config::save_to(config, p)?,
            None => config::save(config)?,
        }
        if let Some(p) = path {
            println!("Wrote {}", p.display());
        }
        return Ok(());
    }

    // Never echo the token itself
    let mut shown = config.clone();
    if shown.credentials.youtube_access_token.is_some() {
        shown.credentials.youtube_access_token = Some("<set>".to_string());
    }
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{candidate, track};

    #[test]
    fn test_score_row_fields() {
        let t = track("Test Song", &["Artist A"], 200000);
        let c = candidate("v1", "Test Song - Artist A (Official Video)", 200);
        let policy = MatchPolicy::default();
        let scores = score_candidates(&t, std::slice::from_ref(&c), &policy);

        let row = score_row(&t, &scores[0], &policy);

        assert_eq!(row["videoId"], "v1");
        assert_eq!(row["exact"], true);
        assert_eq!(row["durationScore"], 1.0);
    }

    #[test]
    fn test_rank_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let track_path = dir.path().join("track.json");
        let candidates_path = dir.path().join("candidates.json");
        std::fs::write(
            &track_path,
            r#"{"id": "sp1", "name": "Test Song", "artists": [{"name": "Artist A"}], "duration_ms": 200000}"#,
        )
        .unwrap();
        std::fs::write(
            &candidates_path,
            r#"[{"id": "v1", "title": "Test Song - Artist A", "duration_sec": 200}]"#,
        )
        .unwrap();

        let result = cmd_rank(&Config::default(), &track_path, &candidates_path, None, true);
        assert!(result.is_ok());
    }

    #[test]
    fn test_rank_rejects_invalid_track() {
        let dir = tempfile::tempdir().unwrap();
        let track_path = dir.path().join("track.json");
        let candidates_path = dir.path().join("candidates.json");
        std::fs::write(&track_path, r#"{"name": "No Artists"}"#).unwrap();
        std::fs::write(&candidates_path, "[]").unwrap();

        let result = cmd_rank(&Config::default(), &track_path, &candidates_path, None, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        cmd_config(&Config::default(), Some(&path), false, true).unwrap();

        let loaded = config::load_from(&path).unwrap();
        assert_eq!(loaded.matching.search_limit, 5);
    }
}
