//! Batch input files.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::error::{Result, ResultExt};
use crate::matcher::{MalformedTrack, TrackEntry};

/// Accepted shapes of a batch input file
#[derive(Deserialize)]
#[serde(untagged)]
enum TrackFile {
    Wrapped {
        #[serde(rename = "spotifyTracks")]
        spotify_tracks: Vec<Value>,
    },
    List(Vec<Value>),
}

/// Read and parse a batch input file
pub fn read_tracks(path: &Path) -> Result<Vec<TrackEntry>> {
    let contents = std::fs::read_to_string(path).with_context(format!("reading {:?}", path))?;
    parse_tracks(&contents).with_context(format!("parsing {:?}", path))
}

/// Parse a batch input file.
///
/// Only the outer shape is fatal. Each entry that is not a valid track
/// keeps its slot as a [`MalformedTrack`] carrying whatever `name` it had
/// and the deserialization error.
pub fn parse_tracks(json: &str) -> Result<Vec<TrackEntry>> {
    let entries = match serde_json::from_str::<TrackFile>(json)
        .with_context("expected a JSON array of tracks or {\"spotifyTracks\": [...]}")?
    {
        TrackFile::Wrapped { spotify_tracks } => spotify_tracks,
        TrackFile::List(entries) => entries,
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, value)| parse_entry(index, value))
        .collect())
}

fn parse_entry(index: usize, value: Value) -> TrackEntry {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    serde_json::from_value(value).map_err(|e| {
        tracing::warn!("Track {} ('{}') is malformed: {}", index + 1, name, e);
        MalformedTrack {
            name,
            reason: e.to_string(),
        }
    })
}
