//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `matching`: online matching against YouTube (single track and batch)
//! - `input`: batch input file parsing
//! - `inspect`: offline tools (ranking local candidates, parsing durations,
//!   previewing queries, showing config)

mod input;
mod inspect;
mod matching;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::matcher::{FallbackPolicy, SourceTrack};
use crate::youtube::AccessToken;

pub use inspect::{cmd_config, cmd_duration, cmd_query, cmd_rank};
pub use matching::{cmd_batch, cmd_match};

/// Syncify CLI - match Spotify tracks to YouTube videos
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Find the YouTube video for one track
    Match {
        /// Track title
        #[arg(long)]
        name: String,
        /// Credited artist (repeat for several, primary first)
        #[arg(long = "artist", required = true)]
        artists: Vec<String>,
        /// Track length in milliseconds
        #[arg(long)]
        duration_ms: u64,
        /// Spotify track ID
        #[arg(long, default_value = "")]
        id: String,
        /// YouTube access token (or set YOUTUBE_ACCESS_TOKEN env var)
        #[arg(short, long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Match every track in a JSON file
    Batch {
        /// JSON array of tracks, or an object with a `spotifyTracks` array
        file: PathBuf,
        /// YouTube access token (or set YOUTUBE_ACCESS_TOKEN env var)
        #[arg(short, long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Tracks matched at once (overrides batch.concurrency)
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Write the JSON result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score local candidates for a track without touching the network
    Rank {
        /// JSON file with one track
        track: PathBuf,
        /// JSON file with an array of candidates
        candidates: PathBuf,
        /// Override matching.fallback
        #[arg(long, value_enum)]
        fallback: Option<FallbackPolicy>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Parse a YouTube duration token (e.g. PT4M13S) into seconds
    Duration {
        token: String,
    },
    /// Show the search query built for a track
    Query {
        #[arg(long)]
        name: String,
        #[arg(long = "artist", required = true)]
        artists: Vec<String>,
    },
    /// Show the effective configuration
    Config {
        /// Print only the config file location
        #[arg(long)]
        path: bool,
        /// Write the effective configuration to the config file
        #[arg(long, conflicts_with = "path")]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Match {
            name,
            artists,
            duration_ms,
            id,
            token,
            json,
        } => {
            let rt = Runtime::new()?;
            let track = SourceTrack {
                id: id.clone(),
                name: name.clone(),
                artists: artists.iter().map(crate::matcher::Artist::new).collect(),
                duration_ms: *duration_ms,
            };
            let token = resolve_token(token.as_deref(), &config)?;
            cmd_match(&rt, &config, token, &track, *json)
        }
        Commands::Batch {
            file,
            token,
            concurrency,
            output,
        } => {
            let rt = Runtime::new()?;
            let token = resolve_token(token.as_deref(), &config)?;
            cmd_batch(&rt, &config, token, file, *concurrency, output.as_deref())
        }
        Commands::Rank {
            track,
            candidates,
            fallback,
            json,
        } => cmd_rank(&config, track, candidates, *fallback, *json),
        Commands::Duration { token } => {
            cmd_duration(token);
            Ok(())
        }
        Commands::Query { name, artists } => {
            cmd_query(&config, name, artists);
            Ok(())
        }
        Commands::Config { path, init } => {
            cmd_config(&config, cli.config.as_deref(), *path, *init)
        }
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Load and validate configuration.
///
/// An explicit `--config` path must exist and parse; the default location
/// falls back to defaults.
fn load_config(path: Option<&Path>) -> crate::error::Result<Config> {
    let config = match path {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    config.matching.validate()?;
    Ok(config)
}

/// Pick the access token: flag/env first, then the config file.
fn resolve_token(flag: Option<&str>, config: &Config) -> anyhow::Result<AccessToken> {
    flag.map(str::to_string)
        .or_else(|| config.credentials.youtube_access_token.clone())
        .map(AccessToken::new)
        .filter(|t| !t.is_empty())
        .context(
            "YouTube access token required. Use --token, set YOUTUBE_ACCESS_TOKEN, \
             or add credentials.youtube_access_token to the config file",
        )
}

/// Read and deserialize a JSON file
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))
}
