//! Syncify - match Spotify tracks to their YouTube videos.
//!
//! Searches the YouTube Data API for each track, then picks a video by an
//! exact title/artist/duration test, a weighted fuzzy score, or reports
//! that nothing fits. Works on single tracks or whole playlists exported
//! as JSON.

pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
#[cfg(test)]
pub mod test_utils;
pub mod youtube;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so JSON output on stdout stays clean)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("syncify=info".parse()?))
        .init();

    cli::run_command(&args)
}
