//! Command-line interface for syncify.
//!
//! This module provides CLI commands for matching Spotify tracks to
//! YouTube videos, one at a time or from a file, plus offline helpers
//! for inspecting how the matcher scores candidates.

mod commands;

pub use commands::{Cli, Commands, run_command};
