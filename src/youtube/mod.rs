//! YouTube Data API integration
//!
//! Supplies match candidates by searching YouTube and resolving each hit's
//! duration. Implements [`crate::matcher::VideoSearch`].
//!
//! API docs: https://developers.google.com/youtube/v3/docs

pub mod dto;
mod adapter;
mod client;

pub use client::{AccessToken, YouTubeClient};
