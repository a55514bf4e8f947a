//! YouTube Data API HTTP client
//!
//! Handles communication with the YouTube Data API v3.
//! See: https://developers.google.com/youtube/v3/docs/search/list
//!
//! A candidate fetch is two requests: `search.list` for the hits (titles,
//! channels, thumbnails) and one batched `videos.list` for their durations.
//! The access token is owned by the client and sent as a bearer header on
//! every request. Nothing is cached or shared between clients.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::{adapter, dto};
use crate::config::YouTubeConfig;
use crate::matcher::domain::{Candidate, MatchError};
use crate::matcher::traits::{VideoDetails, VideoSearch};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// OAuth access token for the YouTube Data API.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// YouTube Data API client
pub struct YouTubeClient {
    token: AccessToken,
    http_client: reqwest::Client,
    base_url: String,
    video_category_id: Option<String>,
}

impl YouTubeClient {
    /// Create a new client for `token` using the endpoint settings in `config`.
    pub fn new(token: AccessToken, config: &YouTubeConfig) -> Result<Self, MatchError> {
        if token.is_empty() {
            return Err(MatchError::Unauthorized(
                "YouTube access token is empty".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| MatchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(token, http_client, config))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_http_client(
        token: AccessToken,
        http_client: reqwest::Client,
        config: &YouTubeConfig,
    ) -> Self {
        Self {
            token,
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            video_category_id: Some(config.video_category_id.clone()).filter(|c| !c.is_empty()),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(token: &str, base_url: impl Into<String>) -> Self {
        let config = YouTubeConfig {
            base_url: base_url.into(),
            ..YouTubeConfig::default()
        };
        Self::with_http_client(AccessToken::new(token), reqwest::Client::new(), &config)
    }

    /// Search for videos and resolve their durations
    pub async fn search_videos(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Candidate>, MatchError> {
        let search: dto::SearchListResponse = self.get_json(&self.search_url(query, limit)).await?;

        let ids = adapter::video_ids(&search);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let durations = self.fetch_durations(&ids).await?;
        Ok(adapter::to_candidates(search, &durations))
    }

    fn search_url(&self, query: &str, limit: u32) -> String {
        let mut url = format!(
            "{}/search?part=snippet&type=video&maxResults={}&q={}",
            self.base_url,
            limit,
            urlencoding::encode(query)
        );
        if let Some(category) = &self.video_category_id {
            url.push_str("&videoCategoryId=");
            url.push_str(&urlencoding::encode(category));
        }
        url
    }

    fn videos_url(&self, ids: &[String]) -> String {
        let joined = ids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}/videos?part=contentDetails&id={}", self.base_url, joined)
    }

    /// Send an authorized GET and decode the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, MatchError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();

        if !status.is_success() {
            // The error envelope is optional; fall back to the bare status
            let body = response.json::<dto::ErrorResponse>().await.ok();
            let err = adapter::to_error(status.as_u16(), body);
            tracing::debug!("YouTube request failed ({}): {}", status, err);
            return Err(err);
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                MatchError::Timeout
            } else {
                MatchError::Parse(e.to_string())
            }
        })
    }
}

fn transport_error(e: reqwest::Error) -> MatchError {
    if e.is_timeout() {
        MatchError::Timeout
    } else {
        MatchError::Network(e.to_string())
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Candidate>, MatchError> {
        self.search_videos(query, limit).await
    }
}

#[async_trait]
impl VideoDetails for YouTubeClient {
    /// One batched `videos.list` request; no request for an empty ID list
    async fn fetch_durations(&self, ids: &[String]) -> Result<HashMap<String, u32>, MatchError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let response: dto::VideoListResponse = self.get_json(&self.videos_url(ids)).await?;
        Ok(adapter::to_durations(response))
    }
}


// =============================================================================
// Mock Server Tests
// =============================================================================
