//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`MatchError`](crate::matcher::MatchError), [`ConfigError`]). File
//! loading (config and batch input) returns [`Error`]; the CLI wraps
//! everything in `anyhow` at the top.
//!
//! # Example
//!
//! ```ignore
//! use crate::error::{Result, ResultExt};
//!
//! fn read_candidates(path: &Path) -> Result<Vec<Candidate>> {
//!     let json = std::fs::read_to_string(path).with_context("reading candidates")?;
//!     Ok(serde_json::from_str(&json)?)
//! }
//! ```

use crate::config::ConfigError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input or output failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Json(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::Invalid("bad weights".to_string()).into();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().contains("bad weights"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::from(ConfigError::NoConfigDir).context("while loading config");
        let msg = err.to_string();
        assert!(msg.contains("while loading config"));
        assert!(msg.contains("config directory"));
    }

    #[test]
    fn test_result_ext_io() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let msg = result.with_context("reading tracks.json").unwrap_err().to_string();
        assert!(msg.contains("reading tracks.json"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_result_ext_json() {
        let result: std::result::Result<Vec<u32>, serde_json::Error> = serde_json::from_str("[1,");
        let err = result.with_context("parsing candidates").unwrap_err();
        assert!(matches!(err, Error::WithContext { ref source, .. } if matches!(**source, Error::Json(_))));
    }
}
