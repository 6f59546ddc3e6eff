//! Level generation - interchangeable providers and the fallback pipeline
//!
//! Providers are black boxes behind the `Generator` trait: remote AI backends
//! that may fail in any way, and a deterministic local generator that cannot.
//! The pipeline tries them in priority order and always returns a playable
//! level.

pub mod local;
pub mod pipeline;
pub mod remote;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::core::level::{sanitize_theme, LevelSpec, ValidationError};

pub use local::LocalGenerator;
pub use pipeline::GenerationPipeline;
pub use remote::{GeminiProvider, OpenRouterProvider};

/// Parameters for one level generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Player skill, 1..=10; drives grid size and obstacle density
    pub player_skill: u8,
    /// Sanitized theme identifier
    pub theme: String,
}

impl GenerateRequest {
    pub fn new(player_skill: u8, theme: &str) -> Self {
        Self {
            player_skill: player_skill.clamp(1, 10),
            theme: sanitize_theme(theme),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("provider is not configured")]
    NotConfigured,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned malformed level data: {0}")]
    Malformed(String),
    #[error("provider result failed validation: {0}")]
    Invalid(#[from] ValidationError),
    #[error("provider timed out")]
    Timeout,
}

/// A level provider. Remote implementations may fail or hang; the pipeline
/// guards every call with a timeout and validates whatever comes back.
pub trait Generator: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Local, synchronous credential check; unconfigured providers are
    /// skipped without a network round trip
    fn is_configured(&self) -> bool;

    /// Produce a level for the request. The result is unverified.
    fn generate_level<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<LevelSpec, GenerateError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_clamps_and_sanitizes() {
        let req = GenerateRequest::new(0, "  Sci Fi!! ");
        assert_eq!(req.player_skill, 1);
        assert_eq!(req.theme, "sci-fi");

        let req = GenerateRequest::new(99, "cave");
        assert_eq!(req.player_skill, 10);
    }
}
