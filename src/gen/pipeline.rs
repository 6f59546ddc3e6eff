//! Generation pipeline - ordered fallback over providers
//!
//! Providers run strictly in configured priority order. Each call is bounded
//! by a timeout and its result gated through `LevelSpec::validate`; any
//! failure logs and falls through to the next provider. The chain always
//! terminates in the deterministic local generator, so `generate` cannot
//! fail regardless of how the remote backends behave.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::core::level::LevelSpec;
use crate::types::DEFAULT_GENERATOR_TIMEOUT_MS;

use super::{GenerateRequest, Generator, LocalGenerator};

/// Milliseconds since the Unix epoch, for level-id derivation
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub struct GenerationPipeline {
    generators: Vec<Box<dyn Generator>>,
    fallback: LocalGenerator,
    timeout: Duration,
    /// Monotonic ticket per generate call; stale results are discarded
    ticket: AtomicU64,
}

impl GenerationPipeline {
    /// Pipeline over the given providers in priority order
    pub fn new(generators: Vec<Box<dyn Generator>>) -> Self {
        Self {
            generators,
            fallback: LocalGenerator::new(),
            timeout: Duration::from_millis(DEFAULT_GENERATOR_TIMEOUT_MS),
            ticket: AtomicU64::new(0),
        }
    }

    /// Standard provider lineup with timeout read from the environment
    /// (`PUZZLE_GEN_TIMEOUT_MS`)
    pub fn from_env() -> Self {
        let timeout_ms = std::env::var("PUZZLE_GEN_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_GENERATOR_TIMEOUT_MS);

        let mut pipeline = Self::new(vec![
            Box::new(super::GeminiProvider::from_env()),
            Box::new(super::OpenRouterProvider::from_env()),
        ]);
        pipeline.timeout = Duration::from_millis(timeout_ms.max(1));
        pipeline
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate a level; never fails.
    ///
    /// Remote outages are invisible to the caller beyond latency: the worst
    /// case is every provider timing out and the local generator answering.
    pub async fn generate(&self, request: &GenerateRequest) -> LevelSpec {
        for generator in &self.generators {
            if !generator.is_configured() {
                println!("[Pipeline] {} not configured, skipping", generator.name());
                continue;
            }

            println!("[Pipeline] trying {} provider", generator.name());
            let attempt = tokio::time::timeout(self.timeout, generator.generate_level(request));
            match attempt.await {
                Err(_) => {
                    eprintln!(
                        "[Pipeline] {} timed out after {:?}",
                        generator.name(),
                        self.timeout
                    );
                }
                Ok(Err(e)) => {
                    eprintln!("[Pipeline] {} failed: {}", generator.name(), e);
                }
                Ok(Ok(spec)) => match spec.validate() {
                    Ok(_) => {
                        println!(
                            "[Pipeline] {} produced level {}",
                            generator.name(),
                            spec.level_id
                        );
                        return spec;
                    }
                    Err(e) => {
                        eprintln!("[Pipeline] {} result rejected: {}", generator.name(), e);
                    }
                },
            }
        }

        println!("[Pipeline] falling back to local generator");
        self.fallback.generate(request, now_ms())
    }

    /// Generate with last-request-wins semantics.
    ///
    /// Each call takes a ticket when it starts; if a newer call has started
    /// by the time this one resolves, the result is stale and dropped so it
    /// is never applied to a session that already moved on.
    pub async fn generate_latest(&self, request: &GenerateRequest) -> Option<LevelSpec> {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let spec = self.generate(request).await;
        if self.ticket.load(Ordering::SeqCst) != ticket {
            println!("[Pipeline] discarding stale result {}", spec.level_id);
            return None;
        }
        Some(spec)
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
