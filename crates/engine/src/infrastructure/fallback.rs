//! Fallback chain over LLM backend variants.
//!
//! Tries each configured backend in a fixed priority order, fresh on every
//! call: a backend that failed once may be transiently down, so no cross-call
//! state records which variant "won". A call only fails when every variant
//! has been exhausted.

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, ModelResult, PromptRequest};

/// Default upper bound on a single backend attempt. The transport timeout in
/// each client is a second line of defense; this one also covers stalled
/// response bodies.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(90);

/// One failed backend attempt, kept for diagnosis.
#[derive(Debug, Clone)]
pub struct BackendAttempt {
    pub backend: String,
    pub error: LlmError,
}

/// Every configured backend variant failed for one call. The sole failure
/// mode surfaced to callers of chat and encounter generation.
#[derive(Debug, thiserror::Error)]
#[error("all LLM backends exhausted: {}", summarize(.attempts))]
pub struct AllBackendsExhausted {
    pub attempts: Vec<BackendAttempt>,
}

impl AllBackendsExhausted {
    /// Identifiers of every attempted variant, in priority order.
    pub fn attempted_backends(&self) -> Vec<&str> {
        self.attempts.iter().map(|a| a.backend.as_str()).collect()
    }
}

fn summarize(attempts: &[BackendAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} ({})", a.backend, a.error))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Priority-ordered chain of backend variants behind one invoke capability.
pub struct FallbackChain {
    backends: Vec<Arc<dyn LlmPort>>,
    call_timeout: Duration,
}

impl FallbackChain {
    pub fn new(backends: Vec<Arc<dyn LlmPort>>) -> Self {
        Self {
            backends,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Dispatch a prompt to the first backend that produces usable text.
    pub async fn invoke(
        &self,
        request: &PromptRequest,
    ) -> Result<ModelResult, AllBackendsExhausted> {
        let mut attempts = Vec::new();

        for backend in &self.backends {
            let attempt = tokio::time::timeout(self.call_timeout, backend.generate(request)).await;

            let error = match attempt {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    if !attempts.is_empty() {
                        tracing::info!(
                            backend = backend.id(),
                            skipped = attempts.len(),
                            "LLM backend succeeded after fallback"
                        );
                    }
                    return Ok(ModelResult {
                        text,
                        provider: backend.id().to_string(),
                    });
                }
                Ok(Ok(_)) => LlmError::EmptyResponse,
                Ok(Err(e)) => e,
                Err(_) => LlmError::RequestFailed(format!(
                    "timed out after {}s",
                    self.call_timeout.as_secs()
                )),
            };

            tracing::warn!(
                backend = backend.id(),
                error = %error,
                "LLM backend failed, trying next variant"
            );
            attempts.push(BackendAttempt {
                backend: backend.id().to_string(),
                error,
            });
        }

        tracing::error!(
            attempted = attempts.len(),
            "all LLM backend variants exhausted"
        );
        Err(AllBackendsExhausted { attempts })
    }
}
