//! Execution coordination: bounded single attempts with ordered fallback.
//!
//! Candidates are tried strictly in order (primary first, then the ranked
//! fallbacks). The first successful attempt wins and short-circuits the
//! rest; per-candidate failures are recorded, not raised, and only surface
//! in aggregate once the whole list is exhausted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::provider::{ChatProvider, ChatRequest};
use crate::util::with_timeout;

/// Default bound on one model-execution attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 60_000;

/// One request to execute against a selected model.
#[derive(Debug, Clone, Builder)]
pub struct ExecutionRequest {
    /// Primary (selected) model name.
    #[builder(into)]
    pub model: String,
    /// User-facing task message.
    #[builder(into)]
    pub message: String,
    #[builder(into)]
    pub system_prompt: Option<String>,
    pub temperature: Option<f64>,
    /// Per-attempt timeout; defaults to [`DEFAULT_ATTEMPT_TIMEOUT_MS`].
    pub timeout_ms: Option<u64>,
}

/// Successful execution, including attempt metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionReport {
    pub model_used: String,
    pub content: String,
    pub tokens_used: u32,
    pub execution_time_ms: u64,
    /// Heuristic response confidence in [0, 100].
    pub confidence: u8,
}

/// One failed attempt against one candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionFailure {
    pub model_attempted: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Terminal outcome of a fallback run. Exhaustion is a normal outcome the
/// caller checks by variant, never an `Err`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Completed(ExecutionReport),
    Exhausted { failures: Vec<ExecutionFailure> },
}

impl ExecutionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Drives execution attempts against the chat capability.
pub struct Executor {
    provider: Arc<dyn ChatProvider>,
}

impl Executor {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Execute one attempt against a single model, bounded by the request
    /// timeout.
    pub async fn execute_task(
        &self,
        request: &ExecutionRequest,
        model: &str,
    ) -> Result<ExecutionReport> {
        let timeout = Duration::from_millis(request.timeout_ms.unwrap_or(DEFAULT_ATTEMPT_TIMEOUT_MS));
        let started = Instant::now();

        let response = with_timeout(
            timeout,
            self.provider.chat(ChatRequest {
                model,
                message: &request.message,
                system_prompt: request.system_prompt.as_deref(),
                temperature: request.temperature,
            }),
        )
        .await?;

        // Wall clock for the whole attempt; the provider's own figure
        // (when reported) stays in the response metadata.
        let execution_time_ms = started.elapsed().as_millis() as u64;
        let tokens_used = response
            .tokens_used
            .unwrap_or_else(|| estimate_tokens(&response.content));
        let confidence = estimate_confidence(&response.content, execution_time_ms);

        Ok(ExecutionReport {
            model_used: model.to_string(),
            content: response.content,
            tokens_used,
            execution_time_ms,
            confidence,
        })
    }

    /// Try the primary model, then each fallback in priority order.
    pub async fn execute_with_fallback(
        &self,
        request: &ExecutionRequest,
        fallbacks: &[String],
    ) -> ExecutionOutcome {
        let mut failures = Vec::new();

        let candidates = std::iter::once(request.model.as_str())
            .chain(fallbacks.iter().map(String::as_str));

        for model in candidates {
            debug!(%model, "attempting execution");
            match self.execute_task(request, model).await {
                Ok(report) => {
                    info!(
                        %model,
                        tokens = report.tokens_used,
                        elapsed_ms = report.execution_time_ms,
                        fallbacks_used = failures.len(),
                        "execution completed"
                    );
                    return ExecutionOutcome::Completed(report);
                }
                Err(e) => {
                    warn!(%model, error = %e, "attempt failed, falling back");
                    failures.push(ExecutionFailure {
                        model_attempted: model.to_string(),
                        error: e.to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        ExecutionOutcome::Exhausted { failures }
    }
}

/// Rough token estimate when the provider reports none: one token per four
/// characters, rounded up.
fn estimate_tokens(content: &str) -> u32 {
    (content.len() as u32).div_ceil(4)
}

/// Heuristic response confidence starting at 50, clamped to [0, 100].
fn estimate_confidence(content: &str, execution_time_ms: u64) -> u8 {
    let mut confidence: i32 = 50;
    if content.len() > 1_000 {
        confidence += 10;
    }
    if content.len() > 2_000 {
        confidence += 10;
    }
    if execution_time_ms > 5_000 && execution_time_ms < 30_000 {
        confidence += 10;
    }
    if execution_time_ms < 1_000 {
        confidence -= 10;
    }
    if content.contains("```") {
        confidence += 10;
    }
    let lowered = content.to_lowercase();
    if lowered.contains("because") || lowered.contains("reason") {
        confidence += 5;
    }
    confidence.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn confidence_baseline_is_penalized_for_fast_short_replies() {
        // Short reply under 1s: 50 - 10.
        assert_eq!(estimate_confidence("ok", 200), 40);
    }

    #[test]
    fn confidence_rewards_length_fences_and_rationale() {
        let content = format!("{}```rust\nfn f() {{}}\n``` because reasons", "x".repeat(2_100));
        // 50 +10 +10 (length tiers) +10 (in timing window) +10 (fence) +5 (rationale)
        assert_eq!(estimate_confidence(&content, 6_000), 95);
    }

    #[test]
    fn confidence_is_clamped_to_bounds() {
        let content = format!("{}``` because", "x".repeat(5_000));
        assert!(estimate_confidence(&content, 10_000) <= 100);
        assert_eq!(estimate_confidence("", 1), 40);
    }
}
