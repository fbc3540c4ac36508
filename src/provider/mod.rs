//! Chat capability boundary and implementations.

pub mod http;
pub mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleChat;

use async_trait::async_trait;

use crate::error::Result;

/// One chat exchange sent to the serving backend.
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    /// Backend model identifier.
    pub model: &'a str,
    pub message: &'a str,
    pub system_prompt: Option<&'a str>,
    pub temperature: Option<f64>,
}

/// Response from the serving backend.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    /// Provider-reported token count, when available.
    pub tokens_used: Option<u32>,
    /// Provider-reported execution time in ms, when available.
    pub execution_time_ms: Option<u64>,
}

/// The external chat capability the execution coordinator consumes.
///
/// Implementations must fail (return `Err`) on transport or provider
/// errors; the coordinator treats any failure uniformly as one failed
/// attempt.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse>;
}
