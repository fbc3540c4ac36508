//! Reference chat provider for any OpenAI-compatible Chat Completions API.

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, RouteError};

use super::http::{bearer_headers, shared_client, status_to_error};
use super::{ChatProvider, ChatRequest, ChatResponse};

pub struct OpenAiCompatibleChat {
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl OpenAiCompatibleChat {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url }
    }

    fn build_body(request: &ChatRequest<'_>) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(system) = request.system_prompt {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": request.message}));

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "stream": false,
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = temperature.into();
        }
        body
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleChat {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = Self::build_body(&request);

        debug!(model = request.model, %url, "chat request");
        let started = Instant::now();
        let response = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_to_error(request.model, status.as_u16(), &text));
        }

        let parsed: CompletionResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RouteError::provider(request.model, "response contained no choices"))?;

        Ok(ChatResponse {
            content,
            tokens_used: parsed.usage.and_then(|u| u.total_tokens),
            execution_time_ms: Some(started.elapsed().as_millis() as u64),
        })
    }
}
