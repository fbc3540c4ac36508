//! Shared test support: a scripted in-memory chat provider.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use taskroute::error::{Result, RouteError};
use taskroute::provider::{ChatProvider, ChatRequest, ChatResponse};

/// Chat stub scripted per model name. Records every attempted model so
/// tests can assert ordering and short-circuiting.
#[derive(Default)]
pub struct ScriptedChat {
    responses: HashMap<String, String>,
    untracked: HashSet<String>,
    failing: HashSet<String>,
    hanging: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, model: &str, content: &str) -> Self {
        self.responses.insert(model.to_string(), content.to_string());
        self
    }

    /// Like [`respond`](Self::respond) but the reply carries no token count.
    pub fn respond_untracked(mut self, model: &str, content: &str) -> Self {
        self.untracked.insert(model.to_string());
        self.responses.insert(model.to_string(), content.to_string());
        self
    }

    pub fn fail(mut self, model: &str) -> Self {
        self.failing.insert(model.to_string());
        self
    }

    /// Model whose call never completes (exercises the timeout race).
    pub fn hang(mut self, model: &str) -> Self {
        self.hanging.insert(model.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
        self.calls.lock().unwrap().push(request.model.to_string());

        if self.hanging.contains(request.model) {
            tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
        }
        if self.failing.contains(request.model) {
            return Err(RouteError::provider(request.model, "scripted failure"));
        }
        match self.responses.get(request.model) {
            Some(content) => {
                let tracked = !self.untracked.contains(request.model);
                Ok(ChatResponse {
                    content: content.clone(),
                    tokens_used: tracked.then_some(42),
                    execution_time_ms: tracked.then_some(1_500),
                })
            }
            None => Err(RouteError::provider(request.model, "no scripted response")),
        }
    }
}
