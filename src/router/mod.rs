//! Request orchestration: characterize, select, compose, execute.
//!
//! [`Router::route`] never fails structurally: characterization, selection,
//! and execution errors all fold into an error-shaped [`RoutedResult`] so
//! the caller always receives a well-formed response plus the ordered step
//! log.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::events::{RequestLog, StepEvent};
use crate::executor::{ExecutionFailure, ExecutionOutcome, ExecutionRequest, Executor};
use crate::prompt::{generate_system_prompt, PromptConfig};
use crate::provider::ChatProvider;
use crate::registry::ModelRegistry;
use crate::selector::{select_model, SelectionResult};
use crate::task::{parse_task, TaskDescriptor, TaskInput};

/// Tunables applied to every routed request.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Per-attempt timeout override in ms.
    pub timeout_ms: Option<u64>,
    pub temperature: Option<f64>,
}

/// Final result of one routed request. Structurally valid on every path;
/// on failure `success` is false and `metadata.error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutedResult {
    pub request_id: Uuid,
    pub success: bool,
    pub response: Option<String>,
    pub task: Option<TaskDescriptor>,
    pub selection: Option<SelectionResult>,
    pub metadata: ResultMetadata,
    pub log: Vec<StepEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResultMetadata {
    pub model_used: Option<String>,
    pub tokens_used: Option<u32>,
    pub execution_time_ms: Option<u64>,
    pub confidence: Option<u8>,
    /// Per-attempt failures accumulated by the fallback loop.
    pub failures: Vec<ExecutionFailure>,
    pub error: Option<String>,
}

/// Owns the registry and drives the full routing pipeline.
pub struct Router {
    registry: RwLock<ModelRegistry>,
    executor: Executor,
    options: RouterOptions,
}

impl Router {
    pub fn new(registry: ModelRegistry, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            registry: RwLock::new(registry),
            executor: Executor::new(provider),
            options: RouterOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    /// Refresh availability flags from an externally determined name set.
    ///
    /// Takes the write guard, so in-flight selections never observe a
    /// half-updated registry.
    pub fn verify_availability(&self, known_available: &HashSet<String>) {
        if let Ok(mut registry) = self.registry.write() {
            registry.verify_availability(known_available);
        }
    }

    /// Mark every profile available (no external probe configured).
    pub fn assume_all_available(&self) {
        if let Ok(mut registry) = self.registry.write() {
            registry.assume_all_available();
        }
    }

    /// Characterize and select without executing.
    pub fn plan(&self, input: &TaskInput) -> Result<(TaskDescriptor, SelectionResult)> {
        let task = parse_task(input)?;
        let registry = self
            .registry
            .read()
            .map_err(|_| crate::error::RouteError::Configuration("registry lock poisoned".into()))?;
        let selection = select_model(&registry, &task)?;
        Ok((task, selection))
    }

    /// Run the full pipeline for one task.
    pub async fn route(&self, input: &TaskInput) -> RoutedResult {
        let request_id = Uuid::new_v4();
        let mut log = RequestLog::new();
        info!(%request_id, "routing task");

        log.info("characterize_task", None);
        let task = match parse_task(input) {
            Ok(task) => task,
            Err(e) => {
                log.error("characterize_task_failed", Some(serde_json::json!({"error": e.to_string()})));
                return Self::error_result(request_id, None, None, Vec::new(), e.to_string(), log);
            }
        };
        log.info(
            "task_characterized",
            Some(serde_json::json!({
                "task_type": task.task_type,
                "domain": task.domain,
                "complexity": task.complexity,
            })),
        );

        let selection = {
            let registry = match self.registry.read() {
                Ok(registry) => registry,
                Err(_) => {
                    let message = "registry lock poisoned".to_string();
                    log.error("select_model_failed", Some(serde_json::json!({"error": message})));
                    return Self::error_result(request_id, Some(task), None, Vec::new(), message, log);
                }
            };
            match select_model(&registry, &task) {
                Ok(selection) => selection,
                Err(e) => {
                    log.error("select_model_failed", Some(serde_json::json!({"error": e.to_string()})));
                    return Self::error_result(request_id, Some(task), None, Vec::new(), e.to_string(), log);
                }
            }
        };
        log.info(
            "model_selected",
            Some(serde_json::json!({
                "model": selection.selected_model,
                "score": selection.score.score,
                "alternatives": selection.alternatives.len(),
            })),
        );

        let system_prompt = generate_system_prompt(&PromptConfig {
            task_type: task.task_type,
            model_name: &selection.selected_model,
            domain: task.domain,
            context: input.context.as_deref(),
        });

        let request = ExecutionRequest::builder()
            .model(selection.selected_model.clone())
            .message(task.description.clone())
            .system_prompt(system_prompt)
            .maybe_temperature(self.options.temperature)
            .maybe_timeout_ms(self.options.timeout_ms)
            .build();
        let fallbacks: Vec<String> = selection
            .alternatives
            .iter()
            .map(|s| s.model_name.clone())
            .collect();

        log.info(
            "execute",
            Some(serde_json::json!({"primary": request.model, "fallbacks": fallbacks})),
        );
        match self.executor.execute_with_fallback(&request, &fallbacks).await {
            ExecutionOutcome::Completed(report) => {
                log.info(
                    "execution_completed",
                    Some(serde_json::json!({
                        "model_used": report.model_used,
                        "tokens_used": report.tokens_used,
                        "execution_time_ms": report.execution_time_ms,
                    })),
                );
                RoutedResult {
                    request_id,
                    success: true,
                    response: Some(report.content),
                    task: Some(task),
                    selection: Some(selection),
                    metadata: ResultMetadata {
                        model_used: Some(report.model_used),
                        tokens_used: Some(report.tokens_used),
                        execution_time_ms: Some(report.execution_time_ms),
                        confidence: Some(report.confidence),
                        failures: Vec::new(),
                        error: None,
                    },
                    log: log.into_events(),
                }
            }
            ExecutionOutcome::Exhausted { failures } => {
                log.error(
                    "execution_exhausted",
                    Some(serde_json::json!({"attempts": failures.len()})),
                );
                let message = format!(
                    "all {} candidate model(s) failed to execute the task",
                    failures.len()
                );
                Self::error_result(request_id, Some(task), Some(selection), failures, message, log)
            }
        }
    }

    fn error_result(
        request_id: Uuid,
        task: Option<TaskDescriptor>,
        selection: Option<SelectionResult>,
        failures: Vec<ExecutionFailure>,
        error: String,
        log: RequestLog,
    ) -> RoutedResult {
        RoutedResult {
            request_id,
            success: false,
            response: None,
            task,
            selection,
            metadata: ResultMetadata {
                failures,
                error: Some(error),
                ..ResultMetadata::default()
            },
            log: log.into_events(),
        }
    }
}
