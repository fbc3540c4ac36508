//! Convenience re-exports.

pub use crate::config::BackendConfig;
pub use crate::error::{Result, RouteError};
pub use crate::events::{RequestLog, StepEvent, StepLevel};
pub use crate::executor::{
    ExecutionFailure, ExecutionOutcome, ExecutionReport, ExecutionRequest, Executor,
};
pub use crate::prompt::{generate_system_prompt, PromptConfig};
pub use crate::provider::{ChatProvider, ChatRequest, ChatResponse, OpenAiCompatibleChat};
pub use crate::registry::{ModelProfile, ModelRegistry};
pub use crate::router::{RoutedResult, Router, RouterOptions};
pub use crate::selector::{select_model, ModelScore, SelectionResult};
pub use crate::task::{parse_task, TaskDescriptor, TaskInput};
pub use crate::types::{Complexity, Domain, TaskType};
