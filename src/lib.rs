//! taskroute: route a free-text engineering task to the best-fit model.
//!
//! The core pipeline characterizes a task description into a structured
//! descriptor, scores a registry of model profiles against it with a fixed
//! weighted formula, composes a task-specific system prompt, and executes
//! against the selected model with ordered fallback.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskroute::prelude::*;
//!
//! # async fn example() -> taskroute::error::Result<()> {
//! let mut registry = ModelRegistry::new();
//! registry.load_from_path("models.toml".as_ref())?;
//!
//! let config = BackendConfig::from_env();
//! let provider = Arc::new(OpenAiCompatibleChat::new(
//!     config.api_key().unwrap_or_default(),
//!     config.base_url(),
//! ));
//!
//! let router = Router::new(registry, provider);
//! router.assume_all_available();
//!
//! let input = TaskInput::builder()
//!     .description("Write a function to calculate fibonacci numbers")
//!     .build();
//! let result = router.route(&input).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod prelude;
pub mod prompt;
pub mod provider;
pub mod registry;
pub mod router;
pub mod selector;
pub mod task;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
