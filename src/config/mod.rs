//! Backend credential configuration (env-layered).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Credentials and endpoint for the chat backend.
///
/// Resolution order: explicit `set_*` calls, then environment variables
/// (`TASKROUTE_API_KEY` falling back to `OPENAI_API_KEY`, and
/// `TASKROUTE_BASE_URL` falling back to `OPENAI_BASE_URL`).
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let config = Self::new();

        let mappings = [
            ("TASKROUTE_API_KEY", "api_key"),
            ("OPENAI_API_KEY", "api_key"),
            ("TASKROUTE_BASE_URL", "base_url"),
            ("OPENAI_BASE_URL", "base_url"),
        ];
        for (env_var, key) in &mappings {
            if config.get(key).is_none() {
                if let Ok(value) = std::env::var(env_var) {
                    config.set(key, value);
                }
            }
        }
        config
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value);
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    pub fn set_api_key(&self, key: String) {
        self.set("api_key", key);
    }

    pub fn api_key(&self) -> Option<String> {
        self.get("api_key")
    }

    pub fn set_base_url(&self, url: String) {
        self.set("base_url", url);
    }

    pub fn base_url(&self) -> String {
        self.get("base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key().is_some()
    }
}
