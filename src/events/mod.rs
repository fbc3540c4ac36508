//! Structured per-request step log.
//!
//! Instead of interleaving progress on a console, each routing step is
//! recorded as an ordered event the caller can render or discard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepLevel {
    Info,
    Warn,
    Error,
}

/// One recorded routing step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepEvent {
    pub timestamp: DateTime<Utc>,
    pub level: StepLevel,
    pub step: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Ordered event collector for one request.
#[derive(Debug, Default)]
pub struct RequestLog {
    events: Vec<StepEvent>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, level: StepLevel, step: impl Into<String>, details: Option<serde_json::Value>) {
        self.events.push(StepEvent {
            timestamp: Utc::now(),
            level,
            step: step.into(),
            details,
        });
    }

    pub fn info(&mut self, step: impl Into<String>, details: Option<serde_json::Value>) {
        self.record(StepLevel::Info, step, details);
    }

    pub fn warn(&mut self, step: impl Into<String>, details: Option<serde_json::Value>) {
        self.record(StepLevel::Warn, step, details);
    }

    pub fn error(&mut self, step: impl Into<String>, details: Option<serde_json::Value>) {
        self.record(StepLevel::Error, step, details);
    }

    pub fn events(&self) -> &[StepEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<StepEvent> {
        self.events
    }
}
