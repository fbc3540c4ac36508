//! Model profile registry: load, validate, and query candidate models.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, RouteError};
use crate::types::{Complexity, Domain};

/// Static metadata describing one candidate model's fitness dimensions.
///
/// Profiles are created once at load time; only `available` is mutated
/// afterwards, by [`ModelRegistry::verify_availability`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelProfile {
    pub name: String,
    pub provider: String,
    pub domains: HashSet<Domain>,
    pub max_complexity: Complexity,
    pub capabilities: HashSet<String>,
    pub context_window: u64,
    pub estimated_latency_ms: f64,
    pub cost_per_token: f64,
    /// Informational only, never scored.
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Defaults false until an availability check runs.
    #[serde(default)]
    pub available: bool,
}

/// Raw profile entry as it appears in the profile file, before validation.
///
/// All fields are optional here so a single malformed entry can be skipped
/// with a warning instead of aborting the whole load.
#[derive(Debug, Clone, Deserialize)]
struct RawProfile {
    provider: Option<String>,
    domains: Option<Vec<Domain>>,
    max_complexity: Option<Complexity>,
    capabilities: Option<Vec<String>>,
    context_window: Option<i64>,
    estimated_latency_ms: Option<f64>,
    cost_per_token: Option<f64>,
    strengths: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
}

// Entries stay untyped here so a type error in one model's table is a
// per-entry skip, not a whole-file failure.
#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    models: HashMap<String, toml::Value>,
}

impl RawProfile {
    /// Apply the field-presence and range rules. Returns the reason the
    /// entry is unusable, or the validated profile.
    fn validate(self, name: &str) -> std::result::Result<ModelProfile, String> {
        let provider = self.provider.ok_or("missing field `provider`")?;
        let domains: HashSet<Domain> = self
            .domains
            .ok_or("missing field `domains`")?
            .into_iter()
            .collect();
        if domains.is_empty() {
            return Err("`domains` must be non-empty".to_string());
        }
        let max_complexity = self.max_complexity.ok_or("missing field `max_complexity`")?;
        let capabilities: HashSet<String> = self
            .capabilities
            .ok_or("missing field `capabilities`")?
            .into_iter()
            .collect();
        if capabilities.is_empty() {
            return Err("`capabilities` must be non-empty".to_string());
        }
        let context_window = self.context_window.ok_or("missing field `context_window`")?;
        if context_window <= 0 {
            return Err(format!("`context_window` must be positive, got {context_window}"));
        }
        let estimated_latency_ms = self
            .estimated_latency_ms
            .ok_or("missing field `estimated_latency_ms`")?;
        if estimated_latency_ms < 0.0 {
            return Err("`estimated_latency_ms` must be non-negative".to_string());
        }
        let cost_per_token = self.cost_per_token.ok_or("missing field `cost_per_token`")?;
        if cost_per_token < 0.0 {
            return Err("`cost_per_token` must be non-negative".to_string());
        }
        let strengths = self.strengths.ok_or("missing field `strengths`")?;
        let weaknesses = self.weaknesses.ok_or("missing field `weaknesses`")?;

        Ok(ModelProfile {
            name: name.to_string(),
            provider,
            domains,
            max_complexity,
            capabilities,
            context_window: context_window as u64,
            estimated_latency_ms,
            cost_per_token,
            strengths,
            weaknesses,
            available: false,
        })
    }
}

/// Holds validated model profiles and answers availability queries.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    profiles: HashMap<String, ModelProfile>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load profiles from a TOML document with a `[models.<name>]` table
    /// per profile.
    ///
    /// Entries failing validation are skipped with a warning; the load only
    /// fails when the document itself is unreadable or malformed, or when no
    /// valid profile remains.
    pub fn load_from_str(&mut self, raw: &str) -> Result<()> {
        let file: ProfileFile = toml::from_str(raw)
            .map_err(|e| RouteError::Configuration(format!("malformed profile file: {e}")))?;

        let mut loaded = HashMap::new();
        for (name, value) in file.models {
            let validated = value
                .try_into::<RawProfile>()
                .map_err(|e| e.to_string())
                .and_then(|raw_profile| raw_profile.validate(&name));
            match validated {
                Ok(profile) => {
                    loaded.insert(name, profile);
                }
                Err(reason) => {
                    warn!(model = %name, %reason, "skipping invalid model profile");
                }
            }
        }

        if loaded.is_empty() {
            return Err(RouteError::Configuration(
                "profile file yielded zero valid model profiles".to_string(),
            ));
        }

        info!(count = loaded.len(), "loaded model profiles");
        self.profiles = loaded;
        Ok(())
    }

    /// Load profiles from a TOML file on disk.
    pub fn load_from_path(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RouteError::Configuration(format!("cannot read profile file {}: {e}", path.display()))
        })?;
        self.load_from_str(&raw)
    }

    /// Set each profile's availability flag by membership in `known_available`.
    pub fn verify_availability(&mut self, known_available: &HashSet<String>) {
        for (name, profile) in &mut self.profiles {
            profile.available = known_available.contains(name);
        }
    }

    /// Mark every loaded profile available. Used when no external probe runs.
    pub fn assume_all_available(&mut self) {
        for profile in self.profiles.values_mut() {
            profile.available = true;
        }
    }

    pub fn get_profile(&self, name: &str) -> Option<&ModelProfile> {
        self.profiles.get(name)
    }

    pub fn all_profiles(&self) -> Vec<&ModelProfile> {
        self.profiles.values().collect()
    }

    pub fn available_profiles(&self) -> Vec<&ModelProfile> {
        self.profiles.values().filter(|p| p.available).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
