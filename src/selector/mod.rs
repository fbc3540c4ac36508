//! Weighted model scoring and selection.
//!
//! Each available profile gets five sub-scores (domain, complexity,
//! capability, context, latency), combined with fixed weights into a total
//! in [0, 100]. Candidates are ranked by total score; near-ties (< 0.01
//! apart) are ordered by ascending latency sub-score. That comparator is
//! preserved exactly as specified even though it favors the slower model
//! inside the tie window; see the pinning test in `tests/selector_tests.rs`
//! before changing it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RouteError};
use crate::registry::{ModelProfile, ModelRegistry};
use crate::task::TaskDescriptor;
use crate::types::Domain;

const DOMAIN_WEIGHT: f64 = 0.30;
const COMPLEXITY_WEIGHT: f64 = 0.25;
const CAPABILITY_WEIGHT: f64 = 0.25;
const CONTEXT_WEIGHT: f64 = 0.10;
const LATENCY_WEIGHT: f64 = 0.10;

/// Scores below this distance apart count as a tie.
const TIE_EPSILON: f64 = 0.01;

/// Number of ranked runners-up reported alongside the selection.
const MAX_ALTERNATIVES: usize = 3;

const MIN_LATENCY_MS: f64 = 1_000.0;
const MAX_LATENCY_MS: f64 = 10_000.0;

/// Per-candidate match score with its five components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelScore {
    pub model_name: String,
    pub score: f64,
    pub domain_match: f64,
    pub complexity_match: f64,
    pub capability_match: f64,
    pub context_match: f64,
    pub latency_score: f64,
    pub justification: String,
}

/// Outcome of one selection call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionResult {
    pub selected_model: String,
    pub score: ModelScore,
    /// Next-best candidates in rank order, capped.
    pub alternatives: Vec<ModelScore>,
    pub reasoning: String,
}

fn score_domain(task: &TaskDescriptor, profile: &ModelProfile) -> f64 {
    // Exact match is checked before the general fallbacks.
    if profile.domains.contains(&task.domain) {
        100.0
    } else if task.domain == Domain::General || profile.domains.contains(&Domain::General) {
        50.0
    } else if task.domain == Domain::Reasoning && profile.domains.contains(&Domain::Code) {
        40.0
    } else {
        0.0
    }
}

fn score_complexity(task: &TaskDescriptor, profile: &ModelProfile) -> f64 {
    let task_rank = task.complexity.rank();
    let model_rank = profile.max_complexity.rank();
    if model_rank >= task_rank {
        100.0
    } else {
        let gap = f64::from(task_rank - model_rank);
        (100.0 - 30.0 * gap).max(0.0)
    }
}

fn score_capability(task: &TaskDescriptor, profile: &ModelProfile) -> f64 {
    if task.required_capabilities.is_empty() {
        return 100.0;
    }
    let matched = task
        .required_capabilities
        .iter()
        .filter(|c| profile.capabilities.contains(c.as_str()))
        .count();
    (matched as f64 / task.required_capabilities.len() as f64) * 100.0
}

fn score_context(task: &TaskDescriptor, profile: &ModelProfile) -> f64 {
    let size = (task.description.len() + task.context_size) as f64;
    let window = profile.context_window as f64;
    if size <= 0.5 * window {
        100.0
    } else if size <= 0.8 * window {
        80.0
    } else if size <= window {
        60.0
    } else {
        // Context exceeds the window; no truncation is attempted here.
        0.0
    }
}

fn score_latency(profile: &ModelProfile) -> f64 {
    let clamped = profile.estimated_latency_ms.clamp(MIN_LATENCY_MS, MAX_LATENCY_MS);
    (MAX_LATENCY_MS - clamped) / (MAX_LATENCY_MS - MIN_LATENCY_MS) * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn justification(domain: f64, complexity: f64, capability: f64) -> String {
    let domain_part = if domain >= 100.0 {
        "excellent domain match"
    } else if domain >= 70.0 {
        "good domain fit"
    } else {
        "partial domain coverage"
    };
    let complexity_part = if complexity >= 100.0 {
        "rated for the task complexity"
    } else if complexity >= 70.0 {
        "slightly below the task complexity"
    } else {
        "well below the task complexity"
    };
    let capability_part = if capability >= 100.0 {
        "covers all required capabilities"
    } else if capability >= 70.0 {
        "covers most required capabilities"
    } else {
        "limited capability coverage"
    };
    format!("{domain_part}, {complexity_part}, {capability_part}")
}

/// Score a single profile against a task.
pub fn score_model(task: &TaskDescriptor, profile: &ModelProfile) -> ModelScore {
    let domain_match = score_domain(task, profile);
    let complexity_match = score_complexity(task, profile);
    let capability_match = score_capability(task, profile);
    let context_match = score_context(task, profile);
    let latency_score = score_latency(profile);

    let total = DOMAIN_WEIGHT * domain_match
        + COMPLEXITY_WEIGHT * complexity_match
        + CAPABILITY_WEIGHT * capability_match
        + CONTEXT_WEIGHT * context_match
        + LATENCY_WEIGHT * latency_score;

    ModelScore {
        model_name: profile.name.clone(),
        score: round2(total),
        domain_match,
        complexity_match,
        capability_match,
        context_match,
        latency_score: round2(latency_score),
        justification: justification(domain_match, complexity_match, capability_match),
    }
}

/// Ranking comparator: total score descending; within the tie window,
/// ascending latency sub-score.
fn rank_order(a: &ModelScore, b: &ModelScore) -> Ordering {
    if (a.score - b.score).abs() < TIE_EPSILON {
        a.latency_score
            .partial_cmp(&b.latency_score)
            .unwrap_or(Ordering::Equal)
    } else {
        b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
    }
}

/// Score every available profile and pick the best match.
///
/// Fails with [`RouteError::NoAvailableModels`] when the registry's
/// available set is empty.
pub fn select_model(registry: &ModelRegistry, task: &TaskDescriptor) -> Result<SelectionResult> {
    let candidates = registry.available_profiles();
    if candidates.is_empty() {
        return Err(RouteError::NoAvailableModels(
            "no model profile passed the availability check".to_string(),
        ));
    }

    let mut scores: Vec<ModelScore> = candidates
        .into_iter()
        .map(|profile| score_model(task, profile))
        .collect();
    scores.sort_by(rank_order);

    let selected = scores[0].clone();
    let alternatives: Vec<ModelScore> =
        scores.iter().skip(1).take(MAX_ALTERNATIVES).cloned().collect();

    debug!(
        selected = %selected.model_name,
        score = selected.score,
        candidates = scores.len(),
        "model selected"
    );

    let alternatives_text = if alternatives.is_empty() {
        "none".to_string()
    } else {
        alternatives
            .iter()
            .map(|s| format!("{} ({})", s.model_name, s.score))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let reasoning = format!(
        "Selected {} (score {}) for a {} {} task of type {}: {}. Alternatives: {}.",
        selected.model_name,
        selected.score,
        task.complexity,
        task.domain,
        task.task_type,
        selected.justification,
        alternatives_text
    );

    Ok(SelectionResult {
        selected_model: selected.model_name.clone(),
        score: selected,
        alternatives,
        reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModelRegistry;
    use crate::task::{parse_task, TaskInput};
    use crate::types::{Complexity, Domain};
    use std::collections::HashSet;

    fn profile(
        name: &str,
        domains: &[Domain],
        max_complexity: Complexity,
        capabilities: &[&str],
        context_window: u64,
        latency_ms: f64,
    ) -> ModelProfile {
        ModelProfile {
            name: name.to_string(),
            provider: "test".to_string(),
            domains: domains.iter().copied().collect(),
            max_complexity,
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            context_window,
            estimated_latency_ms: latency_ms,
            cost_per_token: 0.0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            available: true,
        }
    }

    fn fibonacci_task() -> TaskDescriptor {
        parse_task(
            &TaskInput::builder()
                .description("Write a function to calculate fibonacci numbers")
                .build(),
        )
        .unwrap()
    }

    #[test]
    fn single_rated_profile_scores_perfectly_on_core_axes() {
        let task = fibonacci_task();
        let p = profile(
            "solo",
            &[Domain::Code],
            Complexity::Expert,
            &["code_generation", "reasoning"],
            100_000,
            3_000.0,
        );
        let score = score_model(&task, &p);
        assert_eq!(score.domain_match, 100.0);
        assert_eq!(score.complexity_match, 100.0);
        assert_eq!(score.capability_match, 100.0);
        assert_eq!(score.context_match, 100.0);
    }

    #[test]
    fn domain_rules_apply_in_order() {
        let mut task = fibonacci_task();
        let p = profile(
            "general-model",
            &[Domain::General],
            Complexity::Expert,
            &["reasoning"],
            100_000,
            1_000.0,
        );
        assert_eq!(score_model(&task, &p).domain_match, 50.0);

        task.domain = Domain::Reasoning;
        let coder = profile(
            "coder",
            &[Domain::Code],
            Complexity::Expert,
            &["reasoning"],
            100_000,
            1_000.0,
        );
        assert_eq!(score_model(&task, &coder).domain_match, 40.0);

        task.domain = Domain::Math;
        assert_eq!(score_model(&task, &coder).domain_match, 0.0);
    }

    #[test]
    fn complexity_gap_penalty_floors_at_zero() {
        let mut task = fibonacci_task();
        task.complexity = Complexity::Expert;
        let simple = profile(
            "simple-model",
            &[Domain::Code],
            Complexity::Simple,
            &["reasoning"],
            100_000,
            1_000.0,
        );
        // gap of 3: 100 - 90 = 10
        assert_eq!(score_model(&task, &simple).complexity_match, 10.0);

        task.complexity = Complexity::Complex;
        assert_eq!(score_model(&task, &simple).complexity_match, 40.0);
    }

    #[test]
    fn capability_match_is_fractional() {
        let task = fibonacci_task(); // requires {code_generation, reasoning}
        let half = profile(
            "half",
            &[Domain::Code],
            Complexity::Expert,
            &["reasoning"],
            100_000,
            1_000.0,
        );
        assert_eq!(score_model(&task, &half).capability_match, 50.0);
    }

    #[test]
    fn context_tiers_step_down_and_zero_out() {
        let mut task = fibonacci_task();
        task.context_size = 0;
        let window = task.description.len() as u64; // size == window => 60
        let p = profile(
            "tight",
            &[Domain::Code],
            Complexity::Expert,
            &["reasoning"],
            window,
            1_000.0,
        );
        assert_eq!(score_model(&task, &p).context_match, 60.0);

        task.context_size = 1;
        assert_eq!(score_model(&task, &p).context_match, 0.0);
    }

    #[test]
    fn latency_score_is_clamped_linear_inversion() {
        let task = fibonacci_task();
        let fast = profile("fast", &[Domain::Code], Complexity::Expert, &["reasoning"], 100_000, 500.0);
        let slow = profile("slow", &[Domain::Code], Complexity::Expert, &["reasoning"], 100_000, 20_000.0);
        let mid = profile("mid", &[Domain::Code], Complexity::Expert, &["reasoning"], 100_000, 5_500.0);
        assert_eq!(score_model(&task, &fast).latency_score, 100.0);
        assert_eq!(score_model(&task, &slow).latency_score, 0.0);
        assert_eq!(score_model(&task, &mid).latency_score, 50.0);
    }

    #[test]
    fn empty_available_set_is_an_availability_error() {
        let registry = ModelRegistry::new();
        let err = select_model(&registry, &fibonacci_task()).unwrap_err();
        assert!(matches!(err, RouteError::NoAvailableModels(_)));
    }

    #[test]
    fn scores_and_sub_scores_stay_in_bounds() {
        let task = fibonacci_task();
        let profiles = [
            profile("a", &[Domain::Math], Complexity::Simple, &["math"], 10, 50_000.0),
            profile("b", &[Domain::Code], Complexity::Expert, &["code_generation", "reasoning"], 1_000_000, 0.0),
        ];
        for p in &profiles {
            let s = score_model(&task, p);
            for v in [
                s.score,
                s.domain_match,
                s.complexity_match,
                s.capability_match,
                s.context_match,
                s.latency_score,
            ] {
                assert!((0.0..=100.0).contains(&v), "{}: {v}", p.name);
            }
        }
    }

    #[test]
    fn unavailable_profiles_are_never_candidates() {
        let mut registry = ModelRegistry::new();
        registry
            .load_from_str(
                r#"
                [models.only]
                provider = "test"
                domains = ["code"]
                max_complexity = "expert"
                capabilities = ["code_generation", "reasoning"]
                context_window = 100000
                estimated_latency_ms = 3000.0
                cost_per_token = 0.0
                strengths = []
                weaknesses = []
            "#,
            )
            .unwrap();
        let known: HashSet<String> = HashSet::new();
        registry.verify_availability(&known);
        assert!(select_model(&registry, &fibonacci_task()).is_err());

        registry.assume_all_available();
        let result = select_model(&registry, &fibonacci_task()).unwrap();
        assert_eq!(result.selected_model, "only");
        assert!(result.alternatives.is_empty());
        assert!(result.reasoning.contains("only"));
    }
}
