//! Task characterization: turn a free-text task into a structured descriptor.
//!
//! Classification is deliberately a set of ordered rule tables (keyword
//! groups evaluated top-down, first match wins) so every decision is
//! inspectable and pinned by tests.

use std::collections::BTreeSet;

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RouteError};
use crate::types::{capability, Complexity, Domain, TaskType};

/// Raw request as supplied by the caller.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default)]
pub struct TaskInput {
    /// Free-text description of the work to perform.
    #[builder(into)]
    pub description: String,
    /// Auxiliary context (file contents, logs) passed through verbatim.
    #[builder(into)]
    pub context: Option<String>,
    /// Optional explicit task type; normalized through a synonym table.
    #[builder(into)]
    pub task_type: Option<String>,
}

/// Structured characterization of one task. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDescriptor {
    pub description: String,
    pub domain: Domain,
    pub complexity: Complexity,
    pub required_capabilities: BTreeSet<String>,
    pub context_size: usize,
    pub task_type: TaskType,
}

const MIN_DESCRIPTION_LEN: usize = 10;

/// Length threshold above which a description counts as complex.
const COMPLEX_LENGTH: usize = 500;
/// Length threshold above which a description counts as moderate.
const MODERATE_LENGTH: usize = 200;

// Task-type inference groups, in priority order. First group with any
// matching substring wins.
const TASK_TYPE_RULES: &[(&[&str], TaskType)] = &[
    (
        &["generate", "create", "write code", "write", "implement"],
        TaskType::CodeGeneration,
    ),
    (&["bug", "fix", "error", "issue", "debug"], TaskType::BugFixing),
    (
        &["review", "analyze code", "check code", "audit"],
        TaskType::CodeReview,
    ),
    (
        &["test", "unit test", "testing", "test case"],
        TaskType::TestWriting,
    ),
    (
        &["document", "documentation", "readme", "doc"],
        TaskType::Documentation,
    ),
    (
        &["architecture", "design", "structure", "system"],
        TaskType::ArchitectureAnalysis,
    ),
];

const MATH_TERMS: &[&str] = &[
    "math",
    "calculate",
    "equation",
    "formula",
    "arithmetic",
    "statistics",
    "probability",
];

const REASONING_TERMS: &[&str] = &[
    "reason",
    "logic",
    "deduce",
    "infer",
    "think through",
    "step by step",
    "puzzle",
];

const MEDIA_TERMS: &[&str] = &[
    "image", "video", "audio", "picture", "diagram", "visual", "photo",
];

const CODE_TERMS: &[&str] = &["code", "function", "class", "api", "program", "script"];

const EXPERT_TERMS: &[&str] = &[
    "complex",
    "advanced",
    "sophisticated",
    "distributed",
    "scalable",
    "high-performance",
    "optimize",
    "refactor entire",
    "architectural",
];

const COMPLEX_TERMS: &[&str] = &[
    "multiple",
    "integrate",
    "system",
    "framework",
    "algorithm",
    "design pattern",
];

const MODERATE_TERMS: &[&str] = &["implement", "create", "build", "develop", "function", "class"];

const TOOL_TERMS: &[&str] = &["tool", "command", "terminal", "cli"];
const ANALYSIS_TERMS: &[&str] = &["analyze", "review", "audit"];
const EXPLANATION_TERMS: &[&str] = &["explain", "document", "describe"];

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

/// Map an explicit caller-supplied type through the synonym table.
///
/// Unrecognized values return `None` and fall through to text inference.
fn normalize_task_type(raw: &str) -> Option<TaskType> {
    match raw.trim().to_lowercase().as_str() {
        "code_generation" | "codegen" | "generation" => Some(TaskType::CodeGeneration),
        "bug_fixing" | "bugfix" | "debugging" | "debug" => Some(TaskType::BugFixing),
        "code_review" | "review" => Some(TaskType::CodeReview),
        "test_writing" | "testing" | "tests" | "test" => Some(TaskType::TestWriting),
        "documentation" | "docs" | "doc" => Some(TaskType::Documentation),
        "architecture_analysis" | "architecture" => Some(TaskType::ArchitectureAnalysis),
        "general" => Some(TaskType::General),
        _ => None,
    }
}

fn infer_task_type(lowered: &str) -> TaskType {
    for (terms, task_type) in TASK_TYPE_RULES {
        if contains_any(lowered, terms) {
            return *task_type;
        }
    }
    TaskType::General
}

fn infer_domain(lowered: &str, task_type: TaskType) -> Domain {
    // Code-shaped task types pin the domain before any keyword scan.
    if matches!(
        task_type,
        TaskType::CodeGeneration | TaskType::BugFixing | TaskType::CodeReview | TaskType::TestWriting
    ) {
        return Domain::Code;
    }
    if contains_any(lowered, MATH_TERMS) {
        Domain::Math
    } else if contains_any(lowered, REASONING_TERMS) {
        Domain::Reasoning
    } else if contains_any(lowered, MEDIA_TERMS) {
        Domain::Multimodal
    } else if contains_any(lowered, CODE_TERMS) {
        Domain::Code
    } else {
        Domain::General
    }
}

fn infer_complexity(lowered: &str) -> Complexity {
    // Length thresholds are OR'd with the keyword check at each tier,
    // checked top-down, first match wins.
    if contains_any(lowered, EXPERT_TERMS) {
        Complexity::Expert
    } else if contains_any(lowered, COMPLEX_TERMS) || lowered.len() > COMPLEX_LENGTH {
        Complexity::Complex
    } else if contains_any(lowered, MODERATE_TERMS) || lowered.len() > MODERATE_LENGTH {
        Complexity::Moderate
    } else {
        Complexity::Simple
    }
}

fn infer_capabilities(lowered: &str, domain: Domain, task_type: TaskType) -> BTreeSet<String> {
    let mut caps = BTreeSet::new();
    match domain {
        Domain::Code => {
            caps.insert(capability::CODE_GENERATION.to_string());
        }
        Domain::Math => {
            caps.insert(capability::MATH.to_string());
        }
        Domain::Reasoning => {
            caps.insert(capability::REASONING.to_string());
        }
        Domain::Multimodal => {
            caps.insert(capability::MULTIMODAL.to_string());
        }
        Domain::General => {}
    }
    if task_type == TaskType::TestWriting {
        caps.insert(capability::TESTING.to_string());
    }
    if task_type == TaskType::BugFixing {
        caps.insert(capability::DEBUGGING.to_string());
    }
    if contains_any(lowered, TOOL_TERMS) {
        caps.insert(capability::TOOL_USE.to_string());
    }
    if contains_any(lowered, ANALYSIS_TERMS) {
        caps.insert(capability::CODE_ANALYSIS.to_string());
    }
    if contains_any(lowered, EXPLANATION_TERMS) {
        caps.insert(capability::EXPLANATION.to_string());
    }
    // Every task requires reasoning, whatever the domain.
    caps.insert(capability::REASONING.to_string());
    caps
}

/// Characterize a raw task, failing with a validation error for empty,
/// whitespace-only, or under-length descriptions.
pub fn parse_task(input: &TaskInput) -> Result<TaskDescriptor> {
    let description = input.description.trim();
    if description.is_empty() {
        return Err(RouteError::Validation(
            "task description must not be empty".to_string(),
        ));
    }
    if description.len() < MIN_DESCRIPTION_LEN {
        return Err(RouteError::Validation(format!(
            "task description must be at least {MIN_DESCRIPTION_LEN} characters, got {}",
            description.len()
        )));
    }

    let lowered = description.to_lowercase();

    let task_type = input
        .task_type
        .as_deref()
        .and_then(normalize_task_type)
        .unwrap_or_else(|| infer_task_type(&lowered));
    let domain = infer_domain(&lowered, task_type);
    let complexity = infer_complexity(&lowered);
    let required_capabilities = infer_capabilities(&lowered, domain, task_type);
    let context_size = input.context.as_deref().map_or(0, str::len);

    debug!(
        %task_type,
        %domain,
        %complexity,
        context_size,
        "characterized task"
    );

    Ok(TaskDescriptor {
        description: description.to_string(),
        domain,
        complexity,
        required_capabilities,
        context_size,
        task_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(description: &str) -> TaskDescriptor {
        parse_task(&TaskInput::builder().description(description).build()).unwrap()
    }

    #[test]
    fn rejects_empty_and_whitespace_descriptions() {
        for bad in ["", "   ", "\n\t  "] {
            let err = parse_task(&TaskInput::builder().description(bad).build()).unwrap_err();
            assert!(matches!(err, RouteError::Validation(_)), "input {bad:?}");
        }
    }

    #[test]
    fn rejects_short_descriptions_after_trimming() {
        let err = parse_task(&TaskInput::builder().description("  fix bug  ").build()).unwrap_err();
        assert!(matches!(err, RouteError::Validation(_)));
    }

    #[test]
    fn fibonacci_example_classifies_as_code_generation() {
        let task = parse("Write a function to calculate fibonacci numbers");
        assert_eq!(task.task_type, TaskType::CodeGeneration);
        assert_eq!(task.domain, Domain::Code);
        assert!(task.required_capabilities.contains(capability::CODE_GENERATION));
        assert!(task.required_capabilities.contains(capability::REASONING));
    }

    #[test]
    fn reasoning_is_always_required() {
        let task = parse("summarize this meeting transcript");
        assert!(task.required_capabilities.contains(capability::REASONING));
    }

    #[test]
    fn explicit_type_synonyms_normalize() {
        let task = parse_task(
            &TaskInput::builder()
                .description("something is broken in checkout")
                .task_type("bugfix")
                .build(),
        )
        .unwrap();
        assert_eq!(task.task_type, TaskType::BugFixing);
        assert_eq!(task.domain, Domain::Code);
        assert!(task.required_capabilities.contains(capability::DEBUGGING));
    }

    #[test]
    fn unrecognized_explicit_type_falls_through_to_inference() {
        let task = parse_task(
            &TaskInput::builder()
                .description("debug the login error on staging")
                .task_type("banana")
                .build(),
        )
        .unwrap();
        assert_eq!(task.task_type, TaskType::BugFixing);
    }

    #[test]
    fn task_type_groups_apply_in_priority_order() {
        // "generate" (code_generation) outranks "test" (test_writing).
        let task = parse("generate test fixtures for the parser");
        assert_eq!(task.task_type, TaskType::CodeGeneration);
    }

    #[test]
    fn domain_keyword_scan_applies_when_type_is_not_code_shaped() {
        let task = parse_task(
            &TaskInput::builder()
                .description("solve this equation with the quadratic formula")
                .task_type("general")
                .build(),
        )
        .unwrap();
        assert_eq!(task.domain, Domain::Math);
        assert!(task.required_capabilities.contains(capability::MATH));
    }

    #[test]
    fn media_terms_map_to_multimodal() {
        let task = parse_task(
            &TaskInput::builder()
                .description("describe what is in this picture of a receipt")
                .task_type("general")
                .build(),
        )
        .unwrap();
        assert_eq!(task.domain, Domain::Multimodal);
        assert!(task.required_capabilities.contains(capability::MULTIMODAL));
        assert!(task.required_capabilities.contains(capability::EXPLANATION));
    }

    #[test]
    fn expert_terms_outrank_lower_tiers() {
        let task = parse("refactor entire billing module and implement new invoices");
        assert_eq!(task.complexity, Complexity::Expert);
    }

    #[test]
    fn long_descriptions_escalate_complexity_without_keywords() {
        let filler = "a ".repeat(260); // > 500 chars, no tier keywords
        let task = parse(&format!("please look at this {filler}"));
        assert_eq!(task.complexity, Complexity::Complex);

        let filler = "a ".repeat(110); // > 200 chars
        let task = parse(&format!("please look at this {filler}"));
        assert_eq!(task.complexity, Complexity::Moderate);
    }

    #[test]
    fn short_plain_description_is_simple() {
        let task = parse("rename this one variable");
        assert_eq!(task.complexity, Complexity::Simple);
    }

    #[test]
    fn tool_terms_add_tool_use() {
        let task = parse("run the migration command from the terminal");
        assert!(task.required_capabilities.contains(capability::TOOL_USE));
    }

    #[test]
    fn context_size_is_character_length_of_context() {
        let task = parse_task(
            &TaskInput::builder()
                .description("review this module for races")
                .context("fn main() {}")
                .build(),
        )
        .unwrap();
        assert_eq!(task.context_size, 12);

        let task = parse("review this module for races");
        assert_eq!(task.context_size, 0);
    }
}
