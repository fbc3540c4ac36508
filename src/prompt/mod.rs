//! System-prompt composition.
//!
//! Deterministic concatenation of up to four blocks: base instructions, a
//! task-type template, domain guidance, and the caller's verbatim context.
//! Empty blocks are omitted; blocks are joined with blank lines. Always
//! returns a string.

use crate::types::{Domain, TaskType};

/// Inputs to prompt composition.
#[derive(Debug, Clone)]
pub struct PromptConfig<'a> {
    pub task_type: TaskType,
    pub model_name: &'a str,
    pub domain: Domain,
    pub context: Option<&'a str>,
}

const BASE_INSTRUCTIONS: &str = "You are an expert software engineering assistant. \
Work through the task carefully and respond with a complete, actionable answer.";

fn task_type_template(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::CodeGeneration => {
            "Write clean, idiomatic, production-quality code. \
             Include brief usage notes where they help."
        }
        TaskType::BugFixing => {
            "Diagnose the root cause before proposing a fix. \
             Explain what was wrong and show the corrected code."
        }
        TaskType::CodeReview => {
            "Review the code for correctness, clarity, and safety. \
             Point out concrete problems with suggested improvements."
        }
        TaskType::TestWriting => {
            "Write focused tests covering the main behavior and edge cases. \
             Prefer small, independent test cases."
        }
        TaskType::Documentation => {
            "Write clear documentation aimed at a developer new to this code. \
             Lead with what the code does, then how to use it."
        }
        TaskType::ArchitectureAnalysis => {
            "Analyze the structure and its trade-offs. \
             Identify coupling, bottlenecks, and concrete improvement options."
        }
        TaskType::General => "Address the request directly and completely.",
    }
}

fn domain_guidance(domain: Domain) -> &'static str {
    match domain {
        Domain::Code => "Follow the conventions of the language in question.",
        Domain::Math => "Show your working step by step and verify the result.",
        Domain::Reasoning => "Reason explicitly; state assumptions before conclusions.",
        Domain::Multimodal => "Describe visual or audio content precisely and concretely.",
        Domain::General => "",
    }
}

/// Build the full system prompt for a selected model and characterized task.
pub fn generate_system_prompt(config: &PromptConfig<'_>) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(4);
    blocks.push(BASE_INSTRUCTIONS.to_string());
    blocks.push(task_type_template(config.task_type).to_string());

    let guidance = domain_guidance(config.domain);
    if !guidance.is_empty() {
        blocks.push(guidance.to_string());
    }
    if let Some(context) = config.context {
        if !context.is_empty() {
            blocks.push(format!("Relevant context:\n{context}"));
        }
    }

    blocks.join("\n\n")
}
