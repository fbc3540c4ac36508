//! Shared task and model classification enums.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Coarse subject-matter category of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
    Code,
    Math,
    Reasoning,
    Multimodal,
    General,
}

/// Ordinal difficulty tier of a task, compared against a model's ceiling.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
    Expert,
}

impl Complexity {
    /// Numeric rank used for complexity-gap scoring.
    pub fn rank(self) -> u8 {
        match self {
            Self::Simple => 0,
            Self::Moderate => 1,
            Self::Complex => 2,
            Self::Expert => 3,
        }
    }
}

/// Kind of software-engineering work a task describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskType {
    CodeGeneration,
    BugFixing,
    CodeReview,
    TestWriting,
    Documentation,
    ArchitectureAnalysis,
    General,
}

/// Well-known capability names used by the characterizer and profiles.
pub mod capability {
    pub const REASONING: &str = "reasoning";
    pub const CODE_GENERATION: &str = "code_generation";
    pub const MATH: &str = "math";
    pub const MULTIMODAL: &str = "multimodal";
    pub const TESTING: &str = "testing";
    pub const DEBUGGING: &str = "debugging";
    pub const TOOL_USE: &str = "tool_use";
    pub const CODE_ANALYSIS: &str = "code_analysis";
    pub const EXPLANATION: &str = "explanation";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn complexity_ranks_are_totally_ordered() {
        assert!(Complexity::Simple < Complexity::Moderate);
        assert!(Complexity::Moderate < Complexity::Complex);
        assert!(Complexity::Complex < Complexity::Expert);
        assert_eq!(Complexity::Expert.rank(), 3);
    }

    #[test]
    fn enums_round_trip_snake_case() {
        assert_eq!(TaskType::BugFixing.to_string(), "bug_fixing");
        assert_eq!(
            TaskType::from_str("architecture_analysis").unwrap(),
            TaskType::ArchitectureAnalysis
        );
        assert_eq!(Domain::Multimodal.to_string(), "multimodal");
    }
}
