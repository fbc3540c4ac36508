//! CLI argument definitions for the taskroute binary.

use clap::{Parser, Subcommand};

/// taskroute CLI
#[derive(Parser, Debug)]
#[command(name = "taskroute", version, about = "Route a task to the best-fit model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Characterize, select, and execute a task
    Route(RouteArgs),
    /// List the validated model registry
    Models(ModelsArgs),
}

/// Arguments for `taskroute route`.
#[derive(Parser, Debug)]
pub struct RouteArgs {
    /// Path to the TOML model profile file
    #[arg(short, long, default_value = "models.toml")]
    pub profiles: std::path::PathBuf,

    /// Auxiliary context passed to the model verbatim
    #[arg(short, long)]
    pub context: Option<String>,

    /// Explicit task type (e.g. bugfix, docs, code_review)
    #[arg(short, long)]
    pub task_type: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Stop after selection; do not call the backend
    #[arg(long)]
    pub dry_run: bool,

    /// Task description (positional)
    pub description: Option<String>,
}

/// Arguments for `taskroute models`.
#[derive(Parser, Debug)]
pub struct ModelsArgs {
    /// Path to the TOML model profile file
    #[arg(short, long, default_value = "models.toml")]
    pub profiles: std::path::PathBuf,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_route_with_flags() {
        let cli = Cli::try_parse_from([
            "taskroute",
            "route",
            "--profiles",
            "custom.toml",
            "--task-type",
            "bugfix",
            "--dry-run",
            "fix the checkout crash",
        ])
        .unwrap();
        match cli.command {
            Commands::Route(args) => {
                assert_eq!(args.profiles, std::path::PathBuf::from("custom.toml"));
                assert_eq!(args.task_type.as_deref(), Some("bugfix"));
                assert!(args.dry_run);
                assert_eq!(args.description.as_deref(), Some("fix the checkout crash"));
            }
            other => panic!("expected route, got {other:?}"),
        }
    }

    #[test]
    fn parses_models_subcommand() {
        let cli = Cli::try_parse_from(["taskroute", "models"]).unwrap();
        assert!(matches!(cli.command, Commands::Models(_)));
    }
}
