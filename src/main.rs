//! taskroute CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskroute::cli::{Cli, Commands, ModelsArgs, RouteArgs};
use taskroute::config::BackendConfig;
use taskroute::provider::OpenAiCompatibleChat;
use taskroute::registry::ModelRegistry;
use taskroute::router::{Router, RouterOptions};
use taskroute::task::TaskInput;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Route(args) => handle_route(args).await,
        Commands::Models(args) => handle_models(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_registry(path: &std::path::Path) -> Result<ModelRegistry, Box<dyn std::error::Error>> {
    let mut registry = ModelRegistry::new();
    registry.load_from_path(path)?;
    Ok(registry)
}

async fn handle_route(args: RouteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let description = match args.description {
        Some(d) => d,
        None => {
            eprintln!("Usage: taskroute route \"your task here\"");
            std::process::exit(1);
        }
    };

    let registry = load_registry(&args.profiles)?;
    let config = BackendConfig::from_env();
    let provider = Arc::new(OpenAiCompatibleChat::new(
        config.api_key().unwrap_or_default(),
        config.base_url(),
    ));
    let router = Router::new(registry, provider).with_options(RouterOptions {
        timeout_ms: args.timeout_ms,
        temperature: args.temperature,
    });
    // No external availability probe is wired into the CLI; every loaded
    // profile is treated as available.
    router.assume_all_available();

    let input = TaskInput::builder()
        .description(description)
        .maybe_context(args.context)
        .maybe_task_type(args.task_type)
        .build();

    if args.dry_run {
        let (task, selection) = router.plan(&input)?;
        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "task": task,
                    "selection": selection,
                }))?
            );
        } else {
            println!("{}", selection.reasoning);
        }
        return Ok(());
    }

    let result = router.route(&input).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        if let Some(selection) = &result.selection {
            eprintln!("» {}", selection.reasoning);
        }
        if let Some(response) = &result.response {
            println!("{response}");
        }
    } else {
        let error = result
            .metadata
            .error
            .unwrap_or_else(|| "unknown routing failure".to_string());
        for failure in &result.metadata.failures {
            eprintln!("  ✗ {}: {}", failure.model_attempted, failure.error);
        }
        return Err(error.into());
    }

    Ok(())
}

fn handle_models(args: ModelsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = load_registry(&args.profiles)?;
    let mut profiles = registry.all_profiles();
    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    for profile in profiles {
        let mut domains: Vec<String> = profile.domains.iter().map(ToString::to_string).collect();
        domains.sort();
        println!(
            "{:<24} {:<12} max={:<8} window={:<9} latency={}ms",
            profile.name,
            domains.join(","),
            profile.max_complexity,
            profile.context_window,
            profile.estimated_latency_ms,
        );
    }
    Ok(())
}
