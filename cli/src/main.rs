//! CLI entrypoint for source-scout
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;

use anyhow::{Context, Result, bail};
use clap::Parser;
use commands::{Cli, Command, build_call, parse_batch};
use scout_application::{
    AdapterSettings, RunToolsInput, RunToolsUseCase, ToolExecutorPort, ToolSchemaPort,
};
use scout_domain::{ToolCall, ToolResult};
use scout_infrastructure::{
    AdapterRegistry, ConfigLoader, JsonSchemaToolConverter, default_registry,
};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        print!("{}", ConfigLoader::describe_config_sources());
        let settings = load_settings(&cli)?;
        println!();
        println!("Effective settings:");
        println!("  max_items:          {}", settings.limits.max_items);
        println!("  max_content_length: {}", settings.limits.max_content_length);
        println!("  max_snippet_length: {}", settings.limits.max_snippet_length);
        println!("  timeout:            {}s", settings.timeout.as_secs());
        println!("  user_agent:         {}", settings.user_agent);
        return Ok(ExitCode::SUCCESS);
    }

    let settings = load_settings(&cli)?;

    // === Dependency Injection ===
    let registry = Arc::new(default_registry(settings).context("Failed to build HTTP client")?);
    info!("Registered {} tools", registry.len());

    match cli.command {
        None | Some(Command::List) => {
            list_tools(&registry);
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Schema { safe_only }) => {
            let converter = JsonSchemaToolConverter;
            let schemas = if safe_only {
                converter.safe_tools_schema(registry.tool_spec())
            } else {
                converter.all_tools_schema(registry.tool_spec())
            };
            println!("{}", serde_json::to_string_pretty(&schemas)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Call {
            tool,
            args,
            json_args,
        }) => {
            let call = build_call(registry.tool_spec(), &tool, &args, json_args.as_deref())?;
            let results = run_calls(registry, vec![call]).await;
            for result in &results {
                println!("{}", serde_json::to_string_pretty(result)?);
            }
            Ok(exit_code(&results))
        }
        Some(Command::Batch { input }) => {
            let calls = parse_batch(&read_input(&input)?)?;
            if calls.is_empty() {
                bail!("No tool calls in {}", input.display());
            }
            let results = run_calls(registry, calls).await;
            for result in &results {
                println!("{}", serde_json::to_string(result)?);
            }
            Ok(exit_code(&results))
        }
    }
}

fn load_settings(cli: &Cli) -> Result<AdapterSettings> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    let (settings, issues) = ConfigLoader::settings_from(&config)?;
    for issue in issues {
        warn!("Configuration: {}", issue.message);
    }
    Ok(settings)
}

fn list_tools(registry: &AdapterRegistry) {
    for definition in registry.tool_spec().sorted() {
        println!(
            "{:<22} [{}] {}",
            definition.name, definition.safety, definition.description
        );
    }
}

/// Run calls concurrently; Ctrl-C cancels every call still in flight.
async fn run_calls(registry: Arc<AdapterRegistry>, calls: Vec<ToolCall>) -> Vec<ToolResult> {
    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight calls");
                token.cancel();
            }
        })
    };

    let use_case = RunToolsUseCase::new(registry).with_cancellation(token);
    let output = use_case.execute(RunToolsInput::new(calls)).await;
    watcher.abort();
    output.results
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read calls from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn exit_code(results: &[ToolResult]) -> ExitCode {
    if results.iter().all(ToolResult::is_success) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
