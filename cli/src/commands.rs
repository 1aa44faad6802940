//! CLI command definitions

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use scout_domain::{ToolCall, ToolSpec};
use serde_json::Value;
use std::path::PathBuf;

/// CLI arguments for source-scout
#[derive(Parser, Debug)]
#[command(name = "source-scout")]
#[command(author, version, about = "Query public knowledge sources as agent tools")]
#[command(long_about = r#"
source-scout exposes Wikipedia, Wikidata, OpenAlex, arXiv, PubMed, Crossref,
Open Library, Reddit, Hacker News, GitHub, Steam, YouTube, RDAP and generic
web pages as tools with bounded, normalized JSON results.

Results are printed to stdout as JSON; logs go to stderr.

Configuration files are loaded from (in priority order):
1. SCOUT_* environment variables (e.g. SCOUT_LIMITS__MAX_ITEMS=5)
2. --config <path>     Explicit config file
3. ./scout.toml        Project-level config
4. ~/.config/source-scout/config.toml   Global config

Example:
  source-scout list
  source-scout call wikipedia_search --arg query="Ada Lovelace"
  source-scout call reddit_list --args '{"subreddit": "rust", "sort": "top", "t": "week"}'
  source-scout batch calls.jsonl
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available tools
    List,

    /// Print the JSON Schema of every tool
    Schema {
        /// Only tools safe to run without confirmation
        #[arg(long)]
        safe_only: bool,
    },

    /// Run one tool call
    Call {
        /// Tool name (see `list`)
        tool: String,

        /// Argument as key=value; numeric and boolean parameters are parsed
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// All arguments as one JSON object
        #[arg(long = "args", value_name = "JSON", conflicts_with = "args")]
        json_args: Option<String>,
    },

    /// Run JSON-lines tool calls concurrently
    Batch {
        /// File with one `{"tool_name": ..., "arguments": {...}}` per line, or `-` for stdin
        input: PathBuf,
    },
}

/// Build a call from `key=value` pairs or a JSON object.
///
/// A pair's value is typed after the tool's declared parameter type, so
/// `limit=5` is a number while `app=413150` stays a string.
pub fn build_call(
    spec: &ToolSpec,
    tool: &str,
    args: &[String],
    json_args: Option<&str>,
) -> Result<ToolCall> {
    let mut call = ToolCall::new(tool);

    if let Some(json) = json_args {
        let value: Value = serde_json::from_str(json).context("--args is not valid JSON")?;
        let Value::Object(map) = value else {
            bail!("--args must be a JSON object");
        };
        for (key, value) in map {
            call = call.with_arg(key, value);
        }
    }

    for pair in args {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("Argument '{}' is not in key=value form", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Argument '{}' has an empty key", pair);
        }
        let param_type = spec
            .get(tool)
            .and_then(|definition| definition.parameter(key))
            .map(|param| param.param_type.as_str());
        let value = match param_type {
            Some("integer" | "number" | "boolean") => parse_value(raw),
            _ => Value::String(raw.to_string()),
        };
        call = call.with_arg(key, value);
    }

    Ok(call)
}

/// Numbers and booleans keep their type; anything else is a plain string.
fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Parse JSON-lines calls; blank lines are skipped.
pub fn parse_batch(text: &str) -> Result<Vec<ToolCall>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Line {} is not a valid tool call", index + 1))
        })
        .collect()
}
