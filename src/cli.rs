use crate::adapters::field_generator::FieldGenerator;
use crate::domain::{FieldContext, Resolver};
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use serde_json::{json, Value};
use std::fmt::Write;
use std::path::PathBuf;

/// Schemock - pick fake data generators for schema fields by keyword
#[derive(Parser, Debug, Clone)]
#[command(name = "schemock", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "SCHEMOCK_CONFIG", default_value = "schemock.toml", global = true)]
    pub config: PathBuf,

    /// Seed for the random generator (0 picks a random seed)
    #[arg(long, env = "SCHEMOCK_SEED", global = true)]
    pub seed: Option<u64>,

    /// Locale tag such as en_US or fr_FR (overrides the configured locale)
    #[arg(long, env = "SCHEMOCK_LOCALE", global = true)]
    pub locale: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show which generator each field resolves to
    Resolve {
        /// Dotted field paths, e.g. `project.name` or `items[0].price`
        #[arg(required = true)]
        fields: Vec<String>,

        /// Also report which rule and pattern matched
        #[arg(long)]
        explain: bool,

        /// Print a JSON array instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resolve each field and generate a value for it
    Generate {
        /// Dotted field paths, e.g. `customer.email`
        #[arg(required = true)]
        fields: Vec<String>,

        /// Print a JSON array instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the rule table in priority order
    Rules,

    /// List the generator methods the provider exposes
    Methods,

    /// Load and validate the configuration
    Check,
}

impl Cli {
    /// Log level implied by the number of `-v` flags
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

fn parse_fields(fields: &[String]) -> anyhow::Result<Vec<FieldContext>> {
    fields
        .iter()
        .map(|f| FieldContext::from_path(f).with_context(|| format!("Invalid field path '{}'", f)))
        .collect()
}

/// Render the `resolve` output.
///
/// JSON output is an array with one entry per requested path, in order, so
/// repeated paths are all reported.
pub fn render_resolutions(
    resolver: &Resolver,
    fields: &[String],
    explain: bool,
    as_json: bool,
) -> anyhow::Result<String> {
    let contexts = parse_fields(fields)?;
    let mut entries = Vec::with_capacity(fields.len());
    let mut out = String::new();

    for (path, field) in fields.iter().zip(&contexts) {
        let resolution = resolver.resolve(field);
        let found = resolver.find_match(field);
        let pattern = found.map(|m| m.rule.patterns()[m.pattern_index].to_string());

        if as_json {
            let mut entry = json!({
                "field": path,
                "method": resolution.method,
                "args": resolution.args,
            });
            if explain {
                entry["rule"] = json!(found.map(|m| m.rule_index));
                entry["pattern"] = json!(pattern);
            }
            entries.push(entry);
            continue;
        }

        write!(out, "{} -> {} {}", path, resolution.method, Value::Object(resolution.args))?;
        if explain {
            match (found, pattern) {
                (Some(m), Some(pattern)) => {
                    write!(out, "  [rule {}, pattern {}]", m.rule_index, pattern)?
                }
                _ => out.push_str("  [fallback]"),
            }
        }
        out.push('\n');
    }

    if as_json {
        out = serde_json::to_string_pretty(&Value::Array(entries))?;
        out.push('\n');
    }
    Ok(out)
}

/// Render the `generate` output, one value per requested path
pub fn render_generated(
    generator: &mut FieldGenerator,
    fields: &[String],
    as_json: bool,
) -> anyhow::Result<String> {
    let contexts = parse_fields(fields)?;
    let mut entries = Vec::with_capacity(fields.len());
    let mut out = String::new();

    for (path, field) in fields.iter().zip(&contexts) {
        let value = generator
            .generate(field)
            .with_context(|| format!("Failed to generate a value for '{}'", path))?;
        if as_json {
            entries.push(json!({ "field": path, "value": value }));
        } else {
            writeln!(out, "{}: {}", path, value)?;
        }
    }

    if as_json {
        out = serde_json::to_string_pretty(&Value::Array(entries))?;
        out.push('\n');
    }
    Ok(out)
}

/// Render the rule table in priority order, fallback last
pub fn render_rules(resolver: &Resolver) -> anyhow::Result<String> {
    let mut out = String::new();
    for (index, rule) in resolver.table().rules().iter().enumerate() {
        let patterns: Vec<String> = rule.patterns().iter().map(ToString::to_string).collect();
        write!(out, "{:>3}  {:<16} {}", index, rule.method(), patterns.join(", "))?;
        if !rule.args().is_empty() {
            write!(out, "  {}", Value::Object(rule.args().clone()))?;
        }
        out.push('\n');
    }
    writeln!(
        out,
        "  -  {:<16} (fallback) {}",
        resolver.fallback().method,
        Value::Object(resolver.fallback().args.clone())
    )?;
    Ok(out)
}
