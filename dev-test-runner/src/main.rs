//! Round-trip runner: flatten each fixture, rebuild it, and compare against the
//! shape the flat form can actually carry.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use json_flat::Policy;
use rayon::prelude::*;
use serde_json::{Map, Value};

/// check flatten → reconstruct round trips over template fixtures
#[derive(Parser, Debug)]
struct Runner {
    /// leaf policy the fixtures are written for
    #[arg(long, default_value = "typed")]
    policy: Policy,

    /// fixture files or quoted glob patterns
    #[arg(num_args = 1.., required = true)]
    fixtures: Vec<String>,
}

enum Outcome {
    Pass,
    Fail { expected: Option<Value>, actual: Option<Value> },
}

fn main() -> Result<()> {
    let runner = Runner::parse();
    let mut files = Vec::<PathBuf>::new();
    for pattern in &runner.fixtures {
        let matched = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
        if matched.is_empty() {
            bail!("pattern matched no fixtures: {pattern}");
        }
        files.extend(matched);
    }

    let outcomes = files
        .par_iter()
        .map(|file| check(runner.policy, file).map(|o| (file, o)))
        .collect::<Result<Vec<_>>>()?;

    let mut failed = 0usize;
    for (file, outcome) in &outcomes {
        match outcome {
            Outcome::Pass => println!("{} {}", "✅ pass".green(), file.display()),
            Outcome::Fail { expected, actual } => {
                failed += 1;
                println!("{} {}", "❌ fail".red().bold(), file.display());
                println!("   expected: {}", render(expected));
                println!("   actual:   {}", render(actual));
            }
        }
    }
    println!("—— {} passed, {} failed ——", outcomes.len() - failed, failed);
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn check(policy: Policy, file: &Path) -> Result<Outcome> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read fixture ({})", file.display()))?;
    let template = serde_json::from_str::<Value>(&source)
        .with_context(|| format!("fixture is not JSON ({})", file.display()))?;
    let pairs = json_flat::flatten_with(policy, &template)
        .with_context(|| format!("failed to flatten ({})", file.display()))?;
    let actual = json_flat::reconstruct(&pairs);
    let expected = canonical_shape(policy, &template);
    if actual == expected {
        Ok(Outcome::Pass)
    } else {
        Ok(Outcome::Fail { expected, actual })
    }
}

/// What survives flattening: first array element only, no nulls or empty
/// containers, leaves normalized the way the policy emits them.
fn canonical_shape(policy: Policy, value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Value::String(match policy {
            Policy::Typed => s.to_ascii_lowercase(),
            Policy::Variable => s.clone(),
        })),
        Value::Bool(_) | Value::Number(_) => Some(Value::String(value.to_string())),
        Value::Array(items) => {
            let first = canonical_shape(policy, items.first()?)?;
            Some(Value::Array(vec![first]))
        }
        Value::Object(map) => {
            let kept = map
                .iter()
                .filter_map(|(k, v)| canonical_shape(policy, v).map(|v| (k.clone(), v)))
                .collect::<Map<_, _>>();
            if kept.is_empty() { None } else { Some(Value::Object(kept)) }
        }
    }
}

fn render(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "(no document)".to_string(),
    }
}
