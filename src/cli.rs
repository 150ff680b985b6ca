//! CLI: flatten templates → pairs, pairs → template, inspect paths.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use json_flat::{LeafValue, Pair, Policy, StoredPair};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// flatten JSON templates into ordered (path, leaf) pairs, and rebuild templates from pairs
#[derive(Parser, Debug)]
#[command(name = "json-flat")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// flatten each template into a list of {path, type|var} pairs
    Flatten(FlattenOut),
    /// rebuild a template from a stored list of {path, type|var} pairs
    Reconstruct(ReconstructOut),
    /// print the segments of one or more paths
    Path(PathOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /data/template)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is its own document
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct FlattenOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// leaf policy: `typed` (string | int | boolean) or `variable` (any scalar)
    #[arg(long, default_value = "typed")]
    policy: Policy,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ReconstructOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct PathOut {
    /// paths such as `a.b[0].c` or `[0].name`
    #[arg(num_args = 1.., required = true)]
    paths: Vec<String>,
}

/// One input document after pointer / jq selection.
#[derive(Debug)]
struct Document {
    label: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Read, parse and select every input, in input order. Files are loaded in parallel.
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        debug!(files = source_paths.len(), "resolved inputs");
        let per_file = source_paths
            .par_iter()
            .map(|source_path| self.load_file(source_path))
            .collect::<Result<Vec<_>>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }

    fn load_file(&self, source_path: &Path) -> Result<Vec<Document>> {
        let label = source_path.to_string_lossy().to_string();
        let source = std::fs::read_to_string(source_path)
            .with_context(|| format!("failed to read source file ({label})"))?;
        let json_value = serde_json::from_str::<Value>(&source)
            .with_context(|| format!("failed to parse JSON source file ({label})"))?;
        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => json_value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("json pointer not found in ({label}): {pointer}"))?,
        };
        let Some(jq_expr) = self.jq_expr.as_deref() else {
            return Ok(vec![Document { label, value: json_value }]);
        };
        let selected = crate::jq_exec::select_with_jq(jq_expr, &json_value)
            .with_context(|| format!("failed to apply jq expression to source file ({label})"))?;
        let single = selected.len() == 1;
        Ok(selected
            .into_iter()
            .enumerate()
            .map(|(ix, value)| Document {
                label: if single { label.clone() } else { format!("{label}#{ix}") },
                value,
            })
            .collect())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Flatten(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let documents = target.input_settings.load_documents()?;
                let results = documents
                    .into_par_iter()
                    .map(|doc| {
                        let pairs = json_flat::flatten_with(target.policy, &doc.value)
                            .with_context(|| format!("failed to flatten ({})", doc.label))?;
                        Ok((doc.label, pairs))
                    })
                    .collect::<Result<Vec<(String, Vec<Pair<LeafValue>>)>>>()?;
                info!(documents = results.len(), policy = %target.policy, "flattened");
                write_output(target.out.as_deref(), &keyed_or_single(results)?)
            }
            Command::Reconstruct(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let documents = target.input_settings.load_documents()?;
                let results = documents
                    .into_par_iter()
                    .map(|doc| {
                        let pairs: Vec<StoredPair> = json_flat::stored_pairs_from_value(doc.value)
                            .with_context(|| format!("invalid pair list ({})", doc.label))?;
                        let rebuilt = json_flat::reconstruct(&pairs).unwrap_or(Value::Null);
                        Ok((doc.label, rebuilt))
                    })
                    .collect::<Result<Vec<(String, Value)>>>()?;
                info!(documents = results.len(), "reconstructed");
                write_output(target.out.as_deref(), &keyed_or_single(results)?)
            }
            Command::Path(target) => {
                if let [raw] = target.paths.as_slice() {
                    println!("{}", serde_json::to_string(&json_flat::parse_path(raw)?)?);
                    return Ok(());
                }
                let mut parsed = IndexMap::new();
                for raw in &target.paths {
                    parsed.insert(raw.clone(), json_flat::parse_path(raw)?);
                }
                println!("{}", serde_json::to_string_pretty(&parsed)?);
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// A lone document prints bare; several print as `{label: result}` in input order.
fn keyed_or_single<T: Serialize>(mut results: Vec<(String, T)>) -> Result<Value> {
    if results.len() == 1 {
        if let Some((_, only)) = results.pop() {
            return Ok(serde_json::to_value(only)?);
        }
    }
    let keyed = results.into_iter().collect::<IndexMap<_, _>>();
    Ok(serde_json::to_value(keyed)?)
}

fn write_output(out: Option<&Path>, value: &Value) -> Result<()> {
    let src = serde_json::to_string_pretty(value)?;
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &src)
                .with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{src}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_result_prints_bare() {
        let v = keyed_or_single(vec![("a.json".to_string(), json!([1]))]).unwrap();
        assert_eq!(v, json!([1]));
    }

    #[test]
    fn many_results_keep_input_order() {
        let v = keyed_or_single(vec![
            ("b.json".to_string(), json!(null)),
            ("a.json".to_string(), json!({"x": "int"})),
        ])
        .unwrap();
        let keys = v.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, ["b.json", "a.json"]);
    }

    #[test]
    fn literal_paths_pass_through_unchecked() {
        let out = resolve_file_path_patterns(["does/not/exist.json"]).unwrap();
        assert_eq!(out, vec![PathBuf::from("does/not/exist.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["/nonexistent-dir-for-tests/*.json"]).is_err());
    }

    #[test]
    fn policy_flag_parses() {
        let cli = CommandLineInterface::try_parse_from([
            "json-flat", "flatten", "--policy", "variable", "-i", "t.json",
        ])
        .unwrap();
        match cli.cmd {
            Command::Flatten(f) => assert_eq!(f.policy, Policy::Variable),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
