//! Template flattening: depth-first, pre-order traversal that emits one
//! `(path, leaf)` pair per leaf.
//!
//! Shared rules for every policy:
//! - `null` contributes nothing.
//! - an array is represented by its first element only (path `...[0]`); an
//!   empty array contributes nothing.
//! - object keys are visited in document order (`serde_json` keeps insertion
//!   order here), so the output order is part of the contract.
//!
//! What a leaf may be is decided by a [`LeafPolicy`]: see [`typed`] and
//! [`variable`].
pub mod typed;
pub mod variable;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::pair::{LeafValue, Pair};
use crate::path;

pub trait LeafPolicy {
    type Leaf;

    /// A string found at `path`.
    fn string_leaf(&self, path: &str, value: &str) -> Result<Self::Leaf>;

    /// A number or boolean found at `path`.
    fn scalar_leaf(&self, path: &str, value: &Value) -> Result<Self::Leaf>;
}

/// Parse `text` as JSON and flatten it. Blank text is an empty template.
pub fn flatten_text<P: LeafPolicy>(policy: &P, text: &str) -> Result<Vec<Pair<P::Leaf>>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value = serde_json::from_str::<Value>(text).map_err(CodecError::from_json)?;
    flatten_value(policy, &value)
}

pub fn flatten_value<P: LeafPolicy>(policy: &P, root: &Value) -> Result<Vec<Pair<P::Leaf>>> {
    let pairs = match root {
        Value::Null | Value::Array(_) | Value::Object(_) => walk(policy, root, "")?,
        other => return Err(CodecError::ScalarRoot { kind: kind_name(other) }),
    };
    debug!(pairs = pairs.len(), "flattened template");
    Ok(pairs)
}

fn walk<P: LeafPolicy>(policy: &P, value: &Value, at: &str) -> Result<Vec<Pair<P::Leaf>>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![Pair::new(at, policy.string_leaf(at, s)?)]),
        Value::Bool(_) | Value::Number(_) => {
            Ok(vec![Pair::new(at, policy.scalar_leaf(at, value)?)])
        }
        Value::Array(items) => match items.first() {
            None => Ok(Vec::new()),
            Some(first) => walk(policy, first, &path::push_index(at, 0)),
        },
        Value::Object(map) => {
            let mut out = Vec::new();
            for (key, child) in map {
                out.extend(walk(policy, child, &path::push_key(at, key))?);
            }
            Ok(out)
        }
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RUNTIME POLICY SELECTION
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Typed,
    Variable,
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typed" | "type" => Ok(Policy::Typed),
            "variable" | "var" => Ok(Policy::Variable),
            other => Err(format!("unknown leaf policy '{other}' (expected 'typed' or 'variable')")),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Policy::Typed => "typed",
            Policy::Variable => "variable",
        })
    }
}

/// Flatten under a policy picked at runtime, unifying the leaf type.
pub fn flatten_with(policy: Policy, root: &Value) -> Result<Vec<Pair<LeafValue>>> {
    let pairs = match policy {
        Policy::Typed => typed::flatten_typed_value(root)?
            .into_iter()
            .map(Pair::into_unified)
            .collect(),
        Policy::Variable => variable::flatten_variable_value(root)?
            .into_iter()
            .map(Pair::into_unified)
            .collect(),
    };
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Accepts anything, recording the JSON kind it saw.
    struct KindPolicy;

    impl LeafPolicy for KindPolicy {
        type Leaf = &'static str;

        fn string_leaf(&self, _path: &str, _value: &str) -> Result<Self::Leaf> {
            Ok("string")
        }

        fn scalar_leaf(&self, _path: &str, value: &Value) -> Result<Self::Leaf> {
            Ok(kind_name(value))
        }
    }

    fn paths<'a>(pairs: &'a [Pair<&'static str>]) -> Vec<&'a str> {
        pairs.iter().map(|p| p.path.as_str()).collect()
    }

    #[test]
    fn visits_keys_in_document_order() {
        let doc = json!({"z": "s", "a": {"m": 1, "b": true}, "k": "s"});
        let pairs = flatten_value(&KindPolicy, &doc).unwrap();
        assert_eq!(paths(&pairs), ["z", "a.m", "a.b", "k"]);
        assert_eq!(pairs[1].leaf, "number");
        assert_eq!(pairs[2].leaf, "boolean");
    }

    #[test]
    fn arrays_contribute_their_first_element_only() {
        let doc = json!({"xs": [{"id": "s"}, {"other": "s"}], "m": [[1, 2], [3]]});
        let pairs = flatten_value(&KindPolicy, &doc).unwrap();
        assert_eq!(paths(&pairs), ["xs[0].id", "m[0][0]"]);
    }

    #[test]
    fn nulls_and_empty_containers_contribute_nothing() {
        let doc = json!({"a": null, "b": [], "c": {}, "d": [null], "e": "s"});
        let pairs = flatten_value(&KindPolicy, &doc).unwrap();
        assert_eq!(paths(&pairs), ["e"]);
    }

    #[test]
    fn null_root_is_an_empty_template() {
        assert!(flatten_value(&KindPolicy, &Value::Null).unwrap().is_empty());
    }

    #[test]
    fn scalar_root_is_rejected() {
        for doc in [json!("string"), json!(5), json!(false)] {
            let err = flatten_value(&KindPolicy, &doc).unwrap_err();
            assert!(matches!(err, CodecError::ScalarRoot { .. }), "{doc}");
        }
    }

    #[test]
    fn blank_text_skips_parsing() {
        assert!(flatten_text(&KindPolicy, "").unwrap().is_empty());
        assert!(flatten_text(&KindPolicy, " \n\t ").unwrap().is_empty());
    }

    #[test]
    fn invalid_json_reports_parser_message() {
        let err = flatten_text(&KindPolicy, "{\"a\": ").unwrap_err();
        match err {
            CodecError::Parse { message, line, .. } => {
                assert!(!message.is_empty());
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!("typed".parse::<Policy>().unwrap(), Policy::Typed);
        assert_eq!("VAR".parse::<Policy>().unwrap(), Policy::Variable);
        assert!("json".parse::<Policy>().is_err());
        assert_eq!(Policy::Variable.to_string(), "variable");
    }

    #[test]
    fn runtime_policy_unifies_leaves() {
        let doc = json!({"n": "INT", "v": "{{x}}"});
        let unified = flatten_with(Policy::Variable, &doc).unwrap();
        assert_eq!(unified[0].leaf, LeafValue::Var(variable::VariableRef::new("INT")));
        let err = flatten_with(Policy::Typed, &doc).unwrap_err();
        assert!(matches!(err, CodecError::InvalidTypeToken { ref path, .. } if path == "v"));
    }
}
