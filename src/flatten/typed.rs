//! Typed-leaf policy: every leaf names a type from a closed vocabulary.
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::LeafPolicy;
use crate::error::{CodecError, Result};
use crate::pair::{Leaf, Pair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeToken {
    String,
    Int,
    Boolean,
}

/// Every token a typed template may use, in the order error messages list them.
pub const VOCABULARY: [TypeToken; 3] = [TypeToken::String, TypeToken::Int, TypeToken::Boolean];

impl TypeToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeToken::String => "string",
            TypeToken::Int => "int",
            TypeToken::Boolean => "boolean",
        }
    }

    /// Case-insensitive lookup in [`VOCABULARY`].
    pub fn lookup(raw: &str) -> Option<Self> {
        VOCABULARY
            .iter()
            .copied()
            .find(|token| token.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Leaf for TypeToken {
    fn field(&self) -> &'static str {
        "type"
    }

    fn as_str(&self) -> &str {
        TypeToken::as_str(self)
    }
}

fn vocabulary_list() -> String {
    VOCABULARY.iter().map(TypeToken::as_str).collect::<Vec<_>>().join(", ")
}

pub struct TypedLeaves;

impl LeafPolicy for TypedLeaves {
    type Leaf = TypeToken;

    fn string_leaf(&self, path: &str, value: &str) -> Result<TypeToken> {
        TypeToken::lookup(value).ok_or_else(|| CodecError::InvalidTypeToken {
            value: value.to_string(),
            path: path.to_string(),
            allowed: vocabulary_list(),
        })
    }

    fn scalar_leaf(&self, path: &str, value: &Value) -> Result<TypeToken> {
        Err(CodecError::InvalidTemplateValue {
            value: value.to_string(),
            path: path.to_string(),
        })
    }
}

pub fn flatten_typed(text: &str) -> Result<Vec<Pair<TypeToken>>> {
    super::flatten_text(&TypedLeaves, text)
}

pub fn flatten_typed_value(root: &Value) -> Result<Vec<Pair<TypeToken>>> {
    super::flatten_value(&TypedLeaves, root)
}
