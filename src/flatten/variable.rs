//! Variable-leaf policy: leaves are opaque references, taken verbatim.
use serde_json::Value;

use super::LeafPolicy;
use crate::error::Result;
use crate::pair::{Leaf, Pair};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableRef(String);

impl VariableRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Leaf for VariableRef {
    fn field(&self) -> &'static str {
        "var"
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct VariableLeaves;

impl LeafPolicy for VariableLeaves {
    type Leaf = VariableRef;

    fn string_leaf(&self, _path: &str, value: &str) -> Result<VariableRef> {
        Ok(VariableRef::new(value))
    }

    // literal fallbacks (numbers, booleans) are kept in their JSON text form
    fn scalar_leaf(&self, _path: &str, value: &Value) -> Result<VariableRef> {
        Ok(VariableRef::new(value.to_string()))
    }
}

pub fn flatten_variable(text: &str) -> Result<Vec<Pair<VariableRef>>> {
    super::flatten_text(&VariableLeaves, text)
}

pub fn flatten_variable_value(root: &Value) -> Result<Vec<Pair<VariableRef>>> {
    super::flatten_value(&VariableLeaves, root)
}
