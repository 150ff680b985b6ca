//! Flattened `(path, leaf)` pairs and the accessors shared by both leaf policies.
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::flatten::typed::TypeToken;
use crate::flatten::variable::VariableRef;

/// A leaf carried by a [`Pair`].
///
/// `field` is the key the leaf is stored under at rest (`type` or `var`).
pub trait Leaf {
    fn field(&self) -> &'static str;
    fn as_str(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair<L> {
    pub path: String,
    pub leaf: L,
}

impl<L> Pair<L> {
    pub fn new(path: impl Into<String>, leaf: L) -> Self {
        Self { path: path.into(), leaf }
    }

    pub fn into_unified(self) -> Pair<LeafValue>
    where
        L: Into<LeafValue>,
    {
        Pair { path: self.path, leaf: self.leaf.into() }
    }
}

impl<L: Leaf> Serialize for Pair<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry(self.leaf.field(), self.leaf.as_str())?;
        map.end()
    }
}

/// Either kind of leaf, for lists that mix typed and variable pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafValue {
    Type(TypeToken),
    Var(VariableRef),
}

impl Leaf for LeafValue {
    fn field(&self) -> &'static str {
        match self {
            LeafValue::Type(token) => token.field(),
            LeafValue::Var(var) => var.field(),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            LeafValue::Type(token) => token.as_str(),
            LeafValue::Var(var) => var.as_str(),
        }
    }
}

impl From<TypeToken> for LeafValue {
    fn from(token: TypeToken) -> Self {
        LeafValue::Type(token)
    }
}

impl From<VariableRef> for LeafValue {
    fn from(var: VariableRef) -> Self {
        LeafValue::Var(var)
    }
}

/// Read-only view reconstruction works through, so it never cares which
/// policy (or storage record) produced a pair.
pub trait PairView {
    fn path(&self) -> &str;
    /// `None` when the record carries no leaf at all.
    fn leaf(&self) -> Option<&str>;
}

impl<L: Leaf> PairView for Pair<L> {
    fn path(&self) -> &str {
        &self.path
    }

    fn leaf(&self) -> Option<&str> {
        Some(self.leaf.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_pair_serializes_under_type() {
        let pair = Pair::new("a.b", TypeToken::Int);
        assert_eq!(
            serde_json::to_value(&pair).unwrap(),
            json!({"path": "a.b", "type": "int"})
        );
    }

    #[test]
    fn variable_pair_serializes_under_var() {
        let pair = Pair::new("[0].id", VariableRef::new("{{user.id}}"));
        assert_eq!(
            serde_json::to_value(&pair).unwrap(),
            json!({"path": "[0].id", "var": "{{user.id}}"})
        );
    }

    #[test]
    fn unified_pairs_keep_their_field() {
        let pairs = vec![
            Pair::new("a", TypeToken::String).into_unified(),
            Pair::new("b", VariableRef::new("x")).into_unified(),
        ];
        assert_eq!(
            serde_json::to_value(&pairs).unwrap(),
            json!([{"path": "a", "type": "string"}, {"path": "b", "var": "x"}])
        );
        assert_eq!(pairs[1].leaf(), Some("x"));
    }
}
