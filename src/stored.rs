//! At-rest pair records: `{ "path": .., "type": .. }` or `{ "path": .., "var": .. }`.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CodecError, Result};
use crate::pair::{Leaf, Pair, PairView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPair {
    pub path: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var: Option<String>,
}

impl PairView for StoredPair {
    fn path(&self) -> &str {
        &self.path
    }

    /// A non-empty `type` wins; otherwise `var`.
    fn leaf(&self) -> Option<&str> {
        self.type_
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.var.as_deref())
    }
}

impl<L: Leaf> From<&Pair<L>> for StoredPair {
    fn from(pair: &Pair<L>) -> Self {
        let value = Some(pair.leaf.as_str().to_string());
        let (type_, var) = match pair.leaf.field() {
            "type" => (value, None),
            _ => (None, value),
        };
        StoredPair { path: pair.path.clone(), type_, var }
    }
}

pub fn parse_stored_pairs(text: &str) -> Result<Vec<StoredPair>> {
    let mut de = serde_json::Deserializer::from_str(text);
    let pairs = deserialize_with_path(&mut de)?;
    // only whitespace may follow the array
    de.end().map_err(CodecError::from_json)?;
    Ok(pairs)
}

pub fn stored_pairs_from_value(value: Value) -> Result<Vec<StoredPair>> {
    deserialize_with_path(value)
}

/// Deserialize with the JSON path of the failing element in the message.
fn deserialize_with_path<'de, D, T>(de: D) -> Result<T>
where
    D: serde::Deserializer<'de, Error = serde_json::Error>,
    T: DeserializeOwned,
{
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            let inner = err.into_inner();
            Err(CodecError::Parse {
                message: format!("at JSON path {path} → {inner}"),
                line: inner.line(),
                column: inner.column(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::typed::TypeToken;
    use crate::flatten::variable::VariableRef;

    #[test]
    fn accepts_either_field_per_element() {
        let pairs = parse_stored_pairs(
            r#"[{"path":"a","type":"string"},{"path":"b","var":"{{x}}"}]"#,
        )
        .unwrap();
        assert_eq!(pairs[0].leaf(), Some("string"));
        assert_eq!(pairs[1].leaf(), Some("{{x}}"));
    }

    #[test]
    fn type_wins_unless_empty() {
        let both = StoredPair {
            path: "a".into(),
            type_: Some("int".into()),
            var: Some("{{a}}".into()),
        };
        assert_eq!(both.leaf(), Some("int"));
        let empty_type = StoredPair { type_: Some(String::new()), ..both.clone() };
        assert_eq!(empty_type.leaf(), Some("{{a}}"));
        let neither = StoredPair { path: "a".into(), type_: None, var: None };
        assert_eq!(neither.leaf(), None);
    }

    #[test]
    fn errors_name_the_offending_element() {
        let err = parse_stored_pairs(r#"[{"path":"a","type":"int"},{"path":"b","type":3}]"#)
            .unwrap_err();
        match err {
            CodecError::Parse { message, .. } => assert!(message.contains("[1].type"), "{message}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn trailing_text_is_rejected() {
        let err = parse_stored_pairs(r#"[{"path":"a","type":"int"}] this is not json"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::Parse { line: 1, .. }), "{err:?}");
        assert!(parse_stored_pairs("[{\"path\":\"a\",\"type\":\"int\"}]  \n").is_ok());
    }

    #[test]
    fn from_value_matches_from_text() {
        let value = serde_json::json!([{"path": "[0].id", "var": "id"}]);
        let pairs = stored_pairs_from_value(value).unwrap();
        assert_eq!(pairs, parse_stored_pairs(r#"[{"path":"[0].id","var":"id"}]"#).unwrap());
    }

    #[test]
    fn converts_from_flattened_pairs() {
        let typed = StoredPair::from(&Pair::new("a", TypeToken::Boolean));
        assert_eq!(typed.type_.as_deref(), Some("boolean"));
        assert_eq!(typed.var, None);
        let var = StoredPair::from(&Pair::new("b", VariableRef::new("v")));
        assert_eq!(var.var.as_deref(), Some("v"));
        assert_eq!(
            serde_json::to_value(&var).unwrap(),
            serde_json::json!({"path": "b", "var": "v"})
        );
    }
}
