//! json-flat: flatten JSON-shaped templates into ordered `(path, leaf)` pairs and
//! rebuild them.
//!
//! - [`path`]: the `a.b[0].c` path notation.
//! - [`flatten`]: depth-first flattening under a typed-leaf or variable-leaf policy.
//! - [`reconstruct`]: pairs back to a nested document, shape inferred from paths.
//! - [`stored`]: the at-rest `{path, type|var}` record.
//!
//! ```
//! use json_flat::{flatten_typed, reconstruct};
//! use serde_json::json;
//!
//! let pairs = flatten_typed(r#"{"users":[{"id":"int","name":"string"}]}"#).unwrap();
//! assert_eq!(pairs[0].path, "users[0].id");
//! assert_eq!(
//!     reconstruct(&pairs),
//!     Some(json!({"users": [{"id": "int", "name": "string"}]}))
//! );
//! ```
pub mod error;
pub mod flatten;
pub mod pair;
pub mod path;
pub mod reconstruct;
pub mod stored;

pub use error::{CodecError, Result};
pub use flatten::typed::{TypeToken, VOCABULARY, flatten_typed, flatten_typed_value};
pub use flatten::variable::{VariableRef, flatten_variable, flatten_variable_value};
pub use flatten::{Policy, flatten_with};
pub use pair::{Leaf, LeafValue, Pair, PairView};
pub use path::{Path, Segment, parse_path};
pub use reconstruct::{reconstruct, reconstruct_text};
pub use stored::{StoredPair, parse_stored_pairs, stored_pairs_from_value};
