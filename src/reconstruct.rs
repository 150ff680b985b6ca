//! Rebuild a template from its flattened pairs.
//!
//! Container shape comes from path syntax alone: the slot addressed by segment
//! `i` becomes an array when segment `i + 1` is an index, an object otherwise.
//! The root is an array as soon as any path starts with an index.
//!
//! There is no validation pass. Pairs that cannot be placed (malformed path,
//! a key into an array or an index into an object, an index padding an array
//! by more than [`MAX_INDEX_PADDING`] nulls) are skipped with a warning, and a
//! later pair at the same path overwrites an earlier one.
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::pair::PairView;
use crate::path::{self, Path, Segment};
use crate::stored;

/// Most `null` slots one pair may add in front of its index.
pub const MAX_INDEX_PADDING: usize = 4096;

/// `None` for an empty pair list ("no document", not "empty document").
pub fn reconstruct<P: PairView>(pairs: &[P]) -> Option<Value> {
    if pairs.is_empty() {
        return None;
    }

    let mut parsed = Vec::with_capacity(pairs.len());
    for pair in pairs {
        match path::parse_path(pair.path()) {
            Ok(path) => parsed.push((path, leaf_value(pair))),
            Err(error) => warn!(%error, "skipping pair"),
        }
    }

    let root_is_array = parsed.iter().any(|(path, _)| path.first().is_index());
    let mut root = empty_container(root_is_array);
    let mut placed = 0usize;
    for (path, leaf) in parsed {
        if insert(&mut root, &path, leaf) {
            placed += 1;
        } else {
            warn!(path = %path, "skipping pair that does not fit the container it reaches");
        }
    }
    debug!(pairs = pairs.len(), placed, "reconstructed template");
    Some(root)
}

/// Parse stored `{path, type|var}` records and rebuild them. Blank text is `None`.
pub fn reconstruct_text(text: &str) -> Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let pairs = stored::parse_stored_pairs(text)?;
    Ok(reconstruct(&pairs))
}

fn leaf_value<P: PairView>(pair: &P) -> Value {
    match pair.leaf() {
        Some(leaf) => Value::String(leaf.to_string()),
        None => Value::Null,
    }
}

fn empty_container(array: bool) -> Value {
    if array {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn insert(root: &mut Value, path: &Path, leaf: Value) -> bool {
    let segments = path.segments();
    let Some((last, ancestors)) = segments.split_last() else {
        return false;
    };

    let mut cursor = root;
    for (i, segment) in ancestors.iter().enumerate() {
        let next_is_index = segments[i + 1].is_index();
        let Some(slot) = slot_mut(cursor, segment) else {
            return false;
        };
        let fits = if next_is_index { slot.is_array() } else { slot.is_object() };
        if !fits {
            *slot = empty_container(next_is_index);
        }
        cursor = slot;
    }

    match slot_mut(cursor, last) {
        Some(slot) => {
            *slot = leaf;
            true
        }
        None => false,
    }
}

/// The child slot `segment` addresses, created as `null` (arrays padded) if absent.
fn slot_mut<'a>(container: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (container, segment) {
        (Value::Object(map), Segment::Key(key)) => {
            Some(map.entry(key.clone()).or_insert(Value::Null))
        }
        (Value::Array(items), Segment::Index(index)) => {
            let index = *index;
            if items.len() <= index {
                let new_len = index.checked_add(1)?;
                if index - items.len() > MAX_INDEX_PADDING {
                    return None;
                }
                items.try_reserve(new_len - items.len()).ok()?;
                items.resize(new_len, Value::Null);
            }
            items.get_mut(index)
        }
        _ => None,
    }
}
