//! Path notation: `a.b[0].c` style addresses into a template.
//!
//! Keys are maximal runs of anything but `.`, `[` and `]`; indices are bracketed
//! non-negative integers. There is no escaping, so a key that itself contains
//! one of those characters is split or mangled when re-parsed. The scanner is
//! lenient and skips characters it cannot place rather than rejecting the path.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{CodecError, Result};

static SEGMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([0-9]+)\]|\.?([^.\[\]]+)").expect("segment pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }
}

/// Parsed, non-empty segment sequence, root first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn first(&self) -> &Segment {
        // non-empty by construction
        &self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}

pub fn parse_path(path: &str) -> Result<Path> {
    let mut segments = Vec::new();
    for caps in SEGMENT_RE.captures_iter(path) {
        if let Some(digits) = caps.get(1) {
            let index = digits
                .as_str()
                .parse::<usize>()
                .map_err(|_| CodecError::MalformedPath {
                    path: path.to_string(),
                    reason: format!("index [{}] is out of range", digits.as_str()),
                })?;
            segments.push(Segment::Index(index));
        } else if let Some(key) = caps.get(2) {
            segments.push(Segment::Key(key.as_str().to_string()));
        }
    }
    if segments.is_empty() {
        return Err(CodecError::MalformedPath {
            path: path.to_string(),
            reason: "no key or index segment found".to_string(),
        });
    }
    Ok(Path { segments })
}

impl FromStr for Path {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        parse_path(s)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPOSITION
// ————————————————————————————————————————————————————————————————————————————

/// `prefix.key`, or just `key` at the root.
pub fn push_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// `prefix[index]`; an empty prefix gives a root-array path such as `[0]`.
pub fn push_index(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for segment in &self.segments {
            out = match segment {
                Segment::Key(key) => push_key(&out, key),
                Segment::Index(index) => push_index(&out, *index),
            };
        }
        f.write_str(&out)
    }
}
