//! Dot-path resolution over loosely structured event payloads
//!
//! Lookups walk a `serde_json::Value` one segment at a time and report what
//! they found as a [`Resolved`] value. A missing segment yields
//! [`Resolved::Absent`], which is kept distinct from an explicit JSON `null`.

use crate::error::{SharedError, SharedResult};
use serde_json::{Map, Value};

/// Outcome of resolving a path against an event payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// Some segment of the path does not exist
    Absent,
    /// The path exists and holds an explicit `null`
    Null,
    /// The path holds an object
    Mapping(&'a Map<String, Value>),
    /// The path holds an array
    List(&'a [Value]),
    /// The path holds a string, number or boolean
    Scalar(&'a Value),
}

impl<'a> Resolved<'a> {
    /// Classify an optional value found during traversal
    pub fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            None => Resolved::Absent,
            Some(Value::Null) => Resolved::Null,
            Some(Value::Object(map)) => Resolved::Mapping(map),
            Some(Value::Array(items)) => Resolved::List(items),
            Some(other) => Resolved::Scalar(other),
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Resolved::Absent)
    }

    /// True for anything other than a missing path or an explicit null.
    /// `0`, `false` and `""` are present.
    pub fn is_present(self) -> bool {
        !matches!(self, Resolved::Absent | Resolved::Null)
    }

    /// Short-circuit fallback: keep `self` when present, otherwise `other`
    pub fn or(self, other: Resolved<'a>) -> Resolved<'a> {
        if self.is_present() {
            self
        } else {
            other
        }
    }

    /// Lazy variant of [`Resolved::or`]
    pub fn or_else<F>(self, fallback: F) -> Resolved<'a>
    where
        F: FnOnce() -> Resolved<'a>,
    {
        if self.is_present() {
            self
        } else {
            fallback()
        }
    }

    pub fn as_str(self) -> Option<&'a str> {
        match self {
            Resolved::Scalar(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_mapping(self) -> Option<&'a Map<String, Value>> {
        match self {
            Resolved::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Owned copy of the resolved value. `None` only for [`Resolved::Absent`];
    /// an explicit null survives as `Value::Null`.
    pub fn to_value(self) -> Option<Value> {
        match self {
            Resolved::Absent => None,
            Resolved::Null => Some(Value::Null),
            Resolved::Mapping(map) => Some(Value::Object(map.clone())),
            Resolved::List(items) => Some(Value::Array(items.to_vec())),
            Resolved::Scalar(value) => Some(value.clone()),
        }
    }

    /// Owned copy of a present value; nulls are dropped as well
    pub fn present_value(self) -> Option<Value> {
        if self.is_present() {
            self.to_value()
        } else {
            None
        }
    }

    /// String view of a scalar. Numbers are rendered, booleans are not.
    pub fn to_text(self) -> Option<String> {
        match self {
            Resolved::Scalar(Value::String(s)) => Some(s.clone()),
            Resolved::Scalar(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Canonical form used when an exact key lookup misses:
/// lower-cased with every non-alphanumeric character removed.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Nested lookup over JSON using dot-delimited paths
pub struct PathResolver;

impl PathResolver {
    /// Resolve `path` under `root`. An empty path resolves to the root itself.
    /// Never fails; anything that cannot be walked is [`Resolved::Absent`].
    pub fn resolve<'a>(root: &'a Value, path: &str) -> Resolved<'a> {
        let mut current = root;

        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            match Self::step(current, segment) {
                Some(next) => current = next,
                None => return Resolved::Absent,
            }
        }

        Resolved::from_value(Some(current))
    }

    /// Like [`PathResolver::resolve`], but rejects a root that is not an
    /// object or array instead of reporting every path as absent.
    pub fn try_resolve<'a>(root: &'a Value, path: &str) -> SharedResult<Resolved<'a>> {
        match root {
            Value::Object(_) | Value::Array(_) => Ok(Self::resolve(root, path)),
            other => Err(SharedError::non_traversable(kind_of(other))),
        }
    }

    fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
        match current {
            Value::Object(map) => map.get(segment).or_else(|| {
                let wanted = normalize_key(segment);
                map.iter()
                    .find(|(key, _)| normalize_key(key) == wanted)
                    .map(|(_, value)| value)
            }),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        }
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Table of canonical keys and the spellings a source payload may use for them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyAliases {
    entries: Vec<(String, Vec<String>)>,
}

impl KeyAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canonical key with its accepted spellings.
    /// The canonical key itself always matches.
    pub fn with(mut self, canonical: &str, spellings: &[&str]) -> Self {
        self.entries.push((
            canonical.to_string(),
            spellings.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn canonical_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(canonical, _)| canonical.as_str())
    }

    pub fn spellings(&self, canonical: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key == canonical)
            .map(|(_, spellings)| spellings.as_slice())
    }

    /// Canonical key that `key` is a spelling of, if any
    pub fn canonical_for(&self, key: &str) -> Option<&str> {
        let wanted = normalize_key(key);
        self.entries
            .iter()
            .find(|(canonical, spellings)| {
                normalize_key(canonical) == wanted
                    || spellings.iter().any(|s| normalize_key(s) == wanted)
            })
            .map(|(canonical, _)| canonical.as_str())
    }

    /// Remove every key matching any registered spelling.
    /// Returns the removed keys in their original spelling.
    pub fn remove_from(&self, map: &mut Map<String, Value>) -> Vec<String> {
        let doomed: Vec<String> = map
            .keys()
            .filter(|key| self.canonical_for(key).is_some())
            .cloned()
            .collect();

        for key in &doomed {
            map.remove(key);
        }

        doomed
    }
}
