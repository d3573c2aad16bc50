//! Resolver and mutation engine over `serde_json::Value` trees.

use serde_json::{Map, Value};

use crate::error::EditError;
use crate::path::{DEFAULT_SEPARATOR, Segment, parse_path};

/// Outcome of a read-only walk. `Found(Value::Null)` is distinct from
/// `NotFound`: an entry can exist and hold null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found(&'a Value),
    /// An intermediate key or index was absent (or out of range).
    NotFound,
    /// Traversal hit a non-mapping node where a key lookup was required.
    Invalid,
}

/// Walk `segments` against `root` without mutating anything.
///
/// Key steps on a non-mapping node are `Invalid`; index steps are
/// permissive: out-of-range and non-sequence nodes both resolve to
/// `NotFound`, so callers can treat "beyond the array" as absent.
pub fn resolve<'a>(root: &'a Value, segments: &[Segment]) -> Resolution<'a> {
    let mut node = root;
    for segment in segments {
        match segment {
            Segment::Key(key) => match node {
                Value::Object(map) => match map.get(key) {
                    Some(v) => node = v,
                    None => return Resolution::NotFound,
                },
                _ => return Resolution::Invalid,
            },
            Segment::Index(index) => match node {
                Value::Array(items) if in_bounds(*index, items.len()) => {
                    node = &items[*index as usize];
                }
                _ => return Resolution::NotFound,
            },
        }
    }
    Resolution::Found(node)
}

/// Mutable counterpart of [`resolve`]; collapses `NotFound`/`Invalid` into
/// `None`.
pub fn resolve_mut<'a>(root: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    let mut node = root;
    for segment in segments {
        node = match segment {
            Segment::Key(key) => match node {
                Value::Object(map) => map.get_mut(key)?,
                _ => return None,
            },
            Segment::Index(index) => match node {
                Value::Array(items) if in_bounds(*index, items.len()) => {
                    &mut items[*index as usize]
                }
                _ => return None,
            },
        };
    }
    Some(node)
}

// Negative indices parse but never address an element.
fn in_bounds(index: i64, len: usize) -> bool {
    index >= 0 && (index as usize) < len
}

// Vacant values may be overwritten with a fresh mapping while materializing
// intermediate containers: null, false, zero, "", [], {}.
fn is_vacant(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Path-addressed editor owning a document tree.
///
/// Mutating operations report `Ok(true)` when the tree changed and
/// `Ok(false)` when there was nothing to do; an absent target is never an
/// error, so every operation is safe to repeat. Operations that can fail
/// partway through a walk (`put`, `create`) work on a copy and only swap it
/// in on success.
#[derive(Debug, Clone)]
pub struct Editor {
    root: Value,
    separator: char,
}

impl Editor {
    pub fn new(root: Value) -> Self {
        Self::with_separator(root, DEFAULT_SEPARATOR)
    }

    pub fn with_separator(root: Value, separator: char) -> Self {
        Self { root, separator }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    pub fn set_root(&mut self, root: Value) {
        self.root = root;
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    fn parse(&self, path: &str) -> Result<Vec<Segment>, EditError> {
        parse_path(path, self.separator)
    }

    /// Read the value at `path`; absent and unreachable targets are `None`.
    pub fn get(&self, path: &str) -> Result<Option<&Value>, EditError> {
        let segments = self.parse(path)?;
        Ok(match resolve(&self.root, &segments) {
            Resolution::Found(v) => Some(v),
            Resolution::NotFound | Resolution::Invalid => None,
        })
    }

    /// Set the value at `path`, materializing intermediate mappings.
    ///
    /// No-op when the resolved value already equals `value`. Index segments
    /// only replace existing in-range positions; a put never extends a
    /// sequence. A non-vacant, non-mapping value in the way of a key step is
    /// a `TypeConflict`; the original tree is kept intact on any failure.
    pub fn put(&mut self, path: &str, value: Value) -> Result<bool, EditError> {
        let segments = self.parse(path)?;
        if let Resolution::Found(existing) = resolve(&self.root, &segments)
            && *existing == value
        {
            return Ok(false);
        }
        let mut copy = self.root.clone();
        if !insert_at(&mut copy, &segments, value)? {
            return Ok(false);
        }
        self.root = copy;
        Ok(true)
    }

    /// First-time materialization of a tree; same insertion as [`Editor::put`]
    /// without the equality short-circuit. Callers gate this on whether a
    /// backing document already exists.
    pub fn create(&mut self, path: &str, value: Value) -> Result<bool, EditError> {
        let segments = self.parse(path)?;
        let mut copy = self.root.clone();
        if !insert_at(&mut copy, &segments, value)? {
            return Ok(false);
        }
        self.root = copy;
        Ok(true)
    }

    /// Merge into a mapping entry, or replace/insert within a sequence entry.
    ///
    /// A mapping entry merges `value` key-by-key (`value` must itself be a
    /// mapping). A sequence entry resolves a target position from
    /// `curr_value` (located by equality) or `index`, replaces it when the
    /// element differs, and otherwise appends `value` only if it is not
    /// already present, so repeated calls converge to a stable state.
    pub fn update(
        &mut self,
        path: &str,
        value: Value,
        index: Option<usize>,
        curr_value: Option<&Value>,
    ) -> Result<bool, EditError> {
        let segments = self.parse(path)?;
        let Some(entry) = resolve_mut(&mut self.root, &segments) else {
            return Ok(false);
        };
        match entry {
            Value::Object(map) => {
                let incoming = match value {
                    Value::Object(incoming) => incoming,
                    other => {
                        return Err(EditError::TypeConflict(format!(
                            "cannot merge {} into the mapping at '{path}'",
                            kind_name(&other)
                        )));
                    }
                };
                for (k, v) in incoming {
                    map.insert(k, v);
                }
                Ok(true)
            }
            Value::Array(items) => {
                let target = match (curr_value, index) {
                    (Some(curr), _) => match items.iter().position(|it| it == curr) {
                        Some(i) => Some(i),
                        None => return Ok(false),
                    },
                    (None, i) => i,
                };
                if let Some(i) = target {
                    if i >= items.len() {
                        return Ok(false);
                    }
                    if items[i] != value {
                        items[i] = value;
                        return Ok(true);
                    }
                }
                if items.contains(&value) {
                    return Ok(false);
                }
                items.push(value);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Append to an existing sequence entry, duplicates allowed.
    pub fn append(&mut self, path: &str, value: Value) -> Result<bool, EditError> {
        let segments = self.parse(path)?;
        match resolve_mut(&mut self.root, &segments) {
            Some(Value::Array(items)) => {
                items.push(value);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove the entry at `path`. The empty path clears a mapping or
    /// sequence root in place; deleting an absent entry is a no-op.
    pub fn delete(&mut self, path: &str) -> Result<bool, EditError> {
        let segments = self.parse(path)?;
        if segments.is_empty() {
            return Ok(match &mut self.root {
                Value::Object(map) => {
                    map.clear();
                    true
                }
                Value::Array(items) => {
                    items.clear();
                    true
                }
                _ => false,
            });
        }
        if !matches!(resolve(&self.root, &segments), Resolution::Found(_)) {
            return Ok(false);
        }
        let Some((last, parents)) = segments.split_last() else {
            return Ok(false);
        };
        Ok(remove_at(&mut self.root, parents, last))
    }

    /// Remove `key_or_item` from the entry at `path`: a key for mapping
    /// entries, the first deep-equal element for sequence entries.
    pub fn pop(&mut self, path: &str, key_or_item: &Value) -> Result<bool, EditError> {
        let segments = self.parse(path)?;
        let Some(entry) = resolve_mut(&mut self.root, &segments) else {
            return Ok(false);
        };
        match entry {
            Value::Object(map) => Ok(match key_or_item.as_str() {
                Some(key) => map.remove(key).is_some(),
                None => false,
            }),
            Value::Array(items) => match items.iter().position(|it| it == key_or_item) {
                Some(i) => {
                    items.remove(i);
                    Ok(true)
                }
                None => Ok(false),
            },
            _ => Ok(false),
        }
    }

    /// Test whether `value` exists at `path`.
    ///
    /// Sequence entries check membership by deep equality. Mapping entries
    /// check a mapping `value` pair-by-pair (an absent sub-key surfaces as
    /// `MissingKey` rather than a silent false) and any other `value` by key
    /// membership. Scalar entries compare for deep equality.
    pub fn exists(&self, path: &str, value: &Value) -> Result<bool, EditError> {
        let segments = self.parse(path)?;
        let entry = match resolve(&self.root, &segments) {
            Resolution::Found(v) => v,
            Resolution::NotFound | Resolution::Invalid => return Ok(false),
        };
        match entry {
            Value::Array(items) => Ok(items.contains(value)),
            Value::Object(map) => match value {
                Value::Object(expected) => {
                    for (key, want) in expected {
                        let Some(actual) = map.get(key) else {
                            return Err(EditError::MissingKey(key.clone()));
                        };
                        if actual != want {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                Value::String(key) => Ok(map.contains_key(key)),
                _ => Ok(false),
            },
            scalar => Ok(scalar == value),
        }
    }
}

// Copy-on-write insertion body shared by put/create. `Ok(false)` is the
// "index not addressable" no-op; key-step conflicts are hard errors.
fn insert_at(root: &mut Value, segments: &[Segment], value: Value) -> Result<bool, EditError> {
    let Some((last, intermediate)) = segments.split_last() else {
        *root = value;
        return Ok(true);
    };
    let mut node = root;
    for segment in intermediate {
        match segment {
            Segment::Key(key) => {
                let map = match node {
                    Value::Object(map) => map,
                    other => {
                        return Err(EditError::TypeConflict(format!(
                            "cannot descend into {} with key '{key}'",
                            kind_name(other)
                        )));
                    }
                };
                let entry = map.entry(key.clone()).or_insert(Value::Null);
                if !matches!(entry, Value::Object(_)) {
                    if is_vacant(entry) {
                        *entry = Value::Object(Map::new());
                    } else {
                        return Err(EditError::TypeConflict(format!(
                            "existing {} at '{key}' is not a mapping",
                            kind_name(entry)
                        )));
                    }
                }
                node = entry;
            }
            Segment::Index(index) => match node {
                Value::Array(items) if in_bounds(*index, items.len()) => {
                    node = &mut items[*index as usize];
                }
                _ => return Ok(false),
            },
        }
    }
    match (last, node) {
        (Segment::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
            Ok(true)
        }
        (Segment::Key(key), other) => Err(EditError::TypeConflict(format!(
            "cannot set key '{key}' on {}",
            kind_name(other)
        ))),
        (Segment::Index(index), Value::Array(items)) if in_bounds(*index, items.len()) => {
            items[*index as usize] = value;
            Ok(true)
        }
        (Segment::Index(_), _) => Ok(false),
    }
}

// Remove a single entry from the parent of the final segment.
fn remove_at(root: &mut Value, parents: &[Segment], last: &Segment) -> bool {
    let Some(parent) = resolve_mut(root, parents) else {
        return false;
    };
    match (last, parent) {
        (Segment::Key(key), Value::Object(map)) => map.remove(key).is_some(),
        (Segment::Index(index), Value::Array(items)) if in_bounds(*index, items.len()) => {
            items.remove(*index as usize);
            true
        }
        _ => false,
    }
}
