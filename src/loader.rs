//! Document loading and `$ref` resolution.
//!
//! The loader parses raw JSON or YAML into a generic `serde_json::Value`
//! tree and resolves every intra-document `$ref` before the typed view in
//! [`crate::spec`] is built. Resolution rules:
//!
//! - References into `#/components/schemas/*` are never inlined; they stay
//!   as `$ref` markers so the type resolver can intern one named IR node
//!   per schema (shared and recursive schemas are emitted once).
//! - Other references are inlined transitively. A pointer that reappears on
//!   the active resolution stack is a cycle; it is left as a `$ref` marker
//!   for the IR builder to hoist into a named node instead of recursing.
//! - Fully resolved pointers are memoized as `Rc<Value>`, so repeated
//!   references to the same location share one resolved object.
//! - External (cross-file) references fail with an explicit error.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::SpecError;

const SCHEMA_POINTER_PREFIX: &str = "/components/schemas/";

/// Parse raw spec text into a generic document tree.
///
/// JSON is tried first; anything that fails JSON parsing is treated as
/// YAML, so callers never need to know which format they were handed.
pub fn parse_document(text: &str) -> Result<Value, SpecError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(_) => serde_yaml::from_str::<Value>(text)
            .map_err(|err| SpecError::Parse(err.to_string())),
    }
}

/// Parse and resolve a document in one step.
pub fn load_document(text: &str) -> Result<Value, SpecError> {
    let raw = parse_document(text)?;
    let Some(root) = raw.as_object() else {
        return Err(SpecError::NotAnObject);
    };
    if !root.get("openapi").is_some_and(Value::is_string) {
        return Err(SpecError::MissingVersion);
    }
    RefResolver::new(raw).resolve()
}

/// Resolves intra-document `$ref` pointers over a document tree.
pub struct RefResolver {
    root: Rc<Value>,
    cache: HashMap<String, Rc<Value>>,
    stack: Vec<String>,
}

impl RefResolver {
    pub fn new(root: Value) -> Self {
        Self {
            root: Rc::new(root),
            cache: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Resolve the whole tree, inlining everything except named-schema
    /// references and cycle placeholders.
    pub fn resolve(mut self) -> Result<Value, SpecError> {
        let root = Rc::clone(&self.root);
        self.resolve_node(&root, "#")
    }

    /// Resolve a single `$ref` string to its target node.
    ///
    /// Repeated calls with the same pointer return the identical `Rc`;
    /// the target itself is resolved transitively before caching.
    pub fn resolve_pointer(&mut self, reference: &str) -> Result<Rc<Value>, SpecError> {
        if let Some(cached) = self.cache.get(reference) {
            return Ok(Rc::clone(cached));
        }
        let pointer = strip_fragment(reference)?;
        let root = Rc::clone(&self.root);
        let target = lookup_pointer(&root, pointer).ok_or_else(|| SpecError::BrokenReference {
            pointer: reference.to_string(),
        })?;
        self.stack.push(reference.to_string());
        let resolved = self.resolve_node(target, reference);
        self.stack.pop();
        let resolved = Rc::new(resolved?);
        self.cache
            .insert(reference.to_string(), Rc::clone(&resolved));
        Ok(resolved)
    }

    fn resolve_node(&mut self, node: &Value, location: &str) -> Result<Value, SpecError> {
        match node {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    out.push(self.resolve_node(item, &format!("{location}/{index}"))?);
                }
                Ok(Value::Array(out))
            }
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref") {
                    return self.resolve_reference(reference, map, location);
                }
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    let child = self.resolve_node(value, &format!("{location}/{key}"))?;
                    out.insert(key.clone(), child);
                }
                Ok(Value::Object(out))
            }
            scalar => Ok(scalar.clone()),
        }
    }

    fn resolve_reference(
        &mut self,
        reference: &Value,
        map: &serde_json::Map<String, Value>,
        location: &str,
    ) -> Result<Value, SpecError> {
        let Some(reference) = reference.as_str() else {
            return Err(SpecError::MalformedReference {
                location: location.to_string(),
            });
        };
        let pointer = strip_fragment(reference)?;

        // Named schemas stay symbolic so every use shares one IR node.
        // A pointer already on the resolution stack is a cycle; leave the
        // marker for the IR builder to hoist.
        let deferred = pointer.starts_with(SCHEMA_POINTER_PREFIX)
            || self.stack.iter().any(|active| active == reference);
        if deferred {
            return Ok(ref_marker(reference));
        }

        let resolved = self.resolve_pointer(reference)?;
        if map.len() == 1 {
            return Ok((*resolved).clone());
        }

        // $ref with sibling keys: the siblings override the target.
        let Some(base) = resolved.as_object() else {
            return Err(SpecError::MalformedReference {
                location: location.to_string(),
            });
        };
        let mut merged = base.clone();
        for (key, value) in map {
            if key == "$ref" {
                continue;
            }
            let child = self.resolve_node(value, &format!("{location}/{key}"))?;
            merged.insert(key.clone(), child);
        }
        Ok(Value::Object(merged))
    }
}

/// Build a `$ref` marker node.
fn ref_marker(reference: &str) -> Value {
    let mut map = serde_json::Map::new();
    map.insert("$ref".to_string(), Value::String(reference.to_string()));
    Value::Object(map)
}

/// Split off the leading `#`, rejecting external references.
fn strip_fragment(reference: &str) -> Result<&str, SpecError> {
    match reference.strip_prefix('#') {
        Some(pointer) => Ok(pointer),
        None => Err(SpecError::UnsupportedReference {
            reference: reference.to_string(),
        }),
    }
}

/// Walk a JSON pointer (`/a/b/0`) through the tree.
fn lookup_pointer<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for part in pointer.split('/').skip(1) {
        let key = part.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(map) => map.get(&key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Last segment of a schema pointer (`#/components/schemas/User` -> `User`).
pub fn schema_name_from_reference(reference: &str) -> Option<&str> {
    reference
        .strip_prefix('#')
        .and_then(|pointer| pointer.strip_prefix(SCHEMA_POINTER_PREFIX))
        .filter(|name| !name.is_empty() && !name.contains('/'))
}
