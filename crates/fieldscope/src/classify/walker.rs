//! Walks a recording and yields its fields.

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// One field of a recording: its key, value and path from the root.
///
/// The path ends with the key itself. Array elements use their index as key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRef {
    pub key: String,
    pub value: FieldValue,
    pub path: Vec<String>,
}

impl FieldRef {
    /// Create a field reference.
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>, path: Vec<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            path,
        }
    }

    /// A top-level field (path is just the key).
    pub fn top_level(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let key = key.into();
        let path = vec![key.clone()];
        Self::new(key, value, path)
    }

    /// Path joined with dots.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// All fields of a record, depth-first in document order.
///
/// Containers are emitted before their children. The root itself is not a
/// field.
pub fn walk_record(record: &FieldValue) -> Vec<FieldRef> {
    let mut fields = Vec::new();
    let mut path = Vec::new();
    walk_children(record, &mut path, &mut fields);
    fields
}

fn walk_children(value: &FieldValue, path: &mut Vec<String>, out: &mut Vec<FieldRef>) {
    match value {
        FieldValue::Object(map) => {
            for (key, child) in map {
                visit(key.clone(), child, path, out);
            }
        }
        FieldValue::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                visit(index.to_string(), child, path, out);
            }
        }
        _ => {}
    }
}

fn visit(key: String, value: &FieldValue, path: &mut Vec<String>, out: &mut Vec<FieldRef>) {
    path.push(key.clone());
    out.push(FieldRef {
        key,
        value: value.clone(),
        path: path.clone(),
    });
    walk_children(value, path, out);
    path.pop();
}

/// Find a single field by path.
pub fn find_field(record: &FieldValue, path: &[String]) -> Option<FieldRef> {
    let (key, _) = path.split_last()?;
    let mut current = record;
    for segment in path {
        current = match current {
            FieldValue::Object(map) => map.get(segment)?,
            FieldValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(FieldRef::new(key.clone(), current.clone(), path.to_vec()))
}
