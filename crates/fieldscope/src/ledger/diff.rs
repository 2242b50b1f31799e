//! Structural comparison of versions.

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

use super::version::{ChangeKind, NodeVersion};

/// One structural difference between two values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    /// Location inside the value; empty for the value itself.
    pub path: Vec<String>,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<FieldValue>,
}

impl ValueChange {
    /// Render as a change description under `key`.
    ///
    /// Descriptions start with the change kind so that
    /// [`ChangeKind::from_description`] agrees with the structural result.
    pub fn describe(&self, key: &str) -> String {
        let location = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", key, self.path.join("."))
        };

        match (&self.before, &self.after) {
            (Some(before), Some(after)) => {
                format!("{} {}: {} -> {}", self.kind.prefix(), location, before, after)
            }
            (None, Some(after)) => format!("{} {}: {}", self.kind.prefix(), location, after),
            (Some(before), None) => format!("{} {} (was {})", self.kind.prefix(), location, before),
            (None, None) => format!("{} {}", self.kind.prefix(), location),
        }
    }
}

/// Result of comparing serialized values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValueComparison {
    Unchanged,
    Changed { before: String, after: String },
}

/// Comparison between two versions of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionDiff {
    pub older: String,
    pub newer: String,
    pub comparison: ValueComparison,
    pub changes: Vec<ValueChange>,
}

impl VersionDiff {
    pub fn is_unchanged(&self) -> bool {
        matches!(self.comparison, ValueComparison::Unchanged)
    }

    /// Short human-readable summary.
    pub fn summary(&self) -> String {
        if self.is_unchanged() {
            return "no change".to_string();
        }

        let count = |kind: ChangeKind| self.changes.iter().filter(|c| c.kind == kind).count();
        format!(
            "{} -> {}: {} added, {} removed, {} modified",
            self.older,
            self.newer,
            count(ChangeKind::Added),
            count(ChangeKind::Removed),
            count(ChangeKind::Modified)
        )
    }
}

/// Compare two versions.
pub fn diff(older: &NodeVersion, newer: &NodeVersion) -> VersionDiff {
    let comparison = if older.value == newer.value {
        ValueComparison::Unchanged
    } else {
        ValueComparison::Changed {
            before: older.value.render(),
            after: newer.value.render(),
        }
    };

    VersionDiff {
        older: older.id.clone(),
        newer: newer.id.clone(),
        comparison,
        changes: diff_values(&older.value, &newer.value),
    }
}

/// Structural differences from `old` to `new`.
///
/// Objects are compared by key and arrays by index; anything else that
/// differs is a modification of that location.
pub fn diff_values(old: &FieldValue, new: &FieldValue) -> Vec<ValueChange> {
    let mut changes = Vec::new();
    let mut path = Vec::new();
    collect(old, new, &mut path, &mut changes);
    changes
}

fn collect(old: &FieldValue, new: &FieldValue, path: &mut Vec<String>, out: &mut Vec<ValueChange>) {
    match (old, new) {
        (FieldValue::Object(before), FieldValue::Object(after)) => {
            for (key, old_child) in before {
                path.push(key.clone());
                match after.get(key) {
                    Some(new_child) => collect(old_child, new_child, path, out),
                    None => out.push(change(path, ChangeKind::Removed, Some(old_child), None)),
                }
                path.pop();
            }
            for (key, new_child) in after {
                if !before.contains_key(key) {
                    path.push(key.clone());
                    out.push(change(path, ChangeKind::Added, None, Some(new_child)));
                    path.pop();
                }
            }
        }
        (FieldValue::Array(before), FieldValue::Array(after)) => {
            for index in 0..before.len().max(after.len()) {
                path.push(index.to_string());
                match (before.get(index), after.get(index)) {
                    (Some(o), Some(n)) => collect(o, n, path, out),
                    (Some(o), None) => out.push(change(path, ChangeKind::Removed, Some(o), None)),
                    (None, Some(n)) => out.push(change(path, ChangeKind::Added, None, Some(n))),
                    (None, None) => {}
                }
                path.pop();
            }
        }
        _ if old != new => out.push(change(path, ChangeKind::Modified, Some(old), Some(new))),
        _ => {}
    }
}

fn change(
    path: &[String],
    kind: ChangeKind,
    before: Option<&FieldValue>,
    after: Option<&FieldValue>,
) -> ValueChange {
    ValueChange {
        path: path.to_vec(),
        kind,
        before: before.cloned(),
        after: after.cloned(),
    }
}

/// Change descriptions for committing `new` over `old` under `key`.
pub fn describe_changes(key: &str, old: &FieldValue, new: &FieldValue) -> Vec<String> {
    let changes = diff_values(old, new);
    if changes.is_empty() {
        return vec![format!("resubmitted {} without changes", key)];
    }
    changes.iter().map(|c| c.describe(key)).collect()
}
