//! Version records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quality::QualityAssessment;
use crate::value::FieldValue;

/// One historical snapshot of a field's value and its judgment at the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVersion {
    /// Sequential id, `v1` for the first snapshot.
    pub id: String,

    /// The value at this version.
    pub value: FieldValue,

    /// When the version was created.
    pub timestamp: DateTime<Utc>,

    /// Who created it.
    pub author: String,

    /// Free-text change descriptions.
    pub changes: Vec<String>,

    /// Judgment about this version's value.
    pub quality_assessment: QualityAssessment,
}

impl NodeVersion {
    /// Create a version with the given sequence number.
    pub fn new(
        sequence: usize,
        value: FieldValue,
        author: impl Into<String>,
        changes: Vec<String>,
        quality_assessment: QualityAssessment,
    ) -> Self {
        Self {
            id: version_id(sequence),
            value,
            timestamp: Utc::now(),
            author: author.into(),
            changes,
            quality_assessment,
        }
    }

    /// Numeric part of the id.
    pub fn sequence(&self) -> Option<usize> {
        self.id.strip_prefix('v')?.parse().ok()
    }
}

/// Format a version id.
pub fn version_id(sequence: usize) -> String {
    format!("v{}", sequence)
}

/// Kind of change a description claims to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Unknown,
}

impl ChangeKind {
    /// Classify a change description by its leading word.
    ///
    /// This reads a naming convention, not the values: descriptions written
    /// by hand may say anything. Use [`diff_values`](super::diff_values) when
    /// correctness matters.
    pub fn from_description(description: &str) -> Self {
        let word = description.split_whitespace().next().unwrap_or_default();
        match word.to_lowercase().as_str() {
            "added" => ChangeKind::Added,
            "removed" => ChangeKind::Removed,
            "modified" => ChangeKind::Modified,
            _ => ChangeKind::Unknown,
        }
    }

    /// The leading word used in generated descriptions.
    pub fn prefix(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
            ChangeKind::Unknown => "changed",
        }
    }
}
