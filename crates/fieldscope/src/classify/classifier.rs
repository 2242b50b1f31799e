//! Rule-based field classification.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::rules::{FieldMapping, FieldShape, RuleTable};
use crate::value::FieldValue;

use super::walker::FieldRef;

/// Result of classifying one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Path of the field within the record.
    pub path: Vec<String>,
    /// Field key.
    pub key: String,
    /// Category tag of the resolved rule.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Viewer component of the resolved rule.
    pub component: String,
    /// Priority of the resolved rule.
    pub priority: i32,
    /// Declared shape of the resolved rule.
    pub shape: FieldShape,
}

/// Resolves fields to exactly one rule of a [`RuleTable`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Arc<RuleTable>,
}

impl Classifier {
    /// Create a classifier over a rule table.
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    /// The rule table in use.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Resolve a field to its rule.
    ///
    /// Rules are tried in priority order and the first match wins. The
    /// catch-all rule matches everything, so unknown fields resolve to the
    /// default category rather than failing.
    pub fn resolve(&self, key: &str, value: &FieldValue) -> &FieldMapping {
        let mapping = self
            .rules
            .iter()
            .find(|rule| rule.matches(key, value))
            .unwrap_or_else(|| self.rules.default_rule());

        trace!(key, field_type = %mapping.field_type, "resolved field");
        mapping
    }

    /// Classify a field found by the record walker.
    pub fn classify(&self, field: &FieldRef) -> Classification {
        let mapping = self.resolve(&field.key, &field.value);
        Classification {
            path: field.path.clone(),
            key: field.key.clone(),
            field_type: mapping.field_type.clone(),
            component: mapping.component.clone(),
            priority: mapping.priority,
            shape: mapping.shape(),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Arc::new(RuleTable::builtin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Pattern;

    #[test]
    fn test_image_beats_title_for_file_names() {
        let classifier = Classifier::default();
        let mapping = classifier.resolve("screenshot.png", &FieldValue::from("..."));

        assert_eq!(mapping.field_type, "image");
        assert_eq!(mapping.component, "ImageViewer");
    }

    #[test]
    fn test_action_key() {
        let classifier = Classifier::default();
        assert_eq!(classifier.resolve("type", &"click".into()).field_type, "action");
        assert_eq!(classifier.resolve("TYPE", &"click".into()).field_type, "action");
    }

    #[test]
    fn test_value_can_select_rule() {
        let classifier = Classifier::default();
        let mapping = classifier.resolve("href", &"https://example.com/page".into());
        assert_eq!(mapping.field_type, "url");

        let image = classifier.resolve("src", &"https://cdn.example.com/a.webp".into());
        assert_eq!(image.field_type, "image");
    }

    #[test]
    fn test_unmatched_falls_back_to_default() {
        let classifier = Classifier::default();
        let mapping = classifier.resolve("anything_unmatched_xyz", &FieldValue::from(42i64));
        assert_eq!(mapping.field_type, "default");
    }

    #[test]
    fn test_injected_table() {
        let rules = RuleTable::new(vec![
            FieldMapping::new("low", Pattern::literal("rect"), "Low", 4),
            FieldMapping::new("high", Pattern::literal("rect"), "High", 10),
            FieldMapping::new("default", Pattern::Any, "DefaultViewer", 1),
        ])
        .unwrap();
        let classifier = Classifier::new(Arc::new(rules));

        assert_eq!(classifier.resolve("rect", &FieldValue::Null).component, "High");
    }
}
