//! The ordered, immutable rule table.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{FieldscopeError, Result};

use super::mapping::{FieldMapping, Pattern};

/// An ordered set of classification rules.
///
/// Rules are kept in resolution order: priority descending, with ties in
/// the order they were listed. The table always holds exactly one catch-all
/// rule, and it is the lowest-priority rule, so resolution cannot fail.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<FieldMapping>,
    default_index: usize,
}

impl RuleTable {
    /// Validate and order a list of rules.
    pub fn new(mut rules: Vec<FieldMapping>) -> Result<Self> {
        if rules.is_empty() {
            return Err(FieldscopeError::InvalidRuleTable(
                "rule table is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.field_type.as_str()) {
                return Err(FieldscopeError::InvalidRuleTable(format!(
                    "duplicate rule type '{}'",
                    rule.field_type
                )));
            }
        }

        let catch_all: Vec<&FieldMapping> =
            rules.iter().filter(|r| r.pattern.is_catch_all()).collect();
        let default = match catch_all.as_slice() {
            [only] => *only,
            [] => {
                return Err(FieldscopeError::InvalidRuleTable(
                    "no catch-all rule".to_string(),
                ));
            }
            _ => {
                return Err(FieldscopeError::InvalidRuleTable(format!(
                    "{} catch-all rules, expected exactly one",
                    catch_all.len()
                )));
            }
        };

        if let Some(shadowed) = rules
            .iter()
            .find(|r| !r.pattern.is_catch_all() && r.priority <= default.priority)
        {
            return Err(FieldscopeError::InvalidRuleTable(format!(
                "rule '{}' (priority {}) does not outrank the catch-all '{}' (priority {})",
                shadowed.field_type, shadowed.priority, default.field_type, default.priority
            )));
        }

        // Stable: equal priorities keep their listed order.
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        let default_index = rules.len() - 1;

        Ok(Self {
            rules,
            default_index,
        })
    }

    /// The standard table for task-recording fields.
    pub fn builtin() -> Self {
        let rules = vec![
            FieldMapping::new(
                "image",
                Pattern::Regex(builtin_regex(r"(?i)\.(jpg|jpeg|png|gif|webp|svg)$")),
                "ImageViewer",
                10,
            ),
            FieldMapping::new(
                "screenshot",
                Pattern::Regex(builtin_regex(r"(?i)^(screenshot|imgSave|capture|frame)$")),
                "ScreenshotViewer",
                9,
            ),
            FieldMapping::new(
                "rect",
                Pattern::Regex(builtin_regex(r"(?i)^(rect|bbox|bounds|coordinates)$")),
                "RectViewer",
                8,
            ),
            FieldMapping::new(
                "viewport",
                Pattern::Regex(builtin_regex(r"(?i)^(viewport|screen|display)$")),
                "ViewportViewer",
                8,
            ),
            FieldMapping::new(
                "action",
                Pattern::Regex(builtin_regex(r"(?i)^(type|action|command|operation)$")),
                "ActionViewer",
                7,
            ),
            FieldMapping::new(
                "actionRule",
                Pattern::Regex(builtin_regex(r"(?i)^(actionRuleSetting|rule|setting)$")),
                "ActionRuleViewer",
                7,
            ),
            FieldMapping::new(
                "timestamp",
                Pattern::Regex(builtin_regex(r"(?i)^(timestamp|time|date|created|updated)$")),
                "TimestampViewer",
                6,
            ),
            FieldMapping::new(
                "attributes",
                Pattern::Regex(builtin_regex(r"(?i)^(attributes|props|data)$")),
                "AttributesViewer",
                5,
            ),
            FieldMapping::new(
                "title",
                Pattern::Regex(builtin_regex(r"(?i)^(title|name|label|text|content)$")),
                "TextViewer",
                4,
            ),
            FieldMapping::new(
                "url",
                Pattern::Regex(builtin_regex(r"^https?://.+")),
                "UrlViewer",
                3,
            ),
            FieldMapping::new("default", Pattern::Any, "DefaultViewer", 1),
        ];

        // Already in resolution order; validated by `test_builtin_table_is_valid`.
        let default_index = rules.len() - 1;
        Self {
            rules,
            default_index,
        }
    }

    /// Load a table from a JSON array of rules.
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Vec<FieldMapping> = serde_json::from_str(json)?;
        Self::new(rules)
    }

    /// Load a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| FieldscopeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The catch-all rule.
    pub fn default_rule(&self) -> &FieldMapping {
        &self.rules[self.default_index]
    }

    /// Find a rule by its type tag.
    pub fn by_type(&self, field_type: &str) -> Option<&FieldMapping> {
        self.rules.iter().find(|r| r.field_type == field_type)
    }

    /// Rules in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldMapping> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.rules)?)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_regex(source: &str) -> Regex {
    Regex::new(source).expect("builtin rule patterns are valid")
}
