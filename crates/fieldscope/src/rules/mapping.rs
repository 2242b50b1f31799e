//! Classification rules and their patterns.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FieldscopeError;
use crate::value::FieldValue;

/// Regex source that is equivalent to [`Pattern::Any`].
const MATCH_ALL_SOURCE: &str = ".*";

/// How a rule recognizes a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PatternRepr", into = "PatternRepr")]
pub enum Pattern {
    /// Case-insensitive exact match against the key.
    Literal(String),
    /// Matches the key, or the value when the value is a string.
    Regex(Regex),
    /// Matches every field. Exactly one rule of a table carries it.
    Any,
}

impl Pattern {
    /// Build a regex pattern.
    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(source)?))
    }

    /// Build a literal key pattern.
    pub fn literal(key: impl Into<String>) -> Self {
        Pattern::Literal(key.into())
    }

    /// Check whether a field matches.
    pub fn matches(&self, key: &str, value: &FieldValue) -> bool {
        match self {
            Pattern::Literal(literal) => key.to_lowercase() == literal.to_lowercase(),
            Pattern::Regex(re) => {
                re.is_match(key) || value.as_str().is_some_and(|s| re.is_match(s))
            }
            Pattern::Any => true,
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Pattern::Any)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(literal) => write!(f, "\"{}\"", literal),
            Pattern::Regex(re) => write!(f, "/{}/", re.as_str()),
            Pattern::Any => write!(f, "*"),
        }
    }
}

/// Wire form of [`Pattern`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PatternRepr {
    Literal(String),
    Regex(String),
    Any,
}

impl TryFrom<PatternRepr> for Pattern {
    type Error = FieldscopeError;

    fn try_from(repr: PatternRepr) -> Result<Self, Self::Error> {
        match repr {
            PatternRepr::Literal(literal) => Ok(Pattern::Literal(literal)),
            PatternRepr::Regex(source) if source == MATCH_ALL_SOURCE => Ok(Pattern::Any),
            PatternRepr::Regex(source) => Ok(Pattern::Regex(Regex::new(&source)?)),
            PatternRepr::Any => Ok(Pattern::Any),
        }
    }
}

impl From<Pattern> for PatternRepr {
    fn from(pattern: Pattern) -> Self {
        match pattern {
            Pattern::Literal(literal) => PatternRepr::Literal(literal),
            Pattern::Regex(re) => PatternRepr::Regex(re.as_str().to_string()),
            Pattern::Any => PatternRepr::Any,
        }
    }
}

/// Shape a field's value is expected to have, derived from its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// Object with non-negative numeric `top`, `left`, `width`, `height`.
    Rect,
    /// String holding an image location.
    ImagePath,
    /// String naming a recorded action.
    Action,
    /// No declared shape.
    #[default]
    Free,
}

impl FieldShape {
    pub fn label(&self) -> &'static str {
        match self {
            FieldShape::Rect => "rect",
            FieldShape::ImagePath => "image_path",
            FieldShape::Action => "action",
            FieldShape::Free => "free",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "rect" => Some(FieldShape::Rect),
            "image" | "image_path" | "screenshot" => Some(FieldShape::ImagePath),
            "action" => Some(FieldShape::Action),
            "free" => Some(FieldShape::Free),
            _ => None,
        }
    }
}

/// One classification rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Category tag (e.g. "image", "rect", "action").
    #[serde(rename = "type")]
    pub field_type: String,

    /// What the rule matches.
    pub pattern: Pattern,

    /// Viewer component the presentation layer should use.
    pub component: String,

    /// Higher priorities are tried first.
    pub priority: i32,

    /// Opaque extra data. A `"shape"` entry overrides the derived shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl FieldMapping {
    /// Create a new rule.
    pub fn new(
        field_type: impl Into<String>,
        pattern: Pattern,
        component: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            field_type: field_type.into(),
            pattern,
            component: component.into(),
            priority,
            metadata: None,
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Check whether a field matches this rule.
    pub fn matches(&self, key: &str, value: &FieldValue) -> bool {
        self.pattern.matches(key, value)
    }

    /// Declared value shape for fields resolved to this rule.
    pub fn shape(&self) -> FieldShape {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("shape"))
            .and_then(Value::as_str)
            .and_then(FieldShape::from_tag)
            .or_else(|| FieldShape::from_tag(&self.field_type))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_case_insensitive_exact() {
        let pattern = Pattern::literal("Title");
        assert!(pattern.matches("title", &FieldValue::Null));
        assert!(pattern.matches("TITLE", &FieldValue::Null));
        assert!(!pattern.matches("subtitle", &FieldValue::Null));
    }

    #[test]
    fn test_regex_matches_key_or_string_value() {
        let pattern = Pattern::regex(r"(?i)\.(png|jpg)$").unwrap();

        assert!(pattern.matches("shot.png", &FieldValue::Null));
        assert!(pattern.matches("src", &FieldValue::from("a/b.JPG")));
        assert!(!pattern.matches("src", &FieldValue::from(3i64)));
    }

    #[test]
    fn test_match_all_regex_loads_as_any() {
        let pattern: Pattern = serde_json::from_str(r#"{"regex": ".*"}"#).unwrap();
        assert!(pattern.is_catch_all());

        let any: Pattern = serde_json::from_str(r#""any""#).unwrap();
        assert!(any.is_catch_all());
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let result: Result<Pattern, _> = serde_json::from_str(r#"{"regex": "("}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_shape_derivation() {
        let rect = FieldMapping::new("rect", Pattern::literal("rect"), "RectViewer", 8);
        assert_eq!(rect.shape(), FieldShape::Rect);

        let custom = FieldMapping::new("bounds", Pattern::literal("bounds"), "RectViewer", 8)
            .with_metadata("shape", "rect");
        assert_eq!(custom.shape(), FieldShape::Rect);

        let title = FieldMapping::new("title", Pattern::literal("title"), "TextViewer", 4);
        assert_eq!(title.shape(), FieldShape::Free);
    }
}
