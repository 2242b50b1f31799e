//! Declared value shapes and their checks.
//!
//! The same checks produce analyzer quality issues and reject ledger edits,
//! so a value the analyzer flags is exactly a value an edit may not commit.

use serde::{Deserialize, Serialize};

use crate::rules::FieldShape;
use crate::value::FieldValue;

/// Components every rectangle must carry, in display order.
pub const RECT_COMPONENTS: [&str; 4] = ["top", "left", "width", "height"];

/// A validated rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Width over height, `None` for a zero-height rectangle.
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.height > 0.0).then(|| self.width / self.height)
    }
}

/// Validate a rectangle value, reporting every violation.
pub fn validate_rect(value: &FieldValue) -> Result<Rect, Vec<String>> {
    let Some(object) = value.as_object() else {
        return Err(vec![format!(
            "rectangle must be an object, found {}",
            value.kind()
        )]);
    };

    let mut violations = Vec::new();
    let mut components = [0.0f64; 4];

    for (slot, name) in components.iter_mut().zip(RECT_COMPONENTS) {
        match object.get(name) {
            None | Some(FieldValue::Null) => {
                violations.push(format!("rectangle is missing '{}'", name));
            }
            Some(FieldValue::Number(n)) if !n.is_finite() => {
                violations.push(format!("rectangle '{}' is not a finite number", name));
            }
            Some(FieldValue::Number(n)) if *n < 0.0 => {
                violations.push(format!("rectangle '{}' is negative ({})", name, n));
            }
            Some(FieldValue::Number(n)) => *slot = *n,
            Some(other) => {
                violations.push(format!(
                    "rectangle '{}' must be a number, found {}",
                    name,
                    other.kind()
                ));
            }
        }
    }

    if violations.is_empty() {
        let [top, left, width, height] = components;
        Ok(Rect {
            top,
            left,
            width,
            height,
        })
    } else {
        Err(violations)
    }
}

/// Check a value against a declared shape. Empty means the value conforms.
pub fn check_shape(shape: FieldShape, value: &FieldValue) -> Vec<String> {
    match shape {
        FieldShape::Rect => validate_rect(value).err().unwrap_or_default(),
        FieldShape::ImagePath | FieldShape::Action => match value {
            FieldValue::String(_) => Vec::new(),
            other => vec![format!("expected a string, found {}", other.kind())],
        },
        FieldShape::Free => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_rect() {
        let rect = validate_rect(&json!({"top": 0, "left": 0, "width": 200, "height": 100}).into())
            .unwrap();

        assert_eq!(rect.area(), 20000.0);
        assert_eq!(rect.center(), (100.0, 50.0));
        assert_eq!(rect.aspect_ratio(), Some(2.0));
    }

    #[test]
    fn test_zero_components_are_present() {
        let value: FieldValue = json!({"top": 0, "left": 0, "width": 0, "height": 0}).into();
        assert!(validate_rect(&value).is_ok());
    }

    #[test]
    fn test_reports_every_violation() {
        let value: FieldValue = json!({"top": "10", "width": -5, "height": 10}).into();
        let violations = validate_rect(&value).unwrap_err();

        assert_eq!(violations.len(), 3);
        assert!(violations.iter().any(|v| v.contains("'top' must be a number")));
        assert!(violations.iter().any(|v| v.contains("missing 'left'")));
        assert!(violations.iter().any(|v| v.contains("'width' is negative")));
    }

    #[test]
    fn test_non_object_rect() {
        let violations = validate_rect(&FieldValue::from("0,0,10,10")).unwrap_err();
        assert_eq!(violations, vec!["rectangle must be an object, found string".to_string()]);
    }

    #[test]
    fn test_check_shape_strings() {
        assert!(check_shape(FieldShape::Action, &"click".into()).is_empty());
        assert_eq!(check_shape(FieldShape::ImagePath, &FieldValue::Null).len(), 1);
        assert!(check_shape(FieldShape::Free, &FieldValue::Null).is_empty());
    }
}
