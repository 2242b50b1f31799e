//! Spatial and textual notes attached to a field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldscopeError, Result};

/// Kind of annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// A box drawn over an image.
    Bbox,
    /// A single marked point.
    Point,
    /// Free text.
    Text,
    /// A reported error.
    Error,
    /// A proposed improvement.
    Suggestion,
}

impl AnnotationKind {
    /// Whether this kind is anchored to coordinates.
    pub fn is_spatial(&self) -> bool {
        matches!(self, AnnotationKind::Bbox | AnnotationKind::Point)
    }
}

/// Location of a spatial annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// A note attached to a field. Immutable once added to a context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationData {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    pub content: String,

    pub author: String,

    pub timestamp: DateTime<Utc>,
}

impl AnnotationData {
    fn new(kind: AnnotationKind, coordinates: Option<Coordinates>, content: impl Into<String>) -> Self {
        Self {
            kind,
            coordinates,
            content: content.into(),
            author: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// A box at `(x, y)` with the given size.
    pub fn bbox(x: f64, y: f64, width: f64, height: f64, content: impl Into<String>) -> Self {
        Self::new(
            AnnotationKind::Bbox,
            Some(Coordinates {
                x,
                y,
                width: Some(width),
                height: Some(height),
            }),
            content,
        )
    }

    /// A point at `(x, y)`.
    pub fn point(x: f64, y: f64, content: impl Into<String>) -> Self {
        Self::new(
            AnnotationKind::Point,
            Some(Coordinates {
                x,
                y,
                width: None,
                height: None,
            }),
            content,
        )
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(AnnotationKind::Text, None, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(AnnotationKind::Error, None, content)
    }

    pub fn suggestion(content: impl Into<String>) -> Self {
        Self::new(AnnotationKind::Suggestion, None, content)
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Check that the annotation carries what its kind requires.
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(FieldscopeError::InvalidAnnotation(
                "content must not be empty".to_string(),
            ));
        }

        if !self.kind.is_spatial() {
            return Ok(());
        }

        let Some(coords) = self.coordinates else {
            return Err(FieldscopeError::InvalidAnnotation(format!(
                "{:?} annotation requires coordinates",
                self.kind
            )));
        };

        if !coords.x.is_finite() || !coords.y.is_finite() {
            return Err(FieldscopeError::InvalidAnnotation(
                "coordinates must be finite".to_string(),
            ));
        }

        if self.kind == AnnotationKind::Bbox {
            match (coords.width, coords.height) {
                (Some(w), Some(h)) if w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0 => {}
                _ => {
                    return Err(FieldscopeError::InvalidAnnotation(
                        "bbox requires non-negative width and height".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}
