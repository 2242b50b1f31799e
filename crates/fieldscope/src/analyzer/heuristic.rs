//! Deterministic default analyzer.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::classify::Classifier;
use crate::error::Result;
use crate::rules::FieldShape;
use crate::shape::validate_rect;
use crate::value::FieldValue;

use super::provider::{AnalysisReport, AnalyzerConfig, FieldAnalyzer, clamp_confidence};

static HTTP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid URL prefix pattern"));

/// Confidence ceilings applied when a check fails.
const IMAGE_ISSUE_CONFIDENCE: f64 = 0.4;
const RECT_ISSUE_CONFIDENCE: f64 = 0.3;
const ACTION_ISSUE_CONFIDENCE: f64 = 0.2;

/// Rule-based analyzer that checks values against their field's shape.
///
/// It classifies the field with its own classifier and then applies the
/// checks for that shape: image locations must be HTTP(S) URLs, rectangles
/// need four non-negative numeric components, and actions must be one of a
/// fixed whitelist. Each failed check adds an issue and caps confidence.
pub struct HeuristicAnalyzer {
    classifier: Classifier,
    config: AnalyzerConfig,
}

impl HeuristicAnalyzer {
    /// Create an analyzer over the builtin rule table.
    pub fn new() -> Self {
        Self::with_config(Classifier::default(), AnalyzerConfig::default())
    }

    /// Create with a custom classifier and configuration.
    pub fn with_config(classifier: Classifier, config: AnalyzerConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run the checks without the simulated latency.
    pub fn evaluate(&self, key: &str, value: &FieldValue) -> AnalysisReport {
        let mapping = self.classifier.resolve(key, value);
        let mut confidence = self.config.base_confidence;
        let mut suggestions = Vec::new();
        let mut issues = Vec::new();

        match mapping.shape() {
            FieldShape::ImagePath => {
                match value.as_str() {
                    Some(path) if HTTP_URL.is_match(path) => {}
                    Some(path) => {
                        issues.push(format!("image location is not an HTTP(S) URL: {}", path));
                        confidence = confidence.min(IMAGE_ISSUE_CONFIDENCE);
                    }
                    None => {
                        issues.push(format!(
                            "image location must be a string, found {}",
                            value.kind()
                        ));
                        confidence = confidence.min(IMAGE_ISSUE_CONFIDENCE);
                    }
                }
                suggestions.push("Verify that the image URL is reachable".to_string());
            }
            FieldShape::Rect => {
                if let Err(violations) = validate_rect(value) {
                    issues.extend(violations);
                    confidence = confidence.min(RECT_ISSUE_CONFIDENCE);
                }
                suggestions.push("Ensure all coordinate values are non-negative numbers".to_string());
            }
            FieldShape::Action => match value.as_str() {
                Some(action) if self.is_known_action(action) => {}
                Some(action) => {
                    issues.push(format!("unknown action type: {}", action));
                    confidence = confidence.min(ACTION_ISSUE_CONFIDENCE);
                }
                None => {
                    issues.push(format!("action must be a string, found {}", value.kind()));
                    confidence = confidence.min(ACTION_ISSUE_CONFIDENCE);
                }
            },
            FieldShape::Free => {}
        }

        AnalysisReport {
            confidence: clamp_confidence(confidence),
            suggestions,
            reasoning: format!(
                "Checked field '{}' ({} value) against the '{}' category",
                key,
                value.kind(),
                mapping.field_type
            ),
            quality_issues: issues,
        }
    }

    fn is_known_action(&self, action: &str) -> bool {
        self.config.action_whitelist.iter().any(|a| a == action)
    }
}

impl Default for HeuristicAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FieldAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, key: &str, value: &FieldValue) -> Result<AnalysisReport> {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let report = self.evaluate(key, value);
        debug!(
            key,
            confidence = report.confidence,
            issues = report.quality_issues.len(),
            "heuristic analysis finished"
        );
        Ok(report)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
