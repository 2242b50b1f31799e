//! Analyzer trait and types.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::value::FieldValue;

/// What an analyzer concluded about one field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Confidence in the value (0.0-1.0).
    pub confidence: f64,

    /// Suggested follow-ups, in order.
    #[serde(default)]
    pub suggestions: Vec<String>,

    /// Why the analyzer reached its conclusion.
    pub reasoning: String,

    /// Problems found with the value. Empty means none.
    #[serde(default)]
    pub quality_issues: Vec<String>,
}

impl AnalysisReport {
    /// Create a report with no issues or suggestions.
    pub fn new(confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            confidence: clamp_confidence(confidence),
            suggestions: Vec::new(),
            reasoning: reasoning.into(),
            quality_issues: Vec::new(),
        }
    }

    /// Add a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a quality issue.
    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.quality_issues.push(issue.into());
        self
    }

    pub fn has_issues(&self) -> bool {
        !self.quality_issues.is_empty()
    }
}

/// Clamp a confidence into `[0, 1]`. NaN becomes 0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Configuration for the heuristic analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Confidence reported when nothing lowers it.
    pub base_confidence: f64,

    /// Simulated latency before answering.
    #[serde(with = "duration_ms")]
    pub latency: Duration,

    /// Action values considered valid.
    pub action_whitelist: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_confidence: 0.8,
            latency: Duration::ZERO,
            action_whitelist: ["click", "input", "scroll", "hover", "wait", "navigate", "select"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalyzerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the base confidence.
    pub fn with_base_confidence(mut self, confidence: f64) -> Self {
        self.base_confidence = clamp_confidence(confidence);
        self
    }

    /// Replace the action whitelist.
    pub fn with_action_whitelist(mut self, actions: Vec<String>) -> Self {
        self.action_whitelist = actions;
        self
    }
}

/// Serialize a `Duration` as integer milliseconds.
pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

/// An automated reviewer of field values.
///
/// Analysis may take observable time; callers run it as a task that can be
/// cancelled and whose result may arrive after the field has moved on.
/// Implementations must be thread-safe (Send + Sync) so one analyzer can
/// serve every inspected field.
#[async_trait]
pub trait FieldAnalyzer: Send + Sync {
    /// Analyze one field value.
    async fn analyze(&self, key: &str, value: &FieldValue) -> Result<AnalysisReport>;

    /// Get the name of this analyzer (for logging/debugging).
    fn name(&self) -> &str;
}
