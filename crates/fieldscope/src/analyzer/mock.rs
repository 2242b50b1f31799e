//! Scripted analyzer for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FieldscopeError, Result};
use crate::value::FieldValue;

use super::provider::{AnalysisReport, FieldAnalyzer};

/// Analyzer that returns predictable responses for testing.
///
/// Reports are looked up by the value's compact serialization first, then by
/// key, then fall back to a clean report.
pub struct ScriptedAnalyzer {
    by_value: HashMap<String, AnalysisReport>,
    by_key: HashMap<String, AnalysisReport>,
    fallback: AnalysisReport,
    latency: HashMap<String, Duration>,
    default_latency: Duration,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    /// Create an analyzer that approves everything with confidence 0.9.
    pub fn new() -> Self {
        Self {
            by_value: HashMap::new(),
            by_key: HashMap::new(),
            fallback: AnalysisReport::new(0.9, "scripted"),
            latency: HashMap::new(),
            default_latency: Duration::ZERO,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer with `report` for this key.
    pub fn respond_to_key(mut self, key: impl Into<String>, report: AnalysisReport) -> Self {
        self.by_key.insert(key.into(), report);
        self
    }

    /// Answer with `report` for this exact value.
    pub fn respond_to_value(mut self, value: &FieldValue, report: AnalysisReport) -> Self {
        self.by_value.insert(value.render_compact(), report);
        self
    }

    /// Delay every answer.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    /// Delay answers for one exact value.
    pub fn with_latency_for(mut self, value: &FieldValue, latency: Duration) -> Self {
        self.latency.insert(value.render_compact(), latency);
        self
    }

    /// Fail every call with this message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of analyses started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FieldAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, key: &str, value: &FieldValue) -> Result<AnalysisReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rendered = value.render_compact();

        let latency = self
            .latency
            .get(&rendered)
            .copied()
            .unwrap_or(self.default_latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if let Some(message) = &self.failure {
            return Err(FieldscopeError::Analyzer(message.clone()));
        }

        let report = self
            .by_value
            .get(&rendered)
            .or_else(|| self.by_key.get(key))
            .unwrap_or(&self.fallback);
        Ok(report.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_order() {
        let analyzer = ScriptedAnalyzer::new()
            .respond_to_key("type", AnalysisReport::new(0.5, "by key"))
            .respond_to_value(&"scroll".into(), AnalysisReport::new(0.6, "by value"));

        let by_value = analyzer.analyze("type", &"scroll".into()).await.unwrap();
        assert_eq!(by_value.reasoning, "by value");

        let by_key = analyzer.analyze("type", &"click".into()).await.unwrap();
        assert_eq!(by_key.reasoning, "by key");

        let fallback = analyzer.analyze("other", &"x".into()).await.unwrap();
        assert_eq!(fallback.confidence, 0.9);
        assert_eq!(analyzer.calls(), 3);
    }

    #[tokio::test]
    async fn test_failing() {
        let analyzer = ScriptedAnalyzer::new().failing("model offline");
        let result = analyzer.analyze("type", &"click".into()).await;
        assert!(matches!(result, Err(FieldscopeError::Analyzer(m)) if m == "model offline"));
    }
}
