//! Inspector configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalyzerConfig, clamp_confidence};
use crate::error::{FieldscopeError, Result};

/// Configuration for an [`Inspector`](crate::Inspector) session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Confidence of the pending assessment every new version starts with.
    pub seed_confidence: f64,

    /// Author recorded on versions and annotations when none is given.
    pub default_author: String,

    /// How long to wait for the analyzer before giving up.
    pub analysis_timeout_ms: u64,

    /// Settings for the heuristic analyzer.
    pub analyzer: AnalyzerConfig,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            seed_confidence: 0.8,
            default_author: "current_user".to_string(),
            analysis_timeout_ms: 5_000,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl InspectorConfig {
    /// Create default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| FieldscopeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: InspectorConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the seed confidence.
    pub fn with_seed_confidence(mut self, confidence: f64) -> Self {
        self.seed_confidence = clamp_confidence(confidence);
        self
    }

    /// Set the default author.
    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    /// Set the analysis timeout.
    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the analyzer settings.
    pub fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_millis(self.analysis_timeout_ms)
    }

    /// Check values that deserialization alone cannot.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.seed_confidence) {
            return Err(FieldscopeError::Config(format!(
                "seed_confidence must be within [0, 1], got {}",
                self.seed_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.analyzer.base_confidence) {
            return Err(FieldscopeError::Config(format!(
                "analyzer.base_confidence must be within [0, 1], got {}",
                self.analyzer.base_confidence
            )));
        }
        if self.analysis_timeout_ms == 0 {
            return Err(FieldscopeError::Config(
                "analysis_timeout_ms must be positive".to_string(),
            ));
        }
        if self.default_author.trim().is_empty() {
            return Err(FieldscopeError::Config(
                "default_author must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
