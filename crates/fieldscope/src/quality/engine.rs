//! Quality engine: automated and human review of a field's head version.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::analyzer::{AnalysisReport, FieldAnalyzer};
use crate::context::NodeContext;
use crate::error::{FieldscopeError, Result};
use crate::value::FieldValue;

use super::assessment::{HumanDecision, QualityAssessment, Reviewer};
use super::task::{AnalysisOutcome, AnalysisTask};

/// Configuration for the quality engine.
#[derive(Debug, Clone)]
pub struct QualityConfig {
    /// Maximum time to wait for the analyzer.
    pub analysis_timeout: Duration,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            analysis_timeout: Duration::from_secs(5),
        }
    }
}

/// Produces and applies quality assessments.
///
/// Automated and human assessments both target the head version of a
/// context. Whichever is applied last wins; a human review does not stop
/// an analysis that is already running.
#[derive(Clone)]
pub struct QualityEngine {
    analyzer: Arc<dyn FieldAnalyzer>,
    config: QualityConfig,
}

impl QualityEngine {
    /// Create an engine around an analyzer.
    pub fn new(analyzer: Arc<dyn FieldAnalyzer>) -> Self {
        Self::with_config(analyzer, QualityConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(analyzer: Arc<dyn FieldAnalyzer>, config: QualityConfig) -> Self {
        Self { analyzer, config }
    }

    pub fn analyzer(&self) -> &dyn FieldAnalyzer {
        self.analyzer.as_ref()
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Analyze the context's current value and apply the result in place.
    pub async fn analyze_context(
        &self,
        context: &mut NodeContext,
    ) -> Result<Option<QualityAssessment>> {
        let ticket = context.issue_ticket();
        debug!(key = %ticket.key, ticket = ticket.id, analyzer = self.analyzer.name(), "analyzing field");

        let result = run_analysis(
            self.analyzer.as_ref(),
            &ticket.key,
            &ticket.value,
            self.config.analysis_timeout,
        )
        .await;

        self.apply_outcome(context, AnalysisOutcome { ticket, result })
    }

    /// Start analyzing the context's current value on a Tokio task.
    ///
    /// Any earlier analysis of this context becomes stale. Fails with
    /// `NoRuntime` when called outside a Tokio runtime.
    pub fn spawn_analysis(&self, context: &mut NodeContext) -> Result<AnalysisTask> {
        let runtime = Handle::try_current().map_err(|_| FieldscopeError::NoRuntime)?;
        let ticket = context.issue_ticket();
        debug!(key = %ticket.key, ticket = ticket.id, analyzer = self.analyzer.name(), "spawning analysis");

        let analyzer = Arc::clone(&self.analyzer);
        let key = ticket.key.clone();
        let value = ticket.value.clone();
        let timeout = self.config.analysis_timeout;
        let handle = runtime.spawn(async move {
            run_analysis(analyzer.as_ref(), &key, &value, timeout).await
        });

        Ok(AnalysisTask::new(ticket, handle))
    }

    /// Apply a finished analysis if it still describes the context.
    ///
    /// Returns the applied assessment, or `None` when the outcome was stale
    /// and dropped. A failed analysis leaves the context unchanged.
    pub fn apply_outcome(
        &self,
        context: &mut NodeContext,
        outcome: AnalysisOutcome,
    ) -> Result<Option<QualityAssessment>> {
        if !context.is_current(&outcome.ticket) {
            debug!(
                key = %outcome.ticket.key,
                ticket = outcome.ticket.id,
                "dropping stale analysis"
            );
            return Ok(None);
        }

        let report = match outcome.result {
            Ok(report) => report,
            Err(e) => {
                warn!(key = %outcome.ticket.key, error = %e, "analysis failed");
                return Err(e);
            }
        };

        let assessment = QualityAssessment::from_report(&report);
        context.apply_assessment(assessment.clone());
        context.record_analysis(report);
        Ok(Some(assessment))
    }

    /// Build a human assessment of the context's current value.
    ///
    /// The reviewer is `Hybrid` when an automated analysis exists for the
    /// same key and value, and that analysis's suggestions are carried over.
    /// Blank feedback counts as none.
    pub fn human_review(
        &self,
        context: &NodeContext,
        decision: HumanDecision,
        feedback: Option<&str>,
    ) -> QualityAssessment {
        let analysis = context.current_analysis();
        let reviewer = if analysis.is_some() {
            Reviewer::Hybrid
        } else {
            Reviewer::Human
        };

        let mut assessment = QualityAssessment::new(decision.status(), 1.0, reviewer);
        if let Some(feedback) = feedback.map(str::trim).filter(|f| !f.is_empty()) {
            assessment = assessment.with_reason(feedback);
        }
        if let Some(record) = analysis {
            assessment = assessment.with_suggestions(record.report.suggestions.clone());
        }

        info!(
            key = %context.key(),
            status = assessment.status.label(),
            reviewer = assessment.reviewer.label(),
            "human review"
        );
        assessment
    }
}

async fn run_analysis(
    analyzer: &dyn FieldAnalyzer,
    key: &str,
    value: &FieldValue,
    timeout: Duration,
) -> Result<AnalysisReport> {
    match tokio::time::timeout(timeout, analyzer.analyze(key, value)).await {
        Ok(result) => result,
        Err(_) => Err(FieldscopeError::AnalyzerTimeout(timeout)),
    }
}
