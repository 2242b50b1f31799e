//! Main Inspector orchestrator.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;

use crate::analyzer::{FieldAnalyzer, HeuristicAnalyzer};
use crate::annotation::AnnotationData;
use crate::classify::{Classification, Classifier, FieldRef};
use crate::config::InspectorConfig;
use crate::context::NodeContext;
use crate::error::{FieldscopeError, Result};
use crate::quality::{
    AnalysisTask, AnalysisTicket, HumanDecision, QualityAssessment, QualityConfig, QualityEngine,
};
use crate::rules::RuleTable;
use crate::value::FieldValue;

/// An inspection session over one field at a time.
///
/// Selecting a field builds a fresh [`NodeContext`] and starts an automated
/// analysis in the background. Changing the viewed value restarts it, and
/// selecting another field cancels it. Call [`settle`](Self::settle) to wait
/// for the running analysis and apply its result.
///
/// Analysis runs on the ambient Tokio runtime; operations that start one fail
/// with [`FieldscopeError::NoRuntime`] outside of it.
pub struct Inspector {
    config: InspectorConfig,
    classifier: Classifier,
    engine: QualityEngine,
    custom_analyzer: bool,
    selection: Option<NodeContext>,
    in_flight: Option<AnalysisTask>,
}

impl Inspector {
    /// Create an inspector with the built-in rules and heuristic analyzer.
    pub fn new() -> Self {
        Self::with_config(InspectorConfig::default())
    }

    /// Create an inspector with custom configuration.
    pub fn with_config(config: InspectorConfig) -> Self {
        let classifier = Classifier::default();
        let engine = Self::heuristic_engine(&classifier, &config);

        Self {
            config,
            classifier,
            engine,
            custom_analyzer: false,
            selection: None,
            in_flight: None,
        }
    }

    /// Classify with an alternate rule table.
    ///
    /// The heuristic analyzer follows the new table unless a custom analyzer
    /// was installed.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.classifier = Classifier::new(Arc::new(rules));
        if !self.custom_analyzer {
            self.engine = Self::heuristic_engine(&self.classifier, &self.config);
        }
        self
    }

    /// Use a different analyzer for automated review.
    pub fn with_analyzer(mut self, analyzer: impl FieldAnalyzer + 'static) -> Self {
        self.engine = QualityEngine::with_config(Arc::new(analyzer), self.quality_config());
        self.custom_analyzer = true;
        self
    }

    fn heuristic_engine(classifier: &Classifier, config: &InspectorConfig) -> QualityEngine {
        let analyzer = HeuristicAnalyzer::with_config(classifier.clone(), config.analyzer.clone());
        QualityEngine::with_config(
            Arc::new(analyzer),
            QualityConfig {
                analysis_timeout: config.analysis_timeout(),
            },
        )
    }

    fn quality_config(&self) -> QualityConfig {
        QualityConfig {
            analysis_timeout: self.config.analysis_timeout(),
        }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn engine(&self) -> &QualityEngine {
        &self.engine
    }

    /// Classify every field of a record, in document order.
    pub fn classify_record(&self, record: &FieldValue) -> Vec<Classification> {
        crate::classify::walk_record(record)
            .iter()
            .map(|field| self.classifier.classify(field))
            .collect()
    }

    /// The field under inspection, if any.
    pub fn selection(&self) -> Option<&NodeContext> {
        self.selection.as_ref()
    }

    /// Ticket of the analysis still running, if any.
    pub fn pending_analysis(&self) -> Option<&AnalysisTicket> {
        self.in_flight.as_ref().map(AnalysisTask::ticket)
    }

    /// Inspect a field. Any analysis of the previous field is cancelled.
    pub fn select(&mut self, field: FieldRef) -> Result<&NodeContext> {
        self.cancel_analysis();

        let mapping = self.classifier.resolve(&field.key, &field.value).clone();
        let mut context = NodeContext::new(field, &mapping, &self.config);
        let task = self.engine.spawn_analysis(&mut context)?;

        self.selection = Some(context);
        self.in_flight = Some(task);
        self.current()
    }

    /// Commit a new value as the default author.
    pub fn commit_edit(&mut self, value: FieldValue) -> Result<&NodeContext> {
        let author = self.config.default_author.clone();
        self.commit_edit_by(value, &author)
    }

    /// Commit a new value and restart analysis for it.
    ///
    /// Nothing is recorded when there is no runtime to analyze on.
    pub fn commit_edit_by(&mut self, value: FieldValue, author: &str) -> Result<&NodeContext> {
        self.current()?;
        ensure_runtime()?;
        self.current_mut()?.commit_edit_by(value, author)?;
        self.restart_analysis()?;
        self.current()
    }

    /// View an older version and analyze its value.
    pub fn select_version(&mut self, id: &str) -> Result<&NodeContext> {
        self.current()?;
        ensure_runtime()?;
        self.current_mut()?.select_version(id)?;
        self.restart_analysis()?;
        self.current()
    }

    /// Record a human decision on the head version.
    ///
    /// A running analysis is left alone; if it finishes later for the same
    /// value its result replaces this one.
    pub fn review(
        &mut self,
        decision: HumanDecision,
        feedback: Option<&str>,
    ) -> Result<QualityAssessment> {
        let context = self
            .selection
            .as_mut()
            .ok_or(FieldscopeError::NoSelection)?;
        let assessment = self.engine.human_review(context, decision, feedback);
        context.apply_assessment(assessment.clone());
        Ok(assessment)
    }

    /// Attach an annotation to the selected field.
    pub fn annotate(&mut self, annotation: AnnotationData) -> Result<&NodeContext> {
        self.current_mut()?.add_annotation(annotation)?;
        self.current()
    }

    /// Wait for the running analysis and apply it.
    ///
    /// Returns `None` when nothing was running or the result was stale.
    pub async fn settle(&mut self) -> Result<Option<QualityAssessment>> {
        let Some(task) = self.in_flight.take() else {
            return Ok(None);
        };

        let outcome = task.join().await;
        match self.selection.as_mut() {
            Some(context) => self.engine.apply_outcome(context, outcome),
            None => Ok(None),
        }
    }

    /// Cancel the running analysis, if any.
    pub fn cancel_analysis(&mut self) {
        if let Some(task) = self.in_flight.take() {
            debug!(key = %task.ticket().key, ticket = task.ticket().id, "cancelling analysis");
            task.cancel();
        }
    }

    /// Drop the selection and cancel its analysis.
    pub fn clear(&mut self) -> Option<NodeContext> {
        self.cancel_analysis();
        self.selection.take()
    }

    fn restart_analysis(&mut self) -> Result<()> {
        self.cancel_analysis();
        let context = self
            .selection
            .as_mut()
            .ok_or(FieldscopeError::NoSelection)?;
        self.in_flight = Some(self.engine.spawn_analysis(context)?);
        Ok(())
    }

    fn current(&self) -> Result<&NodeContext> {
        self.selection.as_ref().ok_or(FieldscopeError::NoSelection)
    }

    fn current_mut(&mut self) -> Result<&mut NodeContext> {
        self.selection.as_mut().ok_or(FieldscopeError::NoSelection)
    }
}

fn ensure_runtime() -> Result<()> {
    Handle::try_current()
        .map(|_| ())
        .map_err(|_| FieldscopeError::NoRuntime)
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Inspector {
    fn drop(&mut self) {
        self.cancel_analysis();
    }
}
