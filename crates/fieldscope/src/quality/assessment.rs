//! Quality judgments about a field value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalysisReport, clamp_confidence};

/// Outcome of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStatus {
    /// Not yet reviewed.
    Pending,
    /// Value accepted.
    Approved,
    /// Value sent back.
    Rejected,
    /// Automated review found issues a human should look at.
    NeedsReview,
}

impl QualityStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            QualityStatus::Pending => "Pending",
            QualityStatus::Approved => "Approved",
            QualityStatus::Rejected => "Rejected",
            QualityStatus::NeedsReview => "Needs Review",
        }
    }

    /// Check if this is a final human-style verdict.
    pub fn is_decided(&self) -> bool {
        matches!(self, QualityStatus::Approved | QualityStatus::Rejected)
    }
}

/// Who made a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reviewer {
    Human,
    Ai,
    /// A human decision made after automated output for the same value.
    Hybrid,
}

impl Reviewer {
    pub fn label(&self) -> &'static str {
        match self {
            Reviewer::Human => "human",
            Reviewer::Ai => "ai",
            Reviewer::Hybrid => "hybrid",
        }
    }
}

/// A human verdict on the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanDecision {
    Approve,
    Reject,
}

impl HumanDecision {
    pub fn status(&self) -> QualityStatus {
        match self {
            HumanDecision::Approve => QualityStatus::Approved,
            HumanDecision::Reject => QualityStatus::Rejected,
        }
    }
}

/// A single judgment about a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    /// Outcome of the review.
    pub status: QualityStatus,

    /// Confidence in the outcome (0.0-1.0).
    pub confidence: f64,

    /// Source of the judgment.
    pub reviewer: Reviewer,

    /// When the judgment was made.
    pub timestamp: DateTime<Utc>,

    /// Rationale: joined issues for automated reviews, feedback for humans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Suggested follow-ups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl QualityAssessment {
    /// Create an assessment stamped now.
    pub fn new(status: QualityStatus, confidence: f64, reviewer: Reviewer) -> Self {
        Self {
            status,
            confidence: clamp_confidence(confidence),
            reviewer,
            timestamp: Utc::now(),
            reason: None,
            suggestions: None,
        }
    }

    /// The assessment every new version starts with.
    pub fn seed(confidence: f64) -> Self {
        Self::new(QualityStatus::Pending, confidence, Reviewer::Human)
    }

    /// Derive an automated assessment from an analyzer report.
    ///
    /// Any issue means `needs_review`; the reason is the issues joined with
    /// `"; "` and suggestions pass through unchanged.
    pub fn from_report(report: &AnalysisReport) -> Self {
        let status = if report.has_issues() {
            QualityStatus::NeedsReview
        } else {
            QualityStatus::Approved
        };

        let mut assessment = Self::new(status, report.confidence, Reviewer::Ai);
        if report.has_issues() {
            assessment.reason = Some(report.quality_issues.join("; "));
        }
        assessment.suggestions = Some(report.suggestions.clone());
        assessment
    }

    /// Set the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the suggestions.
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }
}
