//! Quality review of inspected fields.
//!
//! Two reviewers judge a field's head version:
//!
//! - **Automated**: a [`FieldAnalyzer`](crate::analyzer::FieldAnalyzer) runs
//!   as a cancellable task. Its result is applied only if the context still
//!   holds the key and value it was started for.
//! - **Human**: an approve or reject decision with optional feedback, marked
//!   `hybrid` when automated output exists for the same value.
//!
//! Both write the same slot, so the last applied judgment wins.

mod assessment;
mod engine;
mod task;

pub use assessment::{HumanDecision, QualityAssessment, QualityStatus, Reviewer};
pub use engine::{QualityConfig, QualityEngine};
pub use task::{AnalysisOutcome, AnalysisTask, AnalysisTicket};
