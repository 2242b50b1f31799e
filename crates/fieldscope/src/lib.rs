//! Fieldscope: field classification and dual-reviewer quality review for
//! recorded UI interaction data.
//!
//! Each field of a recording is classified against a prioritized rule table,
//! then inspected through a [`NodeContext`] that keeps an append-only version
//! history, a list of annotations and a quality judgment on the newest value.
//! Judgments come from an automated [`FieldAnalyzer`](analyzer::FieldAnalyzer)
//! and from human reviewers; whichever is applied last wins.
//!
//! # Core Principles
//!
//! - **Append-only history**: edits add versions, nothing is rewritten
//! - **Shape-checked edits**: values must fit the field's declared shape
//! - **Supersession**: analysis results for an outdated value are dropped
//!
//! # Example
//!
//! ```no_run
//! use fieldscope::{FieldRef, HumanDecision, Inspector};
//! use serde_json::json;
//!
//! # async fn run() -> fieldscope::Result<()> {
//! let mut inspector = Inspector::new();
//! inspector.select(FieldRef::top_level("type", json!("click")))?;
//! inspector.settle().await?;
//!
//! inspector.commit_edit("scroll".into())?;
//! inspector.review(HumanDecision::Approve, Some("looks right"))?;
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod annotation;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod ledger;
pub mod quality;
pub mod rules;
pub mod shape;
pub mod value;

mod inspector;

pub use annotation::{AnnotationData, AnnotationKind, Coordinates};
pub use classify::{Classification, Classifier, FieldRef};
pub use config::InspectorConfig;
pub use context::NodeContext;
pub use error::{FieldscopeError, Result};
pub use inspector::Inspector;
pub use ledger::{NodeVersion, VersionDiff};
pub use quality::{HumanDecision, QualityAssessment, QualityStatus, Reviewer};
pub use rules::{FieldMapping, FieldShape, RuleTable};
pub use value::FieldValue;
