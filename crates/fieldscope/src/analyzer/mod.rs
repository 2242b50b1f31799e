//! Automated analysis of field values.
//!
//! The quality engine depends only on the [`FieldAnalyzer`] trait. Two
//! implementations ship with the crate:
//!
//! - [`HeuristicAnalyzer`] - deterministic shape, URL and action checks
//! - [`ScriptedAnalyzer`] - canned answers, latency and failures for tests
//!
//! # Example
//!
//! ```
//! use fieldscope::analyzer::HeuristicAnalyzer;
//!
//! let analyzer = HeuristicAnalyzer::new();
//! let report = analyzer.evaluate("type", &"click".into());
//! assert!(report.quality_issues.is_empty());
//! ```

mod heuristic;
mod mock;
mod provider;

pub use heuristic::HeuristicAnalyzer;
pub use mock::ScriptedAnalyzer;
pub use provider::{AnalysisReport, AnalyzerConfig, FieldAnalyzer, clamp_confidence};
