//! Version ledger for inspected fields.
//!
//! Versions are append-only. The newest version sits at index 0 of a
//! context's history and carries the highest sequence number; new
//! assessments replace only the newest version's judgment.

mod diff;
mod version;

pub use diff::{ValueChange, ValueComparison, VersionDiff, describe_changes, diff, diff_values};
pub use version::{ChangeKind, NodeVersion, version_id};
