//! Rule table for field classification.
//!
//! A rule table is explicit configuration: it is built once (the builtin
//! table, or one loaded from JSON) and handed to a
//! [`Classifier`](crate::Classifier). Nothing reads a hidden global table.
//!
//! ```
//! use fieldscope::rules::RuleTable;
//!
//! let rules = RuleTable::from_json(r#"[
//!     {"type": "rect", "pattern": {"literal": "rect"}, "component": "RectViewer", "priority": 8},
//!     {"type": "default", "pattern": "any", "component": "DefaultViewer", "priority": 1}
//! ]"#).unwrap();
//!
//! assert_eq!(rules.default_rule().component, "DefaultViewer");
//! ```

mod mapping;
mod table;

pub use mapping::{FieldMapping, FieldShape, Pattern};
pub use table::RuleTable;
