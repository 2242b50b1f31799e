//! Field classification and record traversal.

mod classifier;
mod walker;

pub use classifier::{Classification, Classifier};
pub use walker::{FieldRef, find_field, walk_record};
