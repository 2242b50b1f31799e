//! CLI command implementations.

pub mod classify;
pub mod inspect;
pub mod rules;

use std::fs;
use std::path::{Path, PathBuf};

use fieldscope::{FieldValue, RuleTable};

/// Read a JSON recording.
pub fn load_record(path: &Path) -> Result<FieldValue, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&json)?)
}

/// The rule table at `path`, or the built-in one.
pub fn load_rules(path: Option<&PathBuf>) -> fieldscope::Result<RuleTable> {
    match path {
        Some(path) => RuleTable::from_path(path),
        None => Ok(RuleTable::builtin()),
    }
}
