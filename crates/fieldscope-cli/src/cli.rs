//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fieldscope: classify recorded UI fields and review their quality
#[derive(Parser)]
#[command(name = "fieldscope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify every field of a recorded JSON document
    Classify {
        /// Path to the recording (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Rule table to use instead of the built-in one (JSON)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Include fields that fall through to the default category
        #[arg(long)]
        all: bool,
    },

    /// Inspect one field: analyze, edit, review and show its history
    Inspect(InspectArgs),

    /// List the rules of a rule table in resolution order
    Rules {
        /// Rule table to list instead of the built-in one (JSON)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct InspectArgs {
    /// Path to the recording (JSON)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Dotted path of the field (e.g. "steps.0.rect")
    #[arg(short, long)]
    pub path: String,

    /// Rule table to use instead of the built-in one (JSON)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Inspector configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Commit a new value (JSON); may be repeated
    #[arg(short, long, value_name = "JSON")]
    pub edit: Vec<String>,

    /// Author recorded on edits and reviews
    #[arg(long)]
    pub author: Option<String>,

    /// Approve the head version (cannot use with --reject)
    #[arg(long, conflicts_with = "reject")]
    pub approve: bool,

    /// Reject the head version (cannot use with --approve)
    #[arg(long, conflicts_with = "approve")]
    pub reject: bool,

    /// Feedback recorded with the review
    #[arg(long)]
    pub reason: Option<String>,

    /// Output the inspected context as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    /// Field path split into segments.
    pub fn segments(&self) -> Vec<String> {
        self.path.split('.').map(str::to_string).collect()
    }
}
