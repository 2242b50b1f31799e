//! Classify command - resolve every field of a recording to a rule.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use fieldscope::classify::walk_record;
use fieldscope::{Classification, Classifier};

use super::{load_record, load_rules};

pub fn run(
    file: PathBuf,
    rules: Option<PathBuf>,
    json_output: bool,
    include_default: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rules = load_rules(rules.as_ref())?;
    let default_type = rules.default_rule().field_type.clone();
    let classifier = Classifier::new(Arc::new(rules));
    let record = load_record(&file)?;

    let fields = walk_record(&record);
    let classifications: Vec<Classification> = fields
        .iter()
        .map(|field| classifier.classify(field))
        .filter(|c| include_default || c.field_type != default_type)
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&classifications)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Classified fields in".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    if classifications.is_empty() {
        println!("  {}", "No recognized fields.".dimmed());
    }

    for c in &classifications {
        let field_type = if c.field_type == default_type {
            c.field_type.dimmed()
        } else {
            c.field_type.green()
        };
        println!(
            "  {:<40} {:<14} {}",
            c.path.join(".").white(),
            field_type,
            c.component.dimmed()
        );
        if verbose {
            println!(
                "  {:<40} priority {}, shape {}",
                "",
                c.priority,
                c.shape.label()
            );
        }
    }

    println!();
    println!(
        "{} of {} fields classified",
        classifications.len().to_string().white().bold(),
        fields.len()
    );

    Ok(())
}
