//! Rules command - list a rule table in resolution order.

use std::path::PathBuf;

use colored::Colorize;

use super::load_rules;

pub fn run(
    rules: Option<PathBuf>,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = rules
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    let table = load_rules(rules.as_ref())?;

    if json_output {
        println!("{}", table.to_json()?);
        return Ok(());
    }

    println!(
        "{} {} ({} rules)",
        "Rule table".cyan().bold(),
        source.white(),
        table.len()
    );
    println!();
    println!(
        "  {:>8}  {:<14} {:<18} {}",
        "priority".dimmed(),
        "type".dimmed(),
        "component".dimmed(),
        "pattern".dimmed()
    );

    for rule in table.iter() {
        let pattern = rule.pattern.to_string();
        let pattern = if rule.pattern.is_catch_all() {
            pattern.yellow()
        } else {
            pattern.normal()
        };
        println!(
            "  {:>8}  {:<14} {:<18} {}",
            rule.priority,
            rule.field_type.green(),
            rule.component,
            pattern
        );
    }

    Ok(())
}
