//! Inspect command - analyze, edit and review a single field.

use colored::{ColoredString, Colorize};
use fieldscope::classify::find_field;
use fieldscope::{
    FieldValue, HumanDecision, Inspector, InspectorConfig, NodeContext, QualityAssessment,
    QualityStatus,
};
use tracing::warn;

use super::{load_record, load_rules};
use crate::cli::InspectArgs;

pub async fn run(args: InspectArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let decision = match (args.approve, args.reject) {
        (true, _) => Some(HumanDecision::Approve),
        (_, true) => Some(HumanDecision::Reject),
        _ => None,
    };
    if decision.is_none() && args.reason.is_some() {
        return Err("--reason needs --approve or --reject".into());
    }

    let mut config = match &args.config {
        Some(path) => InspectorConfig::from_path(path)?,
        None => InspectorConfig::default(),
    };
    if let Some(author) = &args.author {
        config = config.with_default_author(author.clone());
    }

    let rules = load_rules(args.rules.as_ref())?;
    let record = load_record(&args.file)?;
    let field = find_field(&record, &args.segments())
        .ok_or_else(|| format!("No field at path '{}' in {}", args.path, args.file.display()))?;

    let mut inspector = Inspector::with_config(config).with_rules(rules);
    inspector.select(field)?;
    settle(&mut inspector).await;

    for edit in &args.edit {
        let value: FieldValue = serde_json::from_str(edit)
            .map_err(|e| format!("Edit is not valid JSON ({}): {}", e, edit))?;
        inspector.commit_edit(value)?;
        settle(&mut inspector).await;
    }

    if let Some(decision) = decision {
        inspector.review(decision, args.reason.as_deref())?;
    }

    let context = inspector
        .selection()
        .ok_or("Field selection was lost")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(context)?);
    } else {
        print_context(context, verbose);
    }

    Ok(())
}

/// Apply the running analysis. Analyzer failures leave the assessment as is.
async fn settle(inspector: &mut Inspector) {
    if let Err(e) = inspector.settle().await {
        warn!(error = %e, "analysis did not complete");
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }
}

fn print_context(context: &NodeContext, verbose: bool) {
    println!(
        "{} {} ({})",
        "Field".cyan().bold(),
        context.path().join(".").white().bold(),
        context.field_type().green()
    );
    println!("  Shape: {}", context.shape().label());
    println!("  Value: {}", context.value().render_compact());
    println!();

    println!("{}", "Quality:".yellow().bold());
    print_assessment(context.current_assessment());
    println!();

    println!("{}", "History:".yellow().bold());
    for version in context.versions() {
        println!(
            "  {} {} by {} [{}]",
            version.id.white().bold(),
            version.timestamp.format("%Y-%m-%d %H:%M:%S"),
            version.author,
            status_label(&version.quality_assessment)
        );
        for change in &version.changes {
            println!("      {}", change.dimmed());
        }
        if verbose {
            println!("      value: {}", version.value.render_compact());
        }
    }

    if let Some(diff) = context.diff_head() {
        println!();
        println!("{} {}", "Latest change:".yellow().bold(), diff.summary());
    }

    if !context.annotations().is_empty() {
        println!();
        println!("{}", "Annotations:".yellow().bold());
        for annotation in context.annotations() {
            println!(
                "  [{:?}] {} ({})",
                annotation.kind, annotation.content, annotation.author
            );
        }
    }
}

fn print_assessment(assessment: &QualityAssessment) {
    println!(
        "  {} by {} (confidence {:.2})",
        status_label(assessment),
        assessment.reviewer.label(),
        assessment.confidence
    );
    if let Some(reason) = &assessment.reason {
        println!("  Reason: {}", reason);
    }
    for suggestion in assessment.suggestions.iter().flatten() {
        println!("  {} {}", "→".cyan(), suggestion);
    }
}

fn status_label(assessment: &QualityAssessment) -> ColoredString {
    let label = assessment.status.label();
    match assessment.status {
        QualityStatus::Approved => label.green(),
        QualityStatus::Rejected => label.red(),
        QualityStatus::NeedsReview => label.yellow(),
        QualityStatus::Pending => label.normal(),
    }
}
