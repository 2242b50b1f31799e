//! Integration tests for automated and human review.

use std::sync::Arc;
use std::time::Duration;

use fieldscope::analyzer::{AnalysisReport, HeuristicAnalyzer, ScriptedAnalyzer};
use fieldscope::quality::{AnalysisOutcome, QualityConfig, QualityEngine};
use fieldscope::{
    Classifier, FieldRef, FieldscopeError, HumanDecision, Inspector, InspectorConfig, NodeContext,
    QualityStatus, Reviewer,
};
use serde_json::json;

/// Create a context for a top-level field using the built-in rules.
fn create_context(key: &str, value: serde_json::Value) -> NodeContext {
    let field = FieldRef::top_level(key, value);
    let mapping = Classifier::default()
        .resolve(&field.key, &field.value)
        .clone();
    NodeContext::new(field, &mapping, &InspectorConfig::default())
}

fn heuristic_engine() -> QualityEngine {
    QualityEngine::new(Arc::new(HeuristicAnalyzer::new()))
}

// =============================================================================
// Automated Path Tests
// =============================================================================

#[tokio::test]
async fn test_negative_rect_needs_review() {
    let engine = heuristic_engine();
    let mut ctx = create_context("rect", json!({"top": 0, "left": 0, "width": -5, "height": 10}));

    let assessment = engine.analyze_context(&mut ctx).await.unwrap().unwrap();

    assert_eq!(assessment.status, QualityStatus::NeedsReview);
    assert_eq!(assessment.reviewer, Reviewer::Ai);
    assert!(assessment.confidence < 0.8);
    assert!(assessment.reason.as_deref().unwrap().contains("width"));
    assert_eq!(ctx.current_assessment(), &assessment);
}

#[tokio::test]
async fn test_known_action_is_approved() {
    let engine = heuristic_engine();
    let mut ctx = create_context("type", json!("click"));
    assert_eq!(ctx.field_type(), "action");

    let assessment = engine.analyze_context(&mut ctx).await.unwrap().unwrap();

    assert_eq!(assessment.status, QualityStatus::Approved);
    assert_eq!(assessment.reviewer, Reviewer::Ai);
    assert_eq!(assessment.confidence, 0.8);
    assert!(assessment.reason.is_none());
}

#[tokio::test]
async fn test_unknown_action_is_data_not_error() {
    let engine = heuristic_engine();
    let mut ctx = create_context("type", json!("teleport"));

    let assessment = engine.analyze_context(&mut ctx).await.unwrap().unwrap();

    assert_eq!(assessment.status, QualityStatus::NeedsReview);
    assert_eq!(assessment.reason.as_deref(), Some("unknown action type: teleport"));
    assert!(assessment.confidence <= 0.2);
}

#[tokio::test]
async fn test_non_http_image_path() {
    let engine = heuristic_engine();
    let mut ctx = create_context("imgSave", json!("file:///tmp/capture"));

    let assessment = engine.analyze_context(&mut ctx).await.unwrap().unwrap();

    assert_eq!(assessment.status, QualityStatus::NeedsReview);
    assert_eq!(
        assessment.suggestions,
        Some(vec!["Verify that the image URL is reachable".to_string()])
    );
}

#[tokio::test]
async fn test_confidence_taken_verbatim() {
    let analyzer = ScriptedAnalyzer::new().respond_to_key("title", AnalysisReport::new(0.37, "ok"));
    let engine = QualityEngine::new(Arc::new(analyzer));
    let mut ctx = create_context("title", json!("Checkout"));

    let assessment = engine.analyze_context(&mut ctx).await.unwrap().unwrap();
    assert_eq!(assessment.confidence, 0.37);
}

// =============================================================================
// Failure and Timeout Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_timeout_leaves_assessment_unchanged() {
    let analyzer = ScriptedAnalyzer::new().with_latency(Duration::from_secs(30));
    let engine = QualityEngine::with_config(
        Arc::new(analyzer),
        QualityConfig {
            analysis_timeout: Duration::from_secs(1),
        },
    );
    let mut ctx = create_context("type", json!("click"));
    let before = ctx.current_assessment().clone();

    let result = engine.analyze_context(&mut ctx).await;

    assert!(matches!(result, Err(FieldscopeError::AnalyzerTimeout(_))));
    assert_eq!(ctx.current_assessment(), &before);
    assert_eq!(ctx.versions().len(), 1);
}

#[tokio::test]
async fn test_failure_can_be_retried() {
    let engine = QualityEngine::new(Arc::new(ScriptedAnalyzer::new().failing("model offline")));
    let mut ctx = create_context("type", json!("click"));

    assert!(engine.analyze_context(&mut ctx).await.is_err());
    assert_eq!(ctx.current_assessment().status, QualityStatus::Pending);

    let retry = heuristic_engine();
    let assessment = retry.analyze_context(&mut ctx).await.unwrap().unwrap();
    assert_eq!(assessment.status, QualityStatus::Approved);
}

// =============================================================================
// Supersession and Cancellation Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_stale_result_is_dropped() {
    let analyzer = ScriptedAnalyzer::new()
        .with_latency_for(&"click".into(), Duration::from_millis(500))
        .respond_to_value(&"click".into(), AnalysisReport::new(0.1, "slow").with_issue("stale"))
        .respond_to_value(&"scroll".into(), AnalysisReport::new(0.95, "fast"));
    let engine = QualityEngine::new(Arc::new(analyzer));
    let mut ctx = create_context("type", json!("click"));

    let slow = engine.spawn_analysis(&mut ctx).unwrap();
    ctx.commit_edit("scroll".into()).unwrap();
    let fast = engine.spawn_analysis(&mut ctx).unwrap();

    // The fast result lands first, then the slow one arrives.
    let applied = engine.apply_outcome(&mut ctx, fast.join().await).unwrap();
    let dropped = engine.apply_outcome(&mut ctx, slow.join().await).unwrap();

    assert_eq!(applied.unwrap().confidence, 0.95);
    assert!(dropped.is_none());
    assert_eq!(ctx.current_assessment().status, QualityStatus::Approved);
    assert_eq!(ctx.current_assessment().confidence, 0.95);
}

#[tokio::test]
async fn test_newer_ticket_supersedes_same_value() {
    let engine = QualityEngine::new(Arc::new(ScriptedAnalyzer::new()));
    let mut ctx = create_context("type", json!("click"));

    let first = engine.spawn_analysis(&mut ctx).unwrap();
    let second = engine.spawn_analysis(&mut ctx).unwrap();

    assert!(engine.apply_outcome(&mut ctx, first.join().await).unwrap().is_none());
    assert!(engine.apply_outcome(&mut ctx, second.join().await).unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_analysis_applies_nothing() {
    let analyzer = ScriptedAnalyzer::new().with_latency(Duration::from_secs(2));
    let engine = QualityEngine::new(Arc::new(analyzer));
    let mut ctx = create_context("type", json!("click"));

    let task = engine.spawn_analysis(&mut ctx).unwrap();
    task.cancel();
    let outcome: AnalysisOutcome = task.join().await;

    assert!(matches!(outcome.result, Err(FieldscopeError::AnalysisCancelled)));
    assert!(matches!(
        engine.apply_outcome(&mut ctx, outcome),
        Err(FieldscopeError::AnalysisCancelled)
    ));
    assert_eq!(ctx.current_assessment().status, QualityStatus::Pending);
    assert!(ctx.last_analysis().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_switching_fields_cancels_previous_analysis() {
    let analyzer = ScriptedAnalyzer::new().with_latency(Duration::from_millis(300));
    let mut inspector = Inspector::new().with_analyzer(analyzer);

    inspector
        .select(FieldRef::top_level("type", json!("click")))
        .unwrap();
    inspector
        .select(FieldRef::top_level("title", json!("Checkout")))
        .unwrap();

    let applied = inspector.settle().await.unwrap().unwrap();
    let ctx = inspector.selection().unwrap();
    assert_eq!(ctx.key(), "title");
    assert_eq!(ctx.current_assessment(), &applied);
}

// =============================================================================
// Human Path Tests
// =============================================================================

#[tokio::test]
async fn test_human_rejects_with_reason() {
    let mut inspector = Inspector::new();
    inspector
        .select(FieldRef::top_level("imgSave", json!("http://cdn.example.com/a")))
        .unwrap();
    inspector.cancel_analysis();

    let review = inspector
        .review(HumanDecision::Reject, Some("wrong URL"))
        .unwrap();

    assert_eq!(review.status, QualityStatus::Rejected);
    assert_eq!(review.reviewer, Reviewer::Human);
    assert_eq!(review.confidence, 1.0);
    assert_eq!(review.reason.as_deref(), Some("wrong URL"));
    assert_eq!(
        inspector.selection().unwrap().current_assessment(),
        &review
    );
}

#[tokio::test]
async fn test_human_after_ai_is_hybrid() {
    let mut inspector = Inspector::new();
    inspector
        .select(FieldRef::top_level("imgSave", json!("http://cdn.example.com/a")))
        .unwrap();
    inspector.settle().await.unwrap();

    let review = inspector
        .review(HumanDecision::Reject, Some("wrong URL"))
        .unwrap();

    assert_eq!(review.reviewer, Reviewer::Hybrid);
    assert_eq!(review.reason.as_deref(), Some("wrong URL"));
    assert_eq!(
        review.suggestions,
        Some(vec!["Verify that the image URL is reachable".to_string()])
    );
}

#[tokio::test(start_paused = true)]
async fn test_last_write_wins() {
    let analyzer = ScriptedAnalyzer::new().with_latency(Duration::from_millis(100));
    let mut inspector = Inspector::new().with_analyzer(analyzer);
    inspector
        .select(FieldRef::top_level("type", json!("click")))
        .unwrap();

    // Human decides before the analysis lands; the later AI result replaces it.
    inspector.review(HumanDecision::Reject, None).unwrap();
    inspector.settle().await.unwrap();

    let ctx = inspector.selection().unwrap();
    assert_eq!(ctx.current_assessment().reviewer, Reviewer::Ai);
    assert_eq!(ctx.versions().len(), 1);

    // And a human decision after it replaces the AI result.
    inspector.review(HumanDecision::Approve, None).unwrap();
    let ctx = inspector.selection().unwrap();
    assert_eq!(ctx.current_assessment().status, QualityStatus::Approved);
    assert_eq!(ctx.current_assessment().reviewer, Reviewer::Hybrid);
}

#[tokio::test]
async fn test_assessment_only_touches_head() {
    let mut inspector = Inspector::new();
    inspector
        .select(FieldRef::top_level("type", json!("click")))
        .unwrap();
    inspector.settle().await.unwrap();
    inspector.commit_edit("scroll".into()).unwrap();
    inspector.settle().await.unwrap();

    inspector.review(HumanDecision::Reject, Some("should be hover")).unwrap();

    let ctx = inspector.selection().unwrap();
    assert_eq!(ctx.versions()[0].quality_assessment.status, QualityStatus::Rejected);
    assert_eq!(ctx.versions()[1].quality_assessment.status, QualityStatus::Approved);
    assert_eq!(ctx.versions()[1].quality_assessment.reviewer, Reviewer::Ai);
}
