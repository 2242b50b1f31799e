//! The aggregate for one inspected field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analyzer::{AnalysisReport, clamp_confidence};
use crate::annotation::AnnotationData;
use crate::classify::FieldRef;
use crate::config::InspectorConfig;
use crate::error::{FieldscopeError, Result};
use crate::ledger::{NodeVersion, VersionDiff, describe_changes, diff};
use crate::quality::{AnalysisTicket, QualityAssessment};
use crate::rules::{FieldMapping, FieldShape};
use crate::shape::check_shape;
use crate::value::FieldValue;

/// Change description of the seed version.
const INITIAL_CHANGE: &str = "initial snapshot";

/// The last automated analysis applied to a context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub key: String,
    pub value: FieldValue,
    pub report: AnalysisReport,
    pub analyzed_at: DateTime<Utc>,
}

/// One inspected field: its current value, version history and annotations.
///
/// The context changes only through [`commit_edit`](Self::commit_edit),
/// [`apply_assessment`](Self::apply_assessment),
/// [`add_annotation`](Self::add_annotation) and
/// [`select_version`](Self::select_version). History is append-only:
/// `versions()[0]` is always the newest version and no version is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ContextSnapshot", rename_all = "camelCase")]
pub struct NodeContext {
    key: String,
    value: FieldValue,
    path: Vec<String>,
    #[serde(rename = "type")]
    field_type: String,
    shape: FieldShape,
    versions: Vec<NodeVersion>,
    annotations: Vec<AnnotationData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_analysis: Option<AnalysisRecord>,
    editor: String,
    seed_confidence: f64,
    #[serde(skip)]
    issued_tickets: u64,
    #[serde(skip)]
    latest_ticket: Option<u64>,
}

impl NodeContext {
    /// Start inspecting a field, seeding version `v1`.
    pub fn new(field: FieldRef, mapping: &FieldMapping, config: &InspectorConfig) -> Self {
        let seed_confidence = clamp_confidence(config.seed_confidence);
        let seed = NodeVersion::new(
            1,
            field.value.clone(),
            config.default_author.clone(),
            vec![INITIAL_CHANGE.to_string()],
            QualityAssessment::seed(seed_confidence),
        );

        debug!(path = %field.dotted_path(), field_type = %mapping.field_type, "created node context");

        Self {
            key: field.key,
            value: field.value,
            path: field.path,
            field_type: mapping.field_type.clone(),
            shape: mapping.shape(),
            versions: vec![seed],
            annotations: Vec::new(),
            last_analysis: None,
            editor: config.default_author.clone(),
            seed_confidence,
            issued_tickets: 0,
            latest_ticket: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value being viewed, which is the head value unless an older
    /// version was selected.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Classification category tag.
    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    /// Versions, newest first.
    pub fn versions(&self) -> &[NodeVersion] {
        &self.versions
    }

    /// The newest version.
    pub fn head(&self) -> &NodeVersion {
        &self.versions[0]
    }

    /// Judgment on the newest version.
    pub fn current_assessment(&self) -> &QualityAssessment {
        &self.head().quality_assessment
    }

    /// Find a version by id.
    pub fn version(&self, id: &str) -> Option<&NodeVersion> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn annotations(&self) -> &[AnnotationData] {
        &self.annotations
    }

    /// The last automated analysis applied, if any.
    pub fn last_analysis(&self) -> Option<&AnalysisRecord> {
        self.last_analysis.as_ref()
    }

    /// The last automated analysis if it was made for the current key and value.
    pub fn current_analysis(&self) -> Option<&AnalysisRecord> {
        self.last_analysis
            .as_ref()
            .filter(|record| record.key == self.key && record.value == self.value)
    }

    /// Author used when none is given.
    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// Commit a new value as the default author.
    pub fn commit_edit(&mut self, new_value: FieldValue) -> Result<&mut Self> {
        let author = self.editor.clone();
        self.commit_edit_by(new_value, &author)
    }

    /// Commit a new value as a new head version.
    ///
    /// The value must fit the field's declared shape; otherwise the edit is
    /// rejected and the context is left untouched.
    pub fn commit_edit_by(&mut self, new_value: FieldValue, author: &str) -> Result<&mut Self> {
        let violations = check_shape(self.shape, &new_value);
        if !violations.is_empty() {
            warn!(key = %self.key, violations = ?violations, "rejected edit");
            return Err(FieldscopeError::InvalidEdit {
                key: self.key.clone(),
                reasons: violations,
            });
        }

        let changes = describe_changes(&self.key, &self.head().value, &new_value);
        let version = NodeVersion::new(
            self.versions.len() + 1,
            new_value.clone(),
            author,
            changes,
            QualityAssessment::seed(self.seed_confidence),
        );

        info!(key = %self.key, version = %version.id, author, "committed edit");
        self.versions.insert(0, version);
        self.value = new_value;
        Ok(self)
    }

    /// Replace the head version's assessment. Older versions keep theirs.
    pub fn apply_assessment(&mut self, mut assessment: QualityAssessment) -> &mut Self {
        assessment.confidence = clamp_confidence(assessment.confidence);
        debug!(
            key = %self.key,
            version = %self.versions[0].id,
            status = assessment.status.label(),
            reviewer = assessment.reviewer.label(),
            "applied assessment"
        );
        self.versions[0].quality_assessment = assessment;
        self
    }

    /// Append an annotation. An empty author becomes the default author.
    pub fn add_annotation(&mut self, mut annotation: AnnotationData) -> Result<&mut Self> {
        annotation.validate()?;
        if annotation.author.is_empty() {
            annotation.author = self.editor.clone();
        }
        self.annotations.push(annotation);
        Ok(self)
    }

    /// View an older version's value without changing history.
    pub fn select_version(&mut self, id: &str) -> Result<&mut Self> {
        let value = self
            .version(id)
            .map(|v| v.value.clone())
            .ok_or_else(|| FieldscopeError::UnknownVersion(id.to_string()))?;
        self.value = value;
        Ok(self)
    }

    /// Diff of the two newest versions.
    pub fn diff_head(&self) -> Option<VersionDiff> {
        let previous = self.versions.get(1)?;
        Some(diff(previous, self.head()))
    }

    /// Diff between two versions by id.
    pub fn diff_versions(&self, older: &str, newer: &str) -> Result<VersionDiff> {
        let find = |id: &str| {
            self.version(id)
                .ok_or_else(|| FieldscopeError::UnknownVersion(id.to_string()))
        };
        Ok(diff(find(older)?, find(newer)?))
    }

    /// Start a new analysis; any earlier ticket becomes stale.
    pub(crate) fn issue_ticket(&mut self) -> AnalysisTicket {
        self.issued_tickets += 1;
        self.latest_ticket = Some(self.issued_tickets);
        AnalysisTicket {
            id: self.issued_tickets,
            path: self.path.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }

    /// Whether a ticket still describes this context.
    pub fn is_current(&self, ticket: &AnalysisTicket) -> bool {
        self.latest_ticket == Some(ticket.id)
            && ticket.path == self.path
            && ticket.key == self.key
            && ticket.value == self.value
    }

    pub(crate) fn record_analysis(&mut self, report: AnalysisReport) {
        self.last_analysis = Some(AnalysisRecord {
            key: self.key.clone(),
            value: self.value.clone(),
            report,
            analyzed_at: Utc::now(),
        });
    }
}

/// Serialized form of a context, checked before it becomes a [`NodeContext`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextSnapshot {
    key: String,
    value: FieldValue,
    path: Vec<String>,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    shape: FieldShape,
    versions: Vec<NodeVersion>,
    #[serde(default)]
    annotations: Vec<AnnotationData>,
    #[serde(default)]
    last_analysis: Option<AnalysisRecord>,
    editor: String,
    seed_confidence: f64,
}

impl TryFrom<ContextSnapshot> for NodeContext {
    type Error = FieldscopeError;

    fn try_from(snapshot: ContextSnapshot) -> Result<Self> {
        if snapshot.versions.is_empty() {
            return Err(FieldscopeError::Config(
                "node context has no versions".to_string(),
            ));
        }

        let count = snapshot.versions.len();
        let contiguous = snapshot
            .versions
            .iter()
            .enumerate()
            .all(|(index, version)| version.sequence() == Some(count - index));
        if !contiguous {
            return Err(FieldscopeError::Config(format!(
                "node context versions must run v{}..v1, newest first",
                count
            )));
        }

        Ok(Self {
            key: snapshot.key,
            value: snapshot.value,
            path: snapshot.path,
            field_type: snapshot.field_type,
            shape: snapshot.shape,
            versions: snapshot.versions,
            annotations: snapshot.annotations,
            last_analysis: snapshot.last_analysis,
            editor: snapshot.editor,
            seed_confidence: clamp_confidence(snapshot.seed_confidence),
            issued_tickets: 0,
            latest_ticket: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::quality::{QualityStatus, Reviewer};
    use serde_json::json;

    fn context(key: &str, value: serde_json::Value) -> NodeContext {
        let field = FieldRef::top_level(key, value);
        let classifier = Classifier::default();
        let mapping = classifier.resolve(&field.key, &field.value).clone();
        NodeContext::new(field, &mapping, &InspectorConfig::default())
    }

    #[test]
    fn test_seed_version() {
        let ctx = context("type", json!("click"));

        assert_eq!(ctx.versions().len(), 1);
        assert_eq!(ctx.head().id, "v1");
        assert_eq!(ctx.head().author, "current_user");
        assert_eq!(ctx.current_assessment().status, QualityStatus::Pending);
        assert_eq!(ctx.current_assessment().reviewer, Reviewer::Human);
        assert_eq!(ctx.current_assessment().confidence, 0.8);
        assert_eq!(ctx.field_type(), "action");
    }

    #[test]
    fn test_commit_prepends_version() {
        let mut ctx = context("type", json!("click"));
        ctx.commit_edit("scroll".into()).unwrap();

        assert_eq!(ctx.versions().len(), 2);
        assert_eq!(ctx.head().id, "v2");
        assert_eq!(ctx.value(), &FieldValue::from("scroll"));
        assert_eq!(ctx.head().changes, vec!["modified type: \"click\" -> \"scroll\"".to_string()]);
        assert_eq!(ctx.versions()[1].value, FieldValue::from("click"));
    }

    #[test]
    fn test_rejected_edit_leaves_context_unchanged() {
        let mut ctx = context("rect", json!({"top": 1, "left": 1, "width": 5, "height": 5}));
        let before = serde_json::to_string(&ctx).unwrap();

        let result = ctx.commit_edit(json!({"top": 1, "left": 1, "width": -5}).into());

        assert!(matches!(result, Err(FieldscopeError::InvalidEdit { .. })));
        assert_eq!(serde_json::to_string(&ctx).unwrap(), before);
    }

    #[test]
    fn test_apply_assessment_touches_head_only() {
        let mut ctx = context("type", json!("click"));
        ctx.commit_edit("input".into()).unwrap();
        ctx.apply_assessment(QualityAssessment::new(QualityStatus::Approved, 1.0, Reviewer::Human));

        assert_eq!(ctx.versions().len(), 2);
        assert_eq!(ctx.current_assessment().status, QualityStatus::Approved);
        assert_eq!(ctx.versions()[1].quality_assessment.status, QualityStatus::Pending);
    }

    #[test]
    fn test_select_version_is_a_view() {
        let mut ctx = context("type", json!("click"));
        ctx.commit_edit("input".into()).unwrap();
        ctx.select_version("v1").unwrap();

        assert_eq!(ctx.value(), &FieldValue::from("click"));
        assert_eq!(ctx.versions().len(), 2);
        assert_eq!(ctx.head().id, "v2");

        assert!(matches!(
            ctx.select_version("v9"),
            Err(FieldscopeError::UnknownVersion(_))
        ));
    }

    #[test]
    fn test_annotation_author_defaults_to_editor() {
        let mut ctx = context("imgSave", json!("https://cdn.example.com/a.png"));
        ctx.add_annotation(AnnotationData::bbox(1.0, 2.0, 3.0, 4.0, "submit button"))
            .unwrap();

        assert_eq!(ctx.annotations().len(), 1);
        assert_eq!(ctx.annotations()[0].author, "current_user");
        assert!(ctx.add_annotation(AnnotationData::text("")).is_err());
        assert_eq!(ctx.annotations().len(), 1);
    }

    #[test]
    fn test_tickets_supersede() {
        let mut ctx = context("type", json!("click"));
        let first = ctx.issue_ticket();
        let second = ctx.issue_ticket();

        assert!(!ctx.is_current(&first));
        assert!(ctx.is_current(&second));

        ctx.commit_edit("scroll".into()).unwrap();
        assert!(!ctx.is_current(&second));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut ctx = context("type", json!("click"));
        ctx.commit_edit("wait".into()).unwrap();

        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["versions"][0]["id"], "v2");
        assert_eq!(json["versions"][0]["qualityAssessment"]["status"], "pending");

        let restored: NodeContext = serde_json::from_value(json).unwrap();
        assert_eq!(restored.versions().len(), 2);
        assert_eq!(restored.value(), &FieldValue::from("wait"));
    }

    fn snapshot_with_versions(ids: &[&str]) -> serde_json::Value {
        let mut json = serde_json::to_value(context("type", json!("click"))).unwrap();
        let seed = json["versions"][0].clone();
        let versions: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| {
                let mut version = seed.clone();
                version["id"] = json!(id);
                version
            })
            .collect();
        json["versions"] = json!(versions);
        json
    }

    #[test]
    fn test_deserialize_rejects_gapped_history() {
        let gapped = snapshot_with_versions(&["v5", "v3"]);
        assert!(serde_json::from_value::<NodeContext>(gapped).is_err());

        let shifted = snapshot_with_versions(&["v3", "v2"]);
        assert!(serde_json::from_value::<NodeContext>(shifted).is_err());
    }

    #[test]
    fn test_restored_context_continues_ids() {
        let mut restored: NodeContext =
            serde_json::from_value(snapshot_with_versions(&["v2", "v1"])).unwrap();
        restored.commit_edit("scroll".into()).unwrap();

        let ids: Vec<&str> = restored.versions().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v3", "v2", "v1"]);
    }

    #[test]
    fn test_deserialize_rejects_empty_history() {
        let json = json!({
            "key": "type",
            "value": "click",
            "path": ["type"],
            "type": "action",
            "versions": [],
            "editor": "current_user",
            "seedConfidence": 0.8
        });
        assert!(serde_json::from_value::<NodeContext>(json).is_err());
    }
}
