//! Boundary validation for plans, extractions and tasks.
//!
//! Every check returns a [`ValidationReport`]; nothing here panics or
//! returns an error. Structural checks run first against the static
//! schemas in [`schemas`]. Only a structurally valid payload gets the
//! semantic checks, which need the typed value:
//!
//! | keyword           | payload    | meaning                                      |
//! |-------------------|------------|----------------------------------------------|
//! | `blockOrder`      | day plan   | blocks ordered, non-overlapping, end > start |
//! | `blockDuration`   | day plan   | `duration_minutes` matches the block's span  |
//! | `blockTask`       | day plan   | block task ids agree with focus/mini ids     |
//! | `uniqueTask`      | day plan   | focus and minis are distinct                 |
//! | `durationOrder`   | task, item | min duration does not exceed max             |
//! | `itemRef`         | extraction | question points at an existing item          |
//! | `statusInvariant` | task       | done has `completed_at`, open has no plan    |

pub mod schema;
pub mod schemas;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::extraction::Extraction;
use crate::scheduler::{BlockType, DayPlan};
use crate::task::Task;

pub use schema::{Format, Property, Schema};

/// One violation, located by JSON pointer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON pointer into the payload, `""` for the root
    pub path: String,
    pub message: String,
    /// Schema keyword or semantic check that failed
    pub keyword: String,
}

impl ValidationIssue {
    pub fn new(path: &str, message: impl Into<String>, keyword: &str) -> Self {
        ValidationIssue {
            path: path.to_string(),
            message: message.into(),
            keyword: keyword.to_string(),
        }
    }
}

/// Outcome of validating one payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Issues reported for a given keyword.
    pub fn with_keyword<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.errors.iter().filter(move |e| e.keyword == keyword)
    }
}

/// Payloads the validator knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    DayPlan,
    Extraction,
    Task,
}

impl PayloadKind {
    pub fn validate(self, value: &Value) -> ValidationReport {
        match self {
            PayloadKind::DayPlan => validate_day_plan(value),
            PayloadKind::Extraction => validate_extraction(value),
            PayloadKind::Task => validate_task(value),
        }
    }
}

pub fn validate_day_plan(value: &Value) -> ValidationReport {
    run("day_plan", &schemas::DAY_PLAN, value, |v, issues| {
        if let Ok(plan) = serde_json::from_value::<DayPlan>(v.clone()) {
            check_plan(&plan, issues);
        }
    })
}

pub fn validate_extraction(value: &Value) -> ValidationReport {
    run("extraction", &schemas::EXTRACTION, value, |v, issues| {
        if let Ok(extraction) = serde_json::from_value::<Extraction>(v.clone()) {
            check_extraction(&extraction, issues);
        }
    })
}

pub fn validate_task(value: &Value) -> ValidationReport {
    run("task", &schemas::TASK, value, |v, issues| {
        if let Ok(task) = serde_json::from_value::<Task>(v.clone()) {
            check_task(&task, issues);
        }
    })
}

/// Serialize a typed value and validate its wire form.
///
/// ```ignore
/// let report = validate_serialized(&plan, PayloadKind::DayPlan);
/// ```
pub fn validate_serialized<T: Serialize>(value: &T, kind: PayloadKind) -> ValidationReport {
    match serde_json::to_value(value) {
        Ok(json) => kind.validate(&json),
        Err(e) => ValidationReport::from_issues(vec![ValidationIssue::new(
            "",
            format!("could not serialize payload: {e}"),
            "serialize",
        )]),
    }
}

fn run(
    name: &str,
    schema: &Schema,
    value: &Value,
    semantic: impl FnOnce(&Value, &mut Vec<ValidationIssue>),
) -> ValidationReport {
    let mut issues = Vec::new();
    schema.check(value, "", &mut issues);
    if issues.is_empty() {
        semantic(value, &mut issues);
    }
    if !issues.is_empty() {
        tracing::debug!(payload = name, issues = issues.len(), "payload failed validation");
    }
    ValidationReport::from_issues(issues)
}

fn check_plan(plan: &DayPlan, issues: &mut Vec<ValidationIssue>) {
    let mut previous_end = None;
    for (i, block) in plan.suggested_blocks.iter().enumerate() {
        let at = |field: &str| format!("/suggested_blocks/{i}/{field}");

        if block.end_at <= block.start_at {
            issues.push(ValidationIssue::new(&at("end_at"), "must be after start_at", "blockOrder"));
        } else if (block.end_at - block.start_at).num_minutes() != i64::from(block.duration_minutes) {
            issues.push(ValidationIssue::new(
                &at("duration_minutes"),
                "must equal the minutes between start_at and end_at",
                "blockDuration",
            ));
        }
        if let Some(end) = previous_end {
            if block.start_at < end {
                issues.push(ValidationIssue::new(
                    &at("start_at"),
                    "must not start before the previous block ends",
                    "blockOrder",
                ));
            }
        }
        previous_end = Some(block.end_at);

        let task_id = block.task_id.as_deref();
        let message = match block.block_type {
            BlockType::Focus if task_id.is_none() || task_id != plan.focus_task_id.as_deref() => {
                Some("focus block must reference focus_task_id")
            }
            BlockType::Mini if !task_id.is_some_and(|id| plan.mini_task_ids.iter().any(|m| m == id)) => {
                Some("mini block must reference one of mini_task_ids")
            }
            BlockType::Buffer if task_id.is_some() => Some("buffer block must not reference a task"),
            _ => None,
        };
        if let Some(message) = message {
            issues.push(ValidationIssue::new(&at("task_id"), message, "blockTask"));
        }
    }

    let mut seen: HashSet<&str> = plan.focus_task_id.iter().map(String::as_str).collect();
    for (i, id) in plan.mini_task_ids.iter().enumerate() {
        if !seen.insert(id.as_str()) {
            issues.push(ValidationIssue::new(
                &format!("/mini_task_ids/{i}"),
                format!("task '{id}' is planned more than once"),
                "uniqueTask",
            ));
        }
    }
}

fn check_extraction(extraction: &Extraction, issues: &mut Vec<ValidationIssue>) {
    for (i, item) in extraction.items.iter().enumerate() {
        if let (Some(min), Some(max)) = (item.duration_min_minutes, item.duration_max_minutes) {
            if min > max {
                issues.push(ValidationIssue::new(
                    &format!("/items/{i}/duration_max_minutes"),
                    format!("must not be less than duration_min_minutes ({min})"),
                    "durationOrder",
                ));
            }
        }
    }
    for (i, question) in extraction.questions.iter().enumerate() {
        if question.item_index >= extraction.items.len() {
            issues.push(ValidationIssue::new(
                &format!("/questions/{i}/item_index"),
                format!("must refer to one of {} items", extraction.items.len()),
                "itemRef",
            ));
        }
    }
}

fn check_task(task: &Task, issues: &mut Vec<ValidationIssue>) {
    match task.check_invariants() {
        Ok(()) => {}
        Err(ValidationError::InvalidDuration { message, .. }) => {
            issues.push(ValidationIssue::new("/duration_max_minutes", message, "durationOrder"));
        }
        Err(ValidationError::StatusInvariant { message, .. }) => {
            issues.push(ValidationIssue::new("/status", message, "statusInvariant"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{ExtractedItem, ItemKind};
    use crate::scheduler::{DayPlanner, SchedulingConfig};
    use crate::task::{EnergyType, Importance, TaskStatus};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn planned() -> DayPlan {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap();
        let tasks = vec![
            Task::new("write report")
                .with_id("focus")
                .with_duration(90, 120)
                .with_importance(Importance::High)
                .with_energy(EnergyType::DeepWork),
            Task::new("reply mail").with_id("mini").with_duration(10, 15),
        ];
        DayPlanner::new(SchedulingConfig::default()).unwrap().plan(&tasks, now)
    }

    fn plan_json() -> Value {
        serde_json::to_value(planned()).unwrap()
    }

    fn keywords(report: &ValidationReport) -> Vec<(&str, &str)> {
        report
            .errors
            .iter()
            .map(|e| (e.path.as_str(), e.keyword.as_str()))
            .collect()
    }

    #[test]
    fn planner_output_is_valid() {
        let report = validate_serialized(&planned(), PayloadKind::DayPlan);
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn empty_plan_is_valid() {
        let plan = DayPlanner::default().plan(&[], Utc::now());
        assert!(validate_serialized(&plan, PayloadKind::DayPlan).valid);
    }

    #[test]
    fn three_minis_exceed_the_cap() {
        let mut value = plan_json();
        value["mini_task_ids"] = json!(["a", "b", "c"]);
        let report = validate_day_plan(&value);
        assert!(!report.valid);
        assert_eq!(keywords(&report), vec![("/mini_task_ids", "maxItems")]);
    }

    #[test]
    fn structural_errors_are_collected_together() {
        let mut value = plan_json();
        value["date"] = json!("19.10.2026");
        value["confidence"] = json!(1.5);
        value["suggested_blocks"][0]["block_type"] = json!("nap");
        value.as_object_mut().unwrap().remove("timezone");
        let report = validate_day_plan(&value);
        assert_eq!(
            keywords(&report),
            vec![
                ("/date", "format"),
                ("", "required"),
                ("/suggested_blocks/0/block_type", "enum"),
                ("/confidence", "maximum"),
            ]
        );
    }

    #[test]
    fn non_object_payload_reports_type() {
        let report = validate_day_plan(&json!([1, 2]));
        assert_eq!(keywords(&report), vec![("", "type")]);
    }

    #[test]
    fn overlapping_blocks_fail_block_order() {
        let mut value = plan_json();
        value["suggested_blocks"][1]["start_at"] = json!("2026-10-19T10:00:00");
        value["suggested_blocks"][1]["end_at"] = json!("2026-10-19T10:15:00");
        let report = validate_day_plan(&value);
        assert_eq!(
            keywords(&report),
            vec![("/suggested_blocks/1/start_at", "blockOrder")]
        );
    }

    #[test]
    fn block_duration_must_match_span() {
        let mut value = plan_json();
        value["suggested_blocks"][0]["duration_minutes"] = json!(30);
        let report = validate_day_plan(&value);
        assert_eq!(
            keywords(&report),
            vec![("/suggested_blocks/0/duration_minutes", "blockDuration")]
        );
    }

    #[test]
    fn block_task_ids_must_match_plan() {
        let mut value = plan_json();
        value["suggested_blocks"][0]["task_id"] = json!("someone-else");
        value["suggested_blocks"][1]["task_id"] = json!("focus");
        let report = validate_day_plan(&value);
        assert_eq!(
            keywords(&report),
            vec![
                ("/suggested_blocks/0/task_id", "blockTask"),
                ("/suggested_blocks/1/task_id", "blockTask"),
            ]
        );
    }

    #[test]
    fn focus_cannot_double_as_mini() {
        let mut value = plan_json();
        value["mini_task_ids"] = json!(["focus"]);
        let report = validate_day_plan(&value);
        assert_eq!(report.with_keyword("uniqueTask").count(), 1);
        assert_eq!(report.with_keyword("uniqueTask").next().unwrap().path, "/mini_task_ids/0");
    }

    #[test]
    fn extraction_caps_items_and_questions() {
        let items: Vec<ExtractedItem> = (0..11)
            .map(|i| ExtractedItem::from_title(ItemKind::Idea, format!("idea {i}")))
            .collect();
        let value = json!({
            "items": serde_json::to_value(&items).unwrap(),
            "questions": [
                { "item_index": 0, "text": "a?" },
                { "item_index": 1, "text": "b?" }
            ]
        });
        let report = validate_extraction(&value);
        assert_eq!(
            keywords(&report),
            vec![("/items", "maxItems"), ("/questions", "maxItems")]
        );
    }

    #[test]
    fn built_extraction_is_valid() {
        let extraction = Extraction::from_items(vec![
            ExtractedItem::from_title(ItemKind::Task, "Fix login bug"),
            ExtractedItem::from_title(ItemKind::Event, "Dentist"),
        ]);
        assert_eq!(extraction.questions.len(), 1);
        let report = validate_serialized(&extraction, PayloadKind::Extraction);
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn extraction_semantic_checks() {
        let value = json!({
            "items": [{
                "kind": "task",
                "title": "Draft memo",
                "duration_min_minutes": 60,
                "duration_max_minutes": 30,
                "confidence": 0.4
            }],
            "questions": [{ "item_index": 3, "text": "How long?" }]
        });
        let report = validate_extraction(&value);
        assert_eq!(
            keywords(&report),
            vec![
                ("/items/0/duration_max_minutes", "durationOrder"),
                ("/questions/0/item_index", "itemRef"),
            ]
        );
    }

    #[test]
    fn task_checks() {
        let task = Task::new("Review PR").with_duration(30, 60);
        assert!(validate_serialized(&task, PayloadKind::Task).valid);

        let mut value = serde_json::to_value(&task).unwrap();
        value["duration_min_minutes"] = json!(3);
        value["status"] = json!("paused");
        let report = validate_task(&value);
        assert_eq!(
            keywords(&report),
            vec![("/status", "enum"), ("/duration_min_minutes", "minimum")]
        );

        let mut inverted = task.clone();
        inverted.duration_min_minutes = Some(90);
        let report = validate_serialized(&inverted, PayloadKind::Task);
        assert_eq!(keywords(&report), vec![("/duration_max_minutes", "durationOrder")]);

        let mut done = task;
        done.status = TaskStatus::Done;
        let report = validate_serialized(&done, PayloadKind::Task);
        assert_eq!(keywords(&report), vec![("/status", "statusInvariant")]);
    }
}
