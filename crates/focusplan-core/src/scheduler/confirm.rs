//! Confirming a plan: moving its tasks from open to scheduled.

use chrono::{DateTime, Utc};

use super::plan::DayPlan;
use crate::error::TransitionError;
use crate::lifecycle::transition_at;
use crate::task::{Task, TaskStatus};

/// Schedule every task the plan references and link it to `plan_id`.
///
/// Tasks the plan does not mention come back unchanged. The first rejected
/// transition aborts the whole confirmation; nothing is partially applied
/// since the input slice is never modified.
pub fn confirm_plan(
    plan_id: &str,
    plan: &DayPlan,
    tasks: &[Task],
    now: DateTime<Utc>,
) -> Result<Vec<Task>, TransitionError> {
    tasks
        .iter()
        .map(|task| {
            if !plan.references(&task.id) {
                return Ok(task.clone());
            }
            let mut scheduled = transition_at(task, TaskStatus::Scheduled, now)?;
            scheduled.day_plan_id = Some(plan_id.to_string());
            Ok(scheduled)
        })
        .collect()
}
