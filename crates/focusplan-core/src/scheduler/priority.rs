//! Candidate preparation and the planner's total priority order.
//!
//! Order, highest priority first:
//! 1. overdue before not overdue
//! 2. importance high, medium, low
//! 3. older `created_at` first
//!
//! Remaining ties keep input order (stable sort).

use chrono::{DateTime, Utc};

use crate::task::{Task, TaskStatus};

/// An open task with its planning duration resolved.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub task: &'a Task,
    /// Rounded midpoint of the duration bounds, see [`Task::duration_avg`]
    pub duration: u32,
    pub overdue: bool,
}

impl<'a> Candidate<'a> {
    pub fn new(task: &'a Task, reference: DateTime<Utc>) -> Self {
        Candidate {
            task,
            duration: task.duration_avg(),
            overdue: task.is_overdue(reference),
        }
    }

    pub fn id(&self) -> &'a str {
        &self.task.id
    }
}

/// Keep open tasks and sort them into priority order.
pub fn prioritize(tasks: &[Task], reference: DateTime<Utc>) -> Vec<Candidate<'_>> {
    let mut candidates: Vec<Candidate<'_>> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Open)
        .map(|t| Candidate::new(t, reference))
        .collect();

    candidates.sort_by(|a, b| {
        b.overdue
            .cmp(&a.overdue)
            .then_with(|| {
                a.task
                    .importance
                    .priority_rank()
                    .cmp(&b.task.importance.priority_rank())
            })
            .then_with(|| a.task.created_at.cmp(&b.task.created_at))
    });
    candidates
}
