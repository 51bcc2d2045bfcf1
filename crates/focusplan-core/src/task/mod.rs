//! Task model: the only entity the day planner schedules.
//!
//! Task status follows a strict adjacency table enforced by
//! [`crate::lifecycle::transition`]:
//!
//!   OPEN ──────> SCHEDULED ──────> IN_PROGRESS ──────> DONE
//!    │  ^            │                  │
//!    │  └── unplan ──┤                  └────────────> CANCELLED
//!    ├───────────────┼───────────────────────────────> DONE
//!    └───────────────┴───────────────────────────────> CANCELLED
//!
//! Valid transitions:
//! - OPEN → SCHEDULED | DONE | CANCELLED
//! - SCHEDULED → OPEN | IN_PROGRESS | DONE | CANCELLED
//! - IN_PROGRESS → DONE | CANCELLED
//! - DONE, CANCELLED: terminal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::lifecycle::{Lifecycle, StatusMachine};

/// Smallest duration bound a task may carry, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 5;
/// Largest duration bound a task may carry, in minutes.
pub const MAX_DURATION_MINUTES: u32 = 480;
/// Duration assumed when a task has no bounds at all.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting to be planned (initial state)
    #[default]
    Open,
    /// Placed on a confirmed day plan
    Scheduled,
    /// Being worked on
    InProgress,
    /// Finished (terminal)
    Done,
    /// Dropped (terminal)
    Cancelled,
}

impl StatusMachine for TaskStatus {
    const ENTITY: &'static str = "task";

    fn allowed_next(self) -> &'static [Self] {
        match self {
            TaskStatus::Open => &[TaskStatus::Scheduled, TaskStatus::Done, TaskStatus::Cancelled],
            TaskStatus::Scheduled => &[
                TaskStatus::Open,
                TaskStatus::InProgress,
                TaskStatus::Done,
                TaskStatus::Cancelled,
            ],
            TaskStatus::InProgress => &[TaskStatus::Done, TaskStatus::Cancelled],
            TaskStatus::Done | TaskStatus::Cancelled => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing importance of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
}

impl Importance {
    /// Position in the prioritization order (high first).
    pub fn priority_rank(self) -> u8 {
        match self {
            Importance::High => 0,
            Importance::Medium => 1,
            Importance::Low => 2,
        }
    }

    /// Position in the mini-filler order (low first).
    pub fn filler_rank(self) -> u8 {
        match self {
            Importance::Low => 0,
            Importance::Medium => 1,
            Importance::High => 2,
        }
    }
}

/// Kind of attention a task needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EnergyType {
    /// Long uninterrupted concentration
    DeepWork,
    /// Small administrative chores
    Admin,
    /// Open-ended creative work
    Creative,
}

/// Where a task's duration bounds came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum EstimationSource {
    /// Model-supplied estimate
    Ai,
    /// Explicit time expression found in the title
    Parsed,
    /// User edited the bounds
    UserOverride,
    /// Fallback bounds
    #[default]
    Default,
}

/// A unit of schedulable work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Lifecycle status, changed only through the transition guard
    #[serde(default)]
    pub status: TaskStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp (set iff status is done)
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Deadline
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// Lower duration bound in minutes (5-480)
    #[serde(default)]
    pub duration_min_minutes: Option<u32>,
    /// Upper duration bound in minutes (5-480)
    #[serde(default)]
    pub duration_max_minutes: Option<u32>,
    #[serde(default)]
    pub estimation_source: EstimationSource,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub energy_type: Option<EnergyType>,
    /// Inbox note this task was extracted from
    #[serde(default)]
    pub source_note_id: Option<String>,
    /// Day plan that scheduled this task (cleared when reopened)
    #[serde(default)]
    pub day_plan_id: Option<String>,
}

impl Task {
    /// Create a new open task with default values.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            description: None,
            status: TaskStatus::Open,
            created_at: now,
            updated_at: now,
            completed_at: None,
            due_at: None,
            duration_min_minutes: None,
            duration_max_minutes: None,
            estimation_source: EstimationSource::Default,
            importance: Importance::Medium,
            energy_type: None,
            source_note_id: None,
            day_plan_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set both duration bounds.
    pub fn with_duration(mut self, min: u32, max: u32) -> Self {
        self.duration_min_minutes = Some(min);
        self.duration_max_minutes = Some(max);
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_energy(mut self, energy: EnergyType) -> Self {
        self.energy_type = Some(energy);
        self
    }

    pub fn with_due(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Override both creation and update timestamps.
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// Planning duration: rounded midpoint of the bounds.
    ///
    /// A single bound stands in for both; no bounds yields
    /// [`DEFAULT_DURATION_MINUTES`].
    pub fn duration_avg(&self) -> u32 {
        match (self.duration_min_minutes, self.duration_max_minutes) {
            // Half rounds up; widened so unchecked bounds cannot overflow.
            (Some(min), Some(max)) => {
                let mid = (u64::from(min) + u64::from(max) + 1) / 2;
                u32::try_from(mid).unwrap_or(u32::MAX)
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => DEFAULT_DURATION_MINUTES,
        }
    }

    /// Whether the deadline lies strictly before `reference`.
    pub fn is_overdue(&self, reference: DateTime<Utc>) -> bool {
        self.due_at.is_some_and(|due| due < reference)
    }

    /// Check the record-level invariants of a task.
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        let range = MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES;
        for bound in [self.duration_min_minutes, self.duration_max_minutes]
            .into_iter()
            .flatten()
        {
            if !range.contains(&bound) {
                return Err(ValidationError::InvalidDuration {
                    task_id: self.id.clone(),
                    message: format!(
                        "{bound} is outside {MIN_DURATION_MINUTES}-{MAX_DURATION_MINUTES} minutes"
                    ),
                });
            }
        }
        if let (Some(min), Some(max)) = (self.duration_min_minutes, self.duration_max_minutes) {
            if min > max {
                return Err(ValidationError::InvalidDuration {
                    task_id: self.id.clone(),
                    message: format!("min {min} exceeds max {max}"),
                });
            }
        }
        if self.status == TaskStatus::Done && self.completed_at.is_none() {
            return Err(ValidationError::StatusInvariant {
                task_id: self.id.clone(),
                message: "done task has no completed_at".into(),
            });
        }
        if self.status == TaskStatus::Open && self.day_plan_id.is_some() {
            return Err(ValidationError::StatusInvariant {
                task_id: self.id.clone(),
                message: "open task still references a day plan".into(),
            });
        }
        Ok(())
    }
}

impl Lifecycle for Task {
    type Status = TaskStatus;

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn apply_status(&mut self, to: TaskStatus, now: DateTime<Utc>) {
        match to {
            TaskStatus::Done => self.completed_at = Some(now),
            TaskStatus::Open => self.day_plan_id = None,
            _ => {}
        }
        self.status = to;
        self.updated_at = now;
    }
}
