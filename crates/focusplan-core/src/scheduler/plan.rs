//! Day plan value types produced by the planner.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest `reasoning_brief` a plan may carry, in characters.
pub const MAX_REASONING_CHARS: usize = 500;

/// Type of suggested block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// The day's main work item
    Focus,
    /// Short filler task
    Mini,
    /// Unassigned recovery time after a work block
    Buffer,
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::Focus => write!(f, "focus"),
            BlockType::Mini => write!(f, "mini"),
            BlockType::Buffer => write!(f, "buffer"),
        }
    }
}

/// A time slot on the planned day.
///
/// Times are local wall-clock times in the plan's timezone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedBlock {
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub block_type: BlockType,
    /// Set for focus/mini blocks, absent for buffers
    pub task_id: Option<String>,
    pub duration_minutes: u32,
}

/// One focus block plus up to two minis for a single day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    /// Planned calendar day, serialized `YYYY-MM-DD`
    pub date: NaiveDate,
    /// IANA timezone label the block times refer to
    pub timezone: String,
    pub focus_task_id: Option<String>,
    pub mini_task_ids: Vec<String>,
    pub suggested_blocks: Vec<SuggestedBlock>,
    pub reasoning_brief: String,
    /// How well the plan meets the ideal constraints (0.0-1.0)
    pub confidence: f64,
}

impl DayPlan {
    /// A plan with no tasks and no blocks.
    pub fn empty(
        date: NaiveDate,
        timezone: impl Into<String>,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        DayPlan {
            date,
            timezone: timezone.into(),
            focus_task_id: None,
            mini_task_ids: Vec::new(),
            suggested_blocks: Vec::new(),
            reasoning_brief: reasoning.into(),
            confidence,
        }
    }

    /// Id conventionally used when the plan is confirmed and persisted.
    pub fn default_id(&self) -> String {
        format!("plan-{}", self.date.format("%Y-%m-%d"))
    }

    pub fn is_empty(&self) -> bool {
        self.focus_task_id.is_none() && self.mini_task_ids.is_empty()
    }

    /// Whether `task_id` is the focus or one of the minis.
    pub fn references(&self, task_id: &str) -> bool {
        self.focus_task_id.as_deref() == Some(task_id)
            || self.mini_task_ids.iter().any(|id| id == task_id)
    }

    /// Minutes covered by all blocks, buffers included.
    pub fn total_minutes(&self) -> u32 {
        self.suggested_blocks.iter().map(|b| b.duration_minutes).sum()
    }
}
