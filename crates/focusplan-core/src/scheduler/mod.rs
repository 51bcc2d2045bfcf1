//! Deterministic day planner.
//!
//! Turns a list of tasks into one focus block plus up to two mini blocks:
//! - Filters open tasks and orders them by priority ([`priority`])
//! - Picks the focus task and fillers ([`select`])
//! - Degrades the selection until it fits the working day ([`ladder`])
//! - Lays the result out as consecutive blocks with buffers
//!
//! Planning is pure: the same tasks, reference time and config always yield
//! the same plan. Capacity shortfalls lower the plan's confidence instead of
//! failing.

pub mod confirm;
pub mod ladder;
pub mod plan;
pub mod priority;
pub mod select;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::task::Task;

pub use confirm::confirm_plan;
pub use ladder::{fit_to_capacity, Draft, Fitted, LadderStep, LADDER, NOMINAL_CONFIDENCE};
pub use plan::{BlockType, DayPlan, SuggestedBlock, MAX_REASONING_CHARS};
pub use priority::{prioritize, Candidate};
pub use select::{select_focus, select_minis, FocusRule, FOCUS_RULES, MAX_MINIS};

/// Confidence of a plan for a day without open tasks.
pub const EMPTY_DAY_CONFIDENCE: f64 = 1.0;
/// Reasoning for a day without open tasks.
pub const NO_OPEN_TASKS: &str = "no open tasks for today";
/// Confidence when open tasks exist but none fits a slot.
pub const NOTHING_FITS_CONFIDENCE: f64 = 0.2;
/// Reasoning when open tasks exist but none fits a slot.
pub const NOTHING_FITS: &str = "No open task fits a focus or mini slot today.";

/// Longest task title quoted in the reasoning text, in characters.
const REASONING_TITLE_CHARS: usize = 80;

/// Largest buffer the planner accepts, in minutes.
pub const MAX_BUFFER_MINUTES: u32 = 120;

/// Working-day shape used by the planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulingConfig {
    /// Hour the working day starts (0-23)
    #[serde(default = "default_working_hours_start")]
    pub working_hours_start: u32,
    /// Hour the working day ends (1-24), exclusive
    #[serde(default = "default_working_hours_end")]
    pub working_hours_end: u32,
    /// IANA timezone the working day is planned in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Recovery time after each work block
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: u32,
}

fn default_working_hours_start() -> u32 {
    9
}
fn default_working_hours_end() -> u32 {
    18
}
fn default_timezone() -> String {
    "Europe/Berlin".into()
}
fn default_buffer_minutes() -> u32 {
    15
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            working_hours_start: default_working_hours_start(),
            working_hours_end: default_working_hours_end(),
            timezone: default_timezone(),
            buffer_minutes: default_buffer_minutes(),
        }
    }
}

impl SchedulingConfig {
    /// Reject configurations that cannot describe a working day.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.working_hours_end > 24 {
            return Err(ConfigError::invalid(
                "scheduling.working_hours_end",
                format!("{} is past midnight", self.working_hours_end),
            ));
        }
        if self.working_hours_start >= self.working_hours_end {
            return Err(ConfigError::invalid(
                "scheduling.working_hours_start",
                format!(
                    "start {} must be before end {}",
                    self.working_hours_start, self.working_hours_end
                ),
            ));
        }
        self.tz()?;
        if self.buffer_minutes > MAX_BUFFER_MINUTES {
            return Err(ConfigError::invalid(
                "scheduling.buffer_minutes",
                format!("{} exceeds {MAX_BUFFER_MINUTES}", self.buffer_minutes),
            ));
        }
        Ok(())
    }

    /// Parsed IANA timezone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::invalid(
                "scheduling.timezone",
                format!("'{}' is not an IANA timezone", self.timezone),
            )
        })
    }

    /// Length of the working day in minutes.
    pub fn capacity_minutes(&self) -> u32 {
        self.working_hours_end.saturating_sub(self.working_hours_start) * 60
    }
}

/// Day planner bound to a validated configuration.
#[derive(Debug, Clone)]
pub struct DayPlanner {
    config: SchedulingConfig,
    tz: Tz,
}

impl DayPlanner {
    /// Create a planner, rejecting malformed configuration up front.
    pub fn new(config: SchedulingConfig) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            tracing::warn!("rejected scheduling config: {e}");
            return Err(e);
        }
        let tz = config.tz()?;
        Ok(Self { config, tz })
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Plan the calendar day `reference` falls on in the configured timezone.
    ///
    /// `reference` is also the instant deadlines are compared against.
    pub fn plan(&self, tasks: &[Task], reference: DateTime<Utc>) -> DayPlan {
        let date = reference.with_timezone(&self.tz).date_naive();
        let timezone = self.config.timezone.clone();

        let candidates = prioritize(tasks, reference);
        if candidates.is_empty() {
            tracing::info!(%date, "no open tasks to plan");
            return DayPlan::empty(date, timezone, EMPTY_DAY_CONFIDENCE, NO_OPEN_TASKS);
        }

        let focus = select_focus(&candidates);
        if let Some((task, rule)) = &focus {
            tracing::debug!(task_id = task.id(), rule = rule.name, "selected focus task");
        }
        let focus_id = focus.as_ref().map(|(c, _)| c.id());
        let minis = select_minis(&candidates, focus_id);

        let draft = Draft {
            focus: focus.as_ref().map(|(c, _)| *c),
            minis,
            buffer_minutes: self.config.buffer_minutes,
        };
        if draft.is_empty() {
            tracing::info!(%date, open = candidates.len(), "no open task fits a slot");
            return DayPlan::empty(date, timezone, NOTHING_FITS_CONFIDENCE, NOTHING_FITS);
        }

        let fitted = fit_to_capacity(draft, self.config.capacity_minutes());
        let reasoning = match fitted.step {
            Some(step) => step.reasoning.to_string(),
            None => nominal_reasoning(&fitted.draft, focus.as_ref().map(|(_, r)| *r)),
        };

        let plan = DayPlan {
            date,
            timezone,
            focus_task_id: fitted.draft.focus.map(|c| c.id().to_string()),
            mini_task_ids: fitted.draft.minis.iter().map(|c| c.id().to_string()).collect(),
            suggested_blocks: build_blocks(&fitted.draft, date, self.config.working_hours_start),
            reasoning_brief: reasoning,
            confidence: fitted.confidence(),
        };
        tracing::info!(
            %date,
            focus = plan.focus_task_id.as_deref().unwrap_or("-"),
            minis = plan.mini_task_ids.len(),
            confidence = plan.confidence,
            "day plan ready"
        );
        plan
    }
}

impl Default for DayPlanner {
    fn default() -> Self {
        Self {
            config: SchedulingConfig::default(),
            tz: chrono_tz::Europe::Berlin,
        }
    }
}

/// Plan one day with a one-off planner.
pub fn schedule_day(
    tasks: &[Task],
    reference: DateTime<Utc>,
    config: &SchedulingConfig,
) -> Result<DayPlan, ConfigError> {
    Ok(DayPlanner::new(config.clone())?.plan(tasks, reference))
}

/// Lay out focus, minis and buffers back to back from the start of the day.
fn build_blocks(draft: &Draft<'_>, date: NaiveDate, start_hour: u32) -> Vec<SuggestedBlock> {
    let mut cursor = date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(start_hour));
    let mut blocks = Vec::new();

    let work = draft
        .focus
        .iter()
        .map(|c| (BlockType::Focus, c))
        .chain(draft.minis.iter().map(|c| (BlockType::Mini, c)));

    for (block_type, candidate) in work {
        for (kind, task_id, minutes) in [
            (block_type, Some(candidate.id().to_string()), candidate.duration),
            (BlockType::Buffer, None, draft.buffer_minutes),
        ] {
            if minutes == 0 {
                continue;
            }
            let end = cursor + Duration::minutes(i64::from(minutes));
            blocks.push(SuggestedBlock {
                start_at: cursor,
                end_at: end,
                block_type: kind,
                task_id,
                duration_minutes: minutes,
            });
            cursor = end;
        }
    }
    blocks
}

fn nominal_reasoning(draft: &Draft<'_>, rule: Option<&'static FocusRule>) -> String {
    let minis = match draft.minis.len() {
        0 => "no mini tasks".to_string(),
        1 => "1 mini task".to_string(),
        n => format!("{n} mini tasks"),
    };
    match (draft.focus, rule) {
        (Some(focus), Some(rule)) => {
            let title = excerpt(&focus.task.title, REASONING_TITLE_CHARS);
            format!("Focus on \"{title}\" ({}), plus {minis}.", rule.name)
        }
        _ => format!("No focus-sized task today; planned {minis}."),
    }
}

/// First `max_chars` characters of `text`, ellipsized when cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars.saturating_sub(1)) {
        Some((cut, _)) if text[cut..].chars().nth(1).is_some() => format!("{}…", &text[..cut]),
        _ => text.to_string(),
    }
}
