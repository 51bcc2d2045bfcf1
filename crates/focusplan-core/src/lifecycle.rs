//! State transition guards shared by every entity with a status.
//!
//! Each status enum carries a static adjacency table ([`StatusMachine`]);
//! each entity knows how to apply a status and its side effects
//! ([`Lifecycle`]). [`transition`] ties the two together and never mutates
//! its input: it returns an updated copy or an
//! [`TransitionError::InvalidTransition`].

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::TransitionError;

/// A status enum with a fixed table of allowed successor states.
pub trait StatusMachine: Copy + Eq + fmt::Debug + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// States reachable in one step from `self`.
    fn allowed_next(self) -> &'static [Self];

    /// Wire name of the status.
    fn as_str(self) -> &'static str;

    fn can_transition_to(self, to: Self) -> bool {
        self.allowed_next().contains(&to)
    }

    /// Terminal states have no successors.
    fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

/// An entity whose status is changed only through [`transition`].
pub trait Lifecycle: Clone {
    type Status: StatusMachine;

    fn status(&self) -> Self::Status;

    /// Set the status, bump `updated_at` to `now` and apply entity-specific
    /// side effects. Called only after the guard accepted the change.
    fn apply_status(&mut self, to: Self::Status, now: DateTime<Utc>);
}

/// Move `entity` to `to`, stamping changes with the current time.
pub fn transition<E: Lifecycle>(entity: &E, to: E::Status) -> Result<E, TransitionError> {
    transition_at(entity, to, Utc::now())
}

/// Move `entity` to `to`, stamping changes with `now`.
///
/// Requesting the current status is a no-op: the returned value equals the
/// input and `updated_at` is not advanced.
pub fn transition_at<E: Lifecycle>(
    entity: &E,
    to: E::Status,
    now: DateTime<Utc>,
) -> Result<E, TransitionError> {
    let from = entity.status();
    if from == to {
        return Ok(entity.clone());
    }

    if !from.can_transition_to(to) {
        let reason = rejection_reason(from);
        tracing::warn!(
            entity = E::Status::ENTITY,
            from = from.as_str(),
            to = to.as_str(),
            "rejected status transition: {reason}"
        );
        return Err(TransitionError::InvalidTransition {
            entity: E::Status::ENTITY,
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            reason,
        });
    }

    let mut next = entity.clone();
    next.apply_status(to, now);
    tracing::debug!(
        entity = E::Status::ENTITY,
        from = from.as_str(),
        to = to.as_str(),
        "status transition applied"
    );
    Ok(next)
}

fn rejection_reason<S: StatusMachine>(from: S) -> String {
    if from.is_terminal() {
        return format!("{} is terminal", from.as_str());
    }
    let allowed: Vec<&str> = from.allowed_next().iter().map(|s| s.as_str()).collect();
    format!("{} only allows {}", from.as_str(), allowed.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Event, EventStatus, Idea, IdeaStatus, InboxNote, InboxStatus};
    use crate::task::{Task, TaskStatus};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap()
    }

    fn task_in(status: TaskStatus) -> Task {
        let mut task = Task::new("Review PR").with_created_at(t0());
        task.status = status;
        task
    }

    #[test]
    fn same_status_is_a_no_op() {
        let task = task_in(TaskStatus::Scheduled);
        let later = t0() + Duration::hours(3);
        let result = transition_at(&task, TaskStatus::Scheduled, later).unwrap();
        assert_eq!(result, task);
        assert_eq!(result.updated_at, t0());
    }

    #[test]
    fn no_op_is_allowed_even_from_terminal_state() {
        let mut task = task_in(TaskStatus::Done);
        task.completed_at = Some(t0());
        assert_eq!(transition_at(&task, TaskStatus::Done, t0()).unwrap(), task);
    }

    #[test]
    fn open_to_scheduled_bumps_updated_at() {
        let task = task_in(TaskStatus::Open);
        let now = t0() + Duration::minutes(5);
        let next = transition_at(&task, TaskStatus::Scheduled, now).unwrap();
        assert_eq!(next.status, TaskStatus::Scheduled);
        assert_eq!(next.updated_at, now);
        assert_eq!(task.status, TaskStatus::Open, "input must not change");
    }

    #[test]
    fn done_sets_completed_at() {
        let now = t0() + Duration::hours(1);
        let next = transition_at(&task_in(TaskStatus::InProgress), TaskStatus::Done, now).unwrap();
        assert_eq!(next.completed_at, Some(now));
    }

    #[test]
    fn reopening_clears_day_plan_reference() {
        let mut task = task_in(TaskStatus::Scheduled);
        task.day_plan_id = Some("plan-2026-10-01".into());
        let next = transition_at(&task, TaskStatus::Open, t0()).unwrap();
        assert!(next.day_plan_id.is_none());
        assert!(next.check_invariants().is_ok());
    }

    #[test]
    fn in_progress_cannot_be_reopened() {
        let err = transition_at(&task_in(TaskStatus::InProgress), TaskStatus::Open, t0())
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                entity: "task",
                from: "in_progress".into(),
                to: "open".into(),
                reason: "in_progress only allows done, cancelled".into(),
            }
        );
    }

    #[test]
    fn terminal_task_states_reject_everything() {
        let all = [
            TaskStatus::Open,
            TaskStatus::Scheduled,
            TaskStatus::InProgress,
            TaskStatus::Done,
            TaskStatus::Cancelled,
        ];
        for terminal in [TaskStatus::Done, TaskStatus::Cancelled] {
            let task = task_in(terminal);
            for to in all.into_iter().filter(|s| *s != terminal) {
                let err = transition_at(&task, to, t0()).unwrap_err();
                assert!(err.to_string().contains("is terminal"), "{err}");
            }
        }
    }

    #[test]
    fn event_lifecycle() {
        let event = Event::new("Dentist");
        let confirmed = transition_at(&event, EventStatus::Confirmed, t0()).unwrap();
        assert_eq!(confirmed.status, EventStatus::Confirmed);
        assert!(transition_at(&confirmed, EventStatus::Tentative, t0()).is_err());
        let cancelled = transition_at(&confirmed, EventStatus::Cancelled, t0()).unwrap();
        assert!(transition_at(&cancelled, EventStatus::Confirmed, t0()).is_err());
    }

    #[test]
    fn idea_archive_is_permanent() {
        let idea = Idea::new("Garden app");
        let archived = transition_at(&idea, IdeaStatus::Archived, t0()).unwrap();
        assert_eq!(archived.archived_at, Some(t0()));
        assert!(transition_at(&archived, IdeaStatus::Active, t0()).is_err());
        assert!(transition_at(&archived, IdeaStatus::Converted, t0()).is_err());
    }

    #[test]
    fn inbox_note_processing() {
        let note = InboxNote::new("call mom, buy milk");
        let processed = transition_at(&note, InboxStatus::Processed, t0()).unwrap();
        assert_eq!(processed.processed_at, Some(t0()));
        assert!(transition_at(&processed, InboxStatus::Failed, t0()).is_err());
        assert!(transition_at(&processed, InboxStatus::Unprocessed, t0()).is_err());
    }
}
