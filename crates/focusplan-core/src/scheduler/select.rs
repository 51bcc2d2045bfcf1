//! Focus and mini selection over a prioritized candidate list.

use std::ops::RangeInclusive;

use super::priority::Candidate;
use crate::task::{EnergyType, Importance};

/// Duration window (minutes) a focus task must fall into.
pub const FOCUS_DURATION: RangeInclusive<u32> = 60..=120;
/// Duration window (minutes) a mini task must fall into.
pub const MINI_DURATION: RangeInclusive<u32> = 5..=20;
/// Most minis per day.
pub const MAX_MINIS: usize = 2;

/// Focus rule: a name for the reasoning text and a predicate applied on top
/// of the focus duration window.
pub struct FocusRule {
    pub name: &'static str,
    pub matches: fn(&Candidate<'_>) -> bool,
}

impl std::fmt::Debug for FocusRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusRule").field("name", &self.name).finish()
    }
}

fn is_overdue(c: &Candidate<'_>) -> bool {
    c.overdue
}

fn is_high_importance(c: &Candidate<'_>) -> bool {
    c.task.importance == Importance::High
}

fn is_deep_work(c: &Candidate<'_>) -> bool {
    c.task.energy_type == Some(EnergyType::DeepWork)
}

fn any_task(_: &Candidate<'_>) -> bool {
    true
}

/// Focus rules in strict order; the first rule with a match decides.
pub static FOCUS_RULES: &[FocusRule] = &[
    FocusRule { name: "overdue", matches: is_overdue },
    FocusRule { name: "high importance", matches: is_high_importance },
    FocusRule { name: "deep work", matches: is_deep_work },
    FocusRule { name: "fits a focus block", matches: any_task },
];

/// Pick the focus task. Returns the candidate and the rule that chose it.
pub fn select_focus<'a>(
    candidates: &[Candidate<'a>],
) -> Option<(Candidate<'a>, &'static FocusRule)> {
    FOCUS_RULES.iter().find_map(|rule| {
        candidates
            .iter()
            .find(|c| FOCUS_DURATION.contains(&c.duration) && (rule.matches)(c))
            .map(|c| (*c, rule))
    })
}

/// Pick up to [`MAX_MINIS`] fillers, excluding the focus task.
///
/// Admin work goes first, then the least important tasks; priority order
/// breaks remaining ties.
pub fn select_minis<'a>(candidates: &[Candidate<'a>], focus_id: Option<&str>) -> Vec<Candidate<'a>> {
    let mut pool: Vec<Candidate<'a>> = candidates
        .iter()
        .filter(|c| Some(c.id()) != focus_id)
        .filter(|c| MINI_DURATION.contains(&c.duration))
        .copied()
        .collect();

    pool.sort_by_key(|c| {
        (
            c.task.energy_type != Some(EnergyType::Admin),
            c.task.importance.filler_rank(),
        )
    });
    pool.truncate(MAX_MINIS);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap()
    }

    fn task(id: &str, min: u32, max: u32) -> Task {
        Task::new(id).with_id(id).with_duration(min, max).with_created_at(now())
    }

    fn candidates(tasks: &[Task]) -> Vec<Candidate<'_>> {
        tasks.iter().map(|t| Candidate::new(t, now())).collect()
    }

    #[test]
    fn overdue_rule_wins_over_earlier_high_importance() {
        let tasks = vec![
            task("high", 60, 90).with_importance(Importance::High),
            task("late", 60, 90).with_due(now() - Duration::days(1)),
        ];
        let (focus, rule) = select_focus(&candidates(&tasks)).unwrap();
        assert_eq!(focus.id(), "late");
        assert_eq!(rule.name, "overdue");
    }

    #[test]
    fn overdue_task_outside_window_is_skipped() {
        let tasks = vec![
            task("late-long", 200, 300).with_due(now() - Duration::days(1)),
            task("deep", 60, 90).with_energy(EnergyType::DeepWork),
        ];
        let (focus, rule) = select_focus(&candidates(&tasks)).unwrap();
        assert_eq!(focus.id(), "deep");
        assert_eq!(rule.name, "deep work");
    }

    #[test]
    fn any_sized_task_is_last_resort() {
        let tasks = vec![task("short", 10, 15), task("plain", 100, 120)];
        let (focus, rule) = select_focus(&candidates(&tasks)).unwrap();
        assert_eq!(focus.id(), "plain");
        assert_eq!(rule.name, "fits a focus block");
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let tasks = vec![task("edge", 60, 60)];
        assert!(select_focus(&candidates(&tasks)).is_some());
        let tasks = vec![task("over", 120, 122)];
        assert!(select_focus(&candidates(&tasks)).is_none());
    }

    #[test]
    fn no_focus_without_duration() {
        let tasks = vec![Task::new("unsized")];
        assert!(select_focus(&candidates(&tasks)).is_none());
        assert!(select_minis(&candidates(&tasks), None).is_empty());
    }

    #[test]
    fn minis_prefer_admin_then_low_importance() {
        let tasks = vec![
            task("high", 10, 15).with_importance(Importance::High),
            task("low", 10, 15).with_importance(Importance::Low),
            task("admin-high", 10, 15)
                .with_importance(Importance::High)
                .with_energy(EnergyType::Admin),
            task("medium", 10, 15),
        ];
        let minis = select_minis(&candidates(&tasks), None);
        let ids: Vec<&str> = minis.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["admin-high", "low"]);
    }

    #[test]
    fn minis_exclude_focus_and_cap_at_two() {
        let tasks: Vec<Task> = (0..6).map(|i| task(&format!("m{i}"), 10, 15)).collect();
        let minis = select_minis(&candidates(&tasks), Some("m0"));
        let ids: Vec<&str> = minis.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }
}
