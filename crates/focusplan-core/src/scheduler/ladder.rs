//! Capacity fitting through a fixed degradation ladder.
//!
//! When the selected tasks plus buffers exceed the working day, the steps
//! in [`LADDER`] are applied in order, re-checking capacity after each one.
//! The first step after which the draft fits sets the plan's confidence and
//! reasoning. The reasoning text is user-visible, so the order is part of
//! the contract.

use super::priority::Candidate;

/// Confidence of a plan that fits without degradation.
pub const NOMINAL_CONFIDENCE: f64 = 0.9;

/// Buffer length after the first ladder step.
pub const SHRUNK_BUFFER_MINUTES: u32 = 10;

/// Tasks and buffer length under consideration.
#[derive(Debug, Clone)]
pub struct Draft<'a> {
    pub focus: Option<Candidate<'a>>,
    /// Highest filler priority first
    pub minis: Vec<Candidate<'a>>,
    pub buffer_minutes: u32,
}

impl<'a> Draft<'a> {
    /// Work time plus one buffer after every block.
    pub fn total_minutes(&self) -> u32 {
        self.focus
            .iter()
            .chain(self.minis.iter())
            .map(|c| c.duration + self.buffer_minutes)
            .sum()
    }

    pub fn fits(&self, capacity_minutes: u32) -> bool {
        self.total_minutes() <= capacity_minutes
    }

    pub fn is_empty(&self) -> bool {
        self.focus.is_none() && self.minis.is_empty()
    }
}

/// One rung of the ladder.
pub struct LadderStep {
    pub name: &'static str,
    /// Whether the step changes anything for this draft
    pub applies: fn(&Draft<'_>) -> bool,
    pub apply: fn(&mut Draft<'_>),
    pub confidence: f64,
    pub reasoning: &'static str,
}

impl std::fmt::Debug for LadderStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LadderStep")
            .field("name", &self.name)
            .field("confidence", &self.confidence)
            .finish()
    }
}

fn buffer_above_floor(draft: &Draft<'_>) -> bool {
    draft.buffer_minutes > SHRUNK_BUFFER_MINUTES
}

fn shrink_buffer(draft: &mut Draft<'_>) {
    draft.buffer_minutes = SHRUNK_BUFFER_MINUTES;
}

fn has_minis(draft: &Draft<'_>) -> bool {
    !draft.minis.is_empty()
}

fn drop_lowest_mini(draft: &mut Draft<'_>) {
    draft.minis.pop();
}

fn drop_all_minis(draft: &mut Draft<'_>) {
    draft.minis.clear();
}

fn always(_: &Draft<'_>) -> bool {
    true
}

fn drop_everything(draft: &mut Draft<'_>) {
    draft.focus = None;
    draft.minis.clear();
}

/// Degradation steps in the order they are tried.
pub static LADDER: &[LadderStep] = &[
    LadderStep {
        name: "shrink_buffer",
        applies: buffer_above_floor,
        apply: shrink_buffer,
        confidence: 0.7,
        reasoning: "Buffers shortened to 10 minutes to fit your working hours.",
    },
    LadderStep {
        name: "drop_lowest_mini",
        applies: has_minis,
        apply: drop_lowest_mini,
        confidence: 0.6,
        reasoning: "Dropped the lowest-priority mini task to fit your working hours.",
    },
    LadderStep {
        name: "drop_all_minis",
        applies: has_minis,
        apply: drop_all_minis,
        confidence: 0.5,
        reasoning: "Dropped all mini tasks; only the focus task fits your working hours.",
    },
    LadderStep {
        name: "give_up",
        applies: always,
        apply: drop_everything,
        confidence: 0.2,
        reasoning: "Not enough working time for today's focus task. Try again tomorrow.",
    },
];

/// Result of capacity fitting.
#[derive(Debug, Clone)]
pub struct Fitted<'a> {
    pub draft: Draft<'a>,
    /// Last step applied, `None` when the draft fit as selected
    pub step: Option<&'static LadderStep>,
}

impl Fitted<'_> {
    pub fn confidence(&self) -> f64 {
        self.step.map_or(NOMINAL_CONFIDENCE, |s| s.confidence)
    }
}

/// Degrade `draft` until it fits `capacity_minutes`.
///
/// A non-empty draft never ends empty before the final step.
pub fn fit_to_capacity(mut draft: Draft<'_>, capacity_minutes: u32) -> Fitted<'_> {
    if draft.fits(capacity_minutes) {
        return Fitted { draft, step: None };
    }

    let last = LADDER.len() - 1;
    for (i, step) in LADDER.iter().enumerate() {
        if !(step.applies)(&draft) {
            continue;
        }
        (step.apply)(&mut draft);
        tracing::debug!(
            step = step.name,
            total = draft.total_minutes(),
            capacity = capacity_minutes,
            "applied degradation step"
        );
        if draft.fits(capacity_minutes) && (!draft.is_empty() || i == last) {
            return Fitted {
                draft,
                step: Some(step),
            };
        }
    }

    // The final step empties the draft, which always fits.
    Fitted {
        draft,
        step: LADDER.last(),
    }
}
