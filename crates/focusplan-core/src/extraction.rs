//! Typed extraction payload exchanged with the AI layer.
//!
//! The core never reads free text beyond titles; this module only shapes
//! what the extractor returns and enforces the clarifying-question cap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimate::{estimate_duration, requires_question};
use crate::task::{EnergyType, EstimationSource, Importance, Task};

/// Most items a single extraction may carry.
pub const MAX_EXTRACTED_ITEMS: usize = 10;
/// Hard cap on clarifying questions per extraction.
pub const MAX_QUESTIONS: usize = 1;

/// What an extracted item turns into after review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Event,
    Idea,
}

/// One candidate pulled out of an inbox note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedItem {
    pub kind: ItemKind,
    pub title: String,
    #[serde(default)]
    pub duration_min_minutes: Option<u32>,
    #[serde(default)]
    pub duration_max_minutes: Option<u32>,
    #[serde(default)]
    pub estimation_source: Option<EstimationSource>,
    #[serde(default)]
    pub importance: Option<Importance>,
    #[serde(default)]
    pub energy_type: Option<EnergyType>,
    /// 0.0-1.0
    pub confidence: f64,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
}

impl ExtractedItem {
    /// Build an item from a bare title, filling task durations from the
    /// estimation rules.
    pub fn from_title(kind: ItemKind, title: impl Into<String>) -> Self {
        let title = title.into();
        let mut item = ExtractedItem {
            kind,
            title,
            duration_min_minutes: None,
            duration_max_minutes: None,
            estimation_source: None,
            importance: None,
            energy_type: None,
            confidence: 1.0,
            due_at: None,
        };
        if kind == ItemKind::Task {
            let est = estimate_duration(&item.title);
            item.duration_min_minutes = Some(est.min_minutes);
            item.duration_max_minutes = Some(est.max_minutes);
            item.estimation_source = Some(est.source);
            item.energy_type = est.energy_type;
            item.confidence = est.confidence;
        }
        item
    }

    /// Materialize a reviewed task item as an open task.
    ///
    /// Returns `None` for events and ideas.
    pub fn to_task(&self, source_note_id: Option<&str>, now: DateTime<Utc>) -> Option<Task> {
        if self.kind != ItemKind::Task {
            return None;
        }
        let mut task = Task::new(self.title.clone()).with_created_at(now);
        task.duration_min_minutes = self.duration_min_minutes;
        task.duration_max_minutes = self.duration_max_minutes;
        task.estimation_source = self.estimation_source.unwrap_or(EstimationSource::Ai);
        task.importance = self.importance.unwrap_or_default();
        task.energy_type = self.energy_type;
        task.due_at = self.due_at;
        task.source_note_id = source_note_id.map(str::to_string);
        Some(task)
    }
}

/// Follow-up the user is asked about a low-confidence item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClarifyingQuestion {
    /// Index into [`Extraction::items`]
    pub item_index: usize,
    pub text: String,
}

/// Pick the single question worth asking for `items`, if any.
///
/// Targets the lowest-confidence item below the question threshold; the
/// earliest item wins ties.
pub fn clarifying_question(items: &[ExtractedItem]) -> Option<ClarifyingQuestion> {
    let (index, item) = items
        .iter()
        .enumerate()
        .filter(|(_, item)| requires_question(item.confidence))
        .min_by(|(_, a), (_, b)| a.confidence.total_cmp(&b.confidence))?;

    let text = match item.kind {
        ItemKind::Task => format!("How long will \"{}\" take?", item.title),
        ItemKind::Event => format!("When does \"{}\" happen?", item.title),
        ItemKind::Idea => format!("Is \"{}\" something you want to act on?", item.title),
    };
    Some(ClarifyingQuestion {
        item_index: index,
        text,
    })
}

/// Full extraction result for one inbox note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Extraction {
    pub items: Vec<ExtractedItem>,
    #[serde(default)]
    pub questions: Vec<ClarifyingQuestion>,
}

impl Extraction {
    /// Cap the item list and attach at most one clarifying question.
    pub fn from_items(mut items: Vec<ExtractedItem>) -> Self {
        if items.len() > MAX_EXTRACTED_ITEMS {
            tracing::debug!(
                dropped = items.len() - MAX_EXTRACTED_ITEMS,
                "extraction exceeded item cap"
            );
            items.truncate(MAX_EXTRACTED_ITEMS);
        }
        let questions = clarifying_question(&items).into_iter().collect();
        Extraction { items, questions }
    }
}
