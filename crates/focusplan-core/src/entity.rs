//! Non-schedulable captures that share the task's transition guard.
//!
//! - [`Event`]: tentative → confirmed → cancelled
//! - [`Idea`]: active → archived | converted (both terminal)
//! - [`InboxNote`]: unprocessed → processed | failed (both terminal)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lifecycle::{Lifecycle, StatusMachine};

macro_rules! impl_status_display {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Calendar event status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Tentative,
    Confirmed,
    Cancelled,
}

impl StatusMachine for EventStatus {
    const ENTITY: &'static str = "event";

    fn allowed_next(self) -> &'static [Self] {
        match self {
            EventStatus::Tentative => &[EventStatus::Confirmed, EventStatus::Cancelled],
            EventStatus::Confirmed => &[EventStatus::Cancelled],
            EventStatus::Cancelled => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            EventStatus::Tentative => "tentative",
            EventStatus::Confirmed => "confirmed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl_status_display!(EventStatus);

/// Idea status. Archiving is not reversible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    #[default]
    Active,
    Archived,
    Converted,
}

impl StatusMachine for IdeaStatus {
    const ENTITY: &'static str = "idea";

    fn allowed_next(self) -> &'static [Self] {
        match self {
            IdeaStatus::Active => &[IdeaStatus::Archived, IdeaStatus::Converted],
            IdeaStatus::Archived | IdeaStatus::Converted => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            IdeaStatus::Active => "active",
            IdeaStatus::Archived => "archived",
            IdeaStatus::Converted => "converted",
        }
    }
}

impl_status_display!(IdeaStatus);

/// Inbox note processing status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum InboxStatus {
    #[default]
    Unprocessed,
    Processed,
    Failed,
}

impl StatusMachine for InboxStatus {
    const ENTITY: &'static str = "inbox_note";

    fn allowed_next(self) -> &'static [Self] {
        match self {
            InboxStatus::Unprocessed => &[InboxStatus::Processed, InboxStatus::Failed],
            // No retry path yet.
            InboxStatus::Processed | InboxStatus::Failed => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            InboxStatus::Unprocessed => "unprocessed",
            InboxStatus::Processed => "processed",
            InboxStatus::Failed => "failed",
        }
    }
}

impl_status_display!(InboxStatus);

/// Calendar-like entry. Never scheduled by the planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_note_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Event {
            id: format!("event-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            status: EventStatus::Tentative,
            start_at: None,
            end_at: None,
            source_note_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Lifecycle for Event {
    type Status = EventStatus;

    fn status(&self) -> EventStatus {
        self.status
    }

    fn apply_status(&mut self, to: EventStatus, now: DateTime<Utc>) {
        self.status = to;
        self.updated_at = now;
    }
}

/// Non-actionable capture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Idea {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Idea {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Idea {
            id: format!("idea-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            body: None,
            status: IdeaStatus::Active,
            created_at: now,
            updated_at: now,
            archived_at: None,
        }
    }
}

impl Lifecycle for Idea {
    type Status = IdeaStatus;

    fn status(&self) -> IdeaStatus {
        self.status
    }

    fn apply_status(&mut self, to: IdeaStatus, now: DateTime<Utc>) {
        if to == IdeaStatus::Archived {
            self.archived_at = Some(now);
        }
        self.status = to;
        self.updated_at = now;
    }
}

/// Raw free-text capture awaiting extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboxNote {
    pub id: String,
    pub raw_text: String,
    #[serde(default)]
    pub status: InboxStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    /// Extraction failure detail, recorded by the caller
    #[serde(default)]
    pub error_message: Option<String>,
}

impl InboxNote {
    pub fn new(raw_text: impl Into<String>) -> Self {
        let now = Utc::now();
        InboxNote {
            id: format!("note-{}", uuid::Uuid::new_v4()),
            raw_text: raw_text.into(),
            status: InboxStatus::Unprocessed,
            created_at: now,
            updated_at: now,
            processed_at: None,
            error_message: None,
        }
    }
}

impl Lifecycle for InboxNote {
    type Status = InboxStatus;

    fn status(&self) -> InboxStatus {
        self.status
    }

    fn apply_status(&mut self, to: InboxStatus, now: DateTime<Utc>) {
        if to == InboxStatus::Processed {
            self.processed_at = Some(now);
        }
        self.status = to;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_initial_states() {
        assert_eq!(EventStatus::default(), EventStatus::Tentative);
        assert_eq!(IdeaStatus::default(), IdeaStatus::Active);
        assert_eq!(InboxStatus::default(), InboxStatus::Unprocessed);
    }

    #[test]
    fn terminal_states() {
        assert!(EventStatus::Cancelled.is_terminal());
        assert!(!EventStatus::Confirmed.is_terminal());
        assert!(IdeaStatus::Archived.is_terminal());
        assert!(IdeaStatus::Converted.is_terminal());
        assert!(InboxStatus::Processed.is_terminal());
        assert!(InboxStatus::Failed.is_terminal());
    }

    #[test]
    fn display_uses_wire_names() {
        assert_eq!(InboxStatus::Unprocessed.to_string(), "unprocessed");
        assert_eq!(
            serde_json::to_string(&InboxStatus::Unprocessed).unwrap(),
            "\"unprocessed\""
        );
        assert_eq!(IdeaStatus::Converted.to_string(), "converted");
    }

    #[test]
    fn idea_round_trips_through_json() {
        let idea = Idea::new("Podcast about compilers");
        let json = serde_json::to_string(&idea).unwrap();
        let decoded: Idea = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, idea);
    }
}
