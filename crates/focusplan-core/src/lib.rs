//! # Focusplan Core Library
//!
//! Deterministic day planning for a capture-first task manager. Given a set
//! of open tasks and a working-day configuration, the planner picks one focus
//! task and up to two mini tasks, lays them out as time blocks with buffers,
//! and reports how confident it is in the result. A CLI binary exposes every
//! operation; any UI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Estimation**: keyword and time-expression rules turning a title into
//!   duration bounds with a confidence
//! - **Lifecycle**: adjacency-table guards for every status change of tasks,
//!   events, ideas and inbox notes
//! - **Scheduler**: prioritization, focus/mini selection, capacity fitting
//!   through a degradation ladder, and block layout
//! - **Validation**: structural and semantic checks for payloads leaving the
//!   core
//!
//! ## Key Components
//!
//! - [`DayPlanner`]: Plans a single day
//! - [`transition`]: Guarded status changes
//! - [`estimate_duration`]: Duration estimation from a title
//! - [`validate_day_plan`]: Boundary check for plans
//! - [`Config`]: Application configuration management

pub mod config;
pub mod entity;
pub mod error;
pub mod estimate;
pub mod extraction;
pub mod lifecycle;
pub mod scheduler;
pub mod task;
pub mod validate;

pub use config::Config;
pub use entity::{Event, EventStatus, Idea, IdeaStatus, InboxNote, InboxStatus};
pub use error::{ConfigError, TransitionError, ValidationError};
pub use estimate::{confidence_badge, estimate_duration, requires_question, ConfidenceBadge, DurationEstimate};
pub use extraction::{ClarifyingQuestion, ExtractedItem, Extraction, ItemKind};
pub use lifecycle::{transition, transition_at, Lifecycle, StatusMachine};
pub use scheduler::{
    confirm_plan, schedule_day, BlockType, DayPlan, DayPlanner, SchedulingConfig, SuggestedBlock,
};
pub use task::{EnergyType, EstimationSource, Importance, Task, TaskStatus};
pub use validate::{
    validate_day_plan, validate_extraction, validate_serialized, validate_task, PayloadKind,
    ValidationIssue, ValidationReport,
};
