//! Wire schemas for payloads crossing the core boundary.

use once_cell::sync::Lazy;

use super::schema::{Format, Property, Schema};
use crate::extraction::{MAX_EXTRACTED_ITEMS, MAX_QUESTIONS};
use crate::scheduler::{MAX_MINIS, MAX_REASONING_CHARS};
use crate::task::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

const TITLE_MAX_CHARS: usize = 200;
const QUESTION_MAX_CHARS: usize = 300;
const TIMEZONE_MAX_CHARS: usize = 64;
/// A work block plus its buffer for the focus and every mini.
const MAX_BLOCKS: usize = 2 * (1 + MAX_MINIS);

const TASK_STATUSES: &[&str] = &["open", "scheduled", "in_progress", "done", "cancelled"];
const BLOCK_TYPES: &[&str] = &["focus", "mini", "buffer"];
const ITEM_KINDS: &[&str] = &["task", "event", "idea"];
const ESTIMATION_SOURCES: &[&str] = &["ai", "parsed", "user_override", "default"];
const IMPORTANCE: &[&str] = &["low", "medium", "high"];
const ENERGY_TYPES: &[&str] = &["deep_work", "admin", "creative"];

fn duration_bound() -> Schema {
    Schema::integer(i64::from(MIN_DURATION_MINUTES), i64::from(MAX_DURATION_MINUTES))
}

fn id() -> Schema {
    Schema::string().len(Some(1), None)
}

fn title() -> Schema {
    Schema::string().len(Some(1), Some(TITLE_MAX_CHARS))
}

fn confidence() -> Schema {
    Schema::number(0.0, 1.0)
}

pub static DAY_PLAN: Lazy<Schema> = Lazy::new(|| {
    let block = Schema::object(vec![
        Property::required("start_at", Schema::formatted(Format::LocalDateTime)),
        Property::required("end_at", Schema::formatted(Format::LocalDateTime)),
        Property::required("block_type", Schema::one_of(BLOCK_TYPES)),
        Property::optional("task_id", id()).nullable(),
        Property::required(
            "duration_minutes",
            Schema::integer(1, i64::from(MAX_DURATION_MINUTES)),
        ),
    ]);

    Schema::object(vec![
        Property::required("date", Schema::formatted(Format::Date)),
        Property::required("timezone", Schema::string().len(Some(1), Some(TIMEZONE_MAX_CHARS))),
        Property::required("focus_task_id", id()).nullable(),
        Property::required("mini_task_ids", Schema::array(id()).len(None, Some(MAX_MINIS))),
        Property::required("suggested_blocks", Schema::array(block).len(None, Some(MAX_BLOCKS))),
        Property::required(
            "reasoning_brief",
            Schema::string().len(None, Some(MAX_REASONING_CHARS)),
        ),
        Property::required("confidence", confidence()),
    ])
});

pub static EXTRACTION: Lazy<Schema> = Lazy::new(|| {
    let item = Schema::object(vec![
        Property::required("kind", Schema::one_of(ITEM_KINDS)),
        Property::required("title", title()),
        Property::optional("duration_min_minutes", duration_bound()).nullable(),
        Property::optional("duration_max_minutes", duration_bound()).nullable(),
        Property::optional("estimation_source", Schema::one_of(ESTIMATION_SOURCES)).nullable(),
        Property::optional("importance", Schema::one_of(IMPORTANCE)).nullable(),
        Property::optional("energy_type", Schema::one_of(ENERGY_TYPES)).nullable(),
        Property::required("confidence", confidence()),
        Property::optional("due_at", Schema::formatted(Format::DateTime)).nullable(),
    ]);
    let question = Schema::object(vec![
        Property::required("item_index", Schema::integer(0, MAX_EXTRACTED_ITEMS as i64 - 1)),
        Property::required("text", Schema::string().len(Some(1), Some(QUESTION_MAX_CHARS))),
    ]);

    Schema::object(vec![
        Property::required(
            "items",
            Schema::array(item).len(None, Some(MAX_EXTRACTED_ITEMS)),
        ),
        Property::optional("questions", Schema::array(question).len(None, Some(MAX_QUESTIONS))),
    ])
});

pub static TASK: Lazy<Schema> = Lazy::new(|| {
    Schema::object(vec![
        Property::required("id", id()),
        Property::required("title", title()),
        Property::optional("description", Schema::string()).nullable(),
        Property::optional("status", Schema::one_of(TASK_STATUSES)),
        Property::required("created_at", Schema::formatted(Format::DateTime)),
        Property::required("updated_at", Schema::formatted(Format::DateTime)),
        Property::optional("completed_at", Schema::formatted(Format::DateTime)).nullable(),
        Property::optional("due_at", Schema::formatted(Format::DateTime)).nullable(),
        Property::optional("duration_min_minutes", duration_bound()).nullable(),
        Property::optional("duration_max_minutes", duration_bound()).nullable(),
        Property::optional("estimation_source", Schema::one_of(ESTIMATION_SOURCES)),
        Property::optional("importance", Schema::one_of(IMPORTANCE)),
        Property::optional("energy_type", Schema::one_of(ENERGY_TYPES)).nullable(),
        Property::optional("source_note_id", id()).nullable(),
        Property::optional("day_plan_id", id()).nullable(),
    ])
});
