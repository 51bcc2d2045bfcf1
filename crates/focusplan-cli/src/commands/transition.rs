//! Guarded status changes for entities stored as JSON files.

use clap::{Args, ValueEnum};
use focusplan_core::{transition, Event, Idea, InboxNote, Lifecycle, Task};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::read_json;

#[derive(Clone, Copy, ValueEnum)]
pub enum EntityKind {
    Task,
    Event,
    Idea,
    Inbox,
}

#[derive(Args)]
pub struct TransitionArgs {
    /// Entity kind
    #[arg(value_enum)]
    kind: EntityKind,
    /// JSON file holding the entity
    file: PathBuf,
    /// Target status (e.g. "scheduled", "confirmed", "archived")
    status: String,
    /// Write the updated entity back to the file
    #[arg(long)]
    write: bool,
}

pub fn run(args: TransitionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let updated = match args.kind {
        EntityKind::Task => apply::<Task>(&args.file, &args.status)?,
        EntityKind::Event => apply::<Event>(&args.file, &args.status)?,
        EntityKind::Idea => apply::<Idea>(&args.file, &args.status)?,
        EntityKind::Inbox => apply::<InboxNote>(&args.file, &args.status)?,
    };
    if args.write {
        std::fs::write(&args.file, &updated)?;
    }
    println!("{updated}");
    Ok(())
}

fn apply<E>(path: &Path, status: &str) -> Result<String, Box<dyn std::error::Error>>
where
    E: Lifecycle + Serialize + DeserializeOwned,
    E::Status: DeserializeOwned,
{
    let entity: E = read_json(path)?;
    let to: E::Status = serde_json::from_value(serde_json::Value::String(status.to_string()))
        .map_err(|_| format!("unknown status: {status}"))?;
    let updated = transition(&entity, to)?;
    Ok(serde_json::to_string_pretty(&updated)?)
}
