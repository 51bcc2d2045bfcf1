//! Day planning command.

use chrono::{DateTime, Utc};
use clap::Args;
use focusplan_core::{confirm_plan, validate_serialized, DayPlan, DayPlanner, PayloadKind, Task};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{load_config, read_json};

#[derive(Args)]
pub struct PlanArgs {
    /// JSON file holding an array of tasks
    #[arg(long)]
    tasks: PathBuf,
    /// Reference time (RFC 3339); defaults to now
    #[arg(long)]
    at: Option<DateTime<Utc>>,
    /// Override the working-day start hour
    #[arg(long)]
    start: Option<u32>,
    /// Override the working-day end hour
    #[arg(long)]
    end: Option<u32>,
    /// Override the buffer after each block, in minutes
    #[arg(long)]
    buffer: Option<u32>,
    /// Also move the planned tasks to scheduled
    #[arg(long)]
    confirm: bool,
}

#[derive(Serialize)]
struct ConfirmedOutput {
    plan_id: String,
    plan: DayPlan,
    tasks: Vec<Task>,
}

pub fn run(args: PlanArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?.scheduling;
    if let Some(start) = args.start {
        config.working_hours_start = start;
    }
    if let Some(end) = args.end {
        config.working_hours_end = end;
    }
    if let Some(buffer) = args.buffer {
        config.buffer_minutes = buffer;
    }

    let tasks: Vec<Task> = read_json(&args.tasks)?;
    for task in &tasks {
        task.check_invariants()?;
    }
    let reference = args.at.unwrap_or_else(Utc::now);
    let plan = DayPlanner::new(config)?.plan(&tasks, reference);

    let report = validate_serialized(&plan, PayloadKind::DayPlan);
    if !report.valid {
        for issue in &report.errors {
            tracing::error!(path = %issue.path, keyword = %issue.keyword, "{}", issue.message);
        }
        return Err("planner produced an invalid plan".into());
    }

    if args.confirm {
        let plan_id = plan.default_id();
        let tasks = confirm_plan(&plan_id, &plan, &tasks, reference)?;
        let output = ConfirmedOutput { plan_id, plan, tasks };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }
    Ok(())
}
