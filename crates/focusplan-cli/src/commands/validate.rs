use clap::ValueEnum;
use focusplan_core::PayloadKind;
use std::path::Path;

use super::read_json;

#[derive(Clone, Copy, ValueEnum)]
pub enum Kind {
    Plan,
    Extraction,
    Task,
}

impl From<Kind> for PayloadKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Plan => PayloadKind::DayPlan,
            Kind::Extraction => PayloadKind::Extraction,
            Kind::Task => PayloadKind::Task,
        }
    }
}

/// Print the validation report; exit with 1 when the payload is invalid.
pub fn run(kind: Kind, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let value: serde_json::Value = read_json(file)?;
    let report = PayloadKind::from(kind).validate(&value);
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}
