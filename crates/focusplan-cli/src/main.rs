use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "focusplan-cli", version, about = "Focusplan CLI")]
struct Cli {
    /// Config file to use instead of ~/.config/focusplan/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan one day from a task list
    Plan(commands::plan::PlanArgs),
    /// Estimate how long a task title will take
    Estimate {
        /// Task title, e.g. "Quick call with Anna" or "Write report 90 min"
        title: String,
    },
    /// Apply a guarded status change to an entity stored as JSON
    Transition(commands::transition::TransitionArgs),
    /// Check a JSON payload against its wire schema
    Validate {
        /// Payload kind
        #[arg(value_enum)]
        kind: commands::validate::Kind,
        /// JSON file to check
        file: PathBuf,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("FOCUSPLAN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args, config),
        Commands::Estimate { title } => commands::estimate::run(&title),
        Commands::Transition(args) => commands::transition::run(args),
        Commands::Validate { kind, file } => commands::validate::run(kind, &file),
        Commands::Config { action } => commands::config::run(action, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
