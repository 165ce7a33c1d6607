//! `rehearsal` CLI — conflict checks, recurrence planning and slot synthesis
//! over JSON files.
//!
//! ## Usage
//!
//! ```sh
//! # Expand a weekly recurrence request into dates (stdin → stdout)
//! cat request.json | rehearsal expand
//!
//! # Classify one candidate activity against the existing roster
//! rehearsal check -i check.json
//!
//! # Check every occurrence of a recurrence request; exit 2 on critical conflicts
//! rehearsal plan -i plan.json --fail-on-critical
//!
//! # Offer bookable slots, with a custom configuration
//! rehearsal --config rehearsal.toml slots -i slots.json -o candidates.json
//!
//! # Show free ranges inside availability windows
//! rehearsal free -i free.json
//! ```

mod config;
mod logging;

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rehearsal_engine::{
    check_recurrence_with, classify_with, expand_occurrences, format_date, free_ranges_across,
    synthesize_with, Activity, AvailabilityWindow, Interval, RecurrenceRequest,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Exit status when `--fail-on-critical` trips.
const EXIT_CRITICAL: i32 = 2;

#[derive(Parser)]
#[command(
    name = "rehearsal",
    version,
    about = "Rehearsal and lesson scheduling: conflicts, recurrences and free slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (engine defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions at debug level to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a weekly recurrence request into its dates
    Expand {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Classify a candidate activity against existing activities
    Check {
        #[command(flatten)]
        io: IoArgs,
        /// Exit with status 2 when any finding is critical
        #[arg(long)]
        fail_on_critical: bool,
    },
    /// Expand a recurrence request and classify every occurrence
    Plan {
        #[command(flatten)]
        io: IoArgs,
        /// Exit with status 2 when any occurrence has a critical finding
        #[arg(long)]
        fail_on_critical: bool,
    },
    /// Synthesize bookable candidate slots from availability windows
    Slots {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Compute free ranges inside availability windows
    Free {
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(clap::Args)]
struct IoArgs {
    /// Input JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Deserialize)]
struct CheckInput {
    candidate: Activity,
    #[serde(default)]
    existing: Vec<Activity>,
}

#[derive(Deserialize)]
struct PlanInput {
    request: RecurrenceRequest,
    #[serde(default)]
    existing: Vec<Activity>,
}

#[derive(Deserialize)]
struct SlotsInput {
    windows: Vec<AvailabilityWindow>,
    #[serde(default)]
    occupied: Vec<Interval>,
    #[serde(default)]
    already_chosen: Vec<Interval>,
    #[serde(default)]
    durations: Option<Vec<u32>>,
}

#[derive(Deserialize)]
struct FreeInput {
    windows: Vec<AvailabilityWindow>,
    #[serde(default)]
    occupied: Vec<Interval>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose).context("Failed to initialize logging")?;
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Expand { io } => {
            let request: RecurrenceRequest = read_json(&io)?;
            let dates: Vec<String> = expand_occurrences(&request)
                .into_iter()
                .map(format_date)
                .collect();
            write_json(&io, &dates)?;
        }
        Commands::Check {
            io,
            fail_on_critical,
        } => {
            let input: CheckInput = read_json(&io)?;
            let report = classify_with(&input.candidate, &input.existing, &config.classifier);
            write_json(&io, &report)?;
            if fail_on_critical && report.has_critical() {
                warn!(candidate = %input.candidate.id, "critical conflict found");
                process::exit(EXIT_CRITICAL);
            }
        }
        Commands::Plan {
            io,
            fail_on_critical,
        } => {
            let input: PlanInput = read_json(&io)?;
            let plan = check_recurrence_with(&input.request, &input.existing, &config.classifier);
            write_json(&io, &plan)?;
            if fail_on_critical && plan.has_critical() {
                warn!(
                    group = %input.request.group_id,
                    blocked = plan.blocked_dates().len(),
                    "critical conflicts found"
                );
                process::exit(EXIT_CRITICAL);
            }
        }
        Commands::Slots { io } => {
            let input: SlotsInput = read_json(&io)?;
            let durations = input
                .durations
                .unwrap_or_else(|| config.slots.durations.clone());
            let slots = synthesize_with(
                &input.windows,
                &input.occupied,
                &input.already_chosen,
                &durations,
                &config.slots.options(),
            );
            write_json(&io, &slots)?;
        }
        Commands::Free { io } => {
            let input: FreeInput = read_json(&io)?;
            let free = free_ranges_across(&input.windows, &input.occupied);
            write_json(&io, &free)?;
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(io: &IoArgs) -> Result<T> {
    let raw = read_input(io.input.as_ref())?;
    serde_json::from_str(&raw).context("Failed to parse input JSON")
}

fn write_json<T: Serialize>(io: &IoArgs, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    write_output(io.output.as_ref(), &json)
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
