use std::path::PathBuf;

use clap::{Parser, Subcommand};
use furrow_core::models::Language;
use jiff::Timestamp;

use crate::cli::{NotifyArgs, PlanCommands, TaskCommands};

/// Crop-care planner for the command line
///
/// Furrow builds a care plan (watering cadences, field work and dated
/// milestones) for a crop planted on a given date, then answers "what is due
/// today" and "what is due this week" across all of a grower's plans.
#[derive(Parser)]
#[command(version, about, name = "furrow")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/furrow/furrow.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Identity that owns the plans
    #[arg(long, global = true, env = "FURROW_USER")]
    pub user: Option<String>,

    /// Language for plan and task text (en, hi, pa)
    #[arg(long, global = true, default_value = "en")]
    pub lang: Language,

    /// Country sent to the plan generator
    #[arg(long, global = true, default_value = "IN")]
    pub country: String,

    /// IANA time zone for "today" and reminder times. Defaults to the system
    /// time zone
    #[arg(long, global = true)]
    pub tz: Option<String>,

    /// Program that generates plans, reading a JSON request on stdin and
    /// writing a JSON plan on stdout. Without it plans are built from
    /// built-in crop tables
    #[arg(long, global = true, env = "FURROW_ORACLE_COMMAND")]
    pub oracle_command: Option<String>,

    /// Extra argument passed to the oracle command (repeatable)
    #[arg(long = "oracle-arg", global = true, allow_hyphen_values = true)]
    pub oracle_args: Vec<String>,

    /// Seconds to wait for the oracle command before falling back
    #[arg(long, global = true, default_value_t = 30)]
    pub oracle_timeout_secs: u64,

    /// Pretend the current instant is this RFC 3339 timestamp
    #[arg(long, global = true, hide = true)]
    pub now: Option<Timestamp>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Furrow CLI
///
/// - `plan`: create, inspect, complete and delete crop plans
/// - `tasks`: dated tasks across plans or for one plan
/// - `notify`: reminders a device would schedule for one plan
/// - `sweep`: remove plans whose season ended
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Show tasks
    #[command(alias = "t")]
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Show the reminders for a plan
    #[command(alias = "n")]
    Notify(NotifyArgs),
    /// Delete plans whose cleanup date has passed
    Sweep,
}
