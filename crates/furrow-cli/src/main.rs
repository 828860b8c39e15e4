//! Furrow CLI Application
//!
//! Command-line interface for the Furrow crop-care planner.

mod args;
mod cli;
mod renderer;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use furrow_core::{params::Upcoming, CommandOracle, PlannerBuilder};
use jiff::tz::TimeZone;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        user,
        lang,
        country,
        tz,
        oracle_command,
        oracle_args,
        oracle_timeout_secs,
        now,
        command,
    } = Args::parse();

    let mut builder = PlannerBuilder::new()
        .with_database_path(database_file)
        .with_user(user)
        .with_language(lang)
        .with_country(country);

    if let Some(name) = tz {
        let time_zone =
            TimeZone::get(&name).with_context(|| format!("Unknown time zone '{name}'"))?;
        builder = builder.with_time_zone(time_zone);
    }
    if let Some(program) = oracle_command {
        info!("Using oracle command '{program}'");
        let oracle = CommandOracle::new(program)
            .with_args(oracle_args)
            .with_timeout(Duration::from_secs(oracle_timeout_secs));
        builder = builder.with_oracle(Arc::new(oracle));
    }
    if let Some(now) = now {
        builder = builder.with_fixed_now(now);
    }

    let planner = builder
        .build()
        .await
        .context("Failed to initialize planner")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(planner, renderer);

    info!("Furrow started");

    match command {
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Tasks { command }) => cli.handle_task_command(command).await,
        Some(Notify(args)) => cli.notify(&args).await,
        Some(Sweep) => cli.sweep().await,
        None => cli.upcoming(&Upcoming::default()).await,
    }
}
