//! Core library for the Furrow crop-care planner.
//!
//! This crate turns a crop, a planting date and an area into a persisted care
//! plan (watering cadences, recurring field work and dated milestones) and
//! expands those rules into concrete dated tasks on demand.
//!
//! # Architecture
//!
//! - **Generation** ([`oracle`], [`heuristic`]): plan content comes from an
//!   external oracle, consulted at most once per plan, or from deterministic
//!   crop-family tables
//! - **Expansion** ([`expand`]): pure mapping of rules onto calendar dates
//! - **Queries** ([`query`], [`notify`]): cross-plan agendas, watering amount
//!   hints and device reminder projection
//! - **Storage** ([`db`]): one SQLite row per plan, rules stored as JSON
//! - **Presentation** ([`display`]): markdown `Display` impls rendered by the
//!   CLI's terminal renderer
//!
//! # Quick Start
//!
//! ```rust
//! use furrow_core::{params::{ListPlans, UpsertPlan, Upcoming}, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .with_user(Some("farmer-1"))
//!     .build()
//!     .await?;
//!
//! let id = planner
//!     .upsert_plan(&UpsertPlan {
//!         crop_name: "Okra".to_string(),
//!         area_acres: 1.0,
//!         planting_date: "2024-02-01".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("Plan {id} is ready");
//!
//! let agenda = planner.upcoming(&Upcoming::default()).await?;
//! println!("{agenda}");
//!
//! let plans = planner.list_plans_summary(&ListPlans::default()).await?;
//! for plan in &plans {
//!     println!("Plan: {}", plan.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod db;
pub mod display;
pub mod error;
pub mod expand;
pub mod heuristic;
pub mod models;
pub mod notify;
pub mod oracle;
pub mod params;
pub mod planner;
pub mod query;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, LocalDateTime, Notifications, OperationStatus, PlanDetails,
    PlanSummaries, TaskList, UpdateResult,
};
pub use error::{PlannerError, Result};
pub use models::{
    CadenceRule, EveryDays, Language, LocalizedText, OneOffTask, Plan, PlanFilter, PlanSource,
    PlanStatus, PlanSummary, TaskInstance, TaskKind, TimeOfDay,
};
pub use notify::{NotificationSink, ScheduledNotification};
pub use oracle::{CommandOracle, GenerationOracle, OracleError};
pub use params::{
    DeletePlan, ExpandTasks, ListPlans, PlanRef, ProjectNotifications, TasksOnDate, Upcoming,
    UpsertPlan,
};
pub use planner::{Planner, PlannerBuilder};
pub use query::Agenda;
