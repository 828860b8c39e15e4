//! High-level planner API for crop-care plans.
//!
//! The [`Planner`] is the central coordinator between callers and the
//! database. It owns the caller identity, the display language, the local
//! time zone and the optional generation oracle, and implements every
//! user-facing operation on top of the pure [`crate::expand`],
//! [`crate::heuristic`], [`crate::query`] and [`crate::notify`] modules.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │    Database     │
//! │ (plan_handlers) │───▶│ (plan_ops,      │───▶│   (via db/)     │
//! │                 │    │  task_ops, ...) │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`plan_ops`]: Plan generation, lookup, status transitions and cleanup
//! - [`plan_handlers`]: Plan operations returning display wrappers
//! - [`task_ops`]: Expansion of plans into task instances and agendas
//! - [`notify_ops`]: Reminder projection and synchronisation
//!
//! Every database access opens its own connection on tokio's blocking pool.
//!
//! # Usage
//!
//! ```rust
//! use furrow_core::{params::UpsertPlan, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("furrow.db"))
//!     .with_user(Some("farmer-1"))
//!     .build()
//!     .await?;
//!
//! let id = planner
//!     .upsert_plan(&UpsertPlan {
//!         crop_type: "cereal".to_string(),
//!         crop_name: "Rice".to_string(),
//!         area_acres: 2.5,
//!         planting_date: "2024-06-01".to_string(),
//!         expected_harvest_date: None,
//!     })
//!     .await?;
//! assert!(id.starts_with("plan_"));
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use jiff::{civil::Date, tz::TimeZone, Timestamp};
use tokio::task;

use crate::{
    db::Database,
    error::{PlannerError, Result},
    models::Language,
    oracle::GenerationOracle,
};

pub mod builder;
pub mod notify_ops;
pub mod plan_handlers;
pub mod plan_ops;
pub mod task_ops;

#[cfg(test)]
mod tests;

pub use builder::PlannerBuilder;

/// Source of the current instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// The system clock
    #[default]
    System,
    /// A frozen instant, for reproducible runs
    Fixed(Timestamp),
}

impl Clock {
    pub fn now(&self) -> Timestamp {
        match self {
            Clock::System => Timestamp::now(),
            Clock::Fixed(instant) => *instant,
        }
    }
}

/// Main planner interface for managing plans and their tasks.
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) user_id: Option<String>,
    pub(crate) language: Language,
    pub(crate) country: String,
    pub(crate) time_zone: TimeZone,
    pub(crate) clock: Clock,
    pub(crate) oracle: Option<Arc<dyn GenerationOracle>>,
}

impl Planner {
    /// Language used to resolve titles and notes.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Time zone used for "today" and reminder triggers.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// The caller identity, if one was configured.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Today's date in the planner's time zone.
    pub fn today(&self) -> Date {
        self.now().to_zoned(self.time_zone.clone()).date()
    }

    pub(crate) fn require_user(&self, operation: &'static str) -> Result<String> {
        self.user_id
            .clone()
            .ok_or(PlannerError::Unauthenticated { operation })
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    pub(crate) async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
