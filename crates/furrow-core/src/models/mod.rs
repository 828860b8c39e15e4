//! Data models for plans, rules and task instances.
//!
//! This module contains the core domain models of the Furrow crop-care
//! planner. Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures separate from
//! presentation logic.
//!
//! # Model Overview
//!
//! - [`Plan`]: the persisted schedule for one crop, planting date and area
//! - [`CadenceRule`]: a `(start_day, end_day, every_days)` rule; watering
//!   rules and recurring task rules share this shape
//! - [`OneOffTask`]: a task bound to one calendar date
//! - [`TaskInstance`]: a dated occurrence derived from a rule, never stored
//! - [`LocalizedText`]: one text slot per supported [`Language`]
//!
//! # Examples
//!
//! ```rust
//! use furrow_core::models::{Language, LocalizedText, Plan};
//! use jiff::civil::date;
//!
//! let a = Plan::derive_id("Basmati  Rice", date(2024, 6, 1), 2.0);
//! let b = Plan::derive_id("basmati rice", date(2024, 6, 1), 2.001);
//! assert_eq!(a, b);
//!
//! let title = LocalizedText::english("Rice care plan");
//! assert_eq!(title.resolve(Language::Hi), Some("Rice care plan"));
//! ```

pub mod filters;
pub mod instance;
pub mod locale;
pub mod plan;
pub mod rules;
pub mod status;
pub mod summary;


pub use filters::PlanFilter;
pub use instance::TaskInstance;
pub use locale::{Language, LocalizedText};
pub use plan::{default_title, normalize_crop_name, Plan, PlanContent};
pub use rules::{
    dedup_one_off_tasks, CadenceRule, ClockTime, EveryDays, OneOffTask, TaskKind, TimeOfDay,
};
pub use status::{PlanSource, PlanStatus};
pub use summary::PlanSummary;
