//! Parameter structures for Furrow operations.
//!
//! These are the inputs to [`crate::Planner`] methods, kept free of CLI
//! framework derives. Interface layers (the `furrow` binary, tests, embedding
//! applications) build them directly or convert their own argument structs
//! via `From`.
//!
//! Dates arrive as strings and are validated by the planner, so a malformed
//! date is reported as an `InvalidInput` error naming the offending field
//! rather than failing at the interface boundary.

use serde::{Deserialize, Serialize};

/// Default look-ahead for upcoming tasks and notifications, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Parameters for creating (or retrieving) a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPlan {
    /// Free-text crop category, e.g. "cereal"
    #[serde(default)]
    pub crop_type: String,
    /// Crop name, e.g. "Basmati rice" (required)
    pub crop_name: String,
    /// Cultivated area in acres; must be positive
    pub area_acres: f64,
    /// ISO-8601 calendar date
    pub planting_date: String,
    /// Optional ISO-8601 harvest date overriding the crop's maturity length
    #[serde(default)]
    pub expected_harvest_date: Option<String>,
}

/// Parameters for operations addressing one plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanRef {
    /// The plan id, e.g. `plan_1f2e3d4c5b6a7988`
    pub id: String,
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlans {
    /// Show completed plans instead of active ones
    #[serde(default)]
    pub completed: bool,
    /// Only plans whose crop name contains this text
    #[serde(default)]
    pub crop: Option<String>,
}

/// Parameters for permanently deleting a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePlan {
    pub id: String,
    /// Deletion is refused unless explicitly confirmed
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for expanding a plan over an explicit date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpandTasks {
    pub plan_id: String,
    /// ISO-8601 start date (inclusive)
    pub from: String,
    /// ISO-8601 end date (inclusive)
    pub to: String,
}

/// Parameters for the upcoming-tasks agenda.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upcoming {
    /// Days after today to include
    pub window_days: u32,
}

impl Default for Upcoming {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Parameters for the tasks of one plan on one day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksOnDate {
    pub plan_id: String,
    /// ISO-8601 calendar date
    pub date: String,
}

/// Parameters for projecting a plan's reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectNotifications {
    pub plan_id: String,
    /// Days after today to include
    pub window_days: u32,
}
