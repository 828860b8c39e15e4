//! Plan summary types and functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Language, Plan, PlanSource, PlanStatus};

/// Compact view of a plan for list output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: String,
    /// Title resolved in the planner's language
    pub title: String,
    pub crop_name: String,
    pub area_acres: f64,
    pub status: PlanStatus,
    pub source: Option<PlanSource>,
    pub planting_date: Date,
    pub expected_harvest_date: Date,
    pub updated_at: Timestamp,
    /// Number of rules across all collections
    pub rule_count: usize,
}

impl PlanSummary {
    /// Create a PlanSummary from a Plan, resolving its title in `language`
    pub fn from_plan(plan: &Plan, language: Language) -> Self {
        Self {
            id: plan.id.clone(),
            title: plan.display_title(language),
            crop_name: plan.crop_name.clone(),
            area_acres: plan.area_acres,
            status: plan.status,
            source: plan.source,
            planting_date: plan.planting_date,
            expected_harvest_date: plan.expected_harvest_date,
            updated_at: plan.updated_at,
            rule_count: plan.rule_count(),
        }
    }
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        Self::from_plan(plan, Language::default())
    }
}
