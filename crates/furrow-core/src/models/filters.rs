//! Filter types for querying plans.

use super::PlanStatus;

/// Filter options for querying plans.
#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    /// Filter by plan status; `None` returns every status
    pub status: Option<PlanStatus>,

    /// Filter by crop name (case-insensitive partial match)
    pub crop_contains: Option<String>,
}

impl PlanFilter {
    /// Filter for plans that are still in season.
    pub fn active() -> Self {
        Self {
            status: Some(PlanStatus::Active),
            ..Default::default()
        }
    }
}

impl From<&crate::params::ListPlans> for PlanFilter {
    /// Convert ListPlans parameters to a PlanFilter for plan queries.
    ///
    /// ```rust
    /// use furrow_core::{models::{PlanFilter, PlanStatus}, params::ListPlans};
    ///
    /// let params = ListPlans { completed: true, crop: Some("rice".into()) };
    /// let filter: PlanFilter = (&params).into();
    /// assert_eq!(filter.status, Some(PlanStatus::Completed));
    /// assert_eq!(filter.crop_contains.as_deref(), Some("rice"));
    /// ```
    fn from(params: &crate::params::ListPlans) -> Self {
        Self {
            status: Some(if params.completed {
                PlanStatus::Completed
            } else {
                PlanStatus::Active
            }),
            crop_contains: params.crop.clone(),
        }
    }
}
