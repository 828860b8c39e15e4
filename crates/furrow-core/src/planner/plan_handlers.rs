//! Plan handler operations that return formatted wrapper types for the Planner.

use super::Planner;
use crate::{
    display::{CreateResult, DeleteResult, PlanSummaries, UpdateResult},
    error::{PlannerError, Result},
    models::{PlanFilter, PlanSummary},
    params::{DeletePlan, ListPlans, PlanRef, UpsertPlan},
};

impl Planner {
    /// Handle creating a plan, returning it for display.
    ///
    /// Calling this again with the same crop, date and area shows the
    /// existing plan.
    ///
    /// ```rust,no_run
    /// # use furrow_core::{params::UpsertPlan, PlannerBuilder};
    /// # async {
    /// let planner = PlannerBuilder::new().with_user(Some("farmer-1")).build().await?;
    /// let created = planner
    ///     .create_plan_result(&UpsertPlan {
    ///         crop_name: "Wheat".to_string(),
    ///         area_acres: 4.0,
    ///         planting_date: "2024-11-15".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .await?;
    /// println!("{created}");
    /// # Result::<(), furrow_core::PlannerError>::Ok(())
    /// # };
    /// ```
    pub async fn create_plan_result(&self, params: &UpsertPlan) -> Result<CreateResult> {
        let id = self.upsert_plan(params).await?;
        let plan = self.require_plan(&id).await?;
        Ok(CreateResult::new(plan, self.language))
    }

    /// Handle listing plans as summaries with titles in the planner's
    /// language.
    pub async fn list_plans_summary(&self, params: &ListPlans) -> Result<PlanSummaries> {
        let plans = self.list_plans(PlanFilter::from(params)).await?;
        let summaries: Vec<PlanSummary> = plans
            .iter()
            .map(|plan| PlanSummary::from_plan(plan, self.language))
            .collect();
        Ok(PlanSummaries(summaries))
    }

    /// Handle marking a plan completed.
    pub async fn complete_plan_result(&self, params: &PlanRef) -> Result<UpdateResult> {
        let plan = self.complete_plan(params).await?;
        Ok(UpdateResult::with_changes(
            plan,
            self.language,
            vec!["Marked as completed".to_string()],
        ))
    }

    /// Handle permanently deleting a plan with confirmation.
    ///
    /// Uses get-before-delete so the deleted plan can be shown.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidInput` if `confirmed` is false and
    /// `PlannerError::PlanNotFound` if there is no such plan.
    pub async fn delete_plan(&self, params: &DeletePlan) -> Result<DeleteResult> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input("confirmed").with_reason(
                "Plan deletion requires explicit confirmation. Set 'confirmed' to true to proceed with permanent deletion.",
            ));
        }

        let plan_ref = PlanRef {
            id: params.id.clone(),
        };
        let plan = self.require_plan(&params.id).await?;
        self.delete_plan_by_id(&plan_ref).await?;
        Ok(DeleteResult::new(plan, self.language))
    }
}
